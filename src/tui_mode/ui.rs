use super::app::App;
use super::helpers::{format_number, format_with_spaces, highlight_expression, wrap_text};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app.help_scroll);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => {
                    handle_key_event(app, code, modifiers)
                }
                Event::Mouse(mouse) => handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('u') | KeyCode::Char('U') if ctrl => app.clear_input(),
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_char(),
        KeyCode::Left if ctrl => app.move_cursor_by_words(-1),
        KeyCode::Right if ctrl => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => {
            app.cursor_position = 0;
            app.input_scroll = 0;
        }
        KeyCode::End => app.cursor_position = app.input.chars().count(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::Enter => app.submit(),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let scroll = if app.show_help { &mut app.help_scroll } else { &mut app.history_scroll };
    match mouse.kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let area = frame.size();

    app.terminal_too_small = area.width < MIN_TERMINAL_WIDTH || area.height < MIN_TERMINAL_HEIGHT;
    if app.terminal_too_small {
        render_resize_message(frame, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_input(frame, app, layout[0]);
    render_status(frame, layout[1]);
    render_history(frame, app, layout[2]);
    app.list_height = layout[2].height as usize;
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            format!(
                "Terminal too small! Min size: {}x{}. Current: {}x{}",
                MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Please resize your terminal window", Style::default().fg(Color::Yellow))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Indented, wrapped detail lines below a history entry.
fn push_detail(items: &mut Vec<ListItem<'static>>, text: &str, width: usize, style: Style) {
    for (i, line) in wrap_text(text, width).into_iter().enumerate() {
        let prefix = if i == 0 { "    - " } else { "      " };
        items.push(ListItem::new(Line::from(Span::styled(format!("{}{}", prefix, line), style))));
    }
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty = Paragraph::new("No calculations yet. Enter an expression to see results here.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let wrap_width = inner.width.saturating_sub(6) as usize;
    let step_style = Style::default().fg(Color::DarkGray);
    let mut items: Vec<ListItem<'static>> = Vec::new();
    app.item_start_indices.clear();

    for (i, entry) in app.history.iter().enumerate() {
        app.item_start_indices.push(items.len());

        let base_style = Style::default().fg(if i == app.cursor_history { Color::Yellow } else { Color::Cyan });
        let expression = format_with_spaces(&entry.input);

        for (line_idx, line) in wrap_text(&expression, wrap_width).into_iter().enumerate() {
            let mut spans = vec![if line_idx == 0 {
                Span::styled("> ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            }];
            spans.extend(highlight_expression(&line, base_style));

            if line_idx == 0 {
                spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                spans.push(match &entry.result {
                    Ok(value) => Span::styled(
                        format_number(*value),
                        Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
                    ),
                    Err(e) => Span::styled(
                        format!("Error: {}", e),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                });
            }
            items.push(ListItem::new(Line::from(spans)));
        }

        if entry.detailed_mode {
            if let Some(postfix) = &entry.postfix {
                push_detail(&mut items, &format!("RPN: {}", postfix), wrap_width, Style::default().fg(Color::Blue));
            }
            for (j, step) in entry.detailed_steps.iter().enumerate() {
                let text = format!("Step {}: {} = {}", j + 1, step.operation, format_number(step.result));
                push_detail(&mut items, &text, wrap_width, step_style);
            }
            let time = format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0);
            push_detail(&mut items, &time, wrap_width, Style::default().fg(Color::Magenta));
        }

        if i + 1 < app.history.len() {
            items.push(ListItem::new(Line::from(Span::styled(
                "-".repeat(inner.width as usize),
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner.height as usize);
        app.scroll_to_bottom = false;
    }
    app.history_scroll = app.history_scroll.min(items.len().saturating_sub(1));

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default()
        .with_selected(app.item_start_indices.get(app.cursor_history).copied())
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner, &mut state);
}

fn render_status(frame: &mut Frame, area: Rect) {
    let keys = [
        ("Enter", "Calculate"),
        ("Up/Down or PgUp/PgDn", "Navigate"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear Input"),
        ("Ctrl+C", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {} ", desc), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner.width.saturating_sub(2) as usize;
    let total_chars = app.input.chars().count();
    app.adjust_input_scroll(visible_width);

    let visible: String = app.input.chars().skip(app.input_scroll).take(visible_width).collect();
    frame.render_widget(Paragraph::new(format!("> {}", visible)), inner);

    let visible_cursor = app.cursor_position.saturating_sub(app.input_scroll);
    let prefix: String = visible.chars().take(visible_cursor).collect();
    let offset = u16::try_from(prefix.width()).unwrap_or(u16::MAX);
    frame.set_cursor(inner.x.saturating_add(2).saturating_add(offset), inner.y);

    let indicator_style = Style::default().fg(Color::DarkGray);
    if app.input_scroll > 0 {
        frame.render_widget(Paragraph::new("<").style(indicator_style), Rect::new(inner.x, inner.y, 1, 1));
    }
    if total_chars > app.input_scroll + visible_width {
        frame.render_widget(
            Paragraph::new(">").style(indicator_style),
            Rect::new(inner.x + inner.width - 1, inner.y, 1, 1),
        );
    }
}
