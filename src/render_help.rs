use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, scroll: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" RPN Calc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "RPN Calc - infix expressions evaluated through reverse Polish notation",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Operators (highest precedence first):"),
        Line::from("  -x : Unary minus     (e.g., --3 = 3, -(2+3) = -5)"),
        Line::from("  *  : Multiplication  (e.g., 6 * 7 = 42)"),
        Line::from("  /  : Division        (e.g., 7 / 2 = 3.5)"),
        Line::from("  +  : Addition        (e.g., 5 + 3 = 8)"),
        Line::from("  -  : Subtraction     (e.g., 10 - 4 = 6)"),
        Line::from("  Binary operators of equal precedence group left to right."),
        Line::from(""),
        heading("Numbers:"),
        Line::from("  Decimal literals such as 42, 0.5, .25 or 7."),
        Line::from(""),
        heading("Errors:"),
        Line::from("  Lexer error  : invalid number or unexpected character"),
        Line::from("  Parser error : misplaced operator/operand or unbalanced parentheses"),
        Line::from("  Eval error   : division by zero"),
        Line::from(""),
        heading("Commands:"),
        Line::from("  details <expression> : Show postfix form, each step and time"),
        Line::from("  clear : Clear calculation history"),
        Line::from("  help  : Show this help screen"),
        Line::from("  quit  : Exit the calculator"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ← →        : Move cursor left/right"),
        Line::from("  Ctrl+←/→   : Move cursor by words"),
        Line::from("  Home/End   : Move to start/end of line"),
        Line::from("  ↑ ↓        : Navigate calculation history"),
        Line::from("  PgUp/PgDn  : Page through history"),
        Line::from("  Ctrl+U     : Clear current input"),
        Line::from("  Mouse wheel: Scroll through history"),
        Line::from("  Esc / F1   : Close this screen"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  3 + 4 * 2 / (1 - 5)"),
        Line::from("  details ((2+3)*(4+5)-6)/(1+2)"),
        Line::from("  .5 + .25"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
