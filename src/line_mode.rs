use anyhow::{Context, Result};
use rpncalc::calc_engine::{format_postfix, Calculator, EvaluationTrace};
use rpncalc::stream_mode::split_details;
use std::io::{self, stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Expression: ";

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

enum Submitted {
    Line(String),
    Quit,
}

/// Minimal line editor state: text plus a cursor counted in chars.
#[derive(Default)]
struct Editor {
    text: String,
    cursor: usize,
}

impl Editor {
    fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    fn insert(&mut self, c: char) {
        let idx = char_index_to_byte_index(&self.text, self.cursor);
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    fn remove_at_cursor(&mut self) {
        let idx = char_index_to_byte_index(&self.text, self.cursor);
        if let Some(c) = self.text[idx..].chars().next() {
            self.text.drain(idx..idx + c.len_utf8());
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at_cursor();
        }
    }

    fn column(&self) -> u16 {
        let prefix = &self.text[..char_index_to_byte_index(&self.text, self.cursor)];
        u16::try_from(PROMPT.len() + prefix.width() + 1).unwrap_or(u16::MAX)
    }
}

pub fn run_line() -> Result<()> {
    println!("RPN Console Calculator");
    println!("Supports: +, -, * and / with parentheses and unary minus");
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Special commands: 'quit' to exit, 'clear' to reset history");
    println!("Add 'details' before expression for the postfix form and each step\n");

    let mut stdout = stdout().into_raw_mode().context("terminal does not support raw mode")?;
    let mut calc = Calculator::new();
    let mut history: Vec<String> = Vec::new();

    loop {
        let line = match read_line(&mut stdout, &history)? {
            Submitted::Line(line) => line,
            Submitted::Quit => break,
        };

        let input = line.trim();
        if input.is_empty() {
            write!(stdout, "\r\n")?;
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "clear" | "reset" => {
                history.clear();
                write!(stdout, "\r\nHistory cleared\r\n\r\n")?;
                continue;
            }
            _ => {}
        }

        history.push(input.to_string());
        respond(&mut calc, input, &mut stdout)?;
    }

    write!(stdout, "\r\nGoodbye!\r\n")?;
    stdout.flush()?;
    Ok(())
}

/// Evaluates one submitted line, honoring the `details` keyword.
fn respond<W: Write>(calc: &mut Calculator, input: &str, out: &mut W) -> io::Result<()> {
    let (detailed_mode, expression) = split_details(input);
    if expression.is_empty() {
        return write!(out, "\r\n  Please enter a valid expression after 'details'\r\n\r\n");
    }

    let mut trace = EvaluationTrace::new(detailed_mode);
    match calc.evaluate_detailed(expression, &mut trace) {
        Ok((postfix, value)) => {
            write!(out, "\r\n  {} = {}\r\n", expression, value)?;
            if detailed_mode {
                write!(out, "  RPN: {}\r\n", format_postfix(&postfix))?;
                for (i, step) in trace.steps.iter().enumerate() {
                    write!(out, "  Step {}: {} = {}\r\n", i + 1, step.operation, step.result)?;
                }
            }
            write!(out, "\r\n")
        }
        Err(e) => write!(out, "\r\n  {} = Error: {}\r\n\r\n", expression, e),
    }
}

fn read_line<W: Write>(stdout: &mut W, history: &[String]) -> Result<Submitted> {
    let mut editor = Editor::default();
    let mut history_index = history.len();

    write!(stdout, "{}{}", ClearLine, PROMPT)?;
    stdout.flush()?;
    let (_, row) = stdout.cursor_pos()?;

    let stdin = stdin();
    let mut keys = stdin.keys();

    loop {
        write!(stdout, "{}{}{}{}", Goto(1, row), ClearLine, PROMPT, editor.text)?;
        write!(stdout, "{}", Goto(editor.column(), row))?;
        stdout.flush()?;

        let Some(key) = keys.next() else {
            return Ok(Submitted::Quit);
        };

        match key? {
            Key::Char('\n') => return Ok(Submitted::Line(editor.text)),
            Key::Ctrl('c') | Key::Ctrl('d') => return Ok(Submitted::Quit),
            Key::Char(c) => editor.insert(c),
            Key::Backspace => editor.backspace(),
            Key::Delete => editor.remove_at_cursor(),
            Key::Left if editor.cursor > 0 => editor.cursor -= 1,
            Key::Right if editor.cursor < editor.text.chars().count() => editor.cursor += 1,
            Key::Home => editor.cursor = 0,
            Key::End => editor.cursor = editor.text.chars().count(),
            Key::Up if history_index > 0 => {
                history_index -= 1;
                editor.set(&history[history_index]);
            }
            Key::Down if history_index < history.len() => {
                history_index += 1;
                match history.get(history_index) {
                    Some(entry) => editor.set(entry),
                    None => editor.set(""),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_multibyte_text() {
        let mut editor = Editor::default();
        for c in "1÷2".chars() {
            editor.insert(c);
        }
        editor.cursor = 2;
        editor.backspace();
        editor.insert('/');
        assert_eq!(editor.text, "1/2");
        assert_eq!(editor.cursor, 2);
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut editor = Editor::default();
        editor.set("12");
        editor.remove_at_cursor();
        assert_eq!(editor.text, "12");
    }

    #[test]
    fn column_follows_cursor() {
        let mut editor = Editor::default();
        editor.set("2+2");
        assert_eq!(editor.column() as usize, PROMPT.len() + 4);
        editor.cursor = 0;
        assert_eq!(editor.column() as usize, PROMPT.len() + 1);
    }

    #[test]
    fn column_saturates_on_long_input() {
        let mut editor = Editor::default();
        editor.set(&"9".repeat(70_000));
        assert_eq!(editor.column(), u16::MAX);
    }

    fn respond_to(input: &str) -> String {
        let mut out = Vec::new();
        respond(&mut Calculator::new(), input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bare_details_asks_for_expression() {
        assert_eq!(
            respond_to("details"),
            "\r\n  Please enter a valid expression after 'details'\r\n\r\n"
        );
    }

    #[test]
    fn details_prints_rpn_and_steps() {
        assert_eq!(
            respond_to("details 2*3+4"),
            "\r\n  2*3+4 = 10\r\n  RPN: 2 3 * 4 +\r\n  Step 1: 2 * 3 = 6\r\n  Step 2: 6 + 4 = 10\r\n\r\n"
        );
        assert_eq!(
            respond_to("5/0"),
            "\r\n  5/0 = Error: Eval error: division by zero\r\n\r\n"
        );
    }
}
