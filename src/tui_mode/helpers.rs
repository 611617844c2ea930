use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            lines.extend(split_by_width(word, width));
            continue;
        }

        if !current.is_empty() && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_by_width(word: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0;

    for c in word.chars() {
        let w = c.width_cjk().unwrap_or(1);
        if chunk_width + w > width && !chunk.is_empty() {
            chunks.push(std::mem::take(&mut chunk));
            chunk_width = 0;
        }
        chunk.push(c);
        chunk_width += w;
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

pub fn format_number(x: f64) -> String {
    if x.abs() > 1e10 || (x.abs() < 1e-5 && x != 0.0) {
        format!("{:.6e}", x)
    } else {
        let s = format!("{:.6}", x);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Normalizes spacing: one space around binary operators, none inside
/// parentheses or between a unary minus and its operand.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();
    // whether the last non-blank char ends an operand
    let mut after_operand = false;

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '+' | '-' | '*' | '/' if after_operand => {
                result.push(' ');
                result.push(c);
                result.push(' ');
                after_operand = false;
            }
            '(' | '+' | '-' | '*' | '/' => {
                result.push(c);
                after_operand = false;
            }
            ')' => {
                result.push(c);
                after_operand = true;
            }
            _ => {
                result.push(c);
                after_operand = true;
            }
        }
    }
    result
}

pub fn highlight_expression(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let operator_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let number_style = Style::default().fg(Color::LightGreen);
    let invalid_style = Style::default().fg(Color::Red).add_modifier(Modifier::UNDERLINED);

    let mut spans = Vec::new();
    let mut number = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        if !number.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut number), number_style));
        }

        let style = match c {
            '+' | '-' | '*' | '/' => operator_style,
            '(' | ')' | ' ' => base_style,
            _ => invalid_style,
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !number.is_empty() {
        spans.push(Span::styled(number, number_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing() {
        assert_eq!(format_with_spaces("3+4*2/(1-5)"), "3 + 4 * 2 / (1 - 5)");
        assert_eq!(format_with_spaces("-(2 +3)*-4"), "-(2 + 3) * -4");
        assert_eq!(format_with_spaces("  .5+ .25"), ".5 + .25");
    }

    #[test]
    fn numbers() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.75), "0.75");
        assert_eq!(format_number(-20.0), "-20");
        assert_eq!(format_number(1e12), "1.000000e12");
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap_text("1 + 2 + 3", 5), vec!["1 + 2", "+ 3"]);
        assert_eq!(wrap_text("123456", 4), vec!["1234", "56"]);
        assert_eq!(wrap_text("x", 0), vec![""]);
    }

    #[test]
    fn highlighting_groups_numbers() {
        let spans = highlight_expression("12.5+x", Style::default());
        let texts: Vec<_> = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(texts, vec!["12.5", "+", "x"]);
    }
}
