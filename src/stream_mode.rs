use crate::calc_engine::{format_postfix, Calculator, EvaluationTrace, Token};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    /// Print the postfix form and every applied operator after each result.
    pub details: bool,
    /// Suppress banner and prompt, for piped input.
    pub quiet: bool,
}

/// Reads one expression per line until EOF or an empty line and answers each
/// with its value or an `Error: ...` line.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W, options: StreamOptions) -> io::Result<()> {
    let mut calc = Calculator::new();

    if !options.quiet {
        writeln!(output, "Enter expression per line. Empty line or EOF to exit.")?;
    }

    let mut lines = input.lines();
    loop {
        if !options.quiet {
            write!(output, "> ")?;
            output.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.is_empty() {
            break;
        }

        answer(&mut calc, &line, &mut output, options.details)?;
    }

    output.flush()
}

/// Evaluates `expression` and writes the outcome. Evaluation errors are
/// reported, only I/O errors are returned.
pub fn answer<W: Write>(calc: &mut Calculator, expression: &str, output: &mut W, details: bool) -> io::Result<()> {
    let mut trace = EvaluationTrace::new(details);

    match calc.evaluate_detailed(expression, &mut trace) {
        Ok((postfix, value)) => write_value(output, value, &postfix, &trace),
        Err(e) => writeln!(output, "Error: {}", e),
    }
}

/// Writes a value, followed by the postfix form and steps when `trace` is
/// in detailed mode.
pub fn write_value<W: Write>(output: &mut W, value: f64, postfix: &[Token], trace: &EvaluationTrace) -> io::Result<()> {
    writeln!(output, "{}", value)?;
    if trace.detailed_mode {
        writeln!(output, "  rpn: {}", format_postfix(postfix))?;
        for (i, step) in trace.steps.iter().enumerate() {
            writeln!(output, "  step {}: {} = {}", i + 1, step.operation, step.result)?;
        }
    }
    Ok(())
}

/// Splits a leading or trailing `details` keyword (any case) off an input
/// line. The keyword on its own yields an empty expression.
pub fn split_details(input: &str) -> (bool, &str) {
    const KEYWORD: &str = "details";
    let n = KEYWORD.len();

    if input.trim().eq_ignore_ascii_case(KEYWORD) {
        return (true, "");
    }
    if input.get(..n).is_some_and(|p| p.eq_ignore_ascii_case(KEYWORD))
        && input[n..].starts_with(char::is_whitespace)
    {
        return (true, input[n..].trim());
    }
    if input.len() > n {
        let split = input.len() - n;
        if input.get(split..).is_some_and(|s| s.eq_ignore_ascii_case(KEYWORD))
            && input[..split].ends_with(char::is_whitespace)
        {
            return (true, input[..split].trim());
        }
    }
    (false, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(input: &str, options: StreamOptions) -> String {
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn quiet() -> StreamOptions {
        StreamOptions { quiet: true, ..Default::default() }
    }

    #[test]
    fn details_keyword() {
        assert_eq!(split_details("details 2+2"), (true, "2+2"));
        assert_eq!(split_details("2+2  DETAILS"), (true, "2+2"));
        assert_eq!(split_details("details "), (true, ""));
        assert_eq!(split_details("details"), (true, ""));
        assert_eq!(split_details("Details"), (true, ""));
        assert_eq!(split_details("detailsx"), (false, "detailsx"));
        assert_eq!(split_details("2+2"), (false, "2+2"));
        assert_eq!(split_details("÷÷÷÷ 1"), (false, "÷÷÷÷ 1"));
    }

    #[test]
    fn prints_results_and_errors() {
        let out = session("2+2\n5/0\n-(2+3)*4\n", quiet());
        assert_eq!(out, "4\nError: Eval error: division by zero\n-20\n");
    }

    #[test]
    fn stops_at_empty_line() {
        let out = session("1+1\n\n3+3\n", quiet());
        assert_eq!(out, "2\n");
    }

    #[test]
    fn continues_after_parse_error() {
        let out = session("(2+3\n.5 + .25\n", quiet());
        assert_eq!(out, "Error: Parser error: '(' without matching ')'\n0.75\n");
    }

    #[test]
    fn handles_crlf() {
        let out = session("7/2\r\n\r\n9\r\n", quiet());
        assert_eq!(out, "3.5\n");
    }

    #[test]
    fn prompt_and_banner() {
        let out = session("1\n", StreamOptions::default());
        assert_eq!(
            out,
            "Enter expression per line. Empty line or EOF to exit.\n> 1\n> "
        );
    }

    #[test]
    fn details_show_rpn_and_steps() {
        let options = StreamOptions { details: true, quiet: true };
        let out = session("2*3+4\n", options);
        assert_eq!(out, "10\n  rpn: 2 3 * 4 +\n  step 1: 2 * 3 = 6\n  step 2: 6 + 4 = 10\n");
    }

    #[test]
    fn detailed_errors_print_once() {
        let mut calc = Calculator::new();
        let mut out = Vec::new();
        answer(&mut calc, "5/(3-3)", &mut out, true).unwrap();
        answer(&mut calc, "", &mut out, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Eval error: division by zero\nError: Parser error: incomplete expression\n"
        );
    }
}
