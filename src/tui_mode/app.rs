use rpncalc::calc_engine::{format_postfix, CalcError, Calculator, EvaluationTrace, Step};
use rpncalc::stream_mode::split_details;
use std::time::{Duration, Instant};

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<f64, CalcError>,
    /// Postfix form of a successful evaluation.
    pub postfix: Option<String>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

pub struct App {
    calc: Calculator,
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new() -> Self {
        App {
            calc: Calculator::new(),
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();

        if self.cursor_position < self.input_scroll {
            self.input_scroll = self.cursor_position;
        } else if self.cursor_position >= self.input_scroll + visible_width {
            self.input_scroll = self.cursor_position + 1 - visible_width;
        }

        self.input_scroll = self.input_scroll.min(total_chars.saturating_sub(visible_width));
    }

    pub fn submit(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                self.should_quit = true;
                return;
            }
            "clear" | "reset" => {
                self.history.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.clear_input();
                return;
            }
            "help" => {
                self.show_help = true;
                self.clear_input();
                return;
            }
            _ => {}
        }

        let (detailed_mode, expression) = split_details(&input);
        if expression.is_empty() {
            // keep the keyword so an expression can still be typed after it
            return;
        }
        let entry = self.run(expression, detailed_mode);

        self.history.push(entry);
        self.cursor_history = self.history.len() - 1;
        self.scroll_to_bottom = true;
        self.clear_input();
    }

    fn run(&mut self, expression: &str, detailed_mode: bool) -> HistoryEntry {
        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed_mode);

        let (postfix, result) = match self.calc.evaluate_detailed(expression, &mut trace) {
            Ok((tokens, value)) => (Some(format_postfix(&tokens)), Ok(value)),
            Err(e) => (None, Err(e)),
        };

        HistoryEntry {
            input: expression.to_string(),
            result,
            postfix,
            detailed_steps: trace.steps,
            detailed_mode,
            duration: start_time.elapsed(),
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let chars: Vec<char> = self.input.chars().collect();
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            while pos > 0 && !chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
        } else {
            while pos < chars.len() && !chars[pos].is_whitespace() {
                pos += 1;
            }
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
        }
        self.cursor_position = pos;
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        self.input.insert(idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        let idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        if let Some(c) = self.input[idx..].chars().next() {
            self.input.drain(idx..idx + c.len_utf8());
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_char();
        }
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history + 1 < self.history.len() {
            self.cursor_history += 1;
        }
        self.recall_selected();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = (self.cursor_history + step).min(self.history.len().saturating_sub(1));
        }
        self.recall_selected();
    }

    fn recall_selected(&mut self) {
        match self.history.get(self.cursor_history) {
            Some(entry) => self.input = entry.input.clone(),
            None => self.input.clear(),
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    }
}
