//! Output sink for rendered text
//!
//! Accumulates tokens into one string while tracking indentation depth and the
//! current column. Line breaks are deferred: a break only materializes (as
//! `\n` plus indentation) when something is written after it, so the finished
//! text never ends with a newline.
//!
//! Two write paths mirror the two kinds of text a renderer emits:
//! - [`OutputSink::token`]: static ASCII punctuation and keywords (fast path)
//! - [`OutputSink::text`]: dynamic text such as identifiers and literals,
//!   measured with Unicode display widths

use unicode_width::UnicodeWidthChar;

pub struct OutputSink {
    indent_unit: String,
    buffer: String,
    depth: usize,
    column: usize,
    line_number: usize,
    pending_line_break: bool,
}

impl OutputSink {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            buffer: String::with_capacity(256),
            depth: 0,
            column: 0,
            line_number: 1,
            pending_line_break: false,
        }
    }

    /// Write static ASCII text
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `token` is not ASCII or contains a line break.
    pub fn token(&mut self, token: &'static str) {
        debug_assert!(token.is_ascii(), "Token must be ASCII only, got: {token:?}");
        debug_assert!(
            !token.contains(['\n', '\r']),
            "Token cannot contain line breaks, use write_line instead: {token:?}"
        );
        if token.is_empty() {
            return;
        }
        self.flush_line_break();
        self.buffer.push_str(token);
        self.column += token.len();
    }

    /// Write dynamic text; embedded `\n` starts a new indented line
    pub fn text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line();
            }
            if line.is_empty() {
                continue;
            }
            self.flush_line_break();
            for c in line.chars() {
                match c {
                    '\r' => continue,
                    c => {
                        self.buffer.push(c);
                        self.column += c.width().unwrap_or(0);
                    }
                }
            }
        }
    }

    /// Alias of [`OutputSink::text`]
    pub fn write(&mut self, text: &str) {
        self.text(text);
    }

    /// Write `text` and end the line
    pub fn write_line(&mut self, text: &str) {
        self.text(text);
        self.new_line();
    }

    /// End the current line; the next write starts at the current depth
    pub fn new_line(&mut self) {
        if self.pending_line_break {
            // Consecutive breaks produce an empty line.
            self.buffer.push('\n');
            self.line_number += 1;
        }
        self.pending_line_break = true;
    }

    /// Run `f` one indentation level deeper
    ///
    /// The previous depth is restored however `f` returns, including early
    /// returns of an `Err` through `?` inside the closure.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.depth;
        self.depth += 1;
        let result = f(self);
        self.depth = saved;
        result
    }

    fn flush_line_break(&mut self) {
        if !self.pending_line_break {
            return;
        }
        self.pending_line_break = false;
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
            self.line_number += 1;
        }
        self.column = 0;
        for _ in 0..self.depth {
            self.buffer.push_str(&self.indent_unit);
            self.column += self
                .indent_unit
                .chars()
                .map(|c| if c == '\t' { 4 } else { 1 })
                .sum::<usize>();
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Display column where the next character lands
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Get the final text
    pub fn finish(self) -> String {
        self.buffer
    }
}
