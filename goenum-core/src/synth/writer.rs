//! Tab-indented line writer for generated Go code.

#[derive(Debug, Default)]
pub struct GoWriter {
    buf: String,
    indent: usize,
}

impl GoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.buf.push('\t');
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Writes a line and indents the following ones.
    pub fn open(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text);
        self.indent += 1;
        self
    }

    /// Dedents, then writes a line.
    pub fn close(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.line(text)
    }

    /// Adjusts indentation without writing (for `case` bodies).
    pub fn indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    pub fn doc(&mut self, text: impl AsRef<str>) -> &mut Self {
        for l in text.as_ref().lines() {
            self.line(format!("// {l}"));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finished text without the final newline.
    pub fn finish(mut self) -> String {
        while self.buf.ends_with('\n') {
            self.buf.pop();
        }
        self.buf
    }
}

/// Quotes `text` as a Go interpreted string literal.
pub fn go_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
