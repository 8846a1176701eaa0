const INDENT: &str = "    ";

/// Line-oriented text buffer with indentation.
#[derive(Debug, Default, Clone)]
pub struct CodeBuilder {
    out: String,
    indent: usize,
}

impl CodeBuilder {
    /// Empty builder at indentation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `s` on its own line at the current indentation.
    pub fn line(&mut self, s: &str) {
        if s.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    /// Writes each of `lines`.
    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for l in lines {
            self.line(l.as_ref());
        }
    }

    /// An empty line.
    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// `{`, then `body` one level deeper, then `close`.
    pub fn scope(&mut self, close: &str, body: impl FnOnce(&mut Self)) {
        self.line("{");
        self.indent();
        body(self);
        self.dedent();
        self.line(close);
    }

    /// Appends another builder's text at the current indentation.
    pub fn append(&mut self, other: &CodeBuilder) {
        for l in other.out.lines() {
            self.line(l);
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/code_builder.rs"]
mod tests;
