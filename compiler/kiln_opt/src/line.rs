//! Source lines and the output buffer.

use kiln_ir::TokenList;
use kiln_lexer::{classify, lex, LineFlags, LineKind};

/// One input line, lexed and classified.
#[derive(Clone, Debug)]
pub struct SourceLine<'a> {
    /// Line content without its terminator.
    pub text: &'a str,
    /// `"\n"`, `"\r\n"`, or empty for a final unterminated line.
    pub terminator: &'a str,
    pub tokens: TokenList,
    pub flags: LineFlags,
}

impl<'a> SourceLine<'a> {
    /// Lex and classify one raw line, terminator included.
    pub fn new(raw: &'a str) -> Self {
        let (text, terminator) = split_terminator(raw);
        let tokens = lex(text);
        let flags = classify(text, tokens.as_slice());
        SourceLine {
            text,
            terminator,
            tokens,
            flags,
        }
    }

    pub fn kind(&self) -> LineKind {
        self.flags.kind()
    }

    /// Leading whitespace.
    pub fn indent(&self) -> &'a str {
        let body = self.text.trim_start();
        &self.text[..self.text.len() - body.len()]
    }
}

fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(text) = raw.strip_suffix("\r\n") {
        (text, &raw[text.len()..])
    } else if let Some(text) = raw.strip_suffix('\n') {
        (text, &raw[text.len()..])
    } else {
        (raw, "")
    }
}

/// Split source into lines, keeping each line's terminator.
pub fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source.split_inclusive('\n').map(SourceLine::new)
}

/// A line written to the output.
#[derive(Clone, Debug, PartialEq, Eq)]
struct EmittedLine {
    text: String,
    declares: bool,
}

/// Optimized lines accumulated for one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    lines: Vec<EmittedLine>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer { lines: Vec::new() }
    }

    /// Append a line; `text` carries its own terminator.
    pub fn push(&mut self, text: String, flags: LineFlags) {
        self.lines.push(EmittedLine {
            text,
            declares: flags.contains(LineFlags::INT_DECLARATION),
        });
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the last `var int` line at or after `start`.
    pub fn last_declaration_since(&self, start: usize) -> Option<usize> {
        let tail = self.lines.get(start..)?;
        tail.iter().rposition(|line| line.declares).map(|i| start + i)
    }

    /// Insert lines before index `at`, clamped to the buffer length.
    pub fn insert_lines(&mut self, at: usize, texts: impl IntoIterator<Item = String>) {
        let at = at.min(self.lines.len());
        let new_lines = texts.into_iter().map(|text| EmittedLine {
            text,
            declares: false,
        });
        self.lines.splice(at..at, new_lines);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    /// Concatenate every line into the final text.
    pub fn into_text(self) -> String {
        self.lines.into_iter().map(|line| line.text).collect()
    }
}
