//! Heuristic repair of malformed model output
//!
//! Model responses arrive wrapped in code fences, surrounded by commentary,
//! or cut off by the token limit. Each of these is handled by one
//! [`RepairPass`]; a [`RepairPipeline`] runs an ordered list of passes so
//! strategies can be composed and tested in isolation. Smaller deviations
//! (trailing commas, single quotes, comments) are left to the JSON5 parser.

use std::fmt;
use tracing::debug;

/// One text transformation applied before parsing
pub trait RepairPass: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Transform the text. Must be idempotent.
    fn apply(&self, input: &str) -> String;
}

/// Ordered list of repair passes
#[derive(Debug)]
pub struct RepairPipeline {
    passes: Vec<Box<dyn RepairPass>>,
}

/// Result of running a pipeline, with the passes that changed the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Repaired text
    pub text: String,
    /// Names of passes that modified the text, in order
    pub applied: Vec<&'static str>,
}

impl RepairPipeline {
    /// An empty pipeline (text passes through unchanged)
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// The standard pipeline: fences, slice, dangling string, balance
    pub fn standard() -> Self {
        Self::empty()
            .with_pass(StripCodeFences)
            .with_pass(SliceToObject)
            .with_pass(CloseDanglingString)
            .with_pass(BalanceBrackets)
    }

    /// Append a pass
    pub fn with_pass(mut self, pass: impl RepairPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Names of the configured passes, in order
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass and return the repaired text
    pub fn repair(&self, raw: &str) -> String {
        self.repair_traced(raw).text
    }

    /// Run every pass, recording which ones changed the text
    pub fn repair_traced(&self, raw: &str) -> RepairOutcome {
        let mut text = raw.to_string();
        let mut applied = Vec::new();

        for pass in &self.passes {
            let next = pass.apply(&text);
            if next != text {
                debug!(pass = pass.name(), before = text.len(), after = next.len(), "Repair pass modified response");
                applied.push(pass.name());
                text = next;
            }
        }

        RepairOutcome { text, applied }
    }
}

impl Default for RepairPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lexical position at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Lexical {
    #[default]
    Code,
    /// Inside a string opened with this quote character
    Str(char),
    LineComment,
    BlockComment,
}

/// Transient bracket counts for one repair attempt
///
/// Only structural characters count: braces and brackets inside string
/// literals (single or double quoted) and comments are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairState {
    /// `{` seen outside strings
    pub open_braces: usize,
    /// `}` seen outside strings
    pub close_braces: usize,
    /// `[` seen outside strings
    pub open_brackets: usize,
    /// `]` seen outside strings
    pub close_brackets: usize,
    lexical: Lexical,
    pending_escape: bool,
    /// Openers not yet matched by a closer, innermost last
    unclosed: Vec<char>,
}

impl RepairState {
    /// Scan text and count structural brackets
    pub fn scan(text: &str) -> Self {
        let mut state = Self::default();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match state.lexical {
                Lexical::Str(quote) => {
                    if state.pending_escape {
                        state.pending_escape = false;
                    } else if ch == '\\' {
                        state.pending_escape = true;
                    } else if ch == quote {
                        state.lexical = Lexical::Code;
                    }
                }
                Lexical::LineComment => {
                    if ch == '\n' {
                        state.lexical = Lexical::Code;
                    }
                }
                Lexical::BlockComment => {
                    if ch == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        state.lexical = Lexical::Code;
                    }
                }
                Lexical::Code => match ch {
                    '"' | '\'' => state.lexical = Lexical::Str(ch),
                    '/' if chars.peek() == Some(&'/') => {
                        chars.next();
                        state.lexical = Lexical::LineComment;
                    }
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        state.lexical = Lexical::BlockComment;
                    }
                    '{' => {
                        state.open_braces += 1;
                        state.unclosed.push('{');
                    }
                    '[' => {
                        state.open_brackets += 1;
                        state.unclosed.push('[');
                    }
                    '}' => {
                        state.close_braces += 1;
                        state.match_closer('{');
                    }
                    ']' => {
                        state.close_brackets += 1;
                        state.match_closer('[');
                    }
                    _ => {}
                },
            }
        }

        state
    }

    /// Remove the innermost unclosed opener of this kind, if any
    fn match_closer(&mut self, opener: char) {
        if let Some(pos) = self.unclosed.iter().rposition(|&c| c == opener) {
            self.unclosed.remove(pos);
        }
    }

    /// Quote character of the string literal the text ends inside, if any
    pub fn open_quote(&self) -> Option<char> {
        match self.lexical {
            Lexical::Str(quote) => Some(quote),
            _ => None,
        }
    }

    /// Text ends inside a string literal
    pub fn in_string(&self) -> bool {
        self.open_quote().is_some()
    }

    /// Text ends with a backslash that escapes whatever comes next
    pub fn pending_escape(&self) -> bool {
        self.pending_escape
    }

    /// What closes the comment the text ends inside, if any
    pub fn open_comment_terminator(&self) -> Option<&'static str> {
        match self.lexical {
            Lexical::LineComment => Some("\n"),
            Lexical::BlockComment => Some("*/"),
            _ => None,
        }
    }

    /// Missing `}` count
    pub fn brace_deficit(&self) -> usize {
        self.open_braces.saturating_sub(self.close_braces)
    }

    /// Missing `]` count
    pub fn bracket_deficit(&self) -> usize {
        self.open_brackets.saturating_sub(self.close_brackets)
    }

    /// True if nothing needs closing
    pub fn is_balanced(&self) -> bool {
        self.brace_deficit() == 0 && self.bracket_deficit() == 0
    }

    /// Closers that bring opens and closes level, innermost first
    pub fn closing_suffix(&self) -> String {
        let mut braces = self.brace_deficit();
        let mut brackets = self.bracket_deficit();
        let mut suffix = String::with_capacity(braces + brackets);

        for &opener in self.unclosed.iter().rev() {
            match opener {
                '{' if braces > 0 => {
                    suffix.push('}');
                    braces -= 1;
                }
                '[' if brackets > 0 => {
                    suffix.push(']');
                    brackets -= 1;
                }
                _ => {}
            }
        }

        // Unmatched openers always cover the deficit; this only guards the
        // count invariant.
        suffix.extend(std::iter::repeat(']').take(brackets));
        suffix.extend(std::iter::repeat('}').take(braces));
        suffix
    }
}

/// Strip surrounding whitespace and code-fence delimiters
///
/// Handles ```` ```json ````, bare ```` ``` ````, partial fences such as
/// ```` `` ```` and stray backticks at either end of the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripCodeFences;

fn is_fence_line(line: &str) -> bool {
    let t = line.trim();
    t.starts_with("``")
        && t.trim_start_matches('`')
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl RepairPass for StripCodeFences {
    fn name(&self) -> &'static str {
        "strip_code_fences"
    }

    fn apply(&self, input: &str) -> String {
        let kept: Vec<&str> = input.lines().filter(|l| !is_fence_line(l)).collect();
        kept.join("\n").trim().trim_matches('`').trim().to_string()
    }
}

/// Slice to the span between the first `{` and the last `}`
///
/// Leading commentary is always dropped. Trailing text after the last `}` is
/// dropped only when that span is fully closed; an under-closed span means
/// the output was truncated, and the tail is kept for [`BalanceBrackets`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceToObject;

impl RepairPass for SliceToObject {
    fn name(&self) -> &'static str {
        "slice_to_object"
    }

    fn apply(&self, input: &str) -> String {
        let Some(start) = input.find('{') else {
            return input.to_string();
        };

        match input.rfind('}') {
            Some(end) if end > start => {
                let span = &input[start..=end];
                if RepairState::scan(span).is_balanced() {
                    span.to_string()
                } else {
                    input[start..].to_string()
                }
            }
            _ => input[start..].to_string(),
        }
    }
}

/// Close a string literal or comment left open by truncation
///
/// A dangling escape backslash is dropped so the added quote is not
/// swallowed by it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseDanglingString;

impl RepairPass for CloseDanglingString {
    fn name(&self) -> &'static str {
        "close_dangling_string"
    }

    fn apply(&self, input: &str) -> String {
        let state = RepairState::scan(input);
        let mut out = input.to_string();

        if let Some(quote) = state.open_quote() {
            if state.pending_escape() {
                out.pop();
            }
            out.push(quote);
        } else if let Some(terminator) = state.open_comment_terminator() {
            out.push_str(terminator);
        }
        out
    }
}

/// Append the missing `}` and `]` closers
///
/// The output always starts with the input and has equal structural open
/// and close counts for both kinds. Closing a truncated structure yields
/// valid syntax but not necessarily the structure the model intended.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceBrackets;

impl RepairPass for BalanceBrackets {
    fn name(&self) -> &'static str {
        "balance_brackets"
    }

    fn apply(&self, input: &str) -> String {
        let state = RepairState::scan(input);
        if state.is_balanced() {
            return input.to_string();
        }
        let mut out = input.to_string();
        out.push_str(&state.closing_suffix());
        out
    }
}
