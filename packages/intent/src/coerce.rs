//! Literal handling for values captured from a message

use serde_json::{Number, Value};

const QUOTES: [(char, char); 5] = [('"', '"'), ('\'', '\''), ('`', '`'), ('“', '”'), ('‘', '’')];

/// A captured value with surrounding quotes or trailing punctuation removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Quoted(String),
    Bare(String),
}

impl Literal {
    /// Classify a captured value. A value wrapped in quotes becomes
    /// `Quoted` and is never coerced, so `"42"` stays the string `42`;
    /// anything else becomes `Bare` with trailing punctuation trimmed.
    /// `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        for (open, close) in QUOTES {
            if let Some(inner) = raw.strip_prefix(open) {
                if let Some(end) = inner.find(close) {
                    return Some(Literal::Quoted(inner[..end].to_string()));
                }
            }
        }

        let bare = raw.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ',' | ';') || c.is_whitespace());
        if bare.is_empty() {
            None
        } else {
            Some(Literal::Bare(bare.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Literal::Quoted(s) | Literal::Bare(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Literal::Quoted(s) | Literal::Bare(s) => s,
        }
    }

    /// Quoted literals stay strings; bare ones are coerced
    pub fn into_value(self) -> Value {
        match self {
            Literal::Quoted(s) => Value::String(s),
            Literal::Bare(s) => coerce(&s),
        }
    }
}

/// Numeric-looking text becomes a number, `true`/`false` a boolean
pub fn coerce(text: &str) -> Value {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            if trimmed.chars().any(|c| c.is_ascii_digit()) {
                return Value::Number(number);
            }
        }
    }

    Value::String(trimmed.to_string())
}
