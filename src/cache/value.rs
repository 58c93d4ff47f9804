//! Scalar values accepted by the cache
//!
//! Two renderings matter:
//!
//! - the **wire encoding** written to the store (`encode`), which follows
//!   what a Redis client sends for each scalar: UTF-8 text, raw bytes,
//!   decimal integers, shortest round-trip floats;
//! - the **literal form** used in call history (`literal`), e.g.
//!   `'Hello'`, `b'\x00'`, `1234`, `3.5`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// A scalar stored under a generated key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl StoredValue {
    /// Bytes written to the key-value store
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Text(s) => s.as_bytes().to_vec(),
            Self::Bytes(b) => b.clone(),
            Self::Int(i) => i.to_string().into_bytes(),
            Self::Float(f) => format!("{:?}", f).into_bytes(),
        }
    }

    /// Literal rendering used when recording call arguments
    pub fn literal(&self) -> String {
        match self {
            Self::Text(s) => text_literal(s),
            Self::Bytes(b) => bytes_literal(b),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{:?}", f),
        }
    }

    /// Short type label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&[u8]> for StoredValue {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for StoredValue {
    fn from(b: &[u8; N]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<i64> for StoredValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for StoredValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for StoredValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for StoredValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for StoredValue {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

/// Render positional arguments as a tuple literal: `()`, `(a,)`, `(a, b)`
pub fn args_literal(args: &[StoredValue]) -> String {
    match args {
        [] => "()".to_string(),
        [only] => format!("({},)", only.literal()),
        many => {
            let parts: Vec<String> = many.iter().map(StoredValue::literal).collect();
            format!("({})", parts.join(", "))
        }
    }
}

// Single quotes unless the text holds a single quote and no double quote.
fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

fn text_literal(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn bytes_literal(b: &[u8]) -> String {
    let quote = pick_quote(b.contains(&b'\''), b.contains(&b'"'));
    let mut out = String::with_capacity(b.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in b {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            byte if byte as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(byte as char),
            byte => {
                let _ = write!(out, "\\x{:02x}", byte);
            }
        }
    }
    out.push(quote);
    out
}
