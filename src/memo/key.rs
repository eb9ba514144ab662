//! Cache Key Builder
//!
//! Turns a logical operation name plus structured arguments into a stable
//! string key. Object fields are emitted in sorted order, so two argument
//! values that differ only in field order produce the same key.

use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;

/// Separator between the logical name and the encoded arguments.
pub const KEY_SEPARATOR: char = ':';

/// Builds `"{name}:{canonical args}"`.
pub fn build_key(name: &str, args: &Value) -> String {
    let mut key = String::with_capacity(name.len() + 32);
    key.push_str(name);
    key.push(KEY_SEPARATOR);
    write_canonical(&mut key, args);
    key
}

/// Like [`build_key`] for any serializable argument type.
///
/// Fails only when `args` cannot be represented as JSON (for example a map
/// with non-string keys).
pub fn build_key_from<A: Serialize + ?Sized>(
    name: &str,
    args: &A,
) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(args)?;
    Ok(build_key(name, &value))
}

/// Canonical JSON-like rendering of `value`.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_unstable_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (field, item)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, field);
                out.push(':');
                write_canonical(out, item);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
