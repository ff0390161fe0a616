//! [`Json`] tree → JSON text.
//!
//! Two layouts:
//!
//! - **Compact**: no whitespace at all, `,` and `:` as separators.
//! - **Indented**: one member per line, 2 spaces per nesting level, `": "`
//!   after keys. Empty containers stay on one line as `{}` / `[]`.
//!
//! Object keys always come out in ascending order, in both layouts, since
//! that is the order objects keep them in.
//!
//! Numbers: integral values print without a fractional part (`100`, not
//! `100.0`), others in plain decimal notation, never with an exponent.
//! NaN and the infinities have no JSON spelling and print as `null`, as do
//! absent values.

use std::fmt;
use std::io;

use crate::error::Result;
use crate::value::{Json, Node};

/// Output layout for [`Json::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Compact,
    Indented,
}

impl Json {
    pub fn render(&self, style: Style) -> String {
        let mut out = String::new();
        encode_value(self, style, &mut out);
        out
    }

    pub fn to_compact_string(&self) -> String {
        self.render(Style::Compact)
    }

    pub fn to_pretty_string(&self) -> String {
        self.render(Style::Indented)
    }

    /// Render into a writer. No trailing newline is added.
    pub fn write_to<W: io::Write>(&self, mut writer: W, style: Style) -> Result<()> {
        writer.write_all(self.render(style).as_bytes())?;
        Ok(())
    }
}

/// `{}` renders compact, `{:#}` renders indented.
impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if f.alternate() {
            Style::Indented
        } else {
            Style::Compact
        };
        f.write_str(&self.render(style))
    }
}

/// An open container: its members, the next one to write, and its closing
/// bracket.
struct Frame {
    members: Vec<(Option<String>, Json)>,
    cursor: usize,
    close: char,
}

/// Encode with an explicit stack, so documents built by hand may nest
/// deeper than the call stack would allow.
fn encode_value(root: &Json, style: Style, out: &mut String) {
    let mut stack = Vec::new();
    open_value(root, &mut stack, out);
    while let Some(frame) = stack.last_mut() {
        let Some((key, child)) = frame.members.get(frame.cursor).cloned() else {
            let close = frame.close;
            stack.pop();
            line_break(style, stack.len(), out);
            out.push(close);
            continue;
        };
        if frame.cursor > 0 {
            out.push(',');
        }
        frame.cursor += 1;
        line_break(style, stack.len(), out);
        if let Some(key) = key {
            encode_string(&key, out);
            out.push(':');
            if style == Style::Indented {
                out.push(' ');
            }
        }
        open_value(&child, &mut stack, out);
    }
}

/// Write a scalar or an empty container whole; open any other container and
/// push its frame.
fn open_value(value: &Json, stack: &mut Vec<Frame>, out: &mut String) {
    match value.node() {
        Node::Null | Node::Absent(_) => out.push_str("null"),
        Node::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Node::Number(n) => out.push_str(&format_number(*n)),
        Node::String(s) => encode_string(s, out),
        Node::Object(map) => {
            let map = map.borrow();
            if map.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            stack.push(Frame {
                members: map
                    .iter()
                    .map(|(key, child)| (Some(key.clone()), child.clone()))
                    .collect(),
                cursor: 0,
                close: '}',
            });
        }
        Node::Array(items) => {
            let items = items.borrow();
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            stack.push(Frame {
                members: items.iter().map(|child| (None, child.clone())).collect(),
                cursor: 0,
                close: ']',
            });
        }
    }
}

/// Newline plus indentation in indented mode, nothing in compact mode.
fn line_break(style: Style, depth: usize, out: &mut String) {
    if style == Style::Indented {
        out.push('\n');
        out.push_str(&make_indent(depth));
    }
}

/// `Display` for `f64` already drops a zero fraction and never uses
/// exponents; only non-finite values need special handling.
fn format_number(n: f64) -> String {
    if n.is_finite() {
        n.to_string()
    } else {
        "null".to_string()
    }
}

/// Quote and escape a string. `/` and non-ASCII characters are left alone.
fn encode_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// 2 spaces per level.
fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
