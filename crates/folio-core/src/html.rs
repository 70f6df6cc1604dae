//! HTML text escaping for values interpolated into widget markup.

use std::fmt;

/// Escape `& < > " '` so `value` can be placed in element text or a
/// quoted attribute.
///
/// Anything `Display` is accepted and formatted first. `&` is handled in
/// the same single pass as the other characters, so entities introduced
/// here are never escaped again. Escaping is not idempotent: feeding the
/// output back in turns every `&` into `&amp;` once more.
pub fn escape_html(value: &(impl fmt::Display + ?Sized)) -> String {
    let text = value.to_string();
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
