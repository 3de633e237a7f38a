//! INDEX clause micro-parsing.
//!
//! The compiler hands the clause through as raw text. Accepted shapes:
//!
//! ```text
//! INDEX { ifIndex }
//! { ipAdEntAddr, ipAdEntIfIndex }
//! ifName, IMPLIED ifAlias
//! ```
//!
//! The `INDEX` keyword and braces are optional; commas and whitespace both
//! separate items; `IMPLIED` marks the item that follows it. Per SMI only
//! the final field may be variable-length, so an `IMPLIED` anywhere else
//! keeps the field and loses the flag.

/// One referenced name from a raw INDEX clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct IndexRef {
    pub name: String,
    pub implied: bool,
}

/// Parse a raw INDEX clause into referenced names, in declaration order.
/// Unparseable input degrades to an empty list.
pub(crate) fn parse_index_clause(raw: &str) -> Vec<IndexRef> {
    let mut trimmed = raw.trim();
    if let Some(rest) = strip_keyword(trimmed) {
        trimmed = rest;
    }
    let inner = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(open), Some(close)) if open < close => &trimmed[open + 1..close],
        _ => trimmed,
    };

    let mut refs: Vec<IndexRef> = Vec::new();
    let mut implied_pending = false;
    for token in inner.split([',', ' ', '\t', '\n', '\r']) {
        let token = token.trim_matches(|c| c == '{' || c == '}').trim();
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("IMPLIED") {
            implied_pending = true;
            continue;
        }
        refs.push(IndexRef {
            name: token.to_owned(),
            implied: implied_pending,
        });
        implied_pending = false;
    }

    // Only the final field may carry the variable-length marker.
    let last = refs.len().saturating_sub(1);
    for field in refs.iter_mut().take(last) {
        field.implied = false;
    }
    refs
}

/// Strip a leading `INDEX` keyword when it stands alone before the list.
fn strip_keyword(s: &str) -> Option<&str> {
    let rest = s.get(..5)?;
    if !rest.eq_ignore_ascii_case("INDEX") {
        return None;
    }
    let tail = &s[5..];
    match tail.chars().next() {
        None => Some(tail),
        Some(c) if c.is_whitespace() || c == '{' => Some(tail),
        Some(_) => None,
    }
}
