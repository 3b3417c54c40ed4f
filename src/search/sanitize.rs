//! Escaping of free-text queries before they are used as store patterns.

use std::borrow::Cow;

/// Characters that the store's pattern operator would otherwise treat as syntax.
///
/// Virus names routinely carry parenthesised host annotations, e.g.
/// `simian adenovirus 27 (chimpanzee)`.
const ESCAPED: &[char] = &['+', '[', ']', '(', ')'];

/// Escape `+ [ ] ( )` with a backslash, leaving everything else (including
/// existing backslashes) untouched.
///
/// Returns `Cow::Borrowed` when the input needs no escaping.
pub fn sanitize(input: &str) -> Cow<'_, str> {
    if !input.contains(ESCAPED) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if ESCAPED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Escape every `{` or `}` that is not part of a `{m}`, `{m,}` or `{m,n}`
/// counted repetition.
///
/// The store's pattern dialect reads such braces as literal text while `regex`
/// rejects them, so `VP1 {` would otherwise fail to compile. Backslash escapes
/// are copied through untouched.
pub fn literal_braces(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }

    let mut out = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        let len = match c {
            '\\' => rest.chars().take(2).map(char::len_utf8).sum(),
            '{' => counted_repetition_len(rest),
            _ => 0,
        };
        if len > 0 {
            out.push_str(&rest[..len]);
            rest = &rest[len..];
            continue;
        }
        if matches!(c, '{' | '}') {
            out.push('\\');
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

/// Byte length of the counted repetition at the start of `s`, or 0 if there is none.
fn counted_repetition_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let min = digits(1);
    if min == 0 {
        return 0;
    }
    let mut end = 1 + min;
    if bytes.get(end) == Some(&b',') {
        end += 1;
        end += digits(end);
    }
    if bytes.get(end) == Some(&b'}') { end + 1 } else { 0 }
}
