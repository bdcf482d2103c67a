//! Small helpers for picking CSS-style values out of strings.

use std::ops::Range;

/// Finds the first `name(...)` function in `s`.
///
/// Returns the arguments between the parentheses and the byte range of the
/// whole function, including its name. The closing parenthesis is the first
/// one after the opening parenthesis.
pub(crate) fn find_function<'a>(s: &'a str, name: &str) -> Option<(&'a str, Range<usize>)> {
    let start = s.find(name).and_then(|start| {
        let open = start + name.len();
        if s[open..].starts_with('(') {
            Some(start)
        } else {
            // The name matched without a parenthesis; keep looking past it.
            find_function(&s[open..], name).map(|(_, range)| range.start + open)
        }
    })?;
    let args_start = start + name.len() + 1;
    let args_end = args_start + s[args_start..].find(')')?;
    Some((&s[args_start..args_end], start..args_end + 1))
}

/// Strips matching runs of quotes around a value, e.g. `"a.jpg"` or `'a.jpg'`.
pub(crate) fn unquote(s: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let s = s.trim();
    if s.len() >= 2 && s.starts_with(is_quote) && s.ends_with(is_quote) {
        s.trim_matches(is_quote)
    } else {
        s
    }
}
