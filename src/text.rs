//! Text input and the word-level clean-up applied before layout.

use serde::{Deserialize, Serialize};

use crate::TextTransform;

pub mod layout;

/// Text to lay out: a single paragraph or a list of paragraphs.
///
/// Paragraphs are always laid out on separate lines. Deserializes from a
/// JSON string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Paragraph(String),
    Paragraphs(Vec<String>),
}

impl Text {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        let paragraphs: &[String] = match self {
            Text::Paragraph(paragraph) => std::slice::from_ref(paragraph),
            Text::Paragraphs(paragraphs) => paragraphs,
        };
        paragraphs.iter().map(String::as_str)
    }
}

impl From<&str> for Text {
    fn from(paragraph: &str) -> Self {
        Text::Paragraph(paragraph.to_owned())
    }
}

impl From<String> for Text {
    fn from(paragraph: String) -> Self {
        Text::Paragraph(paragraph)
    }
}

impl From<Vec<String>> for Text {
    fn from(paragraphs: Vec<String>) -> Self {
        Text::Paragraphs(paragraphs)
    }
}

/// Fixes up characters that commonly arrive mangled from URLs and word
/// processors.
///
/// `1amp1` (in any case) becomes `&`, curly quotes become straight quotes,
/// and underscores, newlines, carriage returns and tabs are removed.
pub fn sanitize(text: &str) -> String {
    let text = replace_ignore_ascii_case(text, "1amp1", "&");
    text.chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '_' | '\n' | '\r' | '\t' => None,
            c => Some(c),
        })
        .collect()
}

/// Replaces every occurrence of the lower-case ASCII `pattern`, ignoring the
/// ASCII case of `text`.
fn replace_ignore_ascii_case(text: &str, pattern: &str, replacement: &str) -> String {
    // ASCII lower-casing keeps byte offsets intact.
    let lower = text.to_ascii_lowercase();
    let mut replaced = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(pattern) {
        replaced.push_str(&text[last..start]);
        replaced.push_str(replacement);
        last = start + pattern.len();
    }
    replaced.push_str(&text[last..]);
    replaced
}

pub fn transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_owned(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => {
            let mut capitalized = String::with_capacity(text.len());
            let mut word_start = true;
            for c in text.chars() {
                if word_start {
                    capitalized.extend(c.to_uppercase());
                } else {
                    capitalized.push(c);
                }
                word_start = c.is_whitespace();
            }
            capitalized
        }
    }
}

/// Splits a paragraph into cleaned-up, transformed words. Words that end up
/// empty are skipped.
pub(crate) fn words(
    paragraph: &str,
    text_transform: TextTransform,
) -> impl Iterator<Item = String> + '_ {
    paragraph
        .split_whitespace()
        .map(move |word| transform(&sanitize(word), text_transform))
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes() {
        assert_eq!(sanitize("Tom 1amp1 Jerry"), "Tom & Jerry");
        assert_eq!(sanitize("R1AMP1D"), "R&D");
        assert_eq!(sanitize("it\u{2019}s \u{2018}ok\u{2019}"), "it's 'ok'");
        assert_eq!(sanitize("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(sanitize("snake_case"), "snakecase");
        assert_eq!(sanitize("a\tb\r\nc"), "abc");
        assert_eq!(sanitize("café"), "café");
    }

    #[test]
    fn transforms() {
        assert_eq!(transform("hello World", TextTransform::Uppercase), "HELLO WORLD");
        assert_eq!(transform("Hello World", TextTransform::Lowercase), "hello world");
        assert_eq!(transform("hello wide world", TextTransform::Capitalize), "Hello Wide World");
        assert_eq!(transform("éclair", TextTransform::Capitalize), "Éclair");
        assert_eq!(transform("as-is", TextTransform::None), "as-is");
    }

    #[test]
    fn splits_words() {
        let words: Vec<String> =
            words("  one\ttwo  ___ 1amp1 ", TextTransform::Uppercase).collect();
        assert_eq!(words, vec!["ONE", "TWO", "&"]);
    }

    #[test]
    fn paragraphs() {
        let text = Text::from("single");
        assert_eq!(text.paragraphs().collect::<Vec<_>>(), vec!["single"]);

        let text: Text = serde_json::from_str(r#"["first", "second"]"#).unwrap();
        assert_eq!(text.paragraphs().collect::<Vec<_>>(), vec!["first", "second"]);

        let text: Text = serde_json::from_str(r#""just one""#).unwrap();
        assert_eq!(text, Text::Paragraph("just one".to_owned()));
    }
}
