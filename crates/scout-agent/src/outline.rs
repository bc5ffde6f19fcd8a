//! Markdown heading outline extraction for the evolving article.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

fn depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// One `#`-prefixed line per heading, in document order, with the `#`
/// count matching the heading level.
pub fn extract_outline(markdown: &str) -> String {
    let mut outline = String::new();
    let mut current: Option<(usize, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((depth(level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    outline.push_str(&"#".repeat(level));
                    outline.push(' ');
                    outline.push_str(text.trim());
                    outline.push('\n');
                }
            }
            _ => {}
        }
    }
    outline
}
