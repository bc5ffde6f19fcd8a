//! Page fetching with HTML-to-text extraction.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use scout_core::{Error, PageFetcher};

/// Hard cap on extracted text; pages beyond this are truncated.
const MAX_TEXT_LEN: usize = 50_000;

pub struct HttpFetcher {
    client: Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("scout/0.1.0")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("failed to fetch '{url}': {e}")))?;

        if !response.status().is_success() {
            return Err(Error::fetch(format!(
                "HTTP error {}: {url}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::fetch(format!("failed to read response body: {e}")))?;

        let text = extract_page_text(&html);
        if text.is_empty() {
            return Err(Error::fetch(format!("no text content at '{url}'")));
        }
        Ok(text)
    }
}

/// Extract readable text from an HTML document, preferring main-content
/// containers and falling back to the whole body.
fn extract_page_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let main_selector = Selector::parse("main, article, .content, #content, .post, .entry").ok();
    let body_selector = Selector::parse("body").ok();

    let text = if let Some(selector) = main_selector {
        let main_content: Vec<_> = document.select(&selector).collect();
        if !main_content.is_empty() {
            main_content
                .into_iter()
                .map(|el| extract_text(&el))
                .collect::<Vec<_>>()
                .join("\n\n")
        } else if let Some(body_sel) = body_selector {
            document
                .select(&body_sel)
                .map(|el| extract_text(&el))
                .collect::<Vec<_>>()
                .join("\n\n")
        } else {
            extract_text(&document.root_element())
        }
    } else {
        extract_text(&document.root_element())
    };

    let mut cleaned = clean_text(&text);
    if cleaned.len() > MAX_TEXT_LEN {
        let mut cut = MAX_TEXT_LEN;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }
    cleaned
}

/// Extract text from an HTML element, filtering out scripts and chrome.
fn extract_text(element: &scraper::ElementRef) -> String {
    let mut text = String::new();

    for node in element.descendants() {
        if let Some(el) = node.value().as_element() {
            let tag = el.name();
            if matches!(
                tag,
                "script" | "style" | "nav" | "footer" | "header" | "aside" | "noscript"
            ) {
                continue;
            }
        }

        if let Some(t) = node.value().as_text() {
            let trimmed = t.trim();
            if !trimmed.is_empty() {
                if !text.is_empty() && !text.ends_with(' ') && !text.ends_with('\n') {
                    text.push(' ');
                }
                text.push_str(trimmed);
            }
        }
    }

    text
}

/// Collapse runs of whitespace; keep at most two consecutive newlines.
fn clean_text(text: &str) -> String {
    let mut result = String::new();
    let mut prev_was_whitespace = false;
    let mut newline_count = 0;

    for ch in text.chars() {
        if ch == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push('\n');
            }
            prev_was_whitespace = true;
        } else if ch.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
            newline_count = 0;
        } else {
            result.push(ch);
            prev_was_whitespace = false;
            newline_count = 0;
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_text_filters_scripts() {
        let html =
            "<html><body><p>Hello</p><script>evil()</script><p>World</p></body></html>";
        let text = extract_page_text(html);
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains("evil"));
    }

    #[test]
    fn test_extract_prefers_main_content() {
        let html = "<html><body><nav>menu</nav><main><p>The article body.</p></main></body></html>";
        let text = extract_page_text(html);
        assert!(text.contains("The article body."));
        assert!(!text.contains("menu"));
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        let cleaned = clean_text("  Hello   world  \n\n\n\n  Test  ");
        assert!(cleaned.contains("Hello world"));
        assert!(cleaned.contains("Test"));
        assert!(!cleaned.contains("\n\n\n"));
    }
}
