//! Static document snapshots handed to the extraction engine.

use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Elements whose text never reaches the rendered page
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Everything the extractors need from one rendered page
///
/// Captured once after the page settled; extraction never goes back to the
/// live browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Final location after redirects
    pub url: String,
    /// Serialized DOM (`document.documentElement.outerHTML`)
    pub html: String,
    /// Flattened visible text (`document.body.innerText`)
    pub visible_text: String,
}

impl PageSnapshot {
    #[must_use]
    pub fn new(url: impl Into<String>, html: impl Into<String>, visible_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            visible_text: visible_text.into(),
        }
    }

    /// Build a snapshot from markup alone, approximating the visible text
    /// from the body's text nodes
    #[must_use]
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let visible_text = visible_text_of(&Html::parse_document(&html));
        Self {
            url: url.into(),
            html,
            visible_text,
        }
    }
}

/// Flatten the text of `<body>` one line per text node, skipping elements
/// that never render
#[must_use]
pub fn visible_text_of(document: &Html) -> String {
    let mut lines = Vec::new();
    if let Some(body) = document.select(&BODY_SELECTOR).next() {
        collect_text(body, &mut lines);
    }
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
            Node::Element(el) if INVISIBLE_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, lines);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_and_styles_are_not_visible() {
        let snapshot = PageSnapshot::from_html(
            "https://www.facebook.com/acme",
            "<html><head><title>Ignored</title></head><body>\
             <h1>Acme</h1><script>var likes = '9 likes';</script>\
             <style>p { color: red }</style><p>1,234 likes</p></body></html>",
        );
        assert_eq!(snapshot.visible_text, "Acme\n1,234 likes");
    }

    #[test]
    fn documents_without_body_text_are_empty() {
        let snapshot = PageSnapshot::from_html("https://www.facebook.com/acme", "");
        assert!(snapshot.visible_text.is_empty());
    }
}
