//! JavaScript evaluation scripts
//!
//! In-page scripts used by the Chromium rendering session. Extraction
//! itself runs in Rust against the captured snapshot; these only prepare
//! the page and capture it.

/// Readiness probe polled until the document is usable
pub const READY_STATE_SCRIPT: &str = r#"
    (() => ({
        readyState: document.readyState,
        bodyExists: document.body !== null
    }))()
"#;

/// Scroll halfway down to trigger lazy-loaded sections
pub const SCROLL_TO_MIDPOINT_SCRIPT: &str = r#"
    (() => {
        const height = document.body ? document.body.scrollHeight : 0;
        window.scrollTo(0, height / 2);
        return height;
    })()
"#;

/// Capture location, serialized DOM and rendered text in one round trip
pub const SNAPSHOT_SCRIPT: &str = r#"
    (() => ({
        url: window.location.href,
        html: document.documentElement ? document.documentElement.outerHTML : '',
        visibleText: document.body ? document.body.innerText : ''
    }))()
"#;

/// Script clicking every visible button whose text is exactly `label`;
/// evaluates to the number of clicks
#[must_use]
pub fn click_buttons_with_text_script(label: &str) -> String {
    // serde_json gives a correctly escaped JS string literal
    let literal = serde_json::to_string(label).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"
    (() => {{
        const label = {literal};
        let clicked = 0;
        document.querySelectorAll('button, [role="button"]').forEach(el => {{
            if ((el.innerText || '').trim() === label && el.offsetParent !== null) {{
                el.click();
                clicked += 1;
            }}
        }});
        return clicked;
    }})()
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_labels_are_escaped() {
        let script = click_buttons_with_text_script(r#"Not "Now""#);
        assert!(script.contains(r#"const label = "Not \"Now\"";"#));
    }
}
