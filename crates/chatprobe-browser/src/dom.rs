//! DOM probing operations: cascade-driven element location, the geometric
//! bottom-right fallback, input fill, and bubble counting.
//!
//! Per-candidate failures (malformed selectors, stale nodes) are skipped by
//! the cascade; nothing in here aborts a feature check.

use crate::session::ProbeSession;
use crate::{Error, Result};
use chatprobe_core::{Cascade, Hit, Strategy};
use chromiumoxide::Element;

impl ProbeSession {
    /// Run a cascade against the current DOM; the first matching candidate
    /// wins. Exhaustion yields `None`.
    pub async fn locate(&self, cascade: &Cascade) -> Option<Hit<Element>> {
        cascade
            .evaluate(|strategy| self.try_strategy(strategy))
            .await
    }

    /// Like [`locate`](Self::locate), but CSS candidates must match a
    /// visible element. Text candidates already imply rendered text.
    pub async fn locate_visible(&self, cascade: &Cascade) -> Option<Hit<Element>> {
        cascade
            .evaluate(|strategy| self.try_visible_strategy(strategy))
            .await
    }

    /// Click into an input and type the probe message. Any existing content
    /// is cleared first, so the field ends up holding exactly `text`.
    pub async fn fill(&self, element: &Element, text: &str) -> Result<()> {
        element.click().await?;
        self.page().evaluate(CLEAR_ACTIVE_ELEMENT_JS).await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// Current value of the first element matching `selector`.
    pub async fn input_value(&self, selector: &str) -> Result<Option<String>> {
        let js = input_value_js(selector);
        let value: Option<String> = self.eval(js).await?;
        Ok(value)
    }

    /// Highest bubble count across the cascade, short-circuiting once a
    /// reply is evident (more elements than the just-sent user message).
    pub async fn reply_bubble_count(&self, cascade: &Cascade) -> usize {
        let mut best = 0;
        for strategy in cascade.strategies {
            match self.match_count(*strategy).await {
                Ok(count) if count > 1 => return count,
                Ok(count) => best = best.max(count),
                Err(e) => {
                    tracing::debug!(
                        "{}: count failed for {:?}, skipping: {}",
                        cascade.feature,
                        strategy,
                        e
                    );
                }
            }
        }
        best
    }

    async fn try_strategy(&self, strategy: Strategy) -> Result<Option<Element>> {
        match strategy {
            Strategy::Css(selector) => {
                let mut elements = self.page().find_elements(selector).await?;
                if elements.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(elements.remove(0)))
                }
            }
            Strategy::TextContains { tag, needle } => {
                for element in self.page().find_elements(tag).await? {
                    if let Some(text) = element.inner_text().await?
                        && text.contains(needle)
                    {
                        return Ok(Some(element));
                    }
                }
                Ok(None)
            }
            Strategy::BottomRight { min_x, min_y } => {
                let index: i64 = self.eval(bottom_right_probe_js(min_x, min_y)).await?;
                if index < 0 {
                    return Ok(None);
                }
                Ok(self
                    .page()
                    .find_elements("button")
                    .await?
                    .into_iter()
                    .nth(index as usize))
            }
        }
    }

    async fn try_visible_strategy(&self, strategy: Strategy) -> Result<Option<Element>> {
        match strategy {
            Strategy::Css(selector) => {
                let index: i64 = self.eval(visible_index_js(selector)).await?;
                if index < 0 {
                    return Ok(None);
                }
                Ok(self
                    .page()
                    .find_elements(selector)
                    .await?
                    .into_iter()
                    .nth(index as usize))
            }
            other => self.try_strategy(other).await,
        }
    }

    async fn match_count(&self, strategy: Strategy) -> Result<usize> {
        match strategy {
            Strategy::Css(selector) => Ok(self.page().find_elements(selector).await?.len()),
            Strategy::TextContains { tag, needle } => {
                let mut count = 0;
                for element in self.page().find_elements(tag).await? {
                    if let Some(text) = element.inner_text().await?
                        && text.contains(needle)
                    {
                        count += 1;
                    }
                }
                Ok(count)
            }
            // The geometric scan locates a single toggle; it has no
            // meaningful match count.
            Strategy::BottomRight { .. } => Ok(0),
        }
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: String) -> Result<T> {
        self.page()
            .evaluate(js)
            .await?
            .into_value()
            .map_err(|e| Error::Cdp(e.to_string()))
    }
}

/// Empty out the focused field (input, textarea, or content-editable) and
/// let the page's framework see the change.
const CLEAR_ACTIVE_ELEMENT_JS: &str = r#"(() => {
    const node = document.activeElement;
    if (!node) return;
    if ('value' in node) node.value = '';
    else if (node.isContentEditable) node.textContent = '';
    node.dispatchEvent(new Event('input', { bubbles: true }));
})()"#;

/// Index of the first button whose bounding box origin lies past
/// (`min_x`, `min_y`), or -1.
fn bottom_right_probe_js(min_x: f64, min_y: f64) -> String {
    format!(
        r#"(() => {{
            const buttons = Array.from(document.querySelectorAll('button'));
            for (let i = 0; i < buttons.length; i++) {{
                const r = buttons[i].getBoundingClientRect();
                if (r.width > 0 && r.height > 0 && r.x > {min_x} && r.y > {min_y}) return i;
            }}
            return -1;
        }})()"#
    )
}

/// Index of the first visible element matching `selector`, or -1.
fn visible_index_js(selector: &str) -> String {
    let quoted = js_string(selector);
    format!(
        r#"(() => {{
            const nodes = Array.from(document.querySelectorAll({quoted}));
            for (let i = 0; i < nodes.length; i++) {{
                const r = nodes[i].getBoundingClientRect();
                const style = window.getComputedStyle(nodes[i]);
                if (r.width > 0 && r.height > 0 && style.visibility !== 'hidden') return i;
            }}
            return -1;
        }})()"#
    )
}

/// Value of the first element matching `selector`, or null.
fn input_value_js(selector: &str) -> String {
    let quoted = js_string(selector);
    format!(
        r#"(() => {{
            const node = document.querySelector({quoted});
            return node ? (node.value ?? node.textContent) : null;
        }})()"#
    )
}

/// Embed a selector in generated JS as a quoted string literal.
fn js_string(selector: &str) -> String {
    serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_right_js_embeds_thresholds() {
        let js = bottom_right_probe_js(1000.0, 600.0);
        assert!(js.contains("r.x > 1000"));
        assert!(js.contains("r.y > 600"));
        assert!(js.contains("querySelectorAll('button')"));
    }

    #[test]
    fn test_clear_js_resets_inputs_and_notifies_the_page() {
        assert!(CLEAR_ACTIVE_ELEMENT_JS.contains("document.activeElement"));
        assert!(CLEAR_ACTIVE_ELEMENT_JS.contains("node.value = ''"));
        assert!(CLEAR_ACTIVE_ELEMENT_JS.contains("isContentEditable"));
        assert!(CLEAR_ACTIVE_ELEMENT_JS.contains("new Event('input', { bubbles: true })"));
    }

    #[test]
    fn test_selectors_with_quotes_are_escaped() {
        let js = visible_index_js("[class*='chat']");
        assert!(js.contains(r#"querySelectorAll("[class*='chat']")"#));

        let js = input_value_js(r#"textarea[placeholder="Ask me anything"]"#);
        assert!(js.contains(r#"\"Ask me anything\""#));
    }
}
