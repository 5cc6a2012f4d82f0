//! Integration tests against a local fixture page.
//!
//! The live target's markup is not under our control, so the probing
//! operations are validated against a deterministic fixture served over
//! file://. These tests launch a real Chromium and are ignored by default.

use chatprobe_browser::{ProbeSession, SessionOptions};
use chatprobe_core::catalog::{self, TEST_MESSAGE};
use chatprobe_core::Strategy;
use std::path::Path;
use std::time::Duration;

/// A widget with obfuscated class names: none of the markup-based toggle
/// candidates match, only the geometric fallback can find the button.
const FIXTURE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><style>
  .x9f2 { position: fixed; right: 24px; bottom: 24px; width: 56px; height: 56px; }
  .assistant-panel { display: none; position: fixed; right: 24px; bottom: 96px;
                     width: 320px; height: 400px; }
  .assistant-panel.open { display: block; }
  .message { padding: 8px; }
</style></head>
<body>
  <header><button class="nav-top">Menu</button></header>
  <button class="x9f2" onclick="openPanel()">&#x2726;</button>
  <div class="assistant-panel" id="panel">
    <div id="thread"><div class="message">Hi! Ask me about your finances.</div></div>
    <textarea placeholder="Ask me anything">half-typed draft</textarea>
    <button onclick="reply()">Send</button>
  </div>
  <script>
    function openPanel() { document.getElementById('panel').classList.add('open'); }
    function reply() {
      const bubble = document.createElement('div');
      bubble.className = 'message';
      bubble.textContent = 'Your net worth is ₹12,40,000.';
      setTimeout(() => document.getElementById('thread').appendChild(bubble), 1200);
    }
  </script>
</body>
</html>"#;

fn fixture_url(dir: &Path) -> String {
    let path = dir.join("fixture.html");
    std::fs::write(&path, FIXTURE_HTML).unwrap();
    format!("file://{}", path.display())
}

async fn launch(dir: &Path) -> ProbeSession {
    let opts = SessionOptions {
        screenshot_dir: dir.join("shots"),
        ..SessionOptions::default()
    };
    ProbeSession::launch(opts).await.expect("browser launch")
}

#[tokio::test]
#[ignore = "requires a Chromium install"]
async fn geometric_fallback_finds_unmarked_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let session = launch(dir.path()).await;

    session.navigate(&fixture_url(dir.path())).await.unwrap();
    session.settle(500).await;

    let hit = session
        .locate(&catalog::TOGGLE)
        .await
        .expect("toggle should be found");

    // Every markup-based candidate misses; the quadrant scan wins.
    assert!(matches!(hit.strategy, Strategy::BottomRight { .. }));

    session.close().await;
}

#[tokio::test]
#[ignore = "requires a Chromium install"]
async fn fill_places_exact_literal_and_reply_appears() {
    let dir = tempfile::tempdir().unwrap();
    let session = launch(dir.path()).await;

    session.navigate(&fixture_url(dir.path())).await.unwrap();
    session.settle(500).await;

    let toggle = session.locate(&catalog::TOGGLE).await.expect("toggle");
    toggle.value.click().await.unwrap();
    session.settle(500).await;

    let input = session.locate(&catalog::INPUT).await.expect("input");
    session.fill(&input.value, TEST_MESSAGE).await.unwrap();

    // The fixture textarea starts with a draft; fill must replace it, not
    // append, leaving exactly the literal message.
    let value = session.input_value("textarea").await.unwrap();
    assert_eq!(value.as_deref(), Some(TEST_MESSAGE));

    let send = session
        .locate_visible(&catalog::SEND)
        .await
        .expect("send button");
    send.value.click().await.unwrap();

    // Bounded poll: the fixture reply lands after ~1.2s, well inside the
    // iteration budget.
    let mut responded = false;
    for _ in 0..catalog::REPLY_POLL_MAX {
        tokio::time::sleep(Duration::from_millis(catalog::REPLY_POLL_INTERVAL_MS)).await;
        if session.reply_bubble_count(&catalog::REPLY_BUBBLES).await > 1 {
            responded = true;
            break;
        }
    }
    assert!(responded, "reply bubble should appear within the poll budget");

    session.close().await;
}

#[tokio::test]
#[ignore = "requires a Chromium install"]
async fn navigation_to_dead_endpoint_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let session = launch(dir.path()).await;

    let result = session.navigate("http://127.0.0.1:1/").await;
    assert!(result.is_err());

    session.close().await;
}
