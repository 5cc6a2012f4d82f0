use crate::output;
use anyhow::{Context, Result};
use chatprobe_browser::{ProbeSession, SessionOptions};
use chatprobe_core::{ProbeReport, catalog};
use std::path::PathBuf;
use std::time::Duration;

pub fn execute(
    url: &str,
    output_dir: Option<PathBuf>,
    results: Option<PathBuf>,
    headful: bool,
    chrome_path: Option<PathBuf>,
) -> Result<()> {
    let target = normalize_target(url);
    url::Url::parse(&target).with_context(|| format!("invalid target URL: {}", url))?;

    let artifact_dir = output_dir.unwrap_or_else(|| std::env::temp_dir().join("chatprobe"));
    let results_path = results.unwrap_or_else(|| artifact_dir.join("chatprobe_results.json"));
    std::fs::create_dir_all(&artifact_dir)
        .with_context(|| format!("cannot create output dir {}", artifact_dir.display()))?;

    println!("🚀 Starting chat widget probe for {}", target);
    println!("{}", "-".repeat(50));

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(run(&target, artifact_dir, headful, chrome_path))?;

    report.to_file(&results_path)?;
    output::print_tally(&report);
    println!("\n📄 Full results saved to: {}", results_path.display());

    // Check failures are reported in the tally, not the exit status.
    Ok(())
}

/// One full probe pass: launch, run the checks, fold the session's captured
/// console output into the report, and close the browser unconditionally.
async fn run(
    url: &str,
    artifact_dir: PathBuf,
    headful: bool,
    chrome_path: Option<PathBuf>,
) -> Result<ProbeReport> {
    let opts = SessionOptions {
        headful,
        chrome_path,
        screenshot_dir: artifact_dir,
        shot_prefix: "chatprobe".to_string(),
    };
    let mut session = ProbeSession::launch(opts).await?;
    let mut report = ProbeReport::new();

    // Top-level catch: an unexpected failure mid-sequence is recorded, a
    // diagnostic screenshot taken, and the partial report still emitted.
    if let Err(e) = run_checks(&mut session, &mut report, url).await {
        println!("\n❌ Error: {}", e);
        report.record_error(e.to_string());
        if let Ok(path) = session.screenshot("error").await {
            report.record_screenshot(&path);
        }
    }

    report.console_logs = session.console_logs().await;
    for err in session.page_errors().await {
        report.record_error(err);
    }

    session.close().await;
    Ok(report)
}

/// The probe sequence. Expected absences record `false` and keep going;
/// only unexpected failures bubble up to the caller's catch.
async fn run_checks(
    session: &mut ProbeSession,
    report: &mut ProbeReport,
    url: &str,
) -> chatprobe_browser::Result<()> {
    println!("\n📍 Step 1: Navigating to {}...", url);
    session.navigate(url).await?;
    report.site_loaded = true;
    println!("   ✅ Site loaded");

    if let Ok(path) = session.screenshot("initial").await {
        report.record_screenshot(&path);
    }

    // Give the client-side app time to mount the widget.
    session.settle(catalog::SETTLE_MS).await;

    println!("\n📍 Step 2: Looking for chat button...");
    let Some(toggle) = session.locate(&catalog::TOGGLE).await else {
        println!("   ❌ Chat button NOT found");
        if let Ok(path) = session.screenshot("no_button").await {
            report.record_screenshot(&path);
        }
        return Ok(());
    };
    report.chat_button_found = true;
    println!("   ✅ Chat button found via: {}", toggle.strategy);
    if let Ok(path) = session.screenshot("button_found").await {
        report.record_screenshot(&path);
    }

    println!("\n📍 Step 3: Opening chat window...");
    toggle.value.click().await?;
    session.settle(catalog::SETTLE_MS).await;

    let Some(window) = session.locate(&catalog::WINDOW).await else {
        println!("   ⚠️ Chat window did not open");
        return Ok(());
    };
    report.chat_window_opened = true;
    println!("   ✅ Chat window opened via: {}", window.strategy);
    if let Ok(path) = session.screenshot("window_open").await {
        report.record_screenshot(&path);
    }

    println!("\n📍 Step 4: Testing text input...");
    match session.locate(&catalog::INPUT).await {
        Some(input) => {
            session.fill(&input.value, catalog::TEST_MESSAGE).await?;
            report.text_input_works = true;
            println!("   ✅ Typed: '{}'", catalog::TEST_MESSAGE);
            if let Ok(path) = session.screenshot("message_typed").await {
                report.record_screenshot(&path);
            }

            match session.locate_visible(&catalog::SEND).await {
                Some(send) => {
                    println!("\n📍 Step 5: Sending message...");
                    send.value.click().await?;
                    report.gemini_response = await_reply(session).await;
                    if let Ok(path) = session.screenshot("after_send").await {
                        report.record_screenshot(&path);
                    }
                    if !report.gemini_response {
                        println!("   ⚠️ No response detected yet (may need more time)");
                    }
                }
                None => println!("   ⚠️ Send button not found"),
            }
        }
        None => println!("   ⚠️ Text input not found"),
    }

    println!("\n📍 Step 6: Checking for voice button...");
    if let Some(hit) = session.locate(&catalog::VOICE).await {
        report.voice_button_found = true;
        println!("   ✅ Voice button found via: {}", hit.strategy);
    } else {
        println!("   ⚠️ Voice button not found (may be browser-specific)");
    }

    println!("\n📍 Step 7: Checking for quick suggestions...");
    if let Some(hit) = session.locate(&catalog::SUGGESTIONS).await {
        report.quick_suggestions = true;
        println!("   ✅ Quick suggestions found via: {}", hit.strategy);
    } else {
        println!("   ⚠️ Quick suggestions not found");
    }

    Ok(())
}

/// Bounded poll for the asynchronous reply: fixed 1 s interval, fixed
/// maximum iteration count, early exit once more than the just-sent user
/// message is on screen.
async fn await_reply(session: &ProbeSession) -> bool {
    println!(
        "   Waiting for reply (up to {} seconds)...",
        catalog::REPLY_POLL_MAX
    );

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message("waiting for reply...");

    for i in 1..=catalog::REPLY_POLL_MAX {
        tokio::time::sleep(Duration::from_millis(catalog::REPLY_POLL_INTERVAL_MS)).await;
        spinner.set_message(format!("waiting for reply... ({}s)", i));
        spinner.tick();

        let count = session.reply_bubble_count(&catalog::REPLY_BUBBLES).await;
        if count > 1 {
            spinner.finish_and_clear();
            println!("   ✅ Found {} message bubble(s) - assistant replied", count);
            return true;
        }
    }

    spinner.finish_and_clear();
    false
}

/// Targets given without a scheme get https, matching how people paste
/// hostnames.
fn normalize_target(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target_adds_https_scheme() {
        assert_eq!(
            normalize_target("finance.maiyuri.com"),
            "https://finance.maiyuri.com"
        );
        assert_eq!(
            normalize_target("http://localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_target("https://example.com"),
            "https://example.com"
        );
    }
}
