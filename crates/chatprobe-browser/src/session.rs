use crate::{Error, Result};
use chatprobe_core::ConsoleEntry;
use chatprobe_core::catalog::{NAVIGATION_TIMEOUT_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::{
    EnableParams, EventConsoleApiCalled, EventExceptionThrown, ExceptionDetails, RemoteObject,
};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Desktop user agent sent with every probe, matching a stock macOS Chrome.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Options for launching a probe session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Run with a visible window for debugging.
    pub headful: bool,
    /// Override the Chromium binary.
    pub chrome_path: Option<PathBuf>,
    /// Directory screenshots are written to.
    pub screenshot_dir: PathBuf,
    /// Filename prefix for the step-numbered screenshots.
    pub shot_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headful: false,
            chrome_path: None,
            screenshot_dir: std::env::temp_dir().join("chatprobe"),
            shot_prefix: "chatprobe".to_string(),
        }
    }
}

/// One browser page owned exclusively for the lifetime of a probe run.
///
/// Console messages and uncaught page errors are captured for the whole
/// session into internal buffers. The session must be closed with
/// [`ProbeSession::close`] at the end of the run regardless of outcome.
pub struct ProbeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    console_logs: Arc<Mutex<Vec<ConsoleEntry>>>,
    page_errors: Arc<Mutex<Vec<String>>>,
    screenshot_dir: PathBuf,
    shot_prefix: String,
    shot_counter: usize,
}

impl ProbeSession {
    /// Launch a headless browser with the probe viewport and attach the
    /// console and page-error listeners.
    pub async fn launch(opts: SessionOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

        if opts.headful {
            builder = builder.with_head();
        }
        if let Some(path) = &opts.chrome_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(Error::Browser)?;

        tracing::info!(headful = opts.headful, "Launching browser");
        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler must run for the session lifetime or CDP commands stall.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.set_user_agent(USER_AGENT).await?;
        page.execute(EnableParams::default()).await?;

        let console_logs = Arc::new(Mutex::new(Vec::new()));
        let page_errors = Arc::new(Mutex::new(Vec::new()));

        let mut console_events = page.event_listener::<EventConsoleApiCalled>().await?;
        let logs = console_logs.clone();
        tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let entry = ConsoleEntry {
                    kind: format!("{:?}", event.r#type).to_lowercase(),
                    text: console_text(&event.args),
                };
                logs.lock().await.push(entry);
            }
        });

        let mut exception_events = page.event_listener::<EventExceptionThrown>().await?;
        let errors = page_errors.clone();
        tokio::spawn(async move {
            while let Some(event) = exception_events.next().await {
                errors
                    .lock()
                    .await
                    .push(exception_text(&event.exception_details));
            }
        });

        Ok(Self {
            browser,
            page,
            handler_task,
            console_logs,
            page_errors,
            screenshot_dir: opts.screenshot_dir,
            shot_prefix: opts.shot_prefix,
            shot_counter: 0,
        })
    }

    /// Navigate to `url` and wait for the load to finish, bounded by the
    /// fixed navigation timeout.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);

        let load = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, Error>(())
        };

        tokio::time::timeout(Duration::from_millis(NAVIGATION_TIMEOUT_MS), load)
            .await
            .map_err(|_| {
                Error::Navigation(format!(
                    "timed out after {}ms loading {}",
                    NAVIGATION_TIMEOUT_MS, url
                ))
            })??;

        Ok(())
    }

    /// Fixed settle delay for client-side rendering and UI transitions.
    pub async fn settle(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    /// Take a full-page screenshot named `<prefix>_<n>_<label>.png`.
    pub async fn screenshot(&mut self, label: &str) -> Result<PathBuf> {
        self.shot_counter += 1;
        tokio::fs::create_dir_all(&self.screenshot_dir).await?;

        let path = self
            .screenshot_dir
            .join(shot_filename(&self.shot_prefix, self.shot_counter, label));

        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                &path,
            )
            .await?;

        tracing::debug!("Saved screenshot: {}", path.display());
        Ok(path)
    }

    /// Console messages captured so far.
    pub async fn console_logs(&self) -> Vec<ConsoleEntry> {
        self.console_logs.lock().await.clone()
    }

    /// Uncaught page errors captured so far.
    pub async fn page_errors(&self) -> Vec<String> {
        self.page_errors.lock().await.clone()
    }

    pub(crate) fn page(&self) -> &Page {
        &self.page
    }

    /// Shut the browser down. Best-effort: a run that crashed the browser
    /// must still be able to finish its report.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed (continuing): {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

fn shot_filename(prefix: &str, counter: usize, label: &str) -> String {
    format!("{}_{}_{}.png", prefix, counter, label)
}

/// Render console call arguments the way DevTools would print them.
fn console_text(args: &[RemoteObject]) -> String {
    args.iter()
        .map(|arg| match &arg.value {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => arg.description.clone().unwrap_or_default(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn exception_text(details: &ExceptionDetails) -> String {
    details
        .exception
        .as_ref()
        .and_then(|e| e.description.clone())
        .unwrap_or_else(|| details.text.clone())
}
