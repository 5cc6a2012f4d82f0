use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// A single browser console message captured during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Outcome of one probe run.
///
/// The seven feature booleans are always present, regardless of how many
/// features were actually reachable. Dependent features (everything after
/// `chat_window_opened`) can only become true once the panel opened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeReport {
    pub site_loaded: bool,
    pub chat_button_found: bool,
    pub chat_window_opened: bool,
    pub text_input_works: bool,
    pub gemini_response: bool,
    pub voice_button_found: bool,
    pub quick_suggestions: bool,
    pub errors: Vec<String>,
    pub console_logs: Vec<ConsoleEntry>,
    pub screenshots: Vec<String>,
}

impl ProbeReport {
    pub const TOTAL_CHECKS: usize = 7;

    pub fn new() -> Self {
        Self::default()
    }

    /// The seven feature checks in reporting order.
    pub fn checks(&self) -> [(&'static str, bool); Self::TOTAL_CHECKS] {
        [
            ("Site Loaded", self.site_loaded),
            ("Chat Button Found", self.chat_button_found),
            ("Chat Window Opened", self.chat_window_opened),
            ("Text Input Works", self.text_input_works),
            ("Gemini Response", self.gemini_response),
            ("Voice Button Found", self.voice_button_found),
            ("Quick Suggestions", self.quick_suggestions),
        ]
    }

    /// Number of checks that passed.
    pub fn passed(&self) -> usize {
        self.checks().iter().filter(|(_, ok)| *ok).count()
    }

    /// Features behind the panel cannot pass if the panel never opened.
    pub fn gating_holds(&self) -> bool {
        self.chat_window_opened
            || !(self.text_input_works
                || self.gemini_response
                || self.voice_button_found
                || self.quick_suggestions)
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn record_screenshot(&mut self, path: &Path) {
        self.screenshots.push(path.display().to_string());
    }

    /// Write the report to a file as pretty-printed JSON.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        tracing::debug!("Writing probe report to: {}", path.display());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;

        tracing::info!(
            "Wrote probe report ({}/{} checks passed) to {}",
            self.passed(),
            Self::TOTAL_CHECKS,
            path.display()
        );

        Ok(())
    }

    /// Read a previously written report back from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading probe report from: {}", path.display());

        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;

        Ok(report)
    }
}
