use crate::output;
use anyhow::{Context, Result};
use chatprobe_core::ProbeReport;
use std::path::Path;

pub fn execute(file: &Path) -> Result<()> {
    tracing::info!("Reading probe results from: {}", file.display());

    let report = ProbeReport::from_file(file)
        .with_context(|| format!("failed to read results file {}", file.display()))?;

    output::print_tally(&report);

    Ok(())
}
