use chatprobe_core::ProbeReport;
use console::style;

/// Print the human-readable pass/fail tally for a run.
pub fn print_tally(report: &ProbeReport) {
    println!("\n{}", "=".repeat(60));
    println!("📊 CHAT WIDGET PROBE RESULTS");
    println!("{}", "=".repeat(60));

    for (name, ok) in report.checks() {
        let status = if ok {
            style("✅ PASS").green()
        } else {
            style("❌ FAIL").red()
        };
        println!("  {} - {}", status, name);
    }

    println!(
        "\n📈 Score: {}/{} checks passed",
        report.passed(),
        ProbeReport::TOTAL_CHECKS
    );

    if !report.errors.is_empty() {
        println!("\n⚠️ Errors encountered:");
        for err in &report.errors {
            println!("   - {}", truncate(err, 100));
        }
    }

    let console_errors: Vec<_> = report
        .console_logs
        .iter()
        .filter(|log| log.kind == "error")
        .collect();
    if !console_errors.is_empty() {
        println!("\n🔴 Console errors:");
        for log in console_errors.iter().take(5) {
            println!("   - {}", truncate(&log.text, 100));
        }
    }

    if !report.screenshots.is_empty() {
        println!("\n📸 Screenshots saved:");
        for path in &report.screenshots {
            println!("   - {}", path);
        }
    }

    println!("{}", "=".repeat(60));

    let passed = report.passed();
    if passed == ProbeReport::TOTAL_CHECKS {
        println!("\n🎉 All checks passed! The chat widget is fully functional.");
    } else if passed >= 4 {
        println!("\n✅ Core functionality working. Some features may need attention.");
    } else {
        println!("\n⚠️ Several issues detected. Review screenshots for debugging.");
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 100), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
        // Multi-byte characters must not be split.
        assert_eq!(truncate("₹₹₹₹", 2), "₹₹");
    }
}
