// Report generation from a finished search

use crate::search::SearchSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_report(
    summary: &SearchSummary,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(summary)),
        ReportFormat::Json => generate_json_report(summary),
    }
}

pub fn generate_text_report(summary: &SearchSummary) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str(&format!("# Backlinks for {}\n\n", summary.seed_url));
    report.push_str(&format!("  Candidates found: {}\n", summary.candidates));
    report.push_str(&format!("  Candidates probed: {}\n", summary.probed));
    report.push_str(&format!("  Failed probes: {}\n", summary.failed));
    report.push_str(&format!("  Backlinks found: {}\n", summary.matches.len()));
    report.push_str(&format!("  Workers: {}\n", summary.workers));
    report.push_str(&format!(
        "  Elapsed: {:.2}s\n",
        summary.elapsed_ms as f64 / 1000.0
    ));

    if summary.timed_out {
        report.push_str("\n  [!] Stopped at the maximum runtime, results are partial\n");
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if summary.matches.is_empty() {
        report.push_str("  No page linked back.\n");
    } else {
        for url in &summary.matches {
            report.push_str(&format!("  {}\n", url));
        }
    }

    report
}

pub fn generate_json_report(summary: &SearchSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "linkback",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "search": summary,
        }
    });

    serde_json::to_string_pretty(&json_report)
}
