//! Output formatting and display logic for streamsup

use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::core::constants::output_formats;
use crate::pipeline::{DocumentReport, PersistDecision, RunTotals};
use crate::ui::color::{Color, bold, colorize};

/// A playlist that could not be read or written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub path: String,
    pub error: String,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    status: &'static str,
    totals: &'a RunTotals,
    documents: &'a [DocumentReport],
    failures: &'a [DocumentFailure],
}

fn label(name: &str) -> String {
    bold(name, Color::Cyan)
}

fn print_setting(name: &str, value: &str) {
    println!("{}: {}", label(name), colorize(value, Color::White));
}

/// Display configuration information in a user-friendly format
pub fn display_config_info<P: AsRef<Path>>(config: &Config, concurrency: usize, expanded_paths: &[P]) {
    print_setting("Concurrent probes", &concurrency.to_string());
    print_setting(
        "Timeout (seconds)",
        &config.timeout_duration().as_secs().to_string(),
    );
    print_setting("Max redirects", &config.max_redirects().to_string());
    print_setting("Retry attempts", &config.retry_attempts().to_string());
    if config.retry_attempts() > 0 {
        print_setting(
            "Retry delay (ms)",
            &config.retry_delay_duration().as_millis().to_string(),
        );
    }
    print_setting(
        "Probe method",
        if config.uses_get_probes() { "GET" } else { "HEAD" },
    );

    if let Some(ref user_agent) = config.user_agent {
        print_setting("User agent", user_agent);
    }
    if let Some(ref proxy) = config.proxy {
        print_setting("Proxy", proxy);
    }
    if let Some(ref allowlist) = config.allowlist {
        print_setting("Allowlist", &format!("{} URLs", allowlist.len()));
    }
    if let Some(ref codes) = config.allowed_status_codes {
        print_setting("Allowed status codes", &format!("{codes:?}"));
    }

    println!(
        "\n{}: {}",
        label("Will check playlists"),
        colorize(
            &format!(
                "{} file{}",
                expanded_paths.len(),
                if expanded_paths.len() == 1 { "" } else { "s" }
            ),
            Color::White
        )
    );

    // Limit to first 10 to avoid spam
    for (i, path) in expanded_paths.iter().enumerate().take(10) {
        println!(
            "   {}. {}",
            colorize(&format!("{}", i + 1), Color::Dim),
            path.as_ref().display()
        );
    }
    if expanded_paths.len() > 10 {
        println!(
            "   {}",
            colorize(
                &format!("... and {} more", expanded_paths.len() - 10),
                Color::Dim
            )
        );
    }
    println!();
}

fn describe_decision(decision: PersistDecision) -> &'static str {
    match decision {
        PersistDecision::Persisted => "written",
        PersistDecision::SkippedNoSurvivors => "skipped, no reachable streams",
        PersistDecision::SkippedHeaderOnly => "skipped, empty playlist",
    }
}

/// One line per processed playlist
pub fn format_document_line(report: &DocumentReport, format: &str) -> Option<String> {
    let name = report.source.as_deref().unwrap_or(&report.destination);
    match format {
        output_formats::JSON => None,
        output_formats::MINIMAL => Some(format!(
            "{name} {}/{} {}",
            report.validated,
            report.total,
            describe_decision(report.decision)
        )),
        _ => {
            let (mark, color) = match report.decision {
                PersistDecision::Persisted => ("✓", Color::Green),
                _ => ("⚠", Color::Yellow),
            };
            let target = if report.decision.is_persisted() {
                format!(" -> {}", report.destination)
            } else {
                String::new()
            };
            Some(format!(
                "{} {name}: {}/{} streams reachable ({}){target}",
                colorize(mark, color),
                report.validated,
                report.total,
                describe_decision(report.decision)
            ))
        }
    }
}

pub fn display_document_report(report: &DocumentReport, format: &str, quiet: bool) {
    if quiet {
        return;
    }
    if let Some(line) = format_document_line(report, format) {
        println!("{line}");
    }
}

/// Render the run as a JSON document
pub fn render_json_summary(
    reports: &[DocumentReport],
    failures: &[DocumentFailure],
    totals: &RunTotals,
) -> serde_json::Result<String> {
    let summary = RunSummary {
        status: if failures.is_empty() {
            "success"
        } else {
            "failure"
        },
        totals,
        documents: reports,
        failures,
    };
    serde_json::to_string_pretty(&summary)
}

/// Display the run summary in the requested format
pub fn display_summary(
    reports: &[DocumentReport],
    failures: &[DocumentFailure],
    totals: &RunTotals,
    format: &str,
    quiet: bool,
) {
    match format {
        output_formats::JSON => match render_json_summary(reports, failures, totals) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: could not render JSON summary: {e}"),
        },
        output_formats::MINIMAL => {
            for failure in failures {
                println!("{} error {}", failure.path, failure.error);
            }
        }
        _ => {
            for failure in failures {
                eprintln!(
                    "{} {}: {}",
                    colorize("✗", Color::Red),
                    failure.path,
                    failure.error
                );
            }
            if quiet {
                return;
            }
            println!(
                "\n{} {} of {} streams reachable, {} of {} playlists written",
                colorize("▶", Color::Cyan),
                colorize(&totals.validated.to_string(), Color::Green),
                totals.total,
                totals.persisted,
                totals.documents
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(decision: PersistDecision) -> DocumentReport {
        DocumentReport {
            source: Some("lists/news.m3u".to_string()),
            destination: "lists/news.checked.m3u".to_string(),
            validated: 1,
            total: 2,
            decision,
        }
    }

    #[test]
    fn test_format_document_line_text() {
        let line = format_document_line(&report(PersistDecision::Persisted), output_formats::TEXT);

        assert_eq!(
            line.as_deref(),
            Some(
                "✓ lists/news.m3u: 1/2 streams reachable (written) -> lists/news.checked.m3u"
            )
        );
    }

    #[test]
    fn test_format_document_line_text_skipped() {
        let line = format_document_line(
            &report(PersistDecision::SkippedNoSurvivors),
            output_formats::TEXT,
        );

        assert_eq!(
            line.as_deref(),
            Some("⚠ lists/news.m3u: 1/2 streams reachable (skipped, no reachable streams)")
        );
    }

    #[test]
    fn test_format_document_line_minimal() {
        let line = format_document_line(
            &report(PersistDecision::SkippedHeaderOnly),
            output_formats::MINIMAL,
        );

        assert_eq!(
            line.as_deref(),
            Some("lists/news.m3u 1/2 skipped, empty playlist")
        );
    }

    #[test]
    fn test_format_document_line_json_is_deferred() {
        assert_eq!(
            format_document_line(&report(PersistDecision::Persisted), output_formats::JSON),
            None
        );
    }

    #[test]
    fn test_render_json_summary() -> Result<(), Box<dyn std::error::Error>> {
        let reports = vec![report(PersistDecision::Persisted)];
        let failures = vec![DocumentFailure {
            path: "broken.m3u".to_string(),
            error: "Could not read playlist".to_string(),
        }];
        let totals = RunTotals {
            documents: 1,
            persisted: 1,
            validated: 1,
            total: 2,
        };

        let json = render_json_summary(&reports, &failures, &totals)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["status"], "failure");
        assert_eq!(value["totals"]["validated"], 1);
        assert_eq!(value["documents"][0]["decision"], "persisted");
        assert_eq!(value["documents"][0]["source"], "lists/news.m3u");
        assert_eq!(value["failures"][0]["path"], "broken.m3u");
        Ok(())
    }

    #[test]
    fn test_render_json_summary_success() -> Result<(), Box<dyn std::error::Error>> {
        let json = render_json_summary(&[], &[], &RunTotals::default())?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["status"], "success");
        assert_eq!(value["documents"].as_array().map(Vec::len), Some(0));
        Ok(())
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        let reports = vec![report(PersistDecision::Persisted)];
        let totals = RunTotals::default();
        for format in output_formats::ALL {
            display_document_report(&reports[0], format, false);
            display_summary(&reports, &[], &totals, format, false);
        }
        display_config_info(&Config::default(), 4, &[Path::new("news.m3u")]);
    }
}
