use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tokio::time::{Duration, sleep};

use crate::core::error::{Result, StreamsUpError};
use crate::core::types::{ResourceEntry, ValidatedSet};
use crate::pipeline::persist::Persist;
use crate::playlist::{PlaylistSyntax, has_content_beyond_header, parse, rebuild};
use crate::reporting::logging;
use crate::ui::ProgressReporter;
use crate::validation::{Executor, ValidateResource};

/// What happened to a playlist's rebuilt output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistDecision {
    Persisted,
    /// Streams were found but none was reachable
    SkippedNoSurvivors,
    /// No streams and nothing besides the header
    SkippedHeaderOnly,
}

impl PersistDecision {
    pub fn is_persisted(self) -> bool {
        self == PersistDecision::Persisted
    }
}

/// Outcome of processing a single playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub source: Option<String>,
    pub destination: String,
    pub validated: usize,
    pub total: usize,
    pub decision: PersistDecision,
}

/// Counts accumulated over every processed playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub documents: usize,
    pub persisted: usize,
    pub validated: usize,
    pub total: usize,
}

impl RunTotals {
    fn add(&mut self, report: &DocumentReport) {
        self.documents += 1;
        self.validated += report.validated;
        self.total += report.total;
        if report.decision.is_persisted() {
            self.persisted += 1;
        }
    }
}

/// Sequences parse, validation, rebuild and persistence per playlist.
pub struct Coordinator<V, P> {
    executor: Executor<V>,
    persister: P,
    syntax: PlaylistSyntax,
    exclude_patterns: Vec<Regex>,
    retry_attempts: u8,
    retry_delay: Duration,
    totals: RunTotals,
}

impl<V: ValidateResource, P: Persist> Coordinator<V, P> {
    pub fn new(executor: Executor<V>, persister: P, syntax: PlaylistSyntax) -> Self {
        Self {
            executor,
            persister,
            syntax,
            exclude_patterns: Vec::new(),
            retry_attempts: 0,
            retry_delay: Duration::ZERO,
            totals: RunTotals::default(),
        }
    }

    /// Streams matching any pattern are dropped without probing
    pub fn with_exclude_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Re-probe unreachable streams for `attempts` extra rounds
    pub fn with_retry(mut self, attempts: u8, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    pub fn persister(&self) -> &P {
        &self.persister
    }

    /// Read `source`, then process it like [`Coordinator::process_text`]
    pub async fn process_file(
        &mut self,
        source: &Path,
        destination: &Path,
        progress: Option<&mut ProgressReporter>,
    ) -> Result<DocumentReport> {
        let raw = fs::read_to_string(source).map_err(|e| StreamsUpError::DocumentRead {
            path: source.display().to_string(),
            source: e,
        })?;

        let mut report = self.process_text(&raw, destination, progress).await?;
        report.source = Some(source.display().to_string());
        Ok(report)
    }

    /// Validate the streams in `raw` and persist the rebuilt playlist if anything survived
    pub async fn process_text(
        &mut self,
        raw: &str,
        destination: &Path,
        mut progress: Option<&mut ProgressReporter>,
    ) -> Result<DocumentReport> {
        let name = destination.display().to_string();
        let document = parse(raw, &self.syntax);
        let total = document.entry_count();

        let candidates: Vec<ResourceEntry> = document
            .entries
            .iter()
            .filter(|entry| !self.is_excluded(entry))
            .cloned()
            .collect();
        if candidates.len() < total {
            log::debug!(
                "Skipping {} excluded stream(s) in {name}",
                total - candidates.len()
            );
        }

        logging::log_document_start(&name, candidates.len());
        if let Some(prog) = progress.as_deref_mut() {
            prog.start_document(&name, candidates.len());
        }

        let validated = self
            .validate_entries(&candidates, progress.as_deref())
            .await;

        if let Some(prog) = progress.as_deref_mut() {
            prog.finish_document(validated.len(), total);
        }

        let rebuilt = rebuild(&document.lines, &validated, &self.syntax);
        let decision = decide(total, &validated, &rebuilt);

        if decision.is_persisted() {
            self.persister
                .persist(destination, &rebuilt)
                .map_err(|e| StreamsUpError::DocumentWrite {
                    path: name.clone(),
                    source: e,
                })?;
        }

        let report = DocumentReport {
            source: None,
            destination: name,
            validated: validated.len(),
            total,
            decision,
        };
        self.totals.add(&report);
        logging::log_document_complete(
            &report.destination,
            report.validated,
            report.total,
            decision.is_persisted(),
        );

        Ok(report)
    }

    fn is_excluded(&self, entry: &ResourceEntry) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(&entry.resource_uri))
    }

    /// One executor pass plus the configured retry rounds
    async fn validate_entries(
        &self,
        entries: &[ResourceEntry],
        progress: Option<&ProgressReporter>,
    ) -> ValidatedSet {
        if entries.is_empty() {
            return ValidatedSet::new();
        }

        let mut validated = self.executor.run_all_with_progress(entries, progress).await;

        for round in 1..=self.retry_attempts {
            let pending: Vec<ResourceEntry> = entries
                .iter()
                .filter(|entry| !validated.contains(entry.position))
                .cloned()
                .collect();
            if pending.is_empty() {
                break;
            }

            sleep(self.retry_delay).await;
            log::debug!("Retry round {round}: re-probing {} stream(s)", pending.len());
            if let Some(prog) = progress {
                prog.restart_round(round.into(), pending.len());
            }
            validated.merge(self.executor.run_all_with_progress(&pending, progress).await);
        }

        validated
    }
}

fn decide(total: usize, validated: &ValidatedSet, rebuilt: &str) -> PersistDecision {
    if total == 0 {
        if has_content_beyond_header(rebuilt) {
            PersistDecision::Persisted
        } else {
            PersistDecision::SkippedHeaderOnly
        }
    } else if validated.is_empty() {
        PersistDecision::SkippedNoSurvivors
    } else {
        PersistDecision::Persisted
    }
}
