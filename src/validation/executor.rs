use futures::{Stream, StreamExt, stream};
use tokio::time::Duration;

use crate::core::types::{ResourceEntry, ValidatedSet, ValidationResult};
use crate::reporting::logging;
use crate::ui::ProgressReporter;
use crate::validation::validator::ValidateResource;

/// Runs validations with a fixed number of probes in flight.
///
/// A new probe starts as soon as any in-flight probe finishes. Every entry
/// is probed exactly once per call; nothing is retried here.
#[derive(Debug)]
pub struct Executor<V> {
    validator: V,
    concurrency_limit: usize,
    timeout: Duration,
    max_redirects: usize,
}

impl<V: ValidateResource> Executor<V> {
    /// A `concurrency_limit` of 0 is treated as 1.
    pub fn new(
        validator: V,
        concurrency_limit: usize,
        timeout: Duration,
        max_redirects: usize,
    ) -> Self {
        Self {
            validator,
            concurrency_limit: concurrency_limit.max(1),
            timeout,
            max_redirects,
        }
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Probe every entry and return the reachable ones keyed by position.
    ///
    /// Returns only after all entries have resolved.
    pub async fn run_all(&self, entries: &[ResourceEntry]) -> ValidatedSet {
        self.run_all_with_progress(entries, None).await
    }

    pub async fn run_all_with_progress(
        &self,
        entries: &[ResourceEntry],
        progress: Option<&ProgressReporter>,
    ) -> ValidatedSet {
        let mut validated = ValidatedSet::new();
        let mut results = self.results(entries);
        let mut completed = 0;

        // Completions are funneled through this loop, the only writer of the set
        while let Some(result) = results.next().await {
            completed += 1;
            logging::log_probe_result(&result);
            if let Some(prog) = progress {
                prog.update_probe_progress(completed);
            }
            validated.record(result);
        }

        validated
    }

    /// Probe every entry and return all outcomes in completion order
    pub async fn collect_all(&self, entries: &[ResourceEntry]) -> Vec<ValidationResult> {
        self.results(entries).collect().await
    }

    fn results<'a>(
        &'a self,
        entries: &'a [ResourceEntry],
    ) -> impl Stream<Item = ValidationResult> + 'a {
        stream::iter(entries)
            .map(move |entry| {
                self.validator
                    .validate(entry, self.timeout, self.max_redirects)
            })
            .buffer_unordered(self.concurrency_limit)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::Outcome;
    use crate::validation::HttpValidator;
    use async_trait::async_trait;
    use mockito::Server;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sleeps per entry, marks even positions reachable and records concurrency.
    #[derive(Default)]
    struct TrackingValidator {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: Mutex<Vec<usize>>,
        slow_position: Option<usize>,
    }

    #[async_trait]
    impl ValidateResource for TrackingValidator {
        async fn validate(
            &self,
            entry: &ResourceEntry,
            _timeout: Duration,
            _max_redirects: usize,
        ) -> ValidationResult {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            self.calls.lock().unwrap().push(entry.position);

            let delay = if Some(entry.position) == self.slow_position {
                Duration::from_millis(500)
            } else {
                Duration::from_millis(5 + (entry.position % 3) as u64 * 5)
            };
            tokio::time::sleep(delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let outcome = if entry.position % 2 == 0 {
                Outcome::Reachable(entry.resource_uri.clone())
            } else {
                Outcome::Unreachable(404)
            };
            ValidationResult::new(entry.clone(), outcome)
        }
    }

    fn entries(count: usize) -> Vec<ResourceEntry> {
        (0..count)
            .map(|i| ResourceEntry::new(format!("http://stream.test/{i}"), i))
            .collect()
    }

    #[tokio::test]
    async fn test_run_all__respects_concurrency_limit() {
        let executor = Executor::new(TrackingValidator::default(), 3, Duration::from_secs(1), 0);

        let validated = executor.run_all(&entries(20)).await;

        let validator = executor.validator();
        assert_eq!(validator.peak.load(Ordering::SeqCst), 3);
        assert_eq!(validator.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(validated.len(), 10);
        assert!(validated.len() <= 20);
    }

    #[tokio::test]
    async fn test_run_all__submits_every_entry_once() {
        let executor = Executor::new(TrackingValidator::default(), 4, Duration::from_secs(1), 0);

        executor.run_all(&entries(15)).await;

        let mut calls = executor.validator().calls.lock().unwrap().clone();
        calls.sort_unstable();
        assert_eq!(calls, (0..15).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_run_all__keys_results_by_position() {
        let executor = Executor::new(TrackingValidator::default(), 2, Duration::from_secs(1), 0);

        let validated = executor.run_all(&entries(6)).await;

        let mut positions: Vec<usize> = validated.positions().collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 2, 4]);
        assert_eq!(
            validated.get(4).map(|e| e.final_uri.as_str()),
            Some("http://stream.test/4")
        );
    }

    #[tokio::test]
    async fn test_collect_all__slow_probe_does_not_hold_back_free_slot() {
        let validator = TrackingValidator {
            slow_position: Some(0),
            ..Default::default()
        };
        let executor = Executor::new(validator, 2, Duration::from_secs(1), 0);

        let results = executor.collect_all(&entries(10)).await;

        assert_eq!(results.len(), 10);
        assert_eq!(results.last().map(|r| r.entry.position), Some(0));
    }

    #[tokio::test]
    async fn test_run_all__empty_input() {
        let executor = Executor::new(TrackingValidator::default(), 2, Duration::from_secs(1), 0);

        let validated = executor.run_all(&[]).await;

        assert!(validated.is_empty());
    }

    #[test]
    fn test_new__zero_limit_is_clamped() {
        let executor = Executor::new(TrackingValidator::default(), 0, Duration::from_secs(1), 0);
        assert_eq!(executor.concurrency_limit(), 1);
    }

    #[tokio::test]
    async fn test_run_all__http_streams() {
        let mut server = Server::new_async().await;
        let _ok = server.mock("HEAD", "/ok").with_status(200).create();
        let _missing = server.mock("HEAD", "/missing").with_status(404).create();
        let entries = vec![
            ResourceEntry::new(server.url() + "/ok", 2).with_metadata("#EXTINF:-1,Alpha", 1),
            ResourceEntry::new(server.url() + "/missing", 4).with_metadata("#EXTINF:-1,Beta", 3),
        ];
        let executor = Executor::new(
            HttpValidator::new().expect("client builds"),
            2,
            Duration::from_secs(5),
            3,
        );

        let validated = executor.run_all(&entries).await;

        assert_eq!(validated.len(), 1);
        let entry = validated.get(2).expect("reachable stream");
        assert_eq!(entry.final_uri, server.url() + "/ok");
        assert_eq!(entry.metadata_line.as_deref(), Some("#EXTINF:-1,Alpha"));
        assert!(!validated.contains(4));
    }
}
