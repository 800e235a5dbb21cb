use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    probe_progress: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            probe_progress: None,
            enabled,
        }
    }

    pub fn start_document(&mut self, name: &str, total_streams: usize) {
        if !self.enabled {
            return;
        }

        let pb = self
            .multi_progress
            .add(ProgressBar::new(total_streams as u64));
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/red}] {pos}/{len} streams {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(name.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        self.probe_progress = Some(pb);
    }

    pub fn update_probe_progress(&self, current: usize) {
        if let Some(ref pb) = self.probe_progress {
            pb.set_position(current as u64);
        }
    }

    /// Reuse the bar for a retry round over `pending` streams
    pub fn restart_round(&self, round: usize, pending: usize) {
        if let Some(ref pb) = self.probe_progress {
            pb.set_length(pending as u64);
            pb.set_position(0);
            pb.set_message(format!("retry {round}"));
        }
    }

    pub fn finish_document(&mut self, validated: usize, total: usize) {
        if let Some(pb) = self.probe_progress.take() {
            let message = if validated == total {
                "✓ all streams reachable".to_string()
            } else {
                format!("✓ {validated}/{total} reachable")
            };
            pb.finish_with_message(message);
        }
    }

    #[cfg(test)]
    pub(crate) fn bar(&self) -> Option<&ProgressBar> {
        self.probe_progress.as_ref()
    }

    pub fn finish_and_clear(&self) {
        if self.enabled {
            self.multi_progress.clear().unwrap_or(());
        }
    }

}
