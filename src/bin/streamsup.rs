use clap::Parser;
use streamsup::config::{CliConfig, Config};
use streamsup::core::constants::output_formats;
use streamsup::discovery::{PlaylistFile, destination_for, expand_paths};
use streamsup::pipeline::{Coordinator, DocumentReport, FsPersister};
use streamsup::reporting::logging;
use streamsup::ui::output::{self, DocumentFailure};
use streamsup::ui::{Cli, ProgressReporter, cli_to_config};
use streamsup::validation::{Executor, HttpValidator};

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run_streamsup_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main playlist checking logic extracted from main() for testing
pub async fn run_streamsup_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli)?;

    let config = load_and_merge_config(&cli_config)?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);

    let playlists = process_and_expand_files(cli, &config)?;

    let concurrency = config.concurrency();
    logging::log_config_info(&config, concurrency);
    if output_settings.should_show_config_info() {
        output::display_config_info(&config, concurrency, &playlists);
    }

    let validator = HttpValidator::from_config(&config)?;
    let executor = Executor::new(
        validator,
        concurrency,
        config.timeout_duration(),
        config.max_redirects(),
    );
    let exclude_patterns = config.compile_exclude_patterns().inspect_err(|e| {
        logging::log_error("Could not compile exclude patterns", Some(e));
    })?;
    let mut coordinator = Coordinator::new(executor, FsPersister, config.playlist_syntax())
        .with_exclude_patterns(exclude_patterns)
        .with_retry(config.retry_attempts(), config.retry_delay_duration());

    let mut progress = create_progress_reporter(&output_settings);
    let output_dir = cli.output_dir.as_deref().map(Path::new);

    let start_time = Instant::now();
    let mut reports: Vec<DocumentReport> = Vec::with_capacity(playlists.len());
    let mut failures: Vec<DocumentFailure> = Vec::new();
    let mut destinations: FxHashSet<PathBuf> = FxHashSet::default();

    // A failing playlist never stops the rest of the run
    for playlist in &playlists {
        let source = playlist.path.as_path();
        let destination = destination_for(playlist, output_dir, cli.in_place);
        if !destinations.insert(destination.clone()) {
            let error = format!(
                "Output '{}' is already used by another playlist",
                destination.display()
            );
            logging::log_error(&format!("Skipping '{}'", source.display()), None);
            failures.push(DocumentFailure {
                path: source.display().to_string(),
                error,
            });
            continue;
        }

        match coordinator
            .process_file(source, &destination, progress.as_mut())
            .await
        {
            Ok(report) => {
                output::display_document_report(
                    &report,
                    &output_settings.output_format,
                    output_settings.quiet,
                );
                reports.push(report);
            }
            Err(e) => {
                logging::log_error(&format!("Failed on '{}'", source.display()), Some(&e));
                failures.push(DocumentFailure {
                    path: source.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    finalize_progress_reporter(progress);

    let totals = coordinator.totals();
    logging::log_run_complete(
        totals.documents,
        totals.validated,
        totals.total,
        start_time.elapsed().as_millis(),
    );
    output::display_summary(
        &reports,
        &failures,
        &totals,
        &output_settings.output_format,
        output_settings.quiet,
    );

    Ok(determine_exit_code(&failures))
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // CLI takes precedence
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn should_show_config_info(&self) -> bool {
        !self.quiet && self.output_format == output_formats::TEXT
    }
}

pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config
        .output_format
        .as_deref()
        .unwrap_or(output_formats::DEFAULT)
        .to_string();
    let show_progress = !quiet && !cli_config.no_progress;

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Validate input paths, then expand directories into playlist files
pub fn process_and_expand_files(
    cli: &Cli,
    config: &Config,
) -> Result<Vec<PlaylistFile>, Box<dyn std::error::Error>> {
    let files: Vec<&Path> = cli.files.iter().map(Path::new).collect();

    let file_types = config.file_types_as_set();
    let playlists = expand_paths(files, cli.recursive, Some(&file_types)).inspect_err(|e| {
        logging::log_error("Could not expand file paths", Some(e));
    })?;

    if playlists.is_empty() {
        let error = "No playlists found to process";
        logging::log_error(error, None);
        return Err(error.into());
    }

    logging::log_file_info(playlists.len(), &playlists);

    Ok(playlists)
}

pub fn create_progress_reporter(output_settings: &OutputSettings) -> Option<ProgressReporter> {
    if output_settings.show_progress && output_settings.output_format == output_formats::TEXT {
        Some(ProgressReporter::new(true))
    } else {
        None
    }
}

pub fn finalize_progress_reporter(progress: Option<ProgressReporter>) {
    if let Some(ref progress) = progress {
        progress.finish_and_clear();
    }
}

/// Any playlist that could not be read or written fails the run
pub fn determine_exit_code(failures: &[DocumentFailure]) -> i32 {
    if failures.is_empty() { 0 } else { 1 }
}
