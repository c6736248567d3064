//! `navcache build` command implementation.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use nav_config::{CliSettings, Config};
use nav_emit::{ArtifactSink, FileSink, NullSink, Published};
use nav_source::{FsSource, PageSource};
use nav_tree::{BuildOptions, CacheBuilder};
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover navcache.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language to build, repeatable (default: every configured language).
    #[arg(short = 'l', long = "language", value_name = "LANG")]
    languages: Vec<String>,

    /// Directory holding pages.json and extras.json (overrides config).
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Directory the artifacts are published to (overrides config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Build every language but write nothing.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output (per-language timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Outcome of building and publishing one language.
struct LanguageReport {
    language: String,
    outcome: Result<Published, CliError>,
    elapsed: Duration,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any language fails to build
    /// or publish. Languages that succeed are published regardless.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            languages: (!self.languages.is_empty()).then_some(self.languages),
            source_dir: self.source_dir,
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!("Source: {}", config.source_dir.display()));
        if self.dry_run {
            output.warning("Dry run: no artifacts will be written");
        } else {
            output.info(&format!("Output: {}", config.output_dir.display()));
        }

        let source = FsSource::new(config.source_dir.clone());
        let sink: Box<dyn ArtifactSink> = if self.dry_run {
            Box::new(NullSink)
        } else {
            Box::new(FileSink::new(config.output_dir.clone()))
        };
        let options = BuildOptions {
            multi_language: config.site_resolved.multi_language,
        };

        let reports = build_languages(
            &source,
            sink.as_ref(),
            options,
            &config.site_resolved.languages,
        );
        summarize(output, &reports)
    }
}

/// Build and publish every language in parallel.
///
/// Reports keep the order of `languages`.
fn build_languages(
    source: &dyn PageSource,
    sink: &dyn ArtifactSink,
    options: BuildOptions,
    languages: &[String],
) -> Vec<LanguageReport> {
    languages
        .par_iter()
        .map(|language| {
            let start = Instant::now();
            let outcome = build_language(source, sink, options, language);
            LanguageReport {
                language: language.clone(),
                outcome,
                elapsed: start.elapsed(),
            }
        })
        .collect()
}

fn build_language(
    source: &dyn PageSource,
    sink: &dyn ArtifactSink,
    options: BuildOptions,
    language: &str,
) -> Result<Published, CliError> {
    let cache = CacheBuilder::new(source, options).build(language)?;
    Ok(sink.publish(&cache)?)
}

/// Print one line per language and fail if any language failed.
fn summarize(output: &Output, reports: &[LanguageReport]) -> Result<(), CliError> {
    let mut failed = 0;
    for report in reports {
        let elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX);
        match &report.outcome {
            Ok(published) => {
                tracing::info!(
                    language = %report.language,
                    elapsed_ms,
                    bytes = published.bytes,
                    "Published navigation cache"
                );
                output.success(&format!(
                    "{}: {} files in {elapsed_ms}ms",
                    report.language,
                    published.paths.len()
                ));
            }
            Err(err) => {
                failed += 1;
                output.error(&format!("{}: {err}", report.language));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Failed {
            failed,
            total: reports.len(),
        });
    }

    output.highlight(&format!("Navigation cache built for {} languages", reports.len()));
    Ok(())
}
