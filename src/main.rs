// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the gh-insight binary.
//!
//! Analyses one GitHub profile or repository URL, shows progress on stderr
//! and prints the report as JSON or as an indented tree.

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
    sync::Arc,
};

use clap::{ArgAction, Parser, ValueEnum};
use gh_insight::{
    AnalysisReport, Analyzer, AnalyzerConfig, Error, OctocrabTransport, ReportView, output_error,
    render_tree, save_report, spawn_analysis,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command line options for a single analysis.
#[derive(Debug, Parser,)]
#[command(
    name = "gh-insight",
    version,
    about = "Analyse a GitHub profile or repository"
)]
struct Cli
{
    /// Profile (https://github.com/<owner>) or repository
    /// (https://github.com/<owner>/<repository>) URL.
    #[arg(value_name = "URL")]
    url: Option<String,>,

    /// Output format written to stdout.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Sections to print.
    #[arg(long = "view", value_enum, default_value_t = ViewArg::All)]
    view: ViewArg,

    /// Save the full report as JSON to this path.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,

    /// YAML file with analyzer settings.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Personal access token sent with every request.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,

    /// Base URL of the GitHub REST API.
    #[arg(long = "api-url", env = "GH_INSIGHT_API_URL", value_name = "URL")]
    api_url: Option<String,>,

    /// Disable the progress bar.
    #[arg(long = "no-progress", action = ArgAction::SetTrue)]
    no_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
enum OutputFormat
{
    /// Two-space indented JSON.
    Json,
    /// Indented key tree.
    Tree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
enum ViewArg
{
    /// Every section.
    All,
    /// Everything except the owner profile.
    Repository,
    /// Only the owner profile.
    Profile,
}

impl From<ViewArg,> for ReportView
{
    fn from(view: ViewArg,) -> Self
    {
        match view {
            ViewArg::All => Self::All,
            ViewArg::Repository => Self::Repository,
            ViewArg::Profile => Self::Profile,
        }
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run(Cli::parse(),).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn",),);
    let _ = tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).try_init();
}

/// Executes one analysis using parsed arguments.
///
/// # Errors
///
/// Propagates invalid input, configuration, analysis and output errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let url = required_url(cli.url.as_deref(),)?;
    let config = resolve_config(&cli,)?;
    debug!("Using API base URL {}", config.api_url);

    let report = analyze(&config, url, !cli.no_progress,).await?;

    if let Some(path,) = cli.output.as_deref() {
        let saved = save_report(path, &report,)?;
        eprintln!("Saved to {}", saved.display());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_view(&mut handle, &report.to_value()?, cli.view.into(), cli.format,)
}

fn required_url(url: Option<&str,>,) -> Result<String, Error,>
{
    url.map(str::trim,)
        .filter(|value| !value.is_empty(),)
        .map(str::to_owned,)
        .ok_or_else(|| Error::validation("please enter a URL",),)
}

fn resolve_config(cli: &Cli,) -> Result<AnalyzerConfig, Error,>
{
    let config = match cli.config.as_deref() {
        Some(path,) => AnalyzerConfig::load(path,)?,
        None => AnalyzerConfig::default(),
    };

    config.with_overrides(cli.api_url.as_deref(), cli.token.as_deref(),).validated()
}

async fn analyze(
    config: &AnalyzerConfig,
    url: String,
    show_progress: bool,
) -> Result<AnalysisReport, Error,>
{
    let analyzer = Arc::new(Analyzer::new(OctocrabTransport::from_config(config,)?,),);
    let mut handle = spawn_analysis(analyzer, url,);
    let canceller = handle.canceller();

    let bar = progress_bar(show_progress,);
    bar.set_message("Analyzing...",);

    loop {
        tokio::select! {
            value = handle.next_progress() => match value {
                Some(value) => bar.set_position(u64::from(value)),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                canceller.cancel();
                break;
            }
        }
    }

    let outcome = handle.outcome().await;
    match &outcome {
        Ok(_,) => bar.finish_with_message("Analysis completed",),
        Err(_,) => bar.abandon_with_message("Analysis failed",),
    }
    outcome
}

fn progress_bar(visible: bool,) -> ProgressBar
{
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(100,);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}",)
        .unwrap_or_else(|_| ProgressStyle::default_bar(),);
    bar.set_style(style,);
    bar
}

fn write_view<W: Write,>(
    writer: &mut W,
    report: &Value,
    view: ReportView,
    format: OutputFormat,
) -> Result<(), Error,>
{
    let selected = view.select(report,);
    let text = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&selected)?),
        OutputFormat::Tree => render_tree(&selected,),
    };

    writer.write_all(text.as_bytes(),).map_err(output_error,)?;
    writer.flush().map_err(output_error,)
}

#[cfg(test)]
mod tests
{
    use std::{
        fs,
        io::{self, Cursor, Write},
        path::Path,
    };

    use clap::Parser;
    use gh_insight::{Error, ReportView};
    use serde_json::json;
    use tempfile::tempdir;

    use super::{Cli, OutputFormat, ViewArg, required_url, resolve_config, write_view};

    #[test]
    fn cli_parses_url_and_flags()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "https://github.com/octocat",
            "--format",
            "tree",
            "--view",
            "profile",
            "--output",
            "report.json",
            "--no-progress",
        ],)
        .expect("failed to parse CLI",);

        assert_eq!(cli.url.as_deref(), Some("https://github.com/octocat"));
        assert_eq!(cli.format, OutputFormat::Tree);
        assert_eq!(cli.view, ViewArg::Profile);
        assert_eq!(cli.output.as_deref(), Some(Path::new("report.json")));
        assert!(cli.no_progress);
    }

    #[test]
    fn cli_defaults_to_json_and_all_sections()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "https://github.com/octocat/repo",],)
            .expect("failed to parse CLI",);

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.view, ViewArg::All);
        assert!(!cli.no_progress);
    }

    #[test]
    fn blank_url_is_rejected()
    {
        for input in [None, Some(""), Some("   ")] {
            match required_url(input,) {
                Err(Error::Validation {
                    message,
                },) => assert_eq!(message, "please enter a URL"),
                other => panic!("unexpected result: {other:?}"),
            }
        }
        assert_eq!(
            required_url(Some(" https://github.com/octocat ")).expect("url"),
            "https://github.com/octocat"
        );
    }

    #[test]
    fn flags_override_config_file()
    {
        let dir = tempdir().expect("failed to create tempdir",);
        let path = dir.path().join("gh-insight.yaml",);
        fs::write(&path, "api_url: https://ghe.example.com/api/v3/\n",).expect("write config",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "https://github.com/octocat",
            "--config",
            path.to_str().expect("utf8",),
            "--token",
            "ghp_example",
        ],)
        .expect("failed to parse CLI",);

        let config = resolve_config(&cli,).expect("valid config",);
        assert_eq!(config.token.as_deref(), Some("ghp_example"));

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "https://github.com/octocat",
            "--config",
            path.to_str().expect("utf8",),
            "--api-url",
            "http://localhost:8080",
        ],)
        .expect("failed to parse CLI",);

        let config = resolve_config(&cli,).expect("valid config",);
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn invalid_api_url_is_a_validation_error()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "https://github.com/octocat",
            "--api-url",
            "ftp://example.com",
        ],)
        .expect("failed to parse CLI",);

        assert!(matches!(resolve_config(&cli), Err(Error::Validation { .. })));
    }

    #[test]
    fn views_select_sections_for_output()
    {
        let report = json!({
            "timestamp": "t",
            "ownerProfile": { "follower_list": ["alice"] },
            "contributions": { "total_contributions_impact": 1 },
        });

        let mut buffer = Cursor::new(Vec::new(),);
        write_view(&mut buffer, &report, ReportView::Profile, OutputFormat::Tree,)
            .expect("write tree",);
        let output = String::from_utf8(buffer.into_inner(),).expect("utf8",);
        assert_eq!(output, "ownerProfile\n  follower_list\n    [0]\n      alice\n");

        let mut buffer = Cursor::new(Vec::new(),);
        write_view(&mut buffer, &report, ReportView::Repository, OutputFormat::Json,)
            .expect("write json",);
        let output = String::from_utf8(buffer.into_inner(),).expect("utf8",);
        assert_eq!(
            output,
            "{\n  \"timestamp\": \"t\",\n  \"contributions\": {\n    \
             \"total_contributions_impact\": 1\n  }\n}\n"
        );
    }

    struct ClosedStdout;

    impl Write for ClosedStdout
    {
        fn write(&mut self, _buf: &[u8],) -> io::Result<usize,>
        {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed",),)
        }

        fn flush(&mut self,) -> io::Result<(),>
        {
            Ok((),)
        }
    }

    #[test]
    fn stdout_failures_are_reported_as_output_errors()
    {
        let error = write_view(
            &mut ClosedStdout,
            &json!({ "timestamp": "t" }),
            ReportView::All,
            OutputFormat::Json,
        )
        .expect_err("closed stdout",);

        match error {
            Error::Output {
                source,
            } => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
