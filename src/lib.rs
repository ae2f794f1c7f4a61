// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Best-effort analysis reports for GitHub profiles and repositories.
//!
//! The library classifies a github.com URL, reads a fixed set of REST
//! endpoints through a [`Transport`], and merges the results into an
//! [`AnalysisReport`]. Every endpoint is fetched independently: a failing
//! endpoint yields an `{"error": "..."}` section instead of aborting the
//! report. [`spawn_analysis`] runs the whole pipeline on a background task
//! with progress reporting and cancellation.

mod assembler;
mod collaborators;
mod commit_activity;
mod config;
mod contributions;
mod decode;
mod error;
mod export;
mod host;
mod profile;
mod reference;
mod report;
mod repository;
mod traffic;
mod transport;
mod tree;

pub use assembler::{ASSEMBLY_PROGRESS_CEILING, Analyzer, fetcher_count};
pub use collaborators::fetch_collaborators;
pub use commit_activity::{WeeklyCommits, fetch_commit_activity, summarize_weeks};
pub use config::{AnalyzerConfig, DEFAULT_API_URL};
pub use contributions::{fetch_contributions, impact};
pub use decode::NOT_AVAILABLE;
pub use error::{Error, FetchError, export_io_error, io_error, output_error};
pub use export::{save_report, to_json_string, write_report};
pub use host::{AnalysisHandle, Canceller, PROGRESS_COMPLETE, spawn_analysis};
pub use profile::fetch_owner_profile;
pub use reference::{TargetDescriptor, TargetKind, classify};
pub use report::{
    ActiveWeek, ActivityEntry, AnalysisReport, Collaborator, Collaborators, CommitActivity,
    Contributions, ErrorRecord, OwnerProfile, RepoSummary, RepositoryDetails, Section,
    StatisticsStatus, SubjectReference, Traffic, TrafficCount,
};
pub use repository::fetch_repository_details;
pub use traffic::{TRAFFIC_UNAVAILABLE_NOTE, fetch_traffic};
pub use transport::{ApiResponse, OctocrabTransport, Transport};
pub use tree::{ReportView, render_tree};
