// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Report assembly.
///
/// Runs the fetchers applicable to a target concurrently and merges their
/// sections into an [`AnalysisReport`]. A failing fetcher only affects its
/// own section.
use std::{
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::Local;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::{
    collaborators::fetch_collaborators,
    commit_activity::fetch_commit_activity,
    contributions::fetch_contributions,
    profile::fetch_owner_profile,
    reference::{TargetDescriptor, TargetKind},
    report::{AnalysisReport, SubjectReference},
    repository::fetch_repository_details,
    traffic::fetch_traffic,
    transport::Transport,
};

/// Highest progress value reported while fetchers are running. The execution
/// host reports 100 once the report is delivered.
pub const ASSEMBLY_PROGRESS_CEILING: u8 = 90;

/// Number of fetchers invoked for a target kind.
pub fn fetcher_count(kind: TargetKind,) -> usize
{
    match kind {
        TargetKind::Profile => 2,
        TargetKind::Repository => 6,
    }
}

/// Assembles reports through a shared, read-only transport.
#[derive(Debug,)]
pub struct Analyzer<T,>
{
    transport: T,
}

impl<T: Transport,> Analyzer<T,>
{
    /// Creates an analyzer reading through `transport`.
    pub fn new(transport: T,) -> Self
    {
        Self {
            transport,
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self,) -> &T
    {
        &self.transport
    }

    /// Assembles the report for `target`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gh_insight::{AnalyzerConfig, Analyzer, OctocrabTransport, classify};
    ///
    /// # async fn example() -> Result<(), gh_insight::Error> {
    /// let transport = OctocrabTransport::from_config(&AnalyzerConfig::default(),)?;
    /// let analyzer = Analyzer::new(transport,);
    /// let target = classify("https://github.com/octocat/Hello-World",)?;
    /// let report = analyzer.assemble(&target,).await;
    /// assert!(report.repository_details.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn assemble(&self, target: &TargetDescriptor,) -> AnalysisReport
    {
        self.assemble_with_progress(target, None,).await
    }

    /// Assembles the report for `target`, sending a progress value after each
    /// fetcher completes.
    ///
    /// Values never exceed [`ASSEMBLY_PROGRESS_CEILING`]. A closed receiver is
    /// ignored.
    pub async fn assemble_with_progress(
        &self,
        target: &TargetDescriptor,
        progress: Option<&UnboundedSender<u8,>,>,
    ) -> AnalysisReport
    {
        let timestamp = Local::now().to_rfc3339();
        let tracker = ProgressTracker::new(progress, fetcher_count(target.kind(),),);
        let transport = &self.transport;
        let owner = target.owner();

        info!("Assembling report for {}", target);

        let report = match target.repository() {
            None => {
                let (owner_profile, contributions,) = tokio::join!(
                    tracker.track(fetch_owner_profile(transport, owner)),
                    tracker.track(fetch_contributions(transport, owner)),
                );

                AnalysisReport {
                    timestamp,
                    subject_reference: SubjectReference::from(target,),
                    owner_profile,
                    repository_details: None,
                    collaborators: None,
                    commit_activity: None,
                    traffic: None,
                    contributions,
                }
            }
            Some(repository,) => {
                let (
                    owner_profile,
                    repository_details,
                    collaborators,
                    commit_activity,
                    traffic,
                    contributions,
                ) = tokio::join!(
                    tracker.track(fetch_owner_profile(transport, owner)),
                    tracker.track(fetch_repository_details(transport, owner, repository)),
                    tracker.track(fetch_collaborators(transport, owner, repository)),
                    tracker.track(fetch_commit_activity(transport, owner, repository)),
                    tracker.track(fetch_traffic(transport, owner, repository)),
                    tracker.track(fetch_contributions(transport, owner)),
                );

                AnalysisReport {
                    timestamp,
                    subject_reference: SubjectReference::from(target,),
                    owner_profile,
                    repository_details: Some(repository_details,),
                    collaborators: Some(collaborators,),
                    commit_activity: Some(commit_activity,),
                    traffic: Some(traffic,),
                    contributions,
                }
            }
        };

        debug!("Report for {} has sections {:?}", target, report.section_keys());
        report
    }
}

/// Counts completed fetchers and forwards the derived percentage.
struct ProgressTracker<'a,>
{
    sender:    Option<&'a UnboundedSender<u8,>,>,
    total:     usize,
    completed: AtomicUsize,
}

impl<'a,> ProgressTracker<'a,>
{
    fn new(sender: Option<&'a UnboundedSender<u8,>,>, total: usize,) -> Self
    {
        Self {
            sender,
            total,
            completed: AtomicUsize::new(0,),
        }
    }

    async fn track<F: Future,>(&self, fetch: F,) -> F::Output
    {
        let output = fetch.await;
        self.advance();
        output
    }

    fn advance(&self,)
    {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst,) + 1;
        let Some(sender,) = self.sender else {
            return;
        };

        let percent = completed.min(self.total,) * usize::from(ASSEMBLY_PROGRESS_CEILING,)
            / self.total.max(1,);
        let _ = sender.send(u8::try_from(percent,).unwrap_or(ASSEMBLY_PROGRESS_CEILING,),);
    }
}
