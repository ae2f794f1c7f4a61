// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Background execution of analyses.
///
/// Each invocation runs on its own tokio task. The caller observes progress,
/// may cancel, and receives exactly one terminal outcome.
use std::{any::Any, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::{JoinError, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::{
    assembler::Analyzer,
    error::Error,
    reference::classify,
    report::AnalysisReport,
    transport::Transport,
};

/// Progress value sent once the report is ready.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Cancels the invocation it was obtained from.
#[derive(Debug, Clone,)]
pub struct Canceller
{
    flag: Arc<watch::Sender<bool,>,>,
}

impl Canceller
{
    /// Requests cancellation. Has no effect once the outcome is settled.
    pub fn cancel(&self,)
    {
        self.flag.send_replace(true,);
    }
}

/// Handle to a running analysis.
#[derive(Debug,)]
pub struct AnalysisHandle
{
    progress:  mpsc::UnboundedReceiver<u8,>,
    outcome:   oneshot::Receiver<Result<AnalysisReport, Error,>,>,
    canceller: Canceller,
    task:      JoinHandle<(),>,
}

impl AnalysisHandle
{
    /// Waits for the next progress value.
    ///
    /// Returns `None` once the worker has finished and all values were read.
    pub async fn next_progress(&mut self,) -> Option<u8,>
    {
        self.progress.recv().await
    }

    /// Requests cancellation of in-flight fetchers.
    pub fn cancel(&self,)
    {
        self.canceller.cancel();
    }

    /// Returns a cancellation handle usable after [`Self::outcome`] consumed
    /// the handle.
    pub fn canceller(&self,) -> Canceller
    {
        self.canceller.clone()
    }

    /// Waits for the terminal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`] for unclassifiable input,
    /// [`Error::Cancelled`] after cancellation and [`Error::Worker`] when the
    /// worker died without reporting.
    pub async fn outcome(self,) -> Result<AnalysisReport, Error,>
    {
        // A dropped flag cancels the worker; keep it alive while waiting.
        let Self {
            outcome,
            task,
            canceller: _canceller,
            ..
        } = self;

        match outcome.await {
            Ok(result,) => result,
            Err(_,) => Err(match task.await {
                Err(error,) => worker_failure(error,),
                Ok((),) => Error::worker("worker exited without an outcome",),
            },),
        }
    }
}

/// Starts analysing `input` on a background task.
///
/// Classification happens on the task, so an invalid reference is delivered
/// as the error outcome.
pub fn spawn_analysis<T: Transport,>(analyzer: Arc<Analyzer<T,>,>, input: String,) -> AnalysisHandle
{
    let (progress_tx, progress_rx,) = mpsc::unbounded_channel();
    let (outcome_tx, outcome_rx,) = oneshot::channel();
    let (cancel_tx, cancel_rx,) = watch::channel(false,);

    let task = tokio::spawn(async move {
        let outcome = run(&analyzer, &input, progress_tx, cancel_rx,).await;
        if outcome_tx.send(outcome,).is_err() {
            debug!("Outcome for {} dropped, handle is gone", input);
        }
    },);

    AnalysisHandle {
        progress: progress_rx,
        outcome: outcome_rx,
        canceller: Canceller {
            flag: Arc::new(cancel_tx,),
        },
        task,
    }
}

async fn run<T: Transport,>(
    analyzer: &Analyzer<T,>,
    input: &str,
    progress: mpsc::UnboundedSender<u8,>,
    mut cancel: watch::Receiver<bool,>,
) -> Result<AnalysisReport, Error,>
{
    let target = classify(input,)?;
    let _ = progress.send(0,);

    tokio::select! {
        report = analyzer.assemble_with_progress(&target, Some(&progress)) => {
            info!("Analysis of {} finished", target);
            let _ = progress.send(PROGRESS_COMPLETE,);
            Ok(report)
        }
        () = cancelled(&mut cancel) => {
            warn!("Analysis of {} cancelled", target);
            Err(Error::Cancelled)
        }
    }
}

/// Resolves once cancellation is requested or every handle to the
/// invocation is gone.
async fn cancelled(flag: &mut watch::Receiver<bool,>,)
{
    if flag.wait_for(|requested| *requested,).await.is_err() {
        debug!("Cancellation flag dropped, abandoning analysis");
    }
}

fn worker_failure(error: JoinError,) -> Error
{
    if error.is_panic() {
        Error::worker(format!("worker panicked: {}", panic_message(error.into_panic())),)
    } else {
        Error::worker(error.to_string(),)
    }
}

fn panic_message(payload: Box<dyn Any + Send,>,) -> String
{
    match payload.downcast::<String,>() {
        Ok(message,) => *message,
        Err(payload,) => payload
            .downcast_ref::<&str,>()
            .map(|message| (*message).to_owned(),)
            .unwrap_or_else(|| "unknown panic payload".to_owned(),),
    }
}
