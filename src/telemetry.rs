//! Request analytics events and sinks.
//!
//! Each request records funnel events through a sink. Emission runs as
//! spawned background work so it never blocks the workflow; the handles are
//! retained and drained before the request handler returns, on success and
//! failure alike, so a serverless host never terminates the process with
//! emission still in flight.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::github::error::BotError;

/// A structured analytics event emitted while processing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A comment addressed to the bot was accepted for processing.
    CommentReceived {
        /// `owner/name` of the repository the comment targets.
        repository: String,
    },
    /// An add-contributor command was parsed and is being orchestrated.
    ContributorAddRequested {
        /// Login of the contributor being added.
        login: String,
        /// Number of contribution tags in the request.
        contribution_count: usize,
    },
    /// A pull request was opened for the staged changes.
    PullRequestOpened {
        /// HTML URL of the new pull request.
        url: String,
    },
    /// The pull request for this contributor was already open.
    PullRequestAlreadyOpen,
    /// The request ended in an error.
    RequestFailed {
        /// Whether the error was a user-facing bot outcome rather than an
        /// infrastructure failure.
        user_facing: bool,
    },
}

/// A sink that can record analytics events.
#[async_trait]
pub trait TelemetrySink: Send + Sync + 'static {
    /// Records one event.
    async fn record(&self, event: TelemetryEvent) -> Result<(), BotError>;
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

#[async_trait]
impl TelemetrySink for NoopTelemetrySink {
    async fn record(&self, _event: TelemetryEvent) -> Result<(), BotError> {
        Ok(())
    }
}

/// Records events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

#[async_trait]
impl TelemetrySink for StderrJsonlTelemetrySink {
    async fn record(&self, event: TelemetryEvent) -> Result<(), BotError> {
        let serialised = serde_json::to_string(&event).map_err(|error| BotError::Io {
            message: error.to_string(),
        })?;
        writeln_stderr(&serialised).map_err(|error| BotError::Io {
            message: error.to_string(),
        })
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Per-request event queue.
///
/// `track` spawns the emission and keeps the join handle; `drain` awaits
/// every outstanding emission. A failed emission is logged, never fatal to
/// the request.
pub struct Analytics {
    sink: Arc<dyn TelemetrySink>,
    in_flight: Vec<JoinHandle<Result<(), BotError>>>,
}

impl Analytics {
    /// Creates a queue recording through `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            sink,
            in_flight: Vec::new(),
        }
    }

    /// Records `event` in the background.
    pub fn track(&mut self, event: TelemetryEvent) {
        let sink = Arc::clone(&self.sink);
        self.in_flight
            .push(tokio::spawn(async move { sink.record(event).await }));
    }

    /// Awaits every outstanding emission.
    pub async fn drain(&mut self) {
        for handle in self.in_flight.drain(..) {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => tracing::warn!("telemetry emission failed: {error}"),
                Err(error) => tracing::warn!("telemetry task aborted: {error}"),
            }
        }
    }
}

#[cfg(feature = "test-support")]
pub mod test_support {
    //! Test helpers for asserting on recorded telemetry.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{TelemetryEvent, TelemetrySink};
    use crate::github::error::BotError;

    /// Sink that captures every recorded event for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        /// Removes and returns every captured event.
        ///
        /// # Panics
        ///
        /// Panics when the internal mutex is poisoned.
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .expect("events mutex should be available")
                .drain(..)
                .collect()
        }
    }

    #[async_trait]
    impl TelemetrySink for RecordingSink {
        async fn record(&self, event: TelemetryEvent) -> Result<(), BotError> {
            self.events
                .lock()
                .expect("events mutex should be available")
                .push(event);
            Ok(())
        }
    }
}
