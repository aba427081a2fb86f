//! Request/response surface for a debugging client.
//!
//! The server owns the recorder so that queries and recording share one
//! thread and a query always sees fully linked events. Every operation that
//! cannot find its target answers with an empty or absent payload; only a
//! request that cannot be decoded is a [`Response::Failure`].

use causeway_foundation::{EventRef, TargetId, TargetRef, TargetType};
use causeway_recorder::{Recorder, RecorderStats};
use serde::{Deserialize, Serialize};

use crate::config::InsightsConfig;
use crate::state::{TargetState, target_state};
use crate::targets::{Target, TargetTable};
use crate::trace::{TraceFrame, current_trace, get_trace};

// =============================================================================
// Wire Types
// =============================================================================

/// A client request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "func", content = "args", rename_all = "camelCase")]
pub enum Request {
    /// Trace of an event by time; `None` traces the currently executing event.
    GetTrace(Option<u32>),
    /// State of a tracked observable.
    GetObservableState(u32),
    /// State of a tracked subscriber.
    GetSubscriberState(u32),
    /// Node counts.
    GetStats,
    /// Every tracked target.
    GetTargets,
    /// Stop tracking a target.
    ReleaseTarget(TargetId),
}

/// Successful response body. Its shape is determined by the request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Answer to `getTrace`.
    Trace(Vec<TraceFrame>),
    /// Answer to `getObservableState` and `getSubscriberState`; `None` when
    /// the target is not tracked.
    State(Option<Box<TargetState>>),
    /// Answer to `getStats`.
    Stats(RecorderStats),
    /// Answer to `getTargets`.
    Targets(Vec<Target>),
    /// Answer to `releaseTarget`: whether the target was tracked.
    Released(bool),
}

/// A server response.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    /// The request was understood.
    Success(Payload),
    /// The request could not be decoded.
    Failure(String),
}

// =============================================================================
// Server
// =============================================================================

/// Answers client requests against a recorder and its tracked targets.
#[derive(Debug, Default)]
pub struct InsightsServer {
    recorder: Recorder,
    targets: TargetTable,
    config: InsightsConfig,
}

impl InsightsServer {
    /// Creates a server around `recorder`.
    #[must_use]
    pub fn new(recorder: Recorder, config: InsightsConfig) -> Self {
        Self {
            recorder,
            targets: TargetTable::new(),
            config,
        }
    }

    /// Returns the recorder.
    #[must_use]
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Returns the recorder for recording.
    pub fn recorder_mut(&mut self) -> &mut Recorder {
        &mut self.recorder
    }

    /// Returns the tracked targets.
    #[must_use]
    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    /// Starts tracking a target so that state queries answer for it.
    pub fn inspect(&mut self, target: impl Into<TargetRef>) -> Option<Target> {
        self.targets.inspect(self.recorder.log(), target.into())
    }

    /// Takes queued inspect notifications.
    pub fn drain_notifications(&mut self) -> Vec<Target> {
        self.targets.drain_notifications()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the trace of event `time`, or of the currently executing event
    /// when `time` is `None`.
    #[must_use]
    pub fn get_trace(&self, time: Option<u32>) -> Vec<TraceFrame> {
        match time {
            Some(time) => get_trace(self.recorder.log(), Some(EventRef::from_raw(time))),
            None => current_trace(&self.recorder),
        }
    }

    /// Returns the state of a tracked observable.
    #[must_use]
    pub fn get_observable_state(&self, id: u32) -> Option<TargetState> {
        self.tracked_state(TargetType::Observable, id)
    }

    /// Returns the state of a tracked subscriber.
    #[must_use]
    pub fn get_subscriber_state(&self, id: u32) -> Option<TargetState> {
        self.tracked_state(TargetType::Subscriber, id)
    }

    fn tracked_state(&self, target_type: TargetType, id: u32) -> Option<TargetState> {
        let target = TargetId { target_type, id };
        if !self.targets.contains(target) {
            tracing::debug!(?target, "state requested for untracked target");
            return None;
        }
        target_state(self.recorder.log(), target.to_ref(), &self.config)
    }

    /// Returns node counts.
    #[must_use]
    pub fn get_stats(&self) -> RecorderStats {
        self.recorder.stats()
    }

    /// Returns every tracked target.
    #[must_use]
    pub fn get_targets(&self) -> Vec<Target> {
        self.targets.targets()
    }

    /// Stops tracking a target. Returns false if it was not tracked.
    pub fn release_target(&mut self, target: TargetId) -> bool {
        self.targets.release(target)
    }

    /// Returns true if the log has a record of `target`, tracked or not.
    #[must_use]
    pub fn is_recorded(&self, target: TargetId) -> bool {
        self.recorder.target(target.to_ref()).is_some()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Answers one request.
    pub fn handle(&mut self, request: Request) -> Response {
        tracing::trace!(?request, "handling request");
        let payload = match request {
            Request::GetTrace(time) => Payload::Trace(self.get_trace(time)),
            Request::GetObservableState(id) => {
                Payload::State(self.get_observable_state(id).map(Box::new))
            }
            Request::GetSubscriberState(id) => {
                Payload::State(self.get_subscriber_state(id).map(Box::new))
            }
            Request::GetStats => Payload::Stats(self.get_stats()),
            Request::GetTargets => Payload::Targets(self.get_targets()),
            Request::ReleaseTarget(target) => Payload::Released(self.release_target(target)),
        };
        Response::Success(payload)
    }

    /// Decodes a request, answers it, and encodes the response, all with the
    /// configured codec.
    pub fn handle_bytes(&mut self, bytes: &[u8]) -> Vec<u8> {
        let codec = self.config.codec;
        let response = match codec.decode::<Request>(bytes) {
            Ok(request) => self.handle(request),
            Err(e) => {
                tracing::warn!(error = %e, ?codec, "failed to decode request");
                Response::Failure(e.to_string())
            }
        };

        match codec.encode(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, ?codec, "failed to encode response");
                codec
                    .encode(&Response::Failure(e.to_string()))
                    .unwrap_or_default()
            }
        }
    }
}
