use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use workbase_core::{RemoteGateway, SignalSink};
use workbase_domain::{ApiError, RequestDescriptor, ResponsePayload, Signal};

type Outcome = Result<ResponsePayload, ApiError>;

/// Gateway that replays queued outcomes and records every request.
///
/// Once the script runs out, `fallback_outcome` is returned for every call.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Outcome>>,
    fallback_outcome: Outcome,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedGateway {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self::with_default(script, Ok(ResponsePayload::Empty))
    }

    pub fn with_default(script: Vec<Outcome>, fallback_outcome: Outcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback_outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A gateway whose every call fails with `err`
    pub fn failing(err: ApiError) -> Self {
        Self::with_default(Vec::new(), Err(err))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn execute(&self, request: RequestDescriptor) -> Outcome {
        self.requests.lock().unwrap().push(request);
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| self.fallback_outcome.clone())
    }
}

/// Sink that keeps every published signal
#[derive(Default, Clone)]
pub struct RecordingSink {
    signals: Arc<Mutex<Vec<Signal>>>,
}

impl RecordingSink {
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().unwrap().clone()
    }
}

impl SignalSink for RecordingSink {
    fn publish(&self, signal: Signal) {
        self.signals.lock().unwrap().push(signal);
    }
}
