use std::collections::VecDeque;

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Serves previously captured responses in order.
///
/// Every request it receives is kept, so callers can inspect what would
/// have been sent.
#[derive(Debug, Clone, Default)]
pub struct ReplayTransport {
    responses: VecDeque<Bytes>,
    requests: Vec<Bytes>,
}

impl ReplayTransport {
    pub fn new<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            requests: Vec::new(),
        }
    }

    /// Queue another response after the existing ones.
    pub fn push_response(&mut self, response: impl Into<Bytes>) {
        self.responses.push_back(response.into());
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> &[Bytes] {
        &self.requests
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for ReplayTransport {
    fn exchange(&mut self, request: Bytes) -> Result<Bytes> {
        self.requests.push(request);
        let response = self.responses.pop_front().ok_or(TransportError::Exhausted)?;
        debug!(
            len = response.len(),
            remaining = self.responses.len(),
            "replaying response"
        );
        Ok(response)
    }
}
