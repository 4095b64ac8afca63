//! Pagination driver: request, decode, follow continuation pointers.

use std::fmt;

use bytes::Bytes;
use mfpsync_records::{
    DecodeSession, Record, Registry, SessionConfig, SyncPointers, SyncRequest, SyncResult,
};
use mfpsync_transport::Transport;
use tracing::debug;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

type ResponseSink = Box<dyn FnMut(&Bytes)>;

/// Upgrade prompt carried by a sync result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeNotice {
    pub alert: String,
    pub url: String,
}

/// Everything one sync returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Data records of every round, in arrival order.
    pub records: Vec<Record>,
    /// Pointers to pass to [`SyncClient::sync_from`] for the next incremental sync.
    pub last_sync_pointers: SyncPointers,
    pub rounds: u32,
    /// Set when any round offered a client upgrade.
    pub upgrade: Option<UpgradeNotice>,
}

/// Sync client for one account.
///
/// Each round sends a [`SyncRequest`] carrying the current pointers and
/// decodes the whole response. The server's [`SyncResult`] supplies the
/// pointers for the next round and says whether more data is waiting.
pub struct SyncClient<T> {
    transport: T,
    username: String,
    password: String,
    installation_id: Uuid,
    config: SyncConfig,
    response_sink: Option<ResponseSink>,
}

impl<T: Transport> SyncClient<T> {
    /// Client with a random installation id and default config.
    pub fn new(transport: T, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            transport,
            username: username.into(),
            password: password.into(),
            installation_id: Uuid::new_v4(),
            config: SyncConfig::default(),
            response_sink: None,
        }
    }

    /// Identify as a specific phone installation.
    pub fn with_installation_id(mut self, installation_id: Uuid) -> Self {
        self.installation_id = installation_id;
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Hand every raw response to `sink` before it is decoded.
    ///
    /// Captured responses can be decoded later with a
    /// [`ReplayTransport`](mfpsync_transport::ReplayTransport).
    pub fn with_response_sink(mut self, sink: impl FnMut(&Bytes) + 'static) -> Self {
        self.response_sink = Some(Box::new(sink));
        self
    }

    pub fn installation_id(&self) -> Uuid {
        self.installation_id
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Fetch all data.
    pub fn sync(&mut self) -> Result<SyncOutcome> {
        self.sync_from(SyncPointers::new())
    }

    /// Fetch data changed since `pointers` were issued.
    pub fn sync_from(&mut self, pointers: SyncPointers) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome {
            records: Vec::new(),
            last_sync_pointers: pointers,
            rounds: 0,
            upgrade: None,
        };

        loop {
            if outcome.rounds >= self.config.max_rounds {
                return Err(SyncError::TooManyRounds {
                    max: self.config.max_rounds,
                });
            }
            outcome.rounds += 1;

            let request = self.request(outcome.last_sync_pointers.clone());
            let response = self.exchange(request)?;
            let received_before = outcome.records.len();
            let result = self.decode_round(response, &mut outcome.records)?;

            let Some(result) = result else {
                debug!(round = outcome.rounds, "response carried no sync result");
                break;
            };

            if result.status_code != 0 {
                return Err(SyncError::Rejected {
                    code: result.status_code,
                    status: result.status_message(),
                    message: result.error_message,
                });
            }
            if result.upgrade_available() {
                outcome.upgrade = Some(UpgradeNotice {
                    alert: result.upgrade_alert().to_string(),
                    url: result.upgrade_url().to_string(),
                });
            }

            let more = result.more_data_to_sync();
            debug!(
                round = outcome.rounds,
                records = outcome.records.len() - received_before,
                more,
                "sync round finished"
            );
            outcome.last_sync_pointers = result.last_sync_pointers;
            if !more {
                break;
            }
        }

        Ok(outcome)
    }

    fn request(&self, last_sync_pointers: SyncPointers) -> SyncRequest {
        SyncRequest {
            api_version: self.config.api_version,
            svn_revision: self.config.svn_revision,
            request_kind: self.config.request_kind,
            username: self.username.clone(),
            password: self.password.clone(),
            flags: self.config.request_flags,
            installation_id: self.installation_id,
            last_sync_pointers,
        }
    }

    fn exchange(&mut self, request: SyncRequest) -> Result<Bytes> {
        let record = Record::from(request);
        let encoded = Registry::standard().encode_all([&record], self.config.wire)?;
        let response = self.transport.exchange(encoded)?;
        if let Some(sink) = self.response_sink.as_mut() {
            sink(&response);
        }
        Ok(response)
    }

    /// Decode one response, returning its first sync result and appending
    /// everything else to `records`.
    fn decode_round(
        &self,
        response: Bytes,
        records: &mut Vec<Record>,
    ) -> Result<Option<SyncResult>> {
        let config = SessionConfig {
            wire: self.config.wire,
            ..SessionConfig::default()
        };

        let mut result = None;
        for decoded in DecodeSession::with_config(response, config) {
            match decoded?.record {
                Record::SyncResult(sync_result) if result.is_none() => result = Some(sync_result),
                record => records.push(record),
            }
        }
        Ok(result)
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("transport", &self.transport)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("installation_id", &self.installation_id)
            .field("config", &self.config)
            .field("response_sink", &self.response_sink.is_some())
            .finish()
    }
}
