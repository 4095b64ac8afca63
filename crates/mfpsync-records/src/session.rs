use bytes::Bytes;
use mfpsync_wire::WireReader;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{RecordError, Result};
use crate::record::{DecodedRecord, Record};
use crate::registry::Registry;

/// Decodes every record of one response buffer.
///
/// Yields records in stream order. A short read that starts exactly at a
/// packet boundary ends the pass cleanly; any other error is yielded once and
/// ends the pass. At a clean end the number of data records is checked
/// against the count announced by the first sync result, when one was seen
/// and [`SessionConfig::verify_record_count`] is set.
#[derive(Debug)]
pub struct DecodeSession {
    reader: WireReader,
    registry: Registry,
    config: SessionConfig,
    record_count: u64,
    expected_count: Option<i32>,
    finished: bool,
}

impl DecodeSession {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self::with_config(buf, SessionConfig::default())
    }

    pub fn with_config(buf: impl Into<Bytes>, config: SessionConfig) -> Self {
        Self {
            reader: WireReader::with_config(buf, config.wire),
            registry: Registry::standard(),
            config,
            record_count: 0,
            expected_count: None,
            finished: false,
        }
    }

    /// Decode with a different codec table.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Data records decoded so far. Sync results are not counted.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Record count declared by the first sync result, if one was decoded.
    pub fn expected_count(&self) -> Option<i32> {
        self.expected_count
    }

    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Start over from the first byte with fresh counters.
    pub fn rewind(&mut self) {
        self.reader = WireReader::with_config(self.reader.get_ref().clone(), self.config.wire);
        self.record_count = 0;
        self.expected_count = None;
        self.finished = false;
    }

    fn observe(&mut self, record: &Record) {
        match record.as_sync_result() {
            Some(result) => {
                if self.expected_count.is_none() {
                    self.expected_count = Some(result.expected_record_count);
                }
            }
            None => self.record_count += 1,
        }
    }

    fn finish(&mut self) -> Option<Result<DecodedRecord>> {
        self.finished = true;
        debug!(
            records = self.record_count,
            expected = ?self.expected_count,
            "decode pass finished"
        );

        let expected = self.expected_count.filter(|_| self.config.verify_record_count)?;
        if u64::try_from(expected).ok() == Some(self.record_count) {
            return None;
        }
        Some(Err(RecordError::CountMismatch {
            expected,
            received: self.record_count,
        }))
    }
}

impl Iterator for DecodeSession {
    type Item = Result<DecodedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let start = self.reader.position();
        match self.registry.decode_record(&mut self.reader) {
            Ok(decoded) => {
                self.observe(&decoded.record);
                Some(Ok(decoded))
            }
            Err(err) if err.is_truncated() && self.reader.position() == start => self.finish(),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Decode a whole buffer with the default session configuration.
pub fn decode_all(buf: impl Into<Bytes>) -> Result<Vec<DecodedRecord>> {
    DecodeSession::new(buf).collect()
}
