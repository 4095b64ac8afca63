//! Sync request and sync result packets.

use std::collections::BTreeMap;
use std::fmt;

use mfpsync_wire::{tag, WireReader, WireWriter};
use uuid::Uuid;

use crate::error::{RecordError, Result};
use crate::flags::Flag;
use crate::packet::{read_count_i16, write_count_i16, write_string_map, Body};

/// Continuation pointers returned by the server and echoed on the next request.
pub type SyncPointers = BTreeMap<String, String>;

pub const DEFAULT_API_VERSION: i16 = 6;
pub const DEFAULT_SVN_REVISION: i32 = 237;
pub const DEFAULT_REQUEST_KIND: i16 = 2;
pub const DEFAULT_REQUEST_FLAGS: i16 = 0x5;

/// Opens every sync exchange.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncRequest {
    pub api_version: i16,
    pub svn_revision: i32,
    /// Undocumented; clients always send 2.
    pub request_kind: i16,
    pub username: String,
    pub password: String,
    pub flags: i16,
    pub installation_id: Uuid,
    pub last_sync_pointers: SyncPointers,
}

impl SyncRequest {
    /// A full-sync request with default protocol settings.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        installation_id: Uuid,
    ) -> Self {
        Self {
            api_version: DEFAULT_API_VERSION,
            svn_revision: DEFAULT_SVN_REVISION,
            request_kind: DEFAULT_REQUEST_KIND,
            username: username.into(),
            password: password.into(),
            flags: DEFAULT_REQUEST_FLAGS,
            installation_id,
            last_sync_pointers: SyncPointers::new(),
        }
    }
}

impl Default for SyncRequest {
    fn default() -> Self {
        Self::new("", "", Uuid::new_v4())
    }
}

impl fmt::Debug for SyncRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRequest")
            .field("api_version", &self.api_version)
            .field("svn_revision", &self.svn_revision)
            .field("request_kind", &self.request_kind)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("flags", &self.flags)
            .field("installation_id", &self.installation_id)
            .field("last_sync_pointers", &self.last_sync_pointers)
            .finish()
    }
}

impl Body for SyncRequest {
    const TAG: u16 = tag::SYNC_REQUEST;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        let api_version = reader.read_i16()?;
        let svn_revision = reader.read_i32()?;
        let request_kind = reader.read_i16()?;
        let username = reader.read_string()?;
        let password = reader.read_string()?;
        let flags = reader.read_i16()?;
        let installation_id = reader.read_uuid()?;
        let count = read_count_i16(reader)?;
        let last_sync_pointers =
            reader.read_map(count, WireReader::read_string, WireReader::read_string)?;

        Ok(Self {
            api_version,
            svn_revision,
            request_kind,
            username,
            password,
            flags,
            installation_id,
            last_sync_pointers,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i16(self.api_version);
        writer.write_i32(self.svn_revision);
        writer.write_i16(self.request_kind);
        writer.write_string(&self.username)?;
        writer.write_string(&self.password)?;
        writer.write_i16(self.flags);
        writer.write_uuid(&self.installation_id);
        write_count_i16(writer, self.last_sync_pointers.len())?;
        write_string_map(writer, &self.last_sync_pointers)
    }
}

/// Outcome codes carried by [`SyncResult::status_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStatus {
    Ok,
    InvalidRegistration,
    AuthenticationFailed,
}

impl SyncStatus {
    const ALL: [SyncStatus; 3] = [
        SyncStatus::Ok,
        SyncStatus::InvalidRegistration,
        SyncStatus::AuthenticationFailed,
    ];

    pub fn code(self) -> i16 {
        match self {
            SyncStatus::Ok => 0,
            SyncStatus::InvalidRegistration => 1,
            SyncStatus::AuthenticationFailed => 2,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SyncStatus::Ok => "ok",
            SyncStatus::InvalidRegistration => "invalid_registration",
            SyncStatus::AuthenticationFailed => "authentication_failed",
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.message() == message)
    }
}

/// Message reported for status codes outside [`SyncStatus`].
pub const UNKNOWN_STATUS_MESSAGE: &str = "unknown";

/// Server summary of one sync response.
///
/// It is not counted as a data record; its `expected_record_count` is the
/// number of other records in the same response.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncResult {
    pub status_code: i16,
    pub error_message: String,
    /// `alert|url` when an upgrade is offered.
    pub extra_message: String,
    pub master_id: i32,
    pub flags: i16,
    pub expected_record_count: i32,
    pub last_sync_pointers: SyncPointers,
}

impl SyncResult {
    pub const MORE_DATA_TO_SYNC: Flag<i16> = Flag::new(0x1);
    pub const UPGRADE_AVAILABLE: Flag<i16> = Flag::new(0x2);

    pub fn more_data_to_sync(&self) -> bool {
        Self::MORE_DATA_TO_SYNC.is_set(self.flags)
    }

    pub fn set_more_data_to_sync(&mut self, enabled: bool) {
        Self::MORE_DATA_TO_SYNC.apply(&mut self.flags, enabled);
    }

    pub fn upgrade_available(&self) -> bool {
        Self::UPGRADE_AVAILABLE.is_set(self.flags)
    }

    pub fn set_upgrade_available(&mut self, enabled: bool) {
        Self::UPGRADE_AVAILABLE.apply(&mut self.flags, enabled);
    }

    pub fn status(&self) -> Option<SyncStatus> {
        SyncStatus::from_code(self.status_code)
    }

    /// Message for the status code, `"unknown"` for unrecognised codes.
    pub fn status_message(&self) -> &'static str {
        self.status()
            .map(SyncStatus::message)
            .unwrap_or(UNKNOWN_STATUS_MESSAGE)
    }

    pub fn set_status(&mut self, status: SyncStatus) {
        self.status_code = status.code();
    }

    /// Set the status code from its message. `"unknown"` is not settable.
    pub fn set_status_message(&mut self, message: &str) -> Result<()> {
        let status = SyncStatus::from_message(message)
            .ok_or_else(|| RecordError::UnknownStatusMessage(message.to_string()))?;
        self.set_status(status);
        Ok(())
    }

    fn upgrade_parts(&self) -> (&str, &str) {
        self.extra_message
            .split_once('|')
            .unwrap_or((self.extra_message.as_str(), ""))
    }

    /// Text before the first `|` of the extra message.
    pub fn upgrade_alert(&self) -> &str {
        self.upgrade_parts().0
    }

    /// Text after the first `|` of the extra message.
    pub fn upgrade_url(&self) -> &str {
        self.upgrade_parts().1
    }

    pub fn set_upgrade_alert(&mut self, alert: &str) {
        self.extra_message = format!("{alert}|{}", self.upgrade_url());
    }

    pub fn set_upgrade_url(&mut self, url: &str) {
        self.extra_message = format!("{}|{url}", self.upgrade_alert());
    }
}

impl Body for SyncResult {
    const TAG: u16 = tag::SYNC_RESULT;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        let status_code = reader.read_i16()?;
        let error_message = reader.read_string()?;
        let extra_message = reader.read_string()?;
        let master_id = reader.read_i32()?;
        let flags = reader.read_i16()?;
        // The pointer count comes before the record count, not before the pointers.
        let pointer_count = read_count_i16(reader)?;
        let expected_record_count = reader.read_i32()?;
        let last_sync_pointers =
            reader.read_map(pointer_count, WireReader::read_string, WireReader::read_string)?;

        Ok(Self {
            status_code,
            error_message,
            extra_message,
            master_id,
            flags,
            expected_record_count,
            last_sync_pointers,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i16(self.status_code);
        writer.write_string(&self.error_message)?;
        writer.write_string(&self.extra_message)?;
        writer.write_i32(self.master_id);
        writer.write_i16(self.flags);
        write_count_i16(writer, self.last_sync_pointers.len())?;
        writer.write_i32(self.expected_record_count);
        write_string_map(writer, &self.last_sync_pointers)
    }
}
