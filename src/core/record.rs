//! Typed log record and its JSON-line encoding

use super::attachments::{Attachments, FieldValue};
use super::error::Result;
use super::tag::TagSet;
use serde::Serialize;

/// Per-entry field state: everything a line carries besides the tags, the
/// message and the timestamp, which are supplied per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    pub host: String,
    pub service: String,
    pub subsystem: String,
    pub ctxpretext: String,
    /// Error text for the next emitted line; cleared after each emission
    pub err: String,
    pub attachments: Attachments,
}

impl RecordFields {
    pub fn new(host: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service: service.into(),
            ..Self::default()
        }
    }

    /// Borrow these fields as a record for one emission
    pub fn record<'a>(
        &'a self,
        timestamp: String,
        tags: &'a TagSet,
        msg: &'a str,
    ) -> LogRecord<'a> {
        LogRecord {
            timestamp,
            host: &self.host,
            service: &self.service,
            subsystem: &self.subsystem,
            filtertags: tags,
            ctxpretext: &self.ctxpretext,
            err: &self.err,
            msg,
            attachments: &self.attachments,
        }
    }

    /// Reset the per-call transient fields
    pub fn clear_transient(&mut self) {
        self.err.clear();
    }
}

/// One line of output. Field names are part of the output contract.
#[derive(Debug, Serialize)]
pub struct LogRecord<'a> {
    pub timestamp: String,
    pub host: &'a str,
    pub service: &'a str,
    pub subsystem: &'a str,
    pub filtertags: &'a TagSet,
    pub ctxpretext: &'a str,
    pub err: &'a str,
    pub msg: &'a str,
    #[serde(flatten)]
    pub attachments: &'a Attachments,
}

impl LogRecord<'_> {
    /// Serialize to a single newline-terminated JSON object
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }

    pub fn attachment(&self, key: &str) -> Option<&FieldValue> {
        self.attachments.get(key)
    }
}
