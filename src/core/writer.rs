//! `io::Write` adapters over an entry
//!
//! Both adapters work on anything that can lend out an [`Entry`]: a borrowed
//! `&mut Entry` from [`Entry::writer`], or an owned copy handed to another
//! thread.

use super::entry::Entry;
use super::tag::TagSet;
use std::borrow::BorrowMut;
use std::io::{self, Write};

/// Logs every buffer as the `msg` of one line
pub struct TagWriter<E: BorrowMut<Entry>> {
    entry: E,
    tags: TagSet,
}

impl<E: BorrowMut<Entry>> TagWriter<E> {
    pub fn new<I, S>(entry: E, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entry,
            tags: TagSet::from_tags(tags),
        }
    }

    pub fn into_inner(self) -> E {
        self.entry
    }
}

impl<E: BorrowMut<Entry>> Write for TagWriter<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = String::from_utf8_lossy(buf).into_owned();
        self.entry.borrow_mut().logft(self.tags.iter(), message);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Embeds every buffer, which must be one JSON document, under a fixed key.
///
/// The key is removed from the entry again after the line is queued, so it
/// never leaks into later lines.
pub struct NestedJsonWriter<E: BorrowMut<Entry>> {
    entry: E,
    tags: TagSet,
    key: String,
}

impl<E: BorrowMut<Entry>> NestedJsonWriter<E> {
    pub fn new<I, S>(entry: E, tags: I, key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entry,
            tags: TagSet::from_tags(tags),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_inner(self) -> E {
        self.entry
    }
}

impl<E: BorrowMut<Entry>> Write for NestedJsonWriter<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let document: serde_json::Value = serde_json::from_slice(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let entry = self.entry.borrow_mut();
        entry
            .set_field(self.key.as_str(), document)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        entry.logft(self.tags.iter(), format!("nested json in {}", self.key));
        entry.remove_field(&self.key);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
