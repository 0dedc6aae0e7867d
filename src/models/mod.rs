use chrono::{DateTime, Utc};
use thiserror::Error;

use std::fmt;

/// Rejected input, reported before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("note id must be a positive integer, got {0}")]
    NonPositiveId(i64),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Store-assigned note identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(i64);

impl NoteId {
    pub const fn new(id: i64) -> Result<Self, ValidationError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(ValidationError::NonPositiveId(id))
        }
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for NoteId {
    type Error = ValidationError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for a new note. Both fields are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCreate {
    title: String,
    content: String,
}

impl NoteCreate {
    pub fn new(title: String, content: String) -> Result<Self, ValidationError> {
        Ok(Self {
            title: non_empty("title", title)?,
            content: non_empty("content", content)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Partial update. `None` keeps the stored value, `Some` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    title: Option<String>,
    content: Option<String>,
}

impl NoteUpdate {
    pub fn new(title: Option<String>, content: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            title: title.map(|t| non_empty("title", t)).transpose()?,
            content: content.map(|c| non_empty("content", c)).transpose()?,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Applies the present fields on top of `note`.
    ///
    /// Only `title` and `content` change; `id` and both timestamps are
    /// carried over untouched; refreshing `updated_at` is the store's job.
    #[must_use]
    pub fn merge(self, note: Note) -> Note {
        Note {
            title: self.title.unwrap_or(note.title),
            content: self.content.unwrap_or(note.content),
            ..note
        }
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}
