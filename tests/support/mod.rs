#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use notes_api::{
    app,
    config::Config,
    models::{Note, NoteCreate, NoteId, NoteUpdate},
    repository::{NoteStore, StoreError},
    service::NoteService,
};
use serde_json::Value;
use tower::ServiceExt;

use std::sync::{Arc, Mutex};

/// In-process `NoteStore` with a logical clock: every write is one second
/// after the previous one.
pub struct MemoryNoteStore {
    state: Mutex<State>,
}

struct State {
    notes: Vec<Note>,
    next_id: i64,
    ticks: i64,
}

impl State {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                notes: Vec::new(),
                next_id: 1,
                ticks: 0,
            }),
        }
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.state.lock().unwrap().notes.clone();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn create(&self, note: NoteCreate) -> Result<Note, StoreError> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let note = Note {
            id: NoteId::new(state.next_id)?,
            title: note.title().to_string(),
            content: note.content().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.next_id += 1;
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: NoteId, patch: NoteUpdate) -> Result<Option<Note>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(pos) = state.notes.iter().position(|n| n.id == id) else {
            return Ok(None);
        };
        let now = state.now();
        let mut merged = patch.merge(state.notes[pos].clone());
        merged.updated_at = now;
        state.notes[pos] = merged.clone();
        Ok(Some(merged))
    }

    async fn delete(&self, id: NoteId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        Ok(state.notes.len() < before)
    }
}

/// Store whose inserts never come back, as if the engine lost the row.
pub struct LosingStore;

#[async_trait]
impl NoteStore for LosingStore {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: NoteId) -> Result<Option<Note>, StoreError> {
        Ok(None)
    }

    async fn create(&self, _note: NoteCreate) -> Result<Note, StoreError> {
        Err(StoreError::MissingAfterInsert)
    }

    async fn update(&self, _id: NoteId, _patch: NoteUpdate) -> Result<Option<Note>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _id: NoteId) -> Result<bool, StoreError> {
        Ok(false)
    }
}

pub fn test_config() -> Config {
    Config {
        database_dsn: "postgres://unused".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        pool_size: 1,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

pub fn test_app_with(store: Arc<dyn NoteStore>) -> Router {
    app(Arc::new(NoteService::new(store)), &test_config()).unwrap()
}

pub fn test_app() -> Router {
    test_app_with(Arc::new(MemoryNoteStore::new()))
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    if bytes.is_empty() {
        (status, Value::Null)
    } else {
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }
}

pub fn timestamp(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc)
}
