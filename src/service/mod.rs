use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    models::{NoteCreate, NoteId, NoteUpdate, ValidationError},
    repository::{NoteStore, StoreError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Request-level note operations. Input is validated here, before the store
/// is reached; absence is reported as `None`/`false`, never as an error.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub const fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let note = NoteCreate::try_from(request)?;
        let created = self.store.create(note).await?;

        tracing::info!(id = %created.id, "note created");

        Ok(created.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<Option<NoteResponse>, ServiceError> {
        let id = NoteId::new(id)?;
        let patch = NoteUpdate::try_from(request)?;

        Ok(self.store.update(id, patch).await?.map(Into::into))
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, ServiceError> {
        let id = NoteId::new(id)?;
        let deleted = self.store.delete(id).await?;

        if deleted {
            tracing::info!(%id, "note deleted");
        }

        Ok(deleted)
    }

    pub async fn get_one_note(&self, id: i64) -> Result<Option<NoteResponse>, ServiceError> {
        let id = NoteId::new(id)?;

        Ok(self.store.get(id).await?.map(Into::into))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ServiceError> {
        let notes = self.store.list().await?;

        Ok(notes.into_iter().map(Into::into).collect())
    }
}
