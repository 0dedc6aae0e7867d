use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Note, NoteCreate, NoteUpdate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Auto-incrementing note identifier
    pub id: i64,
    /// Short title for the note
    pub title: String,
    /// Full note content
    pub content: String,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// When the note was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.get(),
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Short title for the note
    #[schema(min_length = 1)]
    pub title: String,
    /// Full note content
    #[schema(min_length = 1)]
    pub content: String,
}

impl TryFrom<CreateNoteRequest> for NoteCreate {
    type Error = ValidationError;

    fn try_from(request: CreateNoteRequest) -> Result<Self, Self::Error> {
        Self::new(request.title, request.content)
    }
}

/// Missing fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// Updated title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(min_length = 1)]
    pub title: Option<String>,
    /// Updated content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(min_length = 1)]
    pub content: Option<String>,
}

impl TryFrom<UpdateNoteRequest> for NoteUpdate {
    type Error = ValidationError;

    fn try_from(request: UpdateNoteRequest) -> Result<Self, Self::Error> {
        Self::new(request.title, request.content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_treats_null_and_missing_alike() {
        let missing: UpdateNoteRequest = serde_json::from_str(r#"{"content":"new"}"#).unwrap();
        let null: UpdateNoteRequest =
            serde_json::from_str(r#"{"title":null,"content":"new"}"#).unwrap();

        assert_eq!(missing.title, None);
        assert_eq!(null.title, None);
        assert_eq!(NoteUpdate::try_from(null).unwrap().content(), Some("new"));
    }

    #[test]
    fn create_request_with_empty_title_fails_validation() {
        let request = CreateNoteRequest {
            title: String::new(),
            content: "text".to_string(),
        };

        assert_eq!(
            NoteCreate::try_from(request),
            Err(ValidationError::EmptyField("title"))
        );
    }

    #[test]
    fn timestamps_serialize_as_rfc3339_strings() {
        let response = NoteResponse {
            id: 1,
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T09:30:00Z");
        assert_eq!(json["updated_at"], "2024-05-01T10:00:00Z");
    }
}
