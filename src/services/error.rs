use crate::models::EntityKind;
use rusqlite::ErrorCode;

/// Domain failures raised by the content store. Services return
/// `anyhow::Result`; callers that need to branch use `downcast_ref`.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("{entity} title cannot be empty")]
    EmptyTitle { entity: EntityKind },

    #[error("{entity} title must be at most {max} characters")]
    TitleTooLong { entity: EntityKind, max: usize },

    #[error("Invalid slug '{0}': must be 1-200 characters, lowercase letters, numbers, and hyphens only")]
    InvalidSlug(String),

    #[error("Invalid URL '{0}': must be an absolute http or https URL")]
    InvalidUrl(String),

    #[error("Tech stack must be at most {max} characters")]
    TechStackTooLong { max: usize },

    #[error("a {entity} with slug '{slug}' already exists")]
    DuplicateSlug { entity: EntityKind, slug: String },

    #[error("{entity} '{key}' not found")]
    NotFound { entity: EntityKind, key: String },
}

/// Turns a UNIQUE violation on insert/update into `DuplicateSlug`; any other
/// error passes through untouched.
pub(crate) fn map_unique_violation(
    err: rusqlite::Error,
    entity: EntityKind,
    slug: &str,
) -> anyhow::Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            ContentError::DuplicateSlug {
                entity,
                slug: slug.to_string(),
            }
            .into()
        }
        _ => err.into(),
    }
}
