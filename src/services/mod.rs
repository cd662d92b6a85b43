pub mod error;
pub mod fake;
pub mod posts;
pub mod projects;
pub mod seed;
pub mod slug;

pub use error::ContentError;

use crate::models::EntityKind;
use chrono::{DateTime, SecondsFormat, Utc};

pub const MAX_TITLE_LEN: usize = 200;

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn validate_title(entity: EntityKind, title: &str) -> Result<(), ContentError> {
    if title.trim().is_empty() {
        return Err(ContentError::EmptyTitle { entity });
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ContentError::TitleTooLong {
            entity,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

/// `%query%` with LIKE wildcards in the query escaped by `\`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
