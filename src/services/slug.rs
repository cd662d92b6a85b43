use crate::models::EntityKind;
use crate::services::error::ContentError;
use anyhow::Result;
use rusqlite::Connection;
use slug::slugify;
use std::collections::HashSet;

pub const MAX_SLUG_LEN: usize = 200;

/// Leaves room for a `-N` suffix under `MAX_SLUG_LEN`.
const MAX_BASE_LEN: usize = 190;

/// Base used when a title has no sluggable characters at all.
pub const FALLBACK_SLUG: &str = "untitled";

pub fn generate_slug(title: &str) -> String {
    slugify(title)
}

pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// The slug a title maps to before any collision suffix is applied.
pub fn base_slug(title: &str) -> String {
    let mut base = generate_slug(title);
    if base.len() > MAX_BASE_LEN {
        // slugify only emits ASCII, so byte truncation is safe
        base.truncate(MAX_BASE_LEN);
        let trimmed = base.trim_end_matches('-').len();
        base.truncate(trimmed);
    }
    if base.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base
    }
}

/// Returns `base` if free, otherwise the first of `base-1`, `base-2`, ...
/// that is not in `in_use`.
pub fn unique_slug(base: &str, in_use: &HashSet<String>) -> String {
    if !in_use.contains(base) {
        return base.to_string();
    }
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !in_use.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// All slugs of `entity` starting with `base`, ignoring the row `exclude_id`.
///
/// Stored slugs only contain `[a-z0-9-]`, all of which sort below `~`, so the
/// prefix match is expressed as a range the UNIQUE index can serve.
pub fn existing_slugs_with_prefix(
    conn: &Connection,
    entity: EntityKind,
    base: &str,
    exclude_id: Option<i64>,
) -> Result<HashSet<String>> {
    let sql = format!(
        "SELECT slug FROM {} WHERE slug >= ?1 AND slug < ?1 || '~' AND id IS NOT ?2",
        entity.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let slugs = stmt
        .query_map((base, exclude_id), |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(slugs)
}

/// Pre-persist slug normalisation shared by every create and update path.
///
/// A non-blank `requested` slug is validated and kept as-is. Otherwise one is
/// derived from `title` and disambiguated against the rows already stored.
/// Run it on the same connection (or transaction) as the write that follows.
pub fn assign_slug(
    conn: &Connection,
    entity: EntityKind,
    title: &str,
    requested: Option<&str>,
    exclude_id: Option<i64>,
) -> Result<String> {
    if let Some(slug) = requested.filter(|s| !s.trim().is_empty()) {
        if !validate_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_string()).into());
        }
        return Ok(slug.to_string());
    }

    let base = base_slug(title);
    let in_use = existing_slugs_with_prefix(conn, entity, &base, exclude_id)?;
    let slug = unique_slug(&base, &in_use);
    if slug != base {
        tracing::debug!("{} slug '{}' taken, using '{}'", entity, base, slug);
    }
    Ok(slug)
}
