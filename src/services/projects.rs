use crate::models::{CreateProject, EntityKind, NewProject, Project, ProjectFilter, UpdateProject};
use crate::services::error::{map_unique_violation, ContentError};
use crate::services::slug::assign_slug;
use crate::services::{format_timestamp, like_pattern, validate_title};
use crate::Database;
use anyhow::Result;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, TransactionBehavior};

const KIND: EntityKind = EntityKind::Project;

pub const MAX_TECH_STACK_LEN: usize = 500;

const SELECT_COLUMNS: &str =
    "SELECT id, title, slug, description, tech_stack, github_url, live_url, featured, created_at, updated_at FROM projects";

/// Blank means "no link"; anything else must be an absolute http(s) URL.
pub fn normalize_url(raw: Option<String>) -> Result<Option<String>, ContentError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Some(trimmed.to_string())),
        _ => Err(ContentError::InvalidUrl(trimmed.to_string())),
    }
}

fn validate_tech_stack(tech_stack: &str) -> Result<(), ContentError> {
    if tech_stack.chars().count() > MAX_TECH_STACK_LEN {
        return Err(ContentError::TechStackTooLong {
            max: MAX_TECH_STACK_LEN,
        });
    }
    Ok(())
}

pub fn create_project(db: &Database, input: CreateProject) -> Result<i64> {
    validate_title(KIND, &input.title)?;
    validate_tech_stack(&input.tech_stack)?;
    let github_url = normalize_url(input.github_url)?;
    let live_url = normalize_url(input.live_url)?;

    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let slug = assign_slug(&tx, KIND, &input.title, input.slug.as_deref(), None)?;
    let id = insert_project(
        &tx,
        &NewProject {
            title: input.title,
            slug,
            description: input.description,
            tech_stack: input.tech_stack,
            github_url,
            live_url,
            featured: input.featured,
            created_at: format_timestamp(Utc::now()),
        },
    )?;
    tx.commit()?;

    tracing::debug!("Created project id={}", id);
    Ok(id)
}

pub(crate) fn insert_project(conn: &Connection, project: &NewProject) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO projects (title, slug, description, tech_stack, github_url, live_url, featured, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        (
            &project.title,
            &project.slug,
            &project.description,
            &project.tech_stack,
            &project.github_url,
            &project.live_url,
            project.featured,
            &project.created_at,
            &project.created_at,
        ),
    )
    .map_err(|e| map_unique_violation(e, KIND, &project.slug))?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_projects(conn: &Connection, projects: &[NewProject]) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO projects (title, slug, description, tech_stack, github_url, live_url, featured, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )?;
    for project in projects {
        stmt.execute((
            &project.title,
            &project.slug,
            &project.description,
            &project.tech_stack,
            &project.github_url,
            &project.live_url,
            project.featured,
            &project.created_at,
            &project.created_at,
        ))
        .map_err(|e| map_unique_violation(e, KIND, &project.slug))?;
    }
    Ok(projects.len())
}

pub fn update_project(db: &Database, id: i64, input: UpdateProject) -> Result<()> {
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current = fetch_project(&tx, id)?.ok_or_else(|| ContentError::NotFound {
        entity: KIND,
        key: id.to_string(),
    })?;

    let title = input.title.unwrap_or(current.title);
    validate_title(KIND, &title)?;
    let tech_stack = input.tech_stack.unwrap_or(current.tech_stack);
    validate_tech_stack(&tech_stack)?;

    let github_url = match input.github_url {
        Some(url) => normalize_url(url)?,
        None => current.github_url,
    };
    let live_url = match input.live_url {
        Some(url) => normalize_url(url)?,
        None => current.live_url,
    };

    let slug = match input.slug {
        Some(requested) => assign_slug(&tx, KIND, &title, Some(requested.as_str()), Some(id))?,
        None => current.slug,
    };
    let description = input.description.unwrap_or(current.description);
    let featured = input.featured.unwrap_or(current.featured);

    tx.execute(
        r#"
        UPDATE projects SET title = ?, slug = ?, description = ?, tech_stack = ?, github_url = ?, live_url = ?, featured = ?, updated_at = ?
        WHERE id = ?
        "#,
        (
            &title,
            &slug,
            &description,
            &tech_stack,
            &github_url,
            &live_url,
            featured,
            format_timestamp(Utc::now()),
            id,
        ),
    )
    .map_err(|e| map_unique_violation(e, KIND, &slug))?;
    tx.commit()?;

    Ok(())
}

pub fn delete_project(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
    Ok(affected > 0)
}

pub(crate) fn clear_projects(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM projects", [])?)
}

pub fn get_project_by_id(db: &Database, id: i64) -> Result<Option<Project>> {
    let conn = db.get()?;
    fetch_project(&conn, id)
}

pub fn get_project_by_slug(db: &Database, slug: &str) -> Result<Option<Project>> {
    let conn = db.get()?;
    let project = conn
        .query_row(
            &format!("{} WHERE slug = ?", SELECT_COLUMNS),
            [slug],
            row_to_project,
        )
        .optional()?;
    Ok(project)
}

pub fn list_projects(
    db: &Database,
    filter: ProjectFilter<'_>,
    limit: usize,
    offset: usize,
) -> Result<Vec<Project>> {
    let conn = db.get()?;

    let (where_clause, mut params) = filter_clause(filter);
    let sql = format!(
        "{}{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        SELECT_COLUMNS, where_clause
    );
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));

    let mut stmt = conn.prepare(&sql)?;
    let projects = stmt
        .query_map(params_from_iter(params), row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn count_projects(db: &Database, filter: ProjectFilter<'_>) -> Result<i64> {
    let conn = db.get()?;
    let (where_clause, params) = filter_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM projects{}", where_clause);
    let count: i64 = conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
    Ok(count)
}

fn filter_clause(filter: ProjectFilter<'_>) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut params = Vec::new();

    if let Some(featured) = filter.featured {
        sql.push_str(" AND featured = ?");
        params.push(Value::Integer(featured as i64));
    }
    if let Some(query) = filter.search.filter(|q| !q.trim().is_empty()) {
        sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')");
        let pattern = like_pattern(query.trim());
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }

    (sql, params)
}

fn fetch_project(conn: &Connection, id: i64) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            [id],
            row_to_project,
        )
        .optional()?;
    Ok(project)
}

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        tech_stack: row.get(4)?,
        github_url: row.get(5)?,
        live_url: row.get(6)?,
        featured: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
