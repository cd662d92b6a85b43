use crate::models::{BlogPost, CreateBlogPost, EntityKind, NewBlogPost, PostFilter, UpdateBlogPost};
use crate::services::error::{map_unique_violation, ContentError};
use crate::services::slug::assign_slug;
use crate::services::{format_timestamp, like_pattern, validate_title};
use crate::Database;
use anyhow::Result;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, TransactionBehavior};

const KIND: EntityKind = EntityKind::BlogPost;

const SELECT_COLUMNS: &str =
    "SELECT id, title, slug, content, excerpt, published, created_at, updated_at, published_at FROM blog_posts";

pub fn create_post(db: &Database, input: CreateBlogPost) -> Result<i64> {
    validate_title(KIND, &input.title)?;

    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let slug = assign_slug(&tx, KIND, &input.title, input.slug.as_deref(), None)?;
    let created_at = format_timestamp(Utc::now());
    let published_at = input.published.then(|| created_at.clone());

    let id = insert_post(
        &tx,
        &NewBlogPost {
            title: input.title,
            slug,
            content: input.content,
            excerpt: input.excerpt,
            published: input.published,
            created_at,
            published_at,
        },
    )?;
    tx.commit()?;

    tracing::debug!("Created blog post id={}", id);
    Ok(id)
}

pub(crate) fn insert_post(conn: &Connection, post: &NewBlogPost) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO blog_posts (title, slug, content, excerpt, published, created_at, updated_at, published_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        (
            &post.title,
            &post.slug,
            &post.content,
            &post.excerpt,
            post.published,
            &post.created_at,
            &post.created_at,
            &post.published_at,
        ),
    )
    .map_err(|e| map_unique_violation(e, KIND, &post.slug))?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a batch through one prepared statement. Wrap the call in a
/// transaction to make the batch atomic.
pub(crate) fn insert_posts(conn: &Connection, posts: &[NewBlogPost]) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO blog_posts (title, slug, content, excerpt, published, created_at, updated_at, published_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )?;
    for post in posts {
        stmt.execute((
            &post.title,
            &post.slug,
            &post.content,
            &post.excerpt,
            post.published,
            &post.created_at,
            &post.created_at,
            &post.published_at,
        ))
        .map_err(|e| map_unique_violation(e, KIND, &post.slug))?;
    }
    Ok(posts.len())
}

pub fn update_post(db: &Database, id: i64, input: UpdateBlogPost) -> Result<()> {
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current = fetch_post(&tx, id)?.ok_or_else(|| ContentError::NotFound {
        entity: KIND,
        key: id.to_string(),
    })?;

    let title = input.title.unwrap_or(current.title);
    validate_title(KIND, &title)?;

    let slug = match input.slug {
        Some(requested) => assign_slug(&tx, KIND, &title, Some(requested.as_str()), Some(id))?,
        None => current.slug,
    };
    let content = input.content.unwrap_or(current.content);
    let excerpt = input.excerpt.unwrap_or(current.excerpt);
    let published = input.published.unwrap_or(current.published);

    let now = format_timestamp(Utc::now());
    let published_at = match (published, current.published_at) {
        (true, Some(at)) => Some(at),
        (true, None) => Some(now.clone()),
        (false, _) => None,
    };

    tx.execute(
        r#"
        UPDATE blog_posts SET title = ?, slug = ?, content = ?, excerpt = ?, published = ?, updated_at = ?, published_at = ?
        WHERE id = ?
        "#,
        (
            &title,
            &slug,
            &content,
            &excerpt,
            published,
            &now,
            &published_at,
            id,
        ),
    )
    .map_err(|e| map_unique_violation(e, KIND, &slug))?;
    tx.commit()?;

    Ok(())
}

/// Returns whether a row was removed.
pub fn delete_post(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM blog_posts WHERE id = ?", [id])?;
    Ok(affected > 0)
}

pub(crate) fn clear_posts(conn: &Connection) -> Result<usize> {
    Ok(conn.execute("DELETE FROM blog_posts", [])?)
}

pub fn get_post_by_id(db: &Database, id: i64) -> Result<Option<BlogPost>> {
    let conn = db.get()?;
    fetch_post(&conn, id)
}

pub fn get_post_by_slug(db: &Database, slug: &str) -> Result<Option<BlogPost>> {
    let conn = db.get()?;
    let post = conn
        .query_row(
            &format!("{} WHERE slug = ?", SELECT_COLUMNS),
            [slug],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

/// Newest first; ties on `created_at` fall back to insertion order.
pub fn list_posts(
    db: &Database,
    filter: PostFilter<'_>,
    limit: usize,
    offset: usize,
) -> Result<Vec<BlogPost>> {
    let conn = db.get()?;

    let (where_clause, mut params) = filter_clause(filter);
    let sql = format!(
        "{}{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        SELECT_COLUMNS, where_clause
    );
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));

    let mut stmt = conn.prepare(&sql)?;
    let posts = stmt
        .query_map(params_from_iter(params), row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn count_posts(db: &Database, filter: PostFilter<'_>) -> Result<i64> {
    let conn = db.get()?;
    let (where_clause, params) = filter_clause(filter);
    let sql = format!("SELECT COUNT(*) FROM blog_posts{}", where_clause);
    let count: i64 = conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
    Ok(count)
}

fn filter_clause(filter: PostFilter<'_>) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut params = Vec::new();

    if let Some(published) = filter.published {
        sql.push_str(" AND published = ?");
        params.push(Value::Integer(published as i64));
    }
    if let Some(query) = filter.search.filter(|q| !q.trim().is_empty()) {
        sql.push_str(" AND (title LIKE ? ESCAPE '\\' OR content LIKE ? ESCAPE '\\')");
        let pattern = like_pattern(query.trim());
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }

    (sql, params)
}

fn fetch_post(conn: &Connection, id: i64) -> Result<Option<BlogPost>> {
    let post = conn
        .query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            [id],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<BlogPost> {
    Ok(BlogPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        content: row.get(3)?,
        excerpt: row.get(4)?,
        published: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        published_at: row.get(8)?,
    })
}
