//! Sample data generation for development databases.

use crate::config::SeedConfig;
use crate::models::{EntityKind, NewBlogPost, NewProject};
use crate::services::fake::ContentSource;
use crate::services::posts::{clear_posts, insert_posts};
use crate::services::projects::{clear_projects, insert_projects};
use crate::services::slug::{base_slug, existing_slugs_with_prefix, unique_slug};
use crate::services::{format_timestamp, validate_title, MAX_TITLE_LEN};
use crate::Database;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, TransactionBehavior};
use std::collections::HashSet;
use std::io::Write;

pub const TECH_STACKS: [&str; 7] = [
    "Python, Django, PostgreSQL",
    "React, TypeScript, Node.js",
    "Vue.js, Express, MongoDB",
    "Django REST Framework, React, Docker",
    "FastAPI, PostgreSQL, Redis",
    "Next.js, Tailwind CSS, Vercel",
    "Flask, SQLAlchemy, Celery",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub posts: usize,
    pub projects: usize,
    pub clear: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            posts: 10,
            projects: 5,
            clear: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub cleared: bool,
    pub posts_created: usize,
    pub projects_created: usize,
}

/// Hands out slugs for one batch. Existing rows are fetched once per distinct
/// base; everything claimed during the batch is remembered locally.
struct SlugTracker {
    entity: EntityKind,
    used: HashSet<String>,
    loaded_bases: HashSet<String>,
}

impl SlugTracker {
    fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            used: HashSet::new(),
            loaded_bases: HashSet::new(),
        }
    }

    fn claim(&mut self, conn: &Connection, title: &str) -> Result<String> {
        let base = base_slug(title);
        if self.loaded_bases.insert(base.clone()) {
            let existing = existing_slugs_with_prefix(conn, self.entity, &base, None)?;
            self.used.extend(existing);
        }
        let slug = unique_slug(&base, &self.used);
        self.used.insert(slug.clone());
        Ok(slug)
    }
}

/// Runs one seed: optional clear, then one transaction per entity type.
/// Progress lines go to `out`.
pub fn run<S, W>(
    db: &Database,
    source: &mut S,
    settings: &SeedConfig,
    options: SeedOptions,
    out: &mut W,
) -> Result<SeedReport>
where
    S: ContentSource + ?Sized,
    W: Write + ?Sized,
{
    let now = Utc::now();
    let mut report = SeedReport::default();
    let mut conn = db.get()?;

    if options.clear {
        writeln!(out, "Clearing existing data...")?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let posts_removed = clear_posts(&tx)?;
        let projects_removed = clear_projects(&tx)?;
        tx.commit()?;
        tracing::info!(
            "Cleared {} blog posts and {} projects",
            posts_removed,
            projects_removed
        );
        writeln!(out, "Existing data cleared")?;
        report.cleared = true;
    }

    writeln!(out, "Generating {} blog posts...", options.posts)?;
    {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut slugs = SlugTracker::new(EntityKind::BlogPost);
        let mut batch = Vec::with_capacity(options.posts);
        for _ in 0..options.posts {
            batch.push(fake_post(&tx, source, &mut slugs, settings, now)?);
        }
        report.posts_created = insert_posts(&tx, &batch)?;
        tx.commit()?;
    }
    writeln!(out, "Created {} blog posts", report.posts_created)?;

    writeln!(out, "Generating {} projects...", options.projects)?;
    {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut slugs = SlugTracker::new(EntityKind::Project);
        let mut batch = Vec::with_capacity(options.projects);
        for _ in 0..options.projects {
            batch.push(fake_project(&tx, source, &mut slugs, settings, now)?);
        }
        report.projects_created = insert_projects(&tx, &batch)?;
        tx.commit()?;
    }
    writeln!(out, "Created {} projects", report.projects_created)?;

    writeln!(
        out,
        "Sample data generation complete! Created {} blog posts and {} projects.",
        report.posts_created, report.projects_created
    )?;
    tracing::info!(
        "Seeded {} blog posts and {} projects",
        report.posts_created,
        report.projects_created
    );

    Ok(report)
}

fn fake_title(raw: String, entity: EntityKind) -> Result<String> {
    let title: String = raw
        .trim()
        .trim_end_matches('.')
        .chars()
        .take(MAX_TITLE_LEN)
        .collect();
    validate_title(entity, &title)?;
    Ok(title)
}

fn fake_post<S: ContentSource + ?Sized>(
    conn: &Connection,
    source: &mut S,
    slugs: &mut SlugTracker,
    settings: &SeedConfig,
    now: DateTime<Utc>,
) -> Result<NewBlogPost> {
    let title = fake_title(source.sentence(6), EntityKind::BlogPost)?;
    let content = (0..3)
        .map(|_| source.paragraph(5))
        .collect::<Vec<_>>()
        .join("\n\n");
    let published = source.boolean(settings.publish_chance);
    let created_at = source.date_time_within(
        Duration::days(i64::from(settings.post_lookback_days)),
        now,
    );
    let slug = slugs.claim(conn, &title)?;
    let excerpt = source.paragraph(2);

    let created_at = format_timestamp(created_at);
    let published_at = published.then(|| created_at.clone());

    Ok(NewBlogPost {
        title,
        slug,
        content,
        excerpt,
        published,
        created_at,
        published_at,
    })
}

fn fake_project<S: ContentSource + ?Sized>(
    conn: &Connection,
    source: &mut S,
    slugs: &mut SlugTracker,
    settings: &SeedConfig,
    now: DateTime<Utc>,
) -> Result<NewProject> {
    let title = fake_title(source.catch_phrase(), EntityKind::Project)?;
    let description = (0..2)
        .map(|_| source.paragraph(3))
        .collect::<Vec<_>>()
        .join("\n\n");
    let slug = slugs.claim(conn, &title)?;
    let tech_stack = source.choose(&TECH_STACKS).to_string();
    let github_url = source
        .boolean(settings.github_url_chance)
        .then(|| source.url());
    let live_url = source
        .boolean(settings.live_url_chance)
        .then(|| source.url());
    let featured = source.boolean(settings.featured_chance);
    let created_at = source.date_time_within(
        Duration::days(i64::from(settings.project_lookback_days)),
        now,
    );

    Ok(NewProject {
        title,
        slug,
        description,
        tech_stack,
        github_url,
        live_url,
        featured,
        created_at: format_timestamp(created_at),
    })
}
