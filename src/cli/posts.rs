use crate::models::{BlogPost, CreateBlogPost, EntityKind, PostFilter, UpdateBlogPost};
use crate::services::{posts, ContentError};
use crate::{Config, Database};
use anyhow::Result;

use super::{open_database, PostCommand};

pub async fn run(config: &Config, command: PostCommand) -> Result<()> {
    let db = open_database(config)?;

    match command {
        PostCommand::List {
            published,
            drafts,
            search,
            limit,
            json,
        } => {
            let filter = PostFilter {
                published: match (published, drafts) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                search: search.as_deref(),
            };
            let items = posts::list_posts(&db, filter, limit, 0)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }

            let total = posts::count_posts(&db, filter)?;
            println!(
                "{:<50} {:<10} {:<28} {:<28}",
                "TITLE", "PUBLISHED", "CREATED", "PUBLISHED AT"
            );
            println!("{}", "-".repeat(118));
            for post in &items {
                println!(
                    "{:<50} {:<10} {:<28} {:<28}",
                    truncate(&post.title, 50),
                    if post.published { "yes" } else { "no" },
                    post.created_at,
                    post.published_at.as_deref().unwrap_or("-"),
                );
            }
            println!("\n{} of {} blog posts", items.len(), total);
        }
        PostCommand::Show { slug } => {
            let post = find(&db, &slug)?;
            println!("{}", serde_json::to_string_pretty(&post)?);
        }
        PostCommand::Add {
            title,
            slug,
            content,
            excerpt,
            publish,
        } => {
            let id = posts::create_post(
                &db,
                CreateBlogPost {
                    title,
                    slug,
                    content,
                    excerpt,
                    published: publish,
                },
            )?;
            if let Some(post) = posts::get_post_by_id(&db, id)? {
                tracing::info!("Blog post '{}' created as /{}", post.title, post.slug);
            }
        }
        PostCommand::Edit {
            slug,
            title,
            new_slug,
            regenerate_slug,
            content,
            excerpt,
        } => {
            let post = find(&db, &slug)?;
            let slug_change = if regenerate_slug {
                Some(String::new())
            } else {
                new_slug
            };
            posts::update_post(
                &db,
                post.id,
                UpdateBlogPost {
                    title,
                    slug: slug_change,
                    content,
                    excerpt,
                    published: None,
                },
            )?;
            report_update(&db, post.id)?;
        }
        PostCommand::Publish { slug } => set_published(&db, &slug, true)?,
        PostCommand::Unpublish { slug } => set_published(&db, &slug, false)?,
        PostCommand::Remove { slug } => {
            let post = find(&db, &slug)?;
            if posts::delete_post(&db, post.id)? {
                tracing::info!("Blog post '{}' removed", slug);
            } else {
                tracing::warn!("Blog post '{}' not found", slug);
            }
        }
    }

    Ok(())
}

fn find(db: &Database, slug: &str) -> Result<BlogPost> {
    posts::get_post_by_slug(db, slug)?.ok_or_else(|| {
        ContentError::NotFound {
            entity: EntityKind::BlogPost,
            key: slug.to_string(),
        }
        .into()
    })
}

fn set_published(db: &Database, slug: &str, published: bool) -> Result<()> {
    let post = find(db, slug)?;
    posts::update_post(
        db,
        post.id,
        UpdateBlogPost {
            published: Some(published),
            ..Default::default()
        },
    )?;
    report_update(db, post.id)
}

fn report_update(db: &Database, id: i64) -> Result<()> {
    if let Some(post) = posts::get_post_by_id(db, id)? {
        tracing::info!(
            "Blog post /{} updated (published: {})",
            post.slug,
            post.published
        );
    }
    Ok(())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
