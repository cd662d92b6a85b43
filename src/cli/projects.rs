use crate::models::{CreateProject, EntityKind, Project, ProjectFilter, UpdateProject};
use crate::services::{projects, ContentError};
use crate::{Config, Database};
use anyhow::Result;

use super::posts::truncate;
use super::{open_database, ProjectCommand};

pub async fn run(config: &Config, command: ProjectCommand) -> Result<()> {
    let db = open_database(config)?;

    match command {
        ProjectCommand::List {
            featured,
            search,
            limit,
            json,
        } => {
            let filter = ProjectFilter {
                featured: featured.then_some(true),
                search: search.as_deref(),
            };
            let items = projects::list_projects(&db, filter, limit, 0)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }

            let total = projects::count_projects(&db, filter)?;
            println!("{:<50} {:<10} {:<28}", "TITLE", "FEATURED", "CREATED");
            println!("{}", "-".repeat(90));
            for project in &items {
                println!(
                    "{:<50} {:<10} {:<28}",
                    truncate(&project.title, 50),
                    if project.featured { "yes" } else { "no" },
                    project.created_at,
                );
            }
            println!("\n{} of {} projects", items.len(), total);
        }
        ProjectCommand::Show { slug } => {
            let project = find(&db, &slug)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectCommand::Add {
            title,
            slug,
            description,
            tech_stack,
            github_url,
            live_url,
            featured,
        } => {
            let id = projects::create_project(
                &db,
                CreateProject {
                    title,
                    slug,
                    description,
                    tech_stack,
                    github_url,
                    live_url,
                    featured,
                },
            )?;
            if let Some(project) = projects::get_project_by_id(&db, id)? {
                tracing::info!("Project '{}' created as /{}", project.title, project.slug);
            }
        }
        ProjectCommand::Feature { slug } => set_featured(&db, &slug, true)?,
        ProjectCommand::Unfeature { slug } => set_featured(&db, &slug, false)?,
        ProjectCommand::Remove { slug } => {
            let project = find(&db, &slug)?;
            if projects::delete_project(&db, project.id)? {
                tracing::info!("Project '{}' removed", slug);
            } else {
                tracing::warn!("Project '{}' not found", slug);
            }
        }
    }

    Ok(())
}

fn find(db: &Database, slug: &str) -> Result<Project> {
    projects::get_project_by_slug(db, slug)?.ok_or_else(|| {
        ContentError::NotFound {
            entity: EntityKind::Project,
            key: slug.to_string(),
        }
        .into()
    })
}

fn set_featured(db: &Database, slug: &str, featured: bool) -> Result<()> {
    let project = find(db, slug)?;
    projects::update_project(
        db,
        project.id,
        UpdateProject {
            featured: Some(featured),
            ..Default::default()
        },
    )?;
    tracing::info!("Project /{} featured: {}", project.slug, featured);
    Ok(())
}
