pub mod init;
pub mod migrate;
pub mod posts;
pub mod projects;
pub mod seed;

use crate::{Config, Database};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Personal site backend: blog posts, projects and sample data", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "folio.toml", env = "FOLIO_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter folio.toml
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Apply or inspect schema migrations
    Migrate {
        #[command(subcommand)]
        command: Option<MigrateCommand>,
    },
    /// Generate sample blog posts and projects
    Seed {
        /// Number of blog posts to create
        #[arg(long, default_value = "10", value_parser = parse_count, allow_hyphen_values = true)]
        posts: usize,
        /// Number of projects to create
        #[arg(long, default_value = "5", value_parser = parse_count, allow_hyphen_values = true)]
        projects: usize,
        /// Clear existing data before generating new data
        #[arg(long)]
        clear: bool,
    },
    /// Manage blog posts
    Posts {
        #[command(subcommand)]
        command: PostCommand,
    },
    /// Manage portfolio projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },
}

#[derive(Subcommand)]
pub enum MigrateCommand {
    Status,
}

#[derive(Subcommand)]
pub enum PostCommand {
    List {
        #[arg(long, conflicts_with = "drafts")]
        published: bool,
        #[arg(long)]
        drafts: bool,
        /// Match against title and content
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "50")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    Show {
        slug: String,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "")]
        excerpt: String,
        #[arg(long)]
        publish: bool,
    },
    Edit {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "regenerate_slug")]
        new_slug: Option<String>,
        /// Derive the slug again from the (new) title
        #[arg(long)]
        regenerate_slug: bool,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        excerpt: Option<String>,
    },
    Publish {
        slug: String,
    },
    Unpublish {
        slug: String,
    },
    Remove {
        slug: String,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    List {
        #[arg(long)]
        featured: bool,
        /// Match against title and description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "50")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    Show {
        slug: String,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        tech_stack: String,
        #[arg(long)]
        github_url: Option<String>,
        #[arg(long)]
        live_url: Option<String>,
        #[arg(long)]
        featured: bool,
    },
    Feature {
        slug: String,
    },
    Unfeature {
        slug: String,
    },
    Remove {
        slug: String,
    },
}

/// Record counts must be non-negative whole numbers.
pub fn parse_count(raw: &str) -> Result<usize, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", raw))?;
    usize::try_from(value).map_err(|_| format!("count must be zero or greater, got {}", value))
}

/// Opens the configured database and brings its schema up to date.
pub(crate) fn open_database(config: &Config) -> Result<Database> {
    let db = Database::open(&config.database.path, config.database.pool_size)?;
    db.migrate()?;
    Ok(db)
}
