use crate::services::fake::RandomContent;
use crate::services::seed::{self, SeedOptions};
use crate::Config;
use anyhow::Result;
use std::io;

use super::open_database;

pub async fn run(config: &Config, posts: usize, projects: usize, clear: bool) -> Result<()> {
    config.check_seed_allowed()?;

    let db = open_database(config)?;
    let mut source = RandomContent::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    seed::run(
        &db,
        &mut source,
        &config.seed,
        SeedOptions {
            posts,
            projects,
            clear,
        },
        &mut out,
    )?;

    Ok(())
}
