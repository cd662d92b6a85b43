use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "My Site".to_string());

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;

    let config_path = path.join("folio.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    std::fs::write(&config_path, starter_config(&site_name))?;

    tracing::info!("Created new site at {:?}", path);
    tracing::info!("Run 'folio migrate' to set up the database");
    tracing::info!("Run 'folio seed' to fill it with sample content");

    Ok(())
}

fn starter_config(site_name: &str) -> String {
    let title = toml::Value::String(site_name.to_string());
    format!(
        r#"environment = "local"

[site]
title = {}
url = "http://localhost:8000"

[database]
path = "./data/folio.db"
pool_size = 10

[logging]
# level = "debug"
# format = "compact"

[seed]
publish_chance = 0.7
post_lookback_days = 365
project_lookback_days = 730
github_url_chance = 0.8
live_url_chance = 0.6
featured_chance = 0.3
allow_in_production = false
"#,
        title
    )
}
