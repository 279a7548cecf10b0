use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/storage"))?;

    let config = r#"[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/atelier.db"

[storage]
root_dir = "./data/storage"
public_base_url = "/files"

[auth]
session_days = 7

[api]
default_page_size = 20
max_page_size = 100
"#;

    std::fs::write(path.join("atelier.toml"), config)?;

    tracing::info!("Created new Atelier instance at {:?}", path);
    tracing::info!("Run 'atelier migrate' to set up the database");
    tracing::info!("Run 'atelier serve' to start the server");

    Ok(())
}
