#![cfg(test)]
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

/// Private in-memory database with the schema applied; every test gets its own.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Migrated SQLite file in the temp dir, pooled like a real deployment.
/// Concurrency tests need this; an in-memory database has a single connection.
pub async fn get_file_db(tag: &str) -> Result<(DatabaseConnection, PathBuf), anyhow::Error> {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let path = std::env::temp_dir().join(format!("clubhub_{}_{}_{}.db", tag, std::process::id(), nanos));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: 10,
        ..Default::default()
    };
    let db = models::db::connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok((db, path))
}

pub fn remove_file_db(path: &Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}
