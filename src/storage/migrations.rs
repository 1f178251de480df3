// storage/migrations.rs
// Database migration management

use sqlx::{Pool, Sqlite};

/// Runs the SQLx migrations from `migrations/`, embedded at compile time.
///
/// Idempotent: already-applied migrations are skipped.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), anyhow::Error> {
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(pool).await?;
    log::debug!("{} migration(s) applied", migrator.iter().count());
    Ok(())
}
