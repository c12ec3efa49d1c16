use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::fs::create_dir_all;
use std::{fs, path};
use tokio::sync::OnceCell;

mod m20260705_000001_init;
mod m20260729_000001_add_client_reset;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260705_000001_init::Migration),
            Box::new(m20260729_000001_add_client_reset::Migration),
        ]
    }
}

static DATABASE_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();

pub async fn get_connection() -> &'static DatabaseConnection {
    DATABASE_CONNECTION.get_or_init(init_sqlite).await
}

pub async fn init_sqlite() -> DatabaseConnection {
    let db_path = crate::config::get_config().await.db_path.clone();
    let path = path::Path::new(&db_path);
    if !path.exists() {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }
    let db = Database::connect(format!("sqlite://{}", db_path))
        .await
        .expect("failed to connect sqlite");

    db
}
