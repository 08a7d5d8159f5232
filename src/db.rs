use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection,
    sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous},
};

use crate::error::AppResult;

/// Pragmas are set on every pooled connection as it opens.
pub fn sqlite_options<C>(options: C) -> ConnectOptions
where
    C: Into<ConnectOptions>,
{
    let mut options = options.into();
    options.map_sqlx_sqlite_opts(|opts| {
        opts.journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("cache_size", "-64000")
    });
    options
}

pub async fn connect_and_migrate<C>(options: C) -> AppResult<DatabaseConnection>
where
    C: Into<ConnectOptions>,
{
    let db = Database::connect(sqlite_options(options)).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

#[cfg(test)]
pub async fn memory() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    connect_and_migrate(options).await.expect("in-memory database")
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Statement, TransactionTrait};

    use super::*;

    async fn pragma(conn: &impl ConnectionTrait, name: &str) -> i64 {
        let row = conn
            .query_one(Statement::from_string(conn.get_database_backend(), format!("PRAGMA {name}")))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", name).unwrap()
    }

    #[tokio::test]
    async fn every_pooled_connection_gets_the_pragmas() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(2).min_connections(2).sqlx_logging(false);
        let db = Database::connect(sqlite_options(options)).await.unwrap();

        // hold one connection so the pool has to hand out the other
        let txn = db.begin().await.unwrap();
        assert_eq!(pragma(&txn, "cache_size").await, -64000);
        assert_eq!(pragma(&db, "cache_size").await, -64000);
        // NORMAL
        assert_eq!(pragma(&db, "synchronous").await, 1);
        txn.commit().await.unwrap();
    }
}
