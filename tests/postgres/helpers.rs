//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use taskboard::task::{
    adapters::postgres::PostgresTaskRepository, services::TaskLifecycleService,
};
use uuid::Uuid;

/// Environment variable naming the server used by these tests.
pub const TEST_DATABASE_URL_VAR: &str = "TASKBOARD_TEST_DATABASE_URL";

/// SQL creating the task tables.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_tasks/up.sql");

/// Service type backed by `PostgreSQL`.
pub type PostgresTaskService = TaskLifecycleService<PostgresTaskRepository, DefaultClock>;

/// Database created for a single test and dropped with it.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates a fresh database next to `admin_url` and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the schema fails.
    pub fn create(admin_url: &str) -> eyre::Result<Self> {
        let name = format!("taskboard_test_{}", Uuid::new_v4().simple());
        let url = database_url_for(admin_url, &name)?;

        let mut admin = PgConnection::establish(admin_url).wrap_err("connect to admin database")?;
        admin
            .batch_execute(&format!("CREATE DATABASE \"{name}\""))
            .wrap_err("create test database")?;

        let database = Self {
            admin_url: admin_url.to_owned(),
            name,
            url,
        };
        let mut connection =
            PgConnection::establish(&database.url).wrap_err("connect to test database")?;
        connection
            .batch_execute(CREATE_TASKS_SQL)
            .wrap_err("apply task schema")?;
        Ok(database)
    }

    /// Returns the URL of the temporary database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            admin
                .batch_execute(&format!(
                    "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
                    self.name
                ))
                .ok();
        }
    }
}

/// Replaces the database name in `base` with `database`, keeping any query.
fn database_url_for(base: &str, database: &str) -> eyre::Result<String> {
    let (location, query) = base
        .split_once('?')
        .map_or((base, None), |(head, tail)| (head, Some(tail)));
    let (server, _) = location
        .rsplit_once('/')
        .filter(|(server, _)| server.contains("://"))
        .ok_or_else(|| eyre!("{TEST_DATABASE_URL_VAR} must include a database name"))?;
    Ok(query.map_or_else(
        || format!("{server}/{database}"),
        |params| format!("{server}/{database}?{params}"),
    ))
}

/// Repository and service over a temporary database.
///
/// Field order matters: the pool closes before the database is dropped.
pub struct PostgresContext {
    /// Repository under test.
    pub repository: Arc<PostgresTaskRepository>,
    /// Service sharing the repository.
    pub service: PostgresTaskService,
    _database: TemporaryDatabase,
}

/// Creates a temporary database and a repository connected to it.
///
/// # Errors
///
/// Returns an error when [`TEST_DATABASE_URL_VAR`] is unset or setup fails.
#[fixture]
pub async fn postgres_context() -> eyre::Result<PostgresContext> {
    let admin_url = std::env::var(TEST_DATABASE_URL_VAR)
        .wrap_err_with(|| format!("{TEST_DATABASE_URL_VAR} is not set"))?;
    let database =
        tokio::task::spawn_blocking(move || TemporaryDatabase::create(&admin_url)).await??;

    let repository = Arc::new(PostgresTaskRepository::connect(database.url(), 2).await?);
    let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    Ok(PostgresContext {
        repository,
        service,
        _database: database,
    })
}
