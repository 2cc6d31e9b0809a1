//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskChildRow, TaskRow},
    schema::{task_children, tasks},
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskState, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{Builder, ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// The schema is created by the SQL migrations under `migrations/`.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `database_url` and wraps it.
    ///
    /// Pool construction opens its initial connections on the blocking
    /// thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the pool cannot
    /// establish its initial connections.
    pub async fn connect(database_url: &str, max_size: u32) -> TaskRepositoryResult<Self> {
        Self::connect_with(database_url, Pool::builder().max_size(max_size)).await
    }

    async fn connect_with(
        database_url: &str,
        builder: Builder<ConnectionManager<PgConnection>>,
    ) -> TaskRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = tokio::task::spawn_blocking(move || builder.build(manager))
            .await
            .map_err(TaskRepositoryError::persistence)?
            .map_err(TaskRepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

/// Failure inside a write transaction.
enum WriteError {
    Missing(TaskId),
    Database(DieselError),
}

impl From<DieselError> for WriteError {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl From<WriteError> for TaskRepositoryError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Missing(id) => Self::NotFound(id),
            WriteError::Database(db_err) => Self::persistence(db_err),
        }
    }
}

/// Owned snapshot of a task's columns and links, movable into a blocking
/// closure.
struct TaskWrite {
    id: TaskId,
    changeset: TaskChangeset,
    children: Vec<TaskChildRow>,
}

impl TaskWrite {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id(),
            changeset: TaskChangeset {
                title: task.title().as_str().to_owned(),
                description: task.description().to_owned(),
                state: task.state().as_str().to_owned(),
                updated_at: task.updated_at(),
            },
            children: to_child_rows(task),
        }
    }

    fn apply(&self, connection: &mut PgConnection) -> Result<(), WriteError> {
        let updated = diesel::update(tasks::table.find(self.id.into_inner()))
            .set(&self.changeset)
            .execute(connection)?;
        if updated == 0 {
            return Err(WriteError::Missing(self.id));
        }
        insert_children(connection, &self.children)?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);
        let child_rows = to_child_rows(task);

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(tasks::table)
                        .values(&new_row)
                        .execute(tx)?;
                    insert_children(tx, &child_rows)?;
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let write = TaskWrite::from_task(task);
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| write.apply(tx))
                .map_err(TaskRepositoryError::from)
        })
        .await
    }

    async fn save_link(&self, owner: &Task, child: &Task) -> TaskRepositoryResult<()> {
        let child_write = TaskWrite::from_task(child);
        let owner_write = TaskWrite::from_task(owner);
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, WriteError, _>(|tx| {
                    child_write.apply(tx)?;
                    owner_write.apply(tx)
                })
                .map_err(TaskRepositoryError::from)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            let Some(task_row) = row else {
                return Ok(None);
            };

            let children = task_children::table
                .filter(task_children::parent_id.eq(id.into_inner()))
                .select(task_children::child_id)
                .load::<Uuid>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(task_row, children).map(Some)
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let links = task_children::table
                .select((task_children::parent_id, task_children::child_id))
                .load::<TaskChildRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let mut children_by_parent = group_children(links);
            rows.into_iter()
                .map(|row| {
                    let children = children_by_parent.remove(&row.id).unwrap_or_default();
                    row_to_task(row, children)
                })
                .collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Links in both directions go with the row via ON DELETE CASCADE.
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn insert_children(
    connection: &mut PgConnection,
    rows: &[TaskChildRow],
) -> Result<(), DieselError> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(task_children::table)
        .values(rows)
        .on_conflict_do_nothing()
        .execute(connection)?;
    Ok(())
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        state: task.state().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_child_rows(task: &Task) -> Vec<TaskChildRow> {
    let parent_id = task.id().into_inner();
    task.children()
        .iter()
        .map(|child| TaskChildRow {
            parent_id,
            child_id: child.into_inner(),
        })
        .collect()
}

fn group_children(links: Vec<TaskChildRow>) -> HashMap<Uuid, Vec<Uuid>> {
    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in links {
        grouped.entry(link.parent_id).or_default().push(link.child_id);
    }
    grouped
}

fn row_to_task(row: TaskRow, children: Vec<Uuid>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description,
        state: persisted_state,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let state =
        TaskState::try_from(persisted_state.as_str()).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        state,
        children: children
            .into_iter()
            .map(TaskId::from_uuid)
            .collect::<BTreeSet<_>>(),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
