//! Contract tests for the in-memory task repository.

use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};

#[fixture]
fn repository() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

fn sample_task(title: &str) -> eyre::Result<Task> {
    Ok(Task::new(TaskTitle::new(title)?, "", &DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifier(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let task = sample_task("Once")?;
    repository.store(&task).await?;

    let second = repository.store(&task).await;

    ensure!(matches!(second, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_is_not_found(
    repository: InMemoryTaskRepository,
) -> eyre::Result<()> {
    let task = sample_task("Ghost")?;

    let result = repository.update(&task).await;

    ensure!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_missing_task_returns_none(repository: InMemoryTaskRepository) -> eyre::Result<()> {
    ensure!(repository.find_by_id(TaskId::new()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_every_stored_task(repository: InMemoryTaskRepository) -> eyre::Result<()> {
    let first = sample_task("First")?;
    let second = sample_task("Second")?;
    repository.store(&first).await?;
    repository.store(&second).await?;

    let listed = repository.list().await?;

    ensure!(listed.len() == 2);
    ensure!(listed.contains(&first) && listed.contains(&second));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_task_is_not_found(repository: InMemoryTaskRepository) -> eyre::Result<()> {
    let missing = TaskId::new();

    let result = repository.delete(missing).await;

    ensure!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    Ok(())
}
