//! `PostgreSQL` integration tests for task storage and linking.

use super::helpers::{PostgresContext, postgres_context};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::task::{
    domain::{Task, TaskContext, TaskId, TaskState, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
    services::{CreateTaskRequest, LinkTaskRequest},
};

async fn stored(context: &PostgresContext, id: TaskId) -> eyre::Result<Task> {
    context
        .repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| eyre::eyre!("task {id} is missing"))
}

async fn in_progress(context: &PostgresContext, title: &str) -> eyre::Result<Task> {
    let created = context.service.create(CreateTaskRequest::new(title)).await?;
    Ok(context.service.advance_state(created.id()).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn stored_task_reads_back(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let created = context
        .service
        .create(CreateTaskRequest::new("Persist me").with_description("Stored in PostgreSQL"))
        .await?;

    let found = stored(&context, created.id()).await?;

    ensure!(found.title() == created.title());
    ensure!(found.description() == "Stored in PostgreSQL");
    ensure!(found.state() == TaskState::New);
    ensure!(found.children().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn duplicate_store_is_rejected(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let task = Task::new(TaskTitle::new("Once")?, "", &DefaultClock);
    context.repository.store(&task).await?;

    let second = context.repository.store(&task).await;

    ensure!(
        matches!(second, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "unexpected result {second:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn update_of_unknown_task_is_not_found(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let task = Task::new(TaskTitle::new("Ghost")?, "", &DefaultClock);

    let result = context.repository.update(&task).await;

    ensure!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn link_persists_owner_and_promoted_child(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let owner = in_progress(&context, "Owner").await?;
    let child = context.service.create(CreateTaskRequest::new("Child")).await?;

    context
        .service
        .link(LinkTaskRequest::new(owner.id(), child.id()))
        .await?;

    ensure!(stored(&context, owner.id()).await?.has_child(child.id()));
    ensure!(stored(&context, child.id()).await?.state() == TaskState::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn relinking_a_child_keeps_one_link(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let owner = in_progress(&context, "Owner").await?;
    let child = context.service.create(CreateTaskRequest::new("Child")).await?;
    let request = LinkTaskRequest::new(owner.id(), child.id());

    context.service.link(request).await?;
    context.service.link(request).await?;

    ensure!(stored(&context, owner.id()).await?.children().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn failed_link_write_rolls_back_child(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let mut child = context.service.create(CreateTaskRequest::new("Child")).await?;

    // The owner exists only in memory, so its half of the write fails.
    let mut owner = TaskContext::bind(Task::new(TaskTitle::new("Unsaved")?, "", &DefaultClock));
    owner.advance_state(&DefaultClock);
    owner.link(&mut child, &DefaultClock)?;
    let unsaved_owner = owner.into_task();

    let result = context.repository.save_link(&unsaved_owner, &child).await;

    ensure!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == unsaved_owner.id()),
        "unexpected result {result:?}"
    );
    ensure!(stored(&context, child.id()).await?.state() == TaskState::New);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn delete_cascades_links_in_both_directions(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let owner = in_progress(&context, "Owner").await?;
    let child = context.service.create(CreateTaskRequest::new("Child")).await?;
    let grandchild = context.service.create(CreateTaskRequest::new("Grandchild")).await?;
    context
        .service
        .link(LinkTaskRequest::new(owner.id(), child.id()))
        .await?;
    context
        .service
        .link(LinkTaskRequest::new(child.id(), grandchild.id()))
        .await?;

    context.repository.delete(child.id()).await?;

    ensure!(context.repository.find_by_id(child.id()).await?.is_none());
    ensure!(stored(&context, owner.id()).await?.children().is_empty());
    ensure!(stored(&context, grandchild.id()).await?.state() == TaskState::InProgress);
    let again = context.repository.delete(child.id()).await;
    ensure!(matches!(again, Err(TaskRepositoryError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs TASKBOARD_TEST_DATABASE_URL"]
async fn list_returns_tasks_in_creation_order(
    #[future] postgres_context: eyre::Result<PostgresContext>,
) -> eyre::Result<()> {
    let context = postgres_context.await?;
    let mut created = Vec::new();
    for title in ["First", "Second", "Third"] {
        created.push(context.service.create(CreateTaskRequest::new(title)).await?.id());
    }

    let listed: Vec<TaskId> = context.repository.list().await?.iter().map(Task::id).collect();

    ensure!(listed == created, "expected {created:?}, got {listed:?}");
    Ok(())
}
