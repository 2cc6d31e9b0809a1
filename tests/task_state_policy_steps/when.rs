//! When steps for task state policy BDD scenarios.

use super::world::{TaskPolicyWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::task::{domain::TaskPatch, services::LinkTaskRequest};

#[when(r#"the task is edited with title "{title}""#)]
fn edit_task(world: &mut TaskPolicyWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let result = run_async(
        world
            .service
            .update(id, TaskPatch::new().with_title(title)),
    );
    world.last_result = Some(result);
    Ok(())
}

#[when("the child is linked to the task")]
fn link_child(world: &mut TaskPolicyWorld) -> Result<(), eyre::Report> {
    let request = LinkTaskRequest::new(world.task_id()?, world.child_id()?);
    let result = run_async(world.service.link(request));
    world.last_result = Some(result);
    Ok(())
}

#[when("the task moves to its next state")]
fn advance_task(world: &mut TaskPolicyWorld) -> Result<(), eyre::Report> {
    let id = world.task_id()?;
    let result = run_async(world.service.advance_state(id));
    world.last_result = Some(result);
    Ok(())
}
