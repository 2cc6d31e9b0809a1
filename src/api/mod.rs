//! HTTP surface for task lifecycle operations.
//!
//! | Method        | Path                       | Operation                        |
//! |---------------|----------------------------|----------------------------------|
//! | `GET`         | `/health`                  | liveness probe                   |
//! | `GET`         | `/tasks`                   | list tasks                       |
//! | `POST`        | `/tasks`                   | create a task                    |
//! | `GET`         | `/tasks/{id}`              | fetch one task                   |
//! | `PUT`/`PATCH` | `/tasks/{id}`              | edit title and description       |
//! | `DELETE`      | `/tasks/{id}`              | delete a task                    |
//! | `POST`        | `/tasks/{id}/link`         | link `{"child": <id>}`           |
//! | `POST`        | `/tasks/{id}/change_state` | advance the lifecycle state      |

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use types::{CreateTaskBody, LinkTaskBody, StateResponse, TaskResponse};

use crate::task::{ports::TaskRepository, services::TaskLifecycleService};
use axum::{
    Router,
    routing::{get, post},
};
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the HTTP router around a task lifecycle service.
pub fn router<R, C>(service: TaskLifecycleService<R, C>) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/tasks",
            get(handlers::list_tasks::<R, C>).post(handlers::create_task::<R, C>),
        )
        .route(
            "/tasks/:id",
            get(handlers::get_task::<R, C>)
                .put(handlers::update_task::<R, C>)
                .patch(handlers::update_task::<R, C>)
                .delete(handlers::delete_task::<R, C>),
        )
        .route("/tasks/:id/link", post(handlers::link_task::<R, C>))
        .route(
            "/tasks/:id/change_state",
            post(handlers::change_state::<R, C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(service))
}
