use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use chronod_core::ChronodConfig;
use chronod_scheduler::ScheduleManager;
use chronod_users::UserStore;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ChronodConfig,
    pub scheduler: ScheduleManager,
    /// Boxed so tests can swap the Redis store for the in-memory one.
    pub users: Box<dyn UserStore>,
}

impl AppState {
    pub fn new(
        config: ChronodConfig,
        scheduler: ScheduleManager,
        users: Box<dyn UserStore>,
    ) -> Self {
        Self {
            config,
            scheduler,
            users,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/schedule/{user_id}",
            post(crate::http::schedules::create_schedule)
                .get(crate::http::schedules::list_schedules),
        )
        .route(
            "/schedule/{user_id}/{schedule_id}",
            delete(crate::http::schedules::delete_schedule),
        )
        .route(
            "/user",
            post(crate::http::users::create_user).delete(crate::http::users::delete_user),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
