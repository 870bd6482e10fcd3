use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    bulk_create_notifications, create_notification, delete_notification,
    list_notifications, mark_all_notifications_read, mark_notification_read,
    unread_notification_count,
};

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/bulk", post(bulk_create_notifications))
        .route("/read-all", put(mark_all_notifications_read))
        .route("/unread-count", get(unread_notification_count))
        .route(
            "/{id}",
            axum::routing::delete(delete_notification),
        )
        .route("/{id}/read", put(mark_notification_read))
}
