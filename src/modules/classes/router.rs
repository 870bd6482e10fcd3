use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    class_roster, create_class, delete_class, enroll, get_class, list_classes, update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(list_classes))
        .route(
            "/{key}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/{key}/students", get(class_roster))
        .route("/{key}/enroll", post(enroll))
}
