use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted under `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/getRoles", get(admin::list_roles))
        .route("/getUsers", get(admin::list_users))
        .route("/addUser", post(admin::add_user))
        .route("/updateUser", post(admin::update_user))
        .route("/deleteUser", post(admin::delete_user))
}
