use axum::Router;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::categories::{create_category, list_categories};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories).post(create_category))
}
