use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod pages;

pub fn router() -> Router<AppState> {
    handlers::web_routes()
}
