use crate::state::AppState;
use axum::Router;

pub mod code;
pub mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod services;
#[cfg(test)]
pub(crate) mod test_support;

pub fn router() -> Router<AppState> {
    handlers::signup_routes()
}
