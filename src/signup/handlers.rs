use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use tracing::instrument;

use crate::{
    signup::{dto::USER_CREATED, services::SignupError},
    state::AppState,
};

pub fn signup_routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn signup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), SignupError> {
    state.signup.signup(&body).await?;
    Ok((StatusCode::CREATED, USER_CREATED))
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        match self {
            SignupError::Decode(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            SignupError::Hashing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password").into_response()
            }
            SignupError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user").into_response()
            }
        }
    }
}
