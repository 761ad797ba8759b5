use axum::{Extension, Json};
use serde::Serialize;

use crate::gate::Identity;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// GET /api/v1/profile
/// Reports the identity the auth gate attached, if any.
pub async fn handle_get_profile(identity: Option<Extension<Identity>>) -> Json<ProfileResponse> {
    let identity = identity.map(|Extension(identity)| identity);
    Json(ProfileResponse {
        authenticated: identity.is_some(),
        user_id: identity.as_ref().map(|i| i.user_id.clone()),
        email: identity.and_then(|i| i.email),
    })
}
