use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::middleware::auth::EmployeeSession;
use crate::service::tagging::{collect_tags, is_allowed_image};
use crate::{StockroomError, router::StockroomState};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub first_name: String,
}

#[derive(Debug, Serialize)]
pub struct EmployeeHome {
    pub username: String,
}

/// Tags chosen on the upload confirmation form.
#[derive(Debug, Default, Deserialize)]
pub struct TagConfirmation {
    /// Candidate labels the employee ticked.
    #[serde(default)]
    pub selections: Vec<String>,
    /// Comma separated custom tags.
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct TaggedImage {
    pub image_id: String,
    pub tags: Vec<String>,
}

/// POST /employees/login -> verifies credentials and opens a session.
/// A caller that already holds a session gets it back; the body is then ignored
/// and may be omitted.
pub async fn login(
    State(state): State<StockroomState>,
    jar: PrivateCookieJar,
    form: Option<Json<LoginForm>>,
) -> Result<impl IntoResponse, StockroomError> {
    let username = match (EmployeeSession::from_jar(&jar), form) {
        (Some(session), _) => session.username,
        (None, Some(Json(form))) => {
            state
                .credentials
                .verify(&form.username, &form.password)
                .await
                .inspect_err(|e| info!(username = %form.username, reason = %e, "login refused"))?;
            form.username
        }
        (None, None) => return Err(StockroomError::Unauthenticated),
    };

    let first_name = state
        .credentials
        .find_user(&username)
        .await?
        .map(|u| u.first_name)
        .unwrap_or_default();

    let session = EmployeeSession { username };
    let jar = session.store(jar, state.secure_cookie);
    info!(username = %session.username, "employee logged in");

    Ok((
        jar,
        Json(LoginResponse {
            username: session.username,
            first_name,
        }),
    ))
}

/// POST /employees/logout -> drops the session cookie.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    if let Some(session) = EmployeeSession::from_jar(&jar) {
        info!(username = %session.username, "employee logged out");
    }
    (EmployeeSession::clear(jar), StatusCode::NO_CONTENT)
}

/// GET /employees -> who is logged in.
pub async fn employee_home(session: EmployeeSession) -> Json<EmployeeHome> {
    Json(EmployeeHome {
        username: session.username,
    })
}

/// POST /employees/uploads/{image_id} -> store the confirmed tags for an upload.
pub async fn confirm_tags(
    State(state): State<StockroomState>,
    session: EmployeeSession,
    Path(image_id): Path<String>,
    Json(form): Json<TagConfirmation>,
) -> Result<(StatusCode, Json<TaggedImage>), StockroomError> {
    if !is_allowed_image(&image_id) {
        return Err(StockroomError::InvalidImageId(image_id));
    }

    let tags = collect_tags(&form.selections, &form.input);
    state.tags.add_tagged_image(&image_id, &tags).await?;
    info!(
        username = %session.username,
        image_id = %image_id,
        count = tags.len(),
        "tags confirmed"
    );

    Ok((StatusCode::CREATED, Json(TaggedImage { image_id, tags })))
}
