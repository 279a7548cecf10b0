use crate::models::UserSummary;
use crate::services::auth;
use crate::web::error::AppResult;
use crate::web::extractors::CurrentUser;
use crate::web::handlers::bad_request;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use std::sync::Arc;
use time::Duration;

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Response> {
    let user_id = match auth::create_user(&state.db, &req.username, &req.email, &req.password) {
        Ok(id) => id,
        Err(e) => return Ok(bad_request(&e.to_string())),
    };

    let session_days = state.config.auth.session_days;
    let token = auth::create_session(&state.db, user_id, session_days)?;
    let cookie = session_cookie(token, session_days);

    let user = auth::get_user(&state.db, user_id)?
        .ok_or_else(|| anyhow::anyhow!("User {} vanished after insert", user_id))?;

    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(serde_json::json!({"data": user})),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    let rate_key = format!("login:{}", req.username);
    if !state.login_limiter.check(&rate_key) {
        return Ok((
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({"error": "Too many login attempts. Please wait."})),
        )
            .into_response());
    }

    match auth::authenticate(&state.db, &req.username, &req.password)? {
        Some(user) => {
            state.login_limiter.clear(&rate_key);
            let session_days = state.config.auth.session_days;
            let token = auth::create_session(&state.db, user.id, session_days)?;
            let cookie = session_cookie(token, session_days);

            Ok((jar.add(cookie), Json(serde_json::json!({"data": user}))).into_response())
        }
        None => {
            state.login_limiter.record_attempt(&rate_key);
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Invalid username or password"})),
            )
                .into_response())
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get("session") {
        let _ = auth::delete_session(&state.db, cookie.value());
    }

    let cookie = Cookie::build(("session", ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    Ok((
        jar.remove(cookie),
        Json(serde_json::json!({"data": "logged out"})),
    )
        .into_response())
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({"data": UserSummary::from(&user)}))
}

fn session_cookie(token: String, days: i64) -> Cookie<'static> {
    Cookie::build(("session", token))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .max_age(Duration::days(days))
        .build()
}
