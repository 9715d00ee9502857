use crate::middleware::auth::{is_safe_return_url, landing_path, SIGN_IN_PATH};
use crate::models::forms::{FieldErrors, SignInForm, SignUpForm};
use crate::models::user::{ACCESS_TOKEN_KEY, EMAIL_KEY, USER_ID_KEY};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crm_core::error::AppError;
use data_access::{AuthResponse, LoginRequest, RegisterRequest};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

#[derive(Template)]
#[template(path = "auth/sign_in.html")]
pub struct SignInTemplate {
    pub email: String,
    pub return_url: Option<String>,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "auth/sign_up.html")]
pub struct SignUpTemplate {
    pub email: String,
    pub return_url: Option<String>,
    pub errors: FieldErrors,
}

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    #[serde(rename = "returnUrl")]
    pub return_url: Option<String>,
}

fn safe_return_url(return_url: Option<String>) -> Option<String> {
    return_url.filter(|url| is_safe_return_url(url))
}

pub async fn sign_in_page(Query(query): Query<AuthQuery>) -> impl IntoResponse {
    SignInTemplate {
        email: String::new(),
        return_url: safe_return_url(query.return_url),
        errors: FieldErrors::default(),
    }
}

pub async fn sign_up_page(Query(query): Query<AuthQuery>) -> impl IntoResponse {
    SignUpTemplate {
        email: String::new(),
        return_url: safe_return_url(query.return_url),
        errors: FieldErrors::default(),
    }
}

pub async fn sign_in_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        tracing::debug!("Sign-in form rejected");
        let page = SignInTemplate {
            email: form.email,
            return_url: safe_return_url(form.return_url),
            errors: FieldErrors::from(&errors),
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let response = state
        .auth
        .sign_in(&LoginRequest {
            email: form.email,
            password: form.password,
        })
        .await;
    start_session(&session, &response).await?;

    let target = landing_path(form.return_url.as_deref());
    Ok(Redirect::to(target).into_response())
}

pub async fn sign_up_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        tracing::debug!("Sign-up form rejected");
        let page = SignUpTemplate {
            email: form.email,
            return_url: safe_return_url(form.return_url),
            errors: FieldErrors::from(&errors),
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let response = state
        .auth
        .sign_up(&RegisterRequest {
            email: form.email,
            password: form.password,
        })
        .await;
    start_session(&session, &response).await?;

    let target = landing_path(form.return_url.as_deref());
    Ok(Redirect::to(target).into_response())
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    state.auth.logout();
    session
        .flush()
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    Ok(Redirect::to(SIGN_IN_PATH))
}

async fn start_session(session: &Session, response: &AuthResponse) -> Result<(), AppError> {
    // New id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    session
        .insert(ACCESS_TOKEN_KEY, &response.access_token)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    session
        .insert(USER_ID_KEY, response.user.id)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    session
        .insert(EMAIL_KEY, &response.user.email)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    tracing::info!(
        user_id = ?response.user.id,
        email = %response.user.email,
        "Session started"
    );
    Ok(())
}
