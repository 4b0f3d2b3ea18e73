//! Registration, password login, OTP sign-in and session management.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use domain::models::otp::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest};
use domain::models::user::{ChangePasswordRequest, LoginRequest, RegisterUserRequest};
use domain::models::User;
use serde::Serialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, UserAuth};
use crate::response::{ApiResponse, Message};
use crate::services::auth::AuthResult;
use crate::services::{AuthService, OtpService};

/// Session payload returned by every sign-in route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub verified: bool,
    pub mobile: String,
    /// Present when an account is registered with the mobile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionResponse>,
}

impl From<AuthResult> for SessionResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            token: result.token.token,
            token_type: "Bearer",
            expires_in: result.token.expires_in,
            user: result.user,
        }
    }
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.pool.clone(), state.jwt.clone())
}

/// Wraps a session in the success envelope and sets the session cookie.
fn session_response(state: &AppState, result: AuthResult, created: bool) -> Response {
    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &result.token.token);
    let session = SessionResponse::from(result);
    let body = if created {
        ApiResponse::created(session)
    } else {
        ApiResponse::ok(session)
    };
    (headers, body).into_response()
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterUserRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let result = auth_service(&state).register(&request).await?;
    Ok(session_response(&state, result, true))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let result = auth_service(&state).login(&request).await?;
    Ok(session_response(&state, result, false))
}

/// POST /api/v1/auth/send-otp
pub async fn send_otp(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendOtpRequest>,
) -> Result<ApiResponse<SendOtpResponse>, ApiError> {
    request.validate()?;
    let otp = OtpService::new(
        state.pool.clone(),
        state.sms.clone(),
        state.config.otp.ttl_secs,
    );
    Ok(ApiResponse::ok(otp.issue(&request.mobile).await?))
}

/// POST /api/v1/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyOtpRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let otp = OtpService::new(
        state.pool.clone(),
        state.sms.clone(),
        state.config.otp.ttl_secs,
    );
    let verification = otp.verify(&request.mobile, &request.otp).await?;

    let Some(user) = verification.user else {
        return Ok(ApiResponse::ok(VerifyOtpResponse {
            verified: true,
            mobile: verification.mobile,
            session: None,
        })
        .into_response());
    };

    let token = auth_service(&state).issue_token(&user)?;
    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &token.token);
    let body = ApiResponse::ok(VerifyOtpResponse {
        verified: true,
        mobile: verification.mobile,
        session: Some(SessionResponse::from(AuthResult { user, token })),
    });
    Ok((headers, body).into_response())
}

/// POST /api/v1/auth/change-password
///
/// Every token issued before the change stops working; the response carries
/// a fresh one.
pub async fn change_password(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let result = auth_service(&state)
        .change_password(&auth.user, &request)
        .await?;
    Ok(session_response(&state, result, false))
}

/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);
    (headers, ApiResponse::ok(Message::new("Logged out"))).into_response()
}

/// GET /api/v1/auth/me
pub async fn me(auth: UserAuth) -> ApiResponse<User> {
    ApiResponse::ok(auth.user)
}
