//! 인증 API 엔드포인트.
//!
//! # 엔드포인트
//!
//! - `POST /api/auth/register` - 계정 등록 후 토큰 반환
//! - `POST /api/auth/login` - 자격 증명 확인 후 토큰 반환
//! - `GET /api/auth/me` - 현재 토큰의 신원 조회
//!
//! 엔드포인트 경로는 접근 정책에서 공개로 분류되지만, `me`는 게이트가
//! 신원을 부착하지 못하면 추출기 수준에서 401을 반환합니다.

use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthError, CurrentUser, Role};
use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 계정 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 이메일 (토큰 subject로 사용됨)
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    /// 평문 비밀번호 (최소 6자)
    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,
    /// 역할 (ADMIN 또는 SOCIO)
    pub role: Role,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    pub password: String,
}

/// 토큰 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// 서명된 Bearer 토큰
    pub token: String,
}

/// 현재 신원 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
}

// ==================== 핸들러 ====================

/// 계정 등록.
///
/// 성공 시 새 계정의 토큰을 반환합니다. 이미 등록된 이메일이면 400.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "등록 성공, 토큰 반환", body = AuthResponse),
        (status = 400, description = "중복 이메일 또는 유효하지 않은 입력", body = ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if let Err(errors) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(
                ApiErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    "입력 값이 유효하지 않습니다",
                    serde_json::to_value(&errors).unwrap_or_default(),
                )
                .with_request_info(&method, &uri),
            ),
        ));
    }

    let token = state
        .auth
        .register(&payload.email, &payload.password, payload.role)
        .await
        .map_err(|e| match e {
            AuthError::DuplicateEmail(_) => {
                error::business_rule(e.to_string(), &method, &uri)
            }
            AuthError::Internal(detail) => error::internal_error(detail, &method, &uri),
            // register는 자격 증명을 검증하지 않음
            AuthError::InvalidCredentials => error::internal_error(e, &method, &uri),
        })?;

    Ok(Json(AuthResponse { token }))
}

/// 로그인.
///
/// 이메일 부재와 비밀번호 불일치는 동일한 401 응답으로 수렴합니다.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공, 토큰 반환", body = AuthResponse),
        (status = 401, description = "자격 증명 불일치", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let token = state
        .auth
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => error::reject(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                e.to_string(),
                &method,
                &uri,
            ),
            AuthError::Internal(detail) => error::internal_error(detail, &method, &uri),
            AuthError::DuplicateEmail(_) => error::internal_error(e, &method, &uri),
        })?;

    Ok(Json(AuthResponse { token }))
}

/// 현재 토큰의 신원 조회.
///
/// 게이트가 부착한 신원을 그대로 반환합니다. 유효한 토큰이 없으면 401.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "현재 신원", body = MeResponse),
        (status = 401, description = "유효한 토큰 없음", body = ApiErrorResponse)
    )
)]
pub async fn me(user: CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        email: user.email,
        role: user.role,
    })
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}
