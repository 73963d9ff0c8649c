//! 관리자 명부 API 엔드포인트.
//!
//! 관리자 전용 리소스입니다. 여기서 관리하는 명부는 인증 계정과 별개의
//! 레코드이며, 비밀번호는 생성 시에만 받고 수정은 별도 흐름으로
//! 남겨둡니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/administrators` - 관리자 목록 조회
//! - `GET /api/administrators/{id}` - 관리자 상세 조회
//! - `POST /api/administrators` - 관리자 등록
//! - `PUT /api/administrators/{id}` - 관리자 수정
//! - `DELETE /api/administrators/{id}` - 관리자 삭제

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode, Uri},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::hash_password;
use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::repository::{
    AdministratorRecord, AdministratorRepository, NewAdministrator, UpdateAdministrator,
};
use crate::state::AppState;

// ==================== 요청 타입 ====================

/// 관리자 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdministratorRequest {
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: String,
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    /// 평문 비밀번호 (최소 6자, 저장 전 해싱됨)
    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,
}

/// 관리자 수정 요청 (비밀번호 제외).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdministratorUpdateRequest {
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: String,
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
}

// ==================== 핸들러 ====================

/// 관리자 목록 조회.
#[utoipa::path(
    get,
    path = "/api/administrators",
    tag = "administrators",
    responses((status = 200, description = "관리자 목록", body = [AdministratorRecord]))
)]
pub async fn list_administrators(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<AdministratorRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let administrators = AdministratorRepository::find_all(pool)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(administrators))
}

/// 관리자 상세 조회.
pub async fn get_administrator(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AdministratorRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let administrator = AdministratorRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("관리자를 찾을 수 없습니다: {}", id), &method, &uri)
        })?;

    Ok(Json(administrator))
}

/// 관리자 등록.
#[utoipa::path(
    post,
    path = "/api/administrators",
    tag = "administrators",
    request_body = AdministratorRequest,
    responses(
        (status = 201, description = "관리자 등록 성공", body = AdministratorRecord),
        (status = 400, description = "중복 이메일 또는 유효하지 않은 입력", body = ApiErrorResponse)
    )
)]
pub async fn create_administrator(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<AdministratorRequest>,
) -> ApiResult<(StatusCode, Json<AdministratorRecord>)> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    payload.validate().map_err(|errors| validation_error(errors, &method, &uri))?;

    if AdministratorRepository::find_by_email(pool, &payload.email)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .is_some()
    {
        return Err(error::business_rule(
            format!("이미 등록된 관리자 이메일입니다: {}", payload.email),
            &method,
            &uri,
        ));
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| error::internal_error(e, &method, &uri))?;

    let administrator = AdministratorRepository::create(
        pool,
        NewAdministrator {
            name: payload.name,
            email: payload.email,
            password_hash,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?;

    tracing::info!(administrator_id = %administrator.id, "관리자 등록");

    Ok((StatusCode::CREATED, Json(administrator)))
}

/// 관리자 수정.
///
/// 이메일 변경 시 본인을 제외한 중복을 검사합니다.
pub async fn update_administrator(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdministratorUpdateRequest>,
) -> ApiResult<Json<AdministratorRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    payload.validate().map_err(|errors| validation_error(errors, &method, &uri))?;

    AdministratorRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("관리자를 찾을 수 없습니다: {}", id), &method, &uri)
        })?;

    if let Some(other) = AdministratorRepository::find_by_email(pool, &payload.email)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
    {
        if other.id != id {
            return Err(error::business_rule(
                format!("다른 관리자가 사용 중인 이메일입니다: {}", payload.email),
                &method,
                &uri,
            ));
        }
    }

    let administrator = AdministratorRepository::update(
        pool,
        id,
        UpdateAdministrator {
            name: payload.name,
            email: payload.email,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?
    .ok_or_else(|| {
        error::not_found(format!("관리자를 찾을 수 없습니다: {}", id), &method, &uri)
    })?;

    Ok(Json(administrator))
}

/// 관리자 삭제.
pub async fn delete_administrator(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let deleted = AdministratorRepository::delete(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    if !deleted {
        return Err(error::not_found(
            format!("관리자를 찾을 수 없습니다: {}", id),
            &method,
            &uri,
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validation_error(
    errors: validator::ValidationErrors,
    method: &Method,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(
            ApiErrorResponse::with_details(
                "VALIDATION_ERROR",
                "입력 값이 유효하지 않습니다",
                serde_json::to_value(&errors).unwrap_or_default(),
            )
            .with_request_info(method, uri),
        ),
    )
}

/// 관리자 라우터 생성.
pub fn administrators_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_administrators))
        .route("/", post(create_administrator))
        .route("/{id}", get(get_administrator))
        .route("/{id}", put(update_administrator))
        .route("/{id}", delete(delete_administrator))
}
