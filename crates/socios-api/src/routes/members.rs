//! 회원 API 엔드포인트.
//!
//! # 엔드포인트
//!
//! - `GET /api/members` - 회원 목록 조회
//! - `GET /api/members/{id}` - 회원 상세 조회
//! - `POST /api/members` - 회원 등록
//! - `PUT /api/members/{id}` - 회원 수정
//! - `DELETE /api/members/{id}` - 회원 삭제

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode, Uri},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::repository::{
    CategoryRepository, MemberRecord, MemberRepository, NewMember, UpdateMember,
};
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 회원 등록/수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MemberRequest {
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: String,
    #[validate(length(min = 1, message = "신분증 번호는 비워둘 수 없습니다"))]
    pub document: String,
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub category_id: Uuid,
}

/// 회원 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub email: String,
    pub phone: Option<String>,
    pub payment_status: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberRecord> for MemberResponse {
    fn from(record: MemberRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            document: record.document,
            email: record.email,
            phone: record.phone,
            payment_status: record.payment_status,
            category_id: record.category_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// ==================== 핸들러 ====================

/// 회원 목록 조회.
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "members",
    responses((status = 200, description = "회원 목록", body = [MemberResponse]))
)]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let members = MemberRepository::find_all(pool)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// 회원 상세 조회.
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "members",
    params(("id" = Uuid, Path, description = "회원 ID")),
    responses(
        (status = 200, description = "회원 상세", body = MemberResponse),
        (status = 404, description = "회원 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MemberResponse>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let member = MemberRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| error::not_found(format!("회원을 찾을 수 없습니다: {}", id), &method, &uri))?;

    Ok(Json(member.into()))
}

/// 회원 등록.
///
/// 카테고리가 존재해야 하고 이메일/신분증 번호는 유일해야 합니다.
/// 신규 회원의 납부 상태는 `PENDENTE`로 시작합니다.
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "members",
    request_body = MemberRequest,
    responses(
        (status = 201, description = "회원 등록 성공", body = MemberResponse),
        (status = 400, description = "중복 이메일/신분증 번호 또는 유효하지 않은 입력", body = ApiErrorResponse),
        (status = 404, description = "카테고리 없음", body = ApiErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<MemberRequest>,
) -> ApiResult<(StatusCode, Json<MemberResponse>)> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    validate_payload(&payload, &method, &uri)?;

    // 카테고리 존재 확인
    CategoryRepository::find_by_id(pool, payload.category_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(
                format!("카테고리를 찾을 수 없습니다: {}", payload.category_id),
                &method,
                &uri,
            )
        })?;

    // 이메일/신분증 번호 중복 확인
    if MemberRepository::find_by_email(pool, &payload.email)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .is_some()
    {
        return Err(error::business_rule(
            format!("이미 등록된 이메일입니다: {}", payload.email),
            &method,
            &uri,
        ));
    }
    if MemberRepository::find_by_document(pool, &payload.document)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .is_some()
    {
        return Err(error::business_rule(
            format!("이미 등록된 신분증 번호입니다: {}", payload.document),
            &method,
            &uri,
        ));
    }

    let member = MemberRepository::create(
        pool,
        NewMember {
            name: payload.name,
            document: payload.document,
            email: payload.email,
            phone: payload.phone,
            category_id: payload.category_id,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?;

    tracing::info!(member_id = %member.id, "회원 등록");

    Ok((StatusCode::CREATED, Json(member.into())))
}

/// 회원 수정.
///
/// 이메일/신분증 번호 변경 시 본인을 제외한 중복을 검사합니다.
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(payload): Json<MemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    validate_payload(&payload, &method, &uri)?;

    let existing = MemberRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| error::not_found(format!("회원을 찾을 수 없습니다: {}", id), &method, &uri))?;

    // 카테고리 변경 시 존재 확인
    if existing.category_id != payload.category_id {
        CategoryRepository::find_by_id(pool, payload.category_id)
            .await
            .map_err(|e| error::internal_error(e, &method, &uri))?
            .ok_or_else(|| {
                error::not_found(
                    format!("카테고리를 찾을 수 없습니다: {}", payload.category_id),
                    &method,
                    &uri,
                )
            })?;
    }

    // 본인을 제외한 이메일/신분증 번호 중복 검사
    if let Some(other) = MemberRepository::find_by_email(pool, &payload.email)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
    {
        if other.id != id {
            return Err(error::business_rule(
                format!("다른 회원이 사용 중인 이메일입니다: {}", payload.email),
                &method,
                &uri,
            ));
        }
    }
    if let Some(other) = MemberRepository::find_by_document(pool, &payload.document)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
    {
        if other.id != id {
            return Err(error::business_rule(
                format!("다른 회원이 사용 중인 신분증 번호입니다: {}", payload.document),
                &method,
                &uri,
            ));
        }
    }

    let member = MemberRepository::update(
        pool,
        id,
        UpdateMember {
            name: payload.name,
            document: payload.document,
            email: payload.email,
            phone: payload.phone,
            category_id: payload.category_id,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?
    .ok_or_else(|| error::not_found(format!("회원을 찾을 수 없습니다: {}", id), &method, &uri))?;

    Ok(Json(member.into()))
}

/// 회원 삭제.
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let deleted = MemberRepository::delete(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    if !deleted {
        return Err(error::not_found(
            format!("회원을 찾을 수 없습니다: {}", id),
            &method,
            &uri,
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_payload(
    payload: &MemberRequest,
    method: &Method,
    uri: &Uri,
) -> Result<(), (StatusCode, Json<ApiErrorResponse>)> {
    payload.validate().map_err(|errors| {
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
    })
}

/// 회원 라우터 생성.
pub fn members_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_members))
        .route("/", post(create_member))
        .route("/{id}", get(get_member))
        .route("/{id}", put(update_member))
        .route("/{id}", delete(delete_member))
}
