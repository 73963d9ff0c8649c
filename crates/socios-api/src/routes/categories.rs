//! 카테고리 API 엔드포인트.
//!
//! 관리자 전용 리소스입니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/categories` - 카테고리 목록 조회
//! - `GET /api/categories/{id}` - 카테고리 상세 조회
//! - `POST /api/categories` - 카테고리 생성
//! - `PUT /api/categories/{id}` - 카테고리 수정
//! - `DELETE /api/categories/{id}` - 카테고리 삭제 (소속 회원이 없을 때만)

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode, Uri},
    routing::{delete, get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::repository::{CategoryRecord, CategoryRepository, NewCategory, UpdateCategory};
use crate::state::AppState;

// ==================== 요청 타입 ====================

/// 카테고리 생성/수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: String,
    #[serde(default)]
    pub benefits: Option<String>,
    /// 월 회비
    pub monthly_fee: Decimal,
}

// ==================== 핸들러 ====================

/// 카테고리 목록 조회.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses((status = 200, description = "카테고리 목록", body = [CategoryRecord]))
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<CategoryRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let categories = CategoryRepository::find_all(pool)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(categories))
}

/// 카테고리 상세 조회.
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategoryRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let category = CategoryRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("카테고리를 찾을 수 없습니다: {}", id), &method, &uri)
        })?;

    Ok(Json(category))
}

/// 카테고리 생성.
///
/// 이름은 대소문자를 무시하고 유일해야 합니다.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "카테고리 생성 성공", body = CategoryRecord),
        (status = 400, description = "중복 이름 또는 유효하지 않은 입력", body = ApiErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryRecord>)> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    validate_payload(&payload, &method, &uri)?;

    if CategoryRepository::find_by_name(pool, &payload.name)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .is_some()
    {
        return Err(error::business_rule(
            format!("이미 존재하는 카테고리 이름입니다: {}", payload.name),
            &method,
            &uri,
        ));
    }

    let category = CategoryRepository::create(
        pool,
        NewCategory {
            name: payload.name,
            benefits: payload.benefits,
            monthly_fee: payload.monthly_fee,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?;

    tracing::info!(category_id = %category.id, "카테고리 생성");

    Ok((StatusCode::CREATED, Json(category)))
}

/// 카테고리 수정.
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<Json<CategoryRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    validate_payload(&payload, &method, &uri)?;

    let existing = CategoryRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("카테고리를 찾을 수 없습니다: {}", id), &method, &uri)
        })?;

    // 이름 변경 시 중복 검사 (대소문자 무시)
    if !existing.name.eq_ignore_ascii_case(&payload.name) {
        if let Some(other) = CategoryRepository::find_by_name(pool, &payload.name)
            .await
            .map_err(|e| error::internal_error(e, &method, &uri))?
        {
            if other.id != id {
                return Err(error::business_rule(
                    format!("이미 존재하는 카테고리 이름입니다: {}", payload.name),
                    &method,
                    &uri,
                ));
            }
        }
    }

    let category = CategoryRepository::update(
        pool,
        id,
        UpdateCategory {
            name: payload.name,
            benefits: payload.benefits,
            monthly_fee: payload.monthly_fee,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?
    .ok_or_else(|| {
        error::not_found(format!("카테고리를 찾을 수 없습니다: {}", id), &method, &uri)
    })?;

    Ok(Json(category))
}

/// 카테고리 삭제.
///
/// 소속 회원이 있으면 삭제를 거부합니다.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    CategoryRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("카테고리를 찾을 수 없습니다: {}", id), &method, &uri)
        })?;

    let member_count = CategoryRepository::member_count(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;
    if member_count > 0 {
        return Err(error::business_rule(
            "소속 회원이 있는 카테고리는 삭제할 수 없습니다",
            &method,
            &uri,
        ));
    }

    CategoryRepository::delete(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_payload(
    payload: &CategoryRequest,
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

/// 카테고리 라우터 생성.
pub fn categories_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories))
        .route("/", post(create_category))
        .route("/{id}", get(get_category))
        .route("/{id}", put(update_category))
        .route("/{id}", delete(delete_category))
}
