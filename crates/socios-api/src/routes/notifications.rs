//! 알림 API 엔드포인트.
//!
//! 알림 레코드의 기록과 조회만 담당합니다. 실제 발송 채널(이메일 등)은
//! 이 시스템의 범위 밖입니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/notifications` - 알림 기록 생성
//! - `GET /api/notifications` - 알림 목록 조회
//! - `GET /api/notifications/{id}` - 알림 상세 조회
//! - `GET /api/notifications/member/{member_id}` - 회원별 알림 조회
//! - `GET /api/notifications/kind/{kind}` - 종류별 알림 조회
//! - `GET /api/notifications/period?start&end` - 기간별 알림 조회

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use socios_core::NotificationKind;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::repository::{
    MemberRepository, NewNotification, NotificationRecord, NotificationRepository,
};
use crate::routes::payments::{parse_period, PeriodQuery};
use crate::state::AppState;

// ==================== 요청 타입 ====================

/// 알림 기록 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationRequest {
    /// 알림 종류 (PAGAMENTO_PENDENTE, EVENTO, AVISO)
    pub kind: String,
    pub message: String,
    pub member_id: Uuid,
}

// ==================== 핸들러 ====================

/// 알림 기록 생성.
///
/// 대상 회원이 존재해야 하며 종류와 메시지는 비워둘 수 없습니다.
#[utoipa::path(
    post,
    path = "/api/notifications",
    tag = "notifications",
    request_body = NotificationRequest,
    responses(
        (status = 201, description = "알림 기록 생성 성공", body = NotificationRecord),
        (status = 400, description = "비어 있는 메시지 또는 알 수 없는 종류", body = ApiErrorResponse),
        (status = 404, description = "회원 없음", body = ApiErrorResponse)
    )
)]
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<NotificationRequest>,
) -> ApiResult<(StatusCode, Json<NotificationRecord>)> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let kind = NotificationKind::parse(&payload.kind).ok_or_else(|| {
        error::business_rule(
            format!("알 수 없는 알림 종류입니다: {}", payload.kind),
            &method,
            &uri,
        )
    })?;
    if payload.message.trim().is_empty() {
        return Err(error::business_rule(
            "알림 메시지는 비워둘 수 없습니다",
            &method,
            &uri,
        ));
    }

    MemberRepository::find_by_id(pool, payload.member_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(
                format!("회원을 찾을 수 없습니다: {}", payload.member_id),
                &method,
                &uri,
            )
        })?;

    let notification = NotificationRepository::create(
        pool,
        NewNotification {
            kind: kind.as_str().to_string(),
            message: payload.message,
            member_id: payload.member_id,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?;

    tracing::info!(
        notification_id = %notification.id,
        member_id = %notification.member_id,
        kind = %notification.kind,
        "알림 기록 생성"
    );

    Ok((StatusCode::CREATED, Json(notification)))
}

/// 알림 목록 조회.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<NotificationRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let notifications = NotificationRepository::find_all(pool)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(notifications))
}

/// 알림 상세 조회.
pub async fn get_notification(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NotificationRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let notification = NotificationRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| error::not_found(format!("알림을 찾을 수 없습니다: {}", id), &method, &uri))?;

    Ok(Json(notification))
}

/// 회원별 알림 조회.
pub async fn list_notifications_by_member(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<Vec<NotificationRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    MemberRepository::find_by_id(pool, member_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("회원을 찾을 수 없습니다: {}", member_id), &method, &uri)
        })?;

    let notifications = NotificationRepository::find_by_member(pool, member_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(notifications))
}

/// 종류별 알림 조회.
pub async fn list_notifications_by_kind(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<NotificationRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let kind = NotificationKind::parse(&kind).ok_or_else(|| {
        error::business_rule(format!("알 수 없는 알림 종류입니다: {}", kind), &method, &uri)
    })?;

    let notifications = NotificationRepository::find_by_kind(pool, kind.as_str())
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(notifications))
}

/// 기간별 알림 조회.
pub async fn list_notifications_by_period(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<Vec<NotificationRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let (start, end) = parse_period(&query, &method, &uri)?;

    let notifications = NotificationRepository::find_by_period(pool, start, end)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(notifications))
}

/// 알림 라우터 생성.
pub fn notifications_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_notification))
        .route("/", get(list_notifications))
        .route("/period", get(list_notifications_by_period))
        .route("/{id}", get(get_notification))
        .route("/member/{member_id}", get(list_notifications_by_member))
        .route("/kind/{kind}", get(list_notifications_by_kind))
}
