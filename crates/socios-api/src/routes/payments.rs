//! 결제 API 엔드포인트.
//!
//! # 엔드포인트
//!
//! - `POST /api/payments` - 결제 등록
//! - `GET /api/payments` - 결제 목록 조회
//! - `GET /api/payments/{id}` - 결제 상세 조회
//! - `GET /api/payments/member/{member_id}` - 회원별 결제 조회
//! - `GET /api/payments/category/{category_id}` - 카테고리별 결제 조회
//! - `GET /api/payments/status/{status}` - 상태별 결제 조회
//! - `GET /api/payments/period?start&end` - 기간별 결제 조회
//! - `PUT /api/payments/{id}/status` - 결제 상태 변경
//!
//! 결제 레코드는 삭제하지 않습니다.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode, Uri},
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use socios_core::{MemberStatus, PaymentStatus};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::repository::{
    CategoryRepository, MemberRepository, NewPayment, PaymentRecord, PaymentRepository,
};
use crate::routes::parse_datetime_flexible;
use crate::state::AppState;

// ==================== 요청 타입 ====================

/// 결제 등록 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub amount: Decimal,
    /// 결제 상태 (CONFIRMADO, PENDENTE, REJEITADO)
    pub status: String,
    pub member_id: Uuid,
    pub category_id: Uuid,
}

/// 결제 상태 변경 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentStatusRequest {
    pub status: String,
}

/// 기간 조회 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// 시작 (RFC 3339 또는 YYYY-MM-DD)
    pub start: String,
    /// 끝 (RFC 3339 또는 YYYY-MM-DD)
    pub end: String,
}

// ==================== 핸들러 ====================

/// 결제 등록.
///
/// 회원과 카테고리가 존재해야 하며, 결제 시각은 서버에서 기록합니다.
/// 상태가 `CONFIRMADO`이면 회원의 납부 상태를 `PAGO`로 갱신합니다.
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "payments",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "결제 등록 성공", body = PaymentRecord),
        (status = 400, description = "알 수 없는 상태 값", body = ApiErrorResponse),
        (status = 404, description = "회원 또는 카테고리 없음", body = ApiErrorResponse)
    )
)]
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentRecord>)> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let status = PaymentStatus::parse(&payload.status).ok_or_else(|| {
        error::business_rule(
            format!("알 수 없는 결제 상태입니다: {}", payload.status),
            &method,
            &uri,
        )
    })?;

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

    let payment = PaymentRepository::create(
        pool,
        NewPayment {
            amount: payload.amount,
            status: status.as_str().to_string(),
            member_id: payload.member_id,
            category_id: payload.category_id,
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?;

    // 확정 결제는 회원 납부 상태에 반영
    if status == PaymentStatus::Confirmed {
        MemberRepository::update_payment_status(pool, payment.member_id, MemberStatus::Paid)
            .await
            .map_err(|e| error::internal_error(e, &method, &uri))?;
    }

    tracing::info!(payment_id = %payment.id, member_id = %payment.member_id, "결제 등록");

    Ok((StatusCode::CREATED, Json(payment)))
}

/// 결제 목록 조회.
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "payments",
    responses((status = 200, description = "결제 목록", body = [PaymentRecord]))
)]
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let payments = PaymentRepository::find_all(pool)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(payments))
}

/// 결제 상세 조회.
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PaymentRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let payment = PaymentRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| error::not_found(format!("결제를 찾을 수 없습니다: {}", id), &method, &uri))?;

    Ok(Json(payment))
}

/// 회원별 결제 조회.
pub async fn list_payments_by_member(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    MemberRepository::find_by_id(pool, member_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("회원을 찾을 수 없습니다: {}", member_id), &method, &uri)
        })?;

    let payments = PaymentRepository::find_by_member(pool, member_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(payments))
}

/// 카테고리별 결제 조회.
pub async fn list_payments_by_category(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    CategoryRepository::find_by_id(pool, category_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(
                format!("카테고리를 찾을 수 없습니다: {}", category_id),
                &method,
                &uri,
            )
        })?;

    let payments = PaymentRepository::find_by_category(pool, category_id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(payments))
}

/// 상태별 결제 조회.
pub async fn list_payments_by_status(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let status = PaymentStatus::parse(&status).ok_or_else(|| {
        error::business_rule(format!("알 수 없는 결제 상태입니다: {}", status), &method, &uri)
    })?;

    let payments = PaymentRepository::find_by_status(pool, status.as_str())
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(payments))
}

/// 기간별 결제 조회.
pub async fn list_payments_by_period(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let (start, end) = parse_period(&query, &method, &uri)?;

    let payments = PaymentRepository::find_by_period(pool, start, end)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(payments))
}

/// 결제 상태 변경.
///
/// `CONFIRMADO`로 변경되면 회원 납부 상태도 `PAGO`로 갱신합니다.
pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentStatusRequest>,
) -> ApiResult<Json<PaymentRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    if payload.status.trim().is_empty() {
        return Err(error::business_rule(
            "새 상태는 비워둘 수 없습니다",
            &method,
            &uri,
        ));
    }
    let status = PaymentStatus::parse(&payload.status).ok_or_else(|| {
        error::business_rule(
            format!("알 수 없는 결제 상태입니다: {}", payload.status),
            &method,
            &uri,
        )
    })?;

    let payment = PaymentRepository::update_status(pool, id, status.as_str())
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| error::not_found(format!("결제를 찾을 수 없습니다: {}", id), &method, &uri))?;

    if status == PaymentStatus::Confirmed {
        MemberRepository::update_payment_status(pool, payment.member_id, MemberStatus::Paid)
            .await
            .map_err(|e| error::internal_error(e, &method, &uri))?;
    }

    Ok(Json(payment))
}

/// 기간 쿼리를 파싱하고 순서를 검증합니다.
pub(crate) fn parse_period(
    query: &PeriodQuery,
    method: &Method,
    uri: &Uri,
) -> Result<
    (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>),
    (StatusCode, Json<ApiErrorResponse>),
> {
    let start = parse_datetime_flexible(&query.start).ok_or_else(|| {
        error::business_rule(format!("시작 날짜 형식이 올바르지 않습니다: {}", query.start), method, uri)
    })?;
    let end = parse_datetime_flexible(&query.end).ok_or_else(|| {
        error::business_rule(format!("끝 날짜 형식이 올바르지 않습니다: {}", query.end), method, uri)
    })?;

    if start > end {
        return Err(error::business_rule("기간이 유효하지 않습니다", method, uri));
    }

    Ok((start, end))
}

/// 결제 라우터 생성.
pub fn payments_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_payment))
        .route("/", get(list_payments))
        .route("/period", get(list_payments_by_period))
        .route("/{id}", get(get_payment))
        .route("/{id}/status", put(update_payment_status))
        .route("/member/{member_id}", get(list_payments_by_member))
        .route("/category/{category_id}", get(list_payments_by_category))
        .route("/status/{status}", get(list_payments_by_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: &str, end: &str) -> PeriodQuery {
        PeriodQuery {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn test_parse_period_accepts_dates_and_rfc3339() {
        let method = Method::GET;
        let uri: Uri = "/api/payments/period".parse().unwrap();

        assert!(parse_period(&query("2024-01-01", "2024-12-31"), &method, &uri).is_ok());
        assert!(parse_period(
            &query("2024-01-01T00:00:00Z", "2024-06-30T23:59:59Z"),
            &method,
            &uri
        )
        .is_ok());
    }

    #[test]
    fn test_parse_period_rejects_reversed_range() {
        let method = Method::GET;
        let uri: Uri = "/api/payments/period".parse().unwrap();

        let result = parse_period(&query("2024-12-31", "2024-01-01"), &method, &uri);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_period_rejects_bad_format() {
        let method = Method::GET;
        let uri: Uri = "/api/payments/period".parse().unwrap();

        let result = parse_period(&query("31/12/2024", "2024-01-01"), &method, &uri);
        assert!(result.is_err());
    }
}
