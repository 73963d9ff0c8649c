//! 재무 보고서 API 엔드포인트.
//!
//! 관리자 전용 리소스입니다. 보고서 생성은 기간 내 확정 결제를
//! 집계하여 결과를 저장합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/reports` - 보고서 생성
//! - `GET /api/reports` - 보고서 목록 조회
//! - `GET /api/reports/{id}` - 보고서 상세 조회
//! - `GET /api/reports/kind/{kind}` - 종류별 보고서 조회
//! - `GET /api/reports/period?start&end` - 기간별 보고서 조회
//! - `DELETE /api/reports/{id}` - 보고서 삭제

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode, Uri},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use socios_core::ReportKind;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{self, ApiErrorResponse, ApiResult};
use crate::repository::{NewReport, PaymentRepository, ReportRecord, ReportRepository};
use crate::routes::parse_date;
use crate::state::AppState;

// ==================== 요청 타입 ====================

/// 보고서 생성 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateReportRequest {
    /// 보고서 종류 (MENSAL, ANUAL, POR_CATEGORIA)
    pub kind: String,
    /// 기간 시작일 (YYYY-MM-DD)
    pub period_start: String,
    /// 기간 종료일 (YYYY-MM-DD)
    pub period_end: String,
}

/// 기간 조회 쿼리 파라미터 (날짜만).
#[derive(Debug, Deserialize)]
pub struct DatePeriodQuery {
    pub start: String,
    pub end: String,
}

// ==================== 핸들러 ====================

/// 보고서 생성.
///
/// 기간 내 확정 결제의 건수와 합계를 집계하여 JSON 텍스트로 저장합니다.
#[utoipa::path(
    post,
    path = "/api/reports",
    tag = "reports",
    request_body = GenerateReportRequest,
    responses(
        (status = 201, description = "보고서 생성 성공", body = ReportRecord),
        (status = 400, description = "알 수 없는 종류 또는 유효하지 않은 기간", body = ApiErrorResponse)
    )
)]
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<GenerateReportRequest>,
) -> ApiResult<(StatusCode, Json<ReportRecord>)> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let kind = ReportKind::parse(&payload.kind).ok_or_else(|| {
        error::business_rule(
            format!("알 수 없는 보고서 종류입니다: {}", payload.kind),
            &method,
            &uri,
        )
    })?;
    let (start, end) = parse_date_period(&payload.period_start, &payload.period_end, &method, &uri)?;

    // 기간 내 확정 결제 집계 (기간 양끝 날짜 포함)
    let range_start = start.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let range_end = end.and_hms_opt(23, 59, 59).unwrap().and_utc();
    let (count, total) = PaymentRepository::confirmed_totals(pool, range_start, range_end)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    let data = serde_json::json!({
        "kind": kind.as_str(),
        "period_start": start,
        "period_end": end,
        "confirmed_count": count,
        "confirmed_total": total,
    });

    let report = ReportRepository::create(
        pool,
        NewReport {
            kind: kind.as_str().to_string(),
            period_start: start,
            period_end: end,
            data: data.to_string(),
        },
    )
    .await
    .map_err(|e| error::internal_error(e, &method, &uri))?;

    tracing::info!(report_id = %report.id, kind = %report.kind, "보고서 생성");

    Ok((StatusCode::CREATED, Json(report)))
}

/// 보고서 목록 조회.
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "reports",
    responses((status = 200, description = "보고서 목록", body = [ReportRecord]))
)]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<ReportRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let reports = ReportRepository::find_all(pool)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(reports))
}

/// 보고서 상세 조회.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ReportRecord>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let report = ReportRepository::find_by_id(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?
        .ok_or_else(|| {
            error::not_found(format!("보고서를 찾을 수 없습니다: {}", id), &method, &uri)
        })?;

    Ok(Json(report))
}

/// 종류별 보고서 조회.
pub async fn list_reports_by_kind(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<ReportRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let kind = ReportKind::parse(&kind).ok_or_else(|| {
        error::business_rule(format!("알 수 없는 보고서 종류입니다: {}", kind), &method, &uri)
    })?;

    let reports = ReportRepository::find_by_kind(pool, kind.as_str())
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(reports))
}

/// 기간별 보고서 조회.
pub async fn list_reports_by_period(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DatePeriodQuery>,
) -> ApiResult<Json<Vec<ReportRecord>>> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let (start, end) = parse_date_period(&query.start, &query.end, &method, &uri)?;

    let reports = ReportRepository::find_by_period(pool, start, end)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    Ok(Json(reports))
}

/// 보고서 삭제.
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let Some(pool) = state.db_pool.as_ref() else {
        return Err(error::db_unavailable(&method, &uri));
    };

    let deleted = ReportRepository::delete(pool, id)
        .await
        .map_err(|e| error::internal_error(e, &method, &uri))?;

    if !deleted {
        return Err(error::not_found(
            format!("보고서를 찾을 수 없습니다: {}", id),
            &method,
            &uri,
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// 날짜 기간을 파싱하고 순서를 검증합니다.
fn parse_date_period(
    start: &str,
    end: &str,
    method: &Method,
    uri: &Uri,
) -> Result<(NaiveDate, NaiveDate), (StatusCode, Json<ApiErrorResponse>)> {
    let start_date = parse_date(start).ok_or_else(|| {
        error::business_rule(format!("시작 날짜 형식이 올바르지 않습니다: {}", start), method, uri)
    })?;
    let end_date = parse_date(end).ok_or_else(|| {
        error::business_rule(format!("끝 날짜 형식이 올바르지 않습니다: {}", end), method, uri)
    })?;

    if start_date > end_date {
        return Err(error::business_rule("기간이 유효하지 않습니다", method, uri));
    }

    Ok((start_date, end_date))
}

/// 보고서 라우터 생성.
pub fn reports_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(generate_report))
        .route("/", get(list_reports))
        .route("/period", get(list_reports_by_period))
        .route("/{id}", get(get_report))
        .route("/{id}", delete(delete_report))
        .route("/kind/{kind}", get(list_reports_by_kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_period() {
        let method = Method::POST;
        let uri: Uri = "/api/reports".parse().unwrap();

        let (start, end) =
            parse_date_period("2024-01-01", "2024-01-31", &method, &uri).unwrap();
        assert!(start < end);

        // 역순 기간은 거부
        assert!(parse_date_period("2024-02-01", "2024-01-01", &method, &uri).is_err());
        // 날짜 외 형식은 거부
        assert!(parse_date_period("2024-01-01T00:00:00Z", "2024-01-31", &method, &uri).is_err());
    }
}
