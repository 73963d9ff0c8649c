//! Financial Report Repository.
//!
//! 재무 보고서 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 재무 보고서 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportRecord {
    pub id: Uuid,
    /// 보고서 종류 (MENSAL, ANUAL, POR_CATEGORIA)
    pub kind: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// 집계 데이터 (JSON 텍스트)
    pub data: String,
    pub created_at: DateTime<Utc>,
}

/// 새 보고서 입력.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub kind: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub data: String,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Report Repository.
pub struct ReportRepository;

impl ReportRepository {
    /// 모든 보고서 조회.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<ReportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ReportRecord>("SELECT * FROM reports ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    /// 보고서 상세 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ReportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ReportRecord>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 종류별 보고서 조회.
    pub async fn find_by_kind(pool: &PgPool, kind: &str) -> Result<Vec<ReportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ReportRecord>(
            "SELECT * FROM reports WHERE kind = $1 ORDER BY created_at DESC",
        )
        .bind(kind)
        .fetch_all(pool)
        .await
    }

    /// 기간 시작일 기준 보고서 조회.
    pub async fn find_by_period(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ReportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ReportRecord>(
            r#"
            SELECT * FROM reports
            WHERE period_start >= $1 AND period_start <= $2
            ORDER BY period_start
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// 보고서 저장.
    pub async fn create(pool: &PgPool, input: NewReport) -> Result<ReportRecord, sqlx::Error> {
        sqlx::query_as::<_, ReportRecord>(
            r#"
            INSERT INTO reports (id, kind, period_start, period_end, data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.kind)
        .bind(input.period_start)
        .bind(input.period_end)
        .bind(&input.data)
        .fetch_one(pool)
        .await
    }

    /// 보고서 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
