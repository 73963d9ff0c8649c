//! Payment Repository.
//!
//! 결제 관련 데이터베이스 연산을 담당합니다. 결제 레코드는 삭제하지
//! 않고 상태만 갱신합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 결제 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PaymentRecord {
    pub id: Uuid,
    /// 결제 등록 시각 (서버에서 기록)
    pub paid_at: DateTime<Utc>,
    pub amount: Decimal,
    /// 결제 상태 (CONFIRMADO, PENDENTE, REJEITADO)
    pub status: String,
    pub member_id: Uuid,
    pub category_id: Uuid,
}

/// 새 결제 입력.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Decimal,
    pub status: String,
    pub member_id: Uuid,
    pub category_id: Uuid,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Payment Repository.
pub struct PaymentRepository;

impl PaymentRepository {
    /// 모든 결제 조회.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>("SELECT * FROM payments ORDER BY paid_at DESC")
            .fetch_all(pool)
            .await
    }

    /// 결제 상세 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 회원별 결제 조회.
    pub async fn find_by_member(
        pool: &PgPool,
        member_id: Uuid,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payments WHERE member_id = $1 ORDER BY paid_at DESC",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
    }

    /// 카테고리별 결제 조회.
    pub async fn find_by_category(
        pool: &PgPool,
        category_id: Uuid,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payments WHERE category_id = $1 ORDER BY paid_at DESC",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    /// 상태별 결제 조회.
    pub async fn find_by_status(
        pool: &PgPool,
        status: &str,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payments WHERE status = $1 ORDER BY paid_at DESC",
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// 기간별 결제 조회.
    pub async fn find_by_period(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT * FROM payments
            WHERE paid_at >= $1 AND paid_at <= $2
            ORDER BY paid_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// 결제 등록.
    ///
    /// `paid_at`은 등록 시점의 서버 시각으로 기록합니다.
    pub async fn create(pool: &PgPool, input: NewPayment) -> Result<PaymentRecord, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(
            r#"
            INSERT INTO payments (id, paid_at, amount, status, member_id, category_id)
            VALUES ($1, NOW(), $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.amount)
        .bind(&input.status)
        .bind(input.member_id)
        .bind(input.category_id)
        .fetch_one(pool)
        .await
    }

    /// 결제 상태 변경.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: &str,
    ) -> Result<Option<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(
            r#"
            UPDATE payments
            SET status = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// 기간 내 확정 결제 집계 (건수, 합계).
    ///
    /// 재무 보고서 생성에 사용합니다.
    pub async fn confirmed_totals(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(i64, Decimal), sqlx::Error> {
        let row: (i64, Option<Decimal>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), SUM(amount)
            FROM payments
            WHERE status = 'CONFIRMADO' AND paid_at >= $1 AND paid_at <= $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok((row.0, row.1.unwrap_or_default()))
    }
}
