//! Member Repository.
//!
//! 회원(sócio) 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use socios_core::MemberStatus;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 회원 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MemberRecord {
    pub id: Uuid,
    pub name: String,
    /// 신분증 번호 (CPF/CNPJ 등)
    pub document: String,
    pub email: String,
    #[sqlx(default)]
    pub phone: Option<String>,
    /// 납부 상태 (PAGO, PENDENTE, ATRASADO)
    pub payment_status: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 회원 입력.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub document: String,
    pub email: String,
    pub phone: Option<String>,
    pub category_id: Uuid,
}

/// 회원 업데이트 입력.
#[derive(Debug, Clone)]
pub struct UpdateMember {
    pub name: String,
    pub document: String,
    pub email: String,
    pub phone: Option<String>,
    pub category_id: Uuid,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Member Repository.
pub struct MemberRepository;

impl MemberRepository {
    /// 모든 회원 조회.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<MemberRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>("SELECT * FROM members ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// 회원 상세 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<MemberRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 이메일로 회원 조회.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<MemberRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>("SELECT * FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// 신분증 번호로 회원 조회.
    pub async fn find_by_document(
        pool: &PgPool,
        document: &str,
    ) -> Result<Option<MemberRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>("SELECT * FROM members WHERE document = $1")
            .bind(document)
            .fetch_optional(pool)
            .await
    }

    /// 회원 생성.
    ///
    /// 신규 회원의 납부 상태는 `PENDENTE`로 시작합니다.
    pub async fn create(pool: &PgPool, input: NewMember) -> Result<MemberRecord, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>(
            r#"
            INSERT INTO members (id, name, document, email, phone, payment_status, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.document)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(MemberStatus::Pending.as_str())
        .bind(input.category_id)
        .fetch_one(pool)
        .await
    }

    /// 회원 업데이트.
    ///
    /// 납부 상태는 결제 처리에서만 변경되므로 여기서는 건드리지 않습니다.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateMember,
    ) -> Result<Option<MemberRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>(
            r#"
            UPDATE members
            SET name = $2, document = $3, email = $4, phone = $5, category_id = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.document)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.category_id)
        .fetch_optional(pool)
        .await
    }

    /// 회원 납부 상태 변경.
    pub async fn update_payment_status(
        pool: &PgPool,
        id: Uuid,
        status: MemberStatus,
    ) -> Result<Option<MemberRecord>, sqlx::Error> {
        sqlx::query_as::<_, MemberRecord>(
            r#"
            UPDATE members
            SET payment_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
    }

    /// 회원 삭제 (연관 결제/알림은 CASCADE로 함께 삭제됨).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
