//! Category Repository.
//!
//! 회원 카테고리 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 카테고리 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    #[sqlx(default)]
    pub benefits: Option<String>,
    /// 월 회비
    pub monthly_fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 카테고리 입력.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub benefits: Option<String>,
    pub monthly_fee: Decimal,
}

/// 카테고리 업데이트 입력.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub name: String,
    pub benefits: Option<String>,
    pub monthly_fee: Decimal,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Category Repository.
pub struct CategoryRepository;

impl CategoryRepository {
    /// 모든 카테고리 조회.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>("SELECT * FROM categories ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// 카테고리 상세 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CategoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 이름으로 카테고리 조회 (대소문자 무시).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<CategoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>(
            "SELECT * FROM categories WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// 카테고리 생성.
    pub async fn create(pool: &PgPool, input: NewCategory) -> Result<CategoryRecord, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO categories (id, name, benefits, monthly_fee)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.benefits)
        .bind(input.monthly_fee)
        .fetch_one(pool)
        .await
    }

    /// 카테고리 업데이트.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateCategory,
    ) -> Result<Option<CategoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRecord>(
            r#"
            UPDATE categories
            SET name = $2, benefits = $3, monthly_fee = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.benefits)
        .bind(input.monthly_fee)
        .fetch_optional(pool)
        .await
    }

    /// 카테고리 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 카테고리에 소속된 회원 수 조회.
    ///
    /// 삭제 전 참조 검사에 사용합니다.
    pub async fn member_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
