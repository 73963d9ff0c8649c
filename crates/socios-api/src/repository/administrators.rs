//! Administrator Repository.
//!
//! 관리자 명부 관련 데이터베이스 연산을 담당합니다. 이 명부는 인증
//! 계정(users)과 별개의 관리 대상 리소스입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 관리자 레코드.
///
/// `password_hash`는 어떤 응답에도 직렬화되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdministratorRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 관리자 입력.
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// 관리자 업데이트 입력 (비밀번호는 별도 흐름에서 처리).
#[derive(Debug, Clone)]
pub struct UpdateAdministrator {
    pub name: String,
    pub email: String,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Administrator Repository.
pub struct AdministratorRepository;

impl AdministratorRepository {
    /// 모든 관리자 조회.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<AdministratorRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdministratorRecord>("SELECT * FROM administrators ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// 관리자 상세 조회.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<AdministratorRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdministratorRecord>("SELECT * FROM administrators WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 이메일로 관리자 조회.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AdministratorRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdministratorRecord>("SELECT * FROM administrators WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// 관리자 생성.
    pub async fn create(
        pool: &PgPool,
        input: NewAdministrator,
    ) -> Result<AdministratorRecord, sqlx::Error> {
        sqlx::query_as::<_, AdministratorRecord>(
            r#"
            INSERT INTO administrators (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(pool)
        .await
    }

    /// 관리자 업데이트.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateAdministrator,
    ) -> Result<Option<AdministratorRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdministratorRecord>(
            r#"
            UPDATE administrators
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .fetch_optional(pool)
        .await
    }

    /// 관리자 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM administrators WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
