//! 사용자 계정 Repository.
//!
//! 인증 게이트웨이가 사용하는 계정 저장소. 다른 리소스와 달리 trait
//! 뒤에 두어 게이트웨이와 인증 서비스가 저장 방식과 무관하게 동작하도록
//! 합니다. 구현체 참조는 소비자 생성 시점에 한 번 주입됩니다.
//!
//! 계정은 등록으로만 생성되며 게이트웨이 경로에서는 읽기 전용입니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::Role;

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 계정 레코드.
///
/// `password_hash`는 어떤 응답에도 직렬화되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// 저장된 역할 문자열을 파싱합니다.
    ///
    /// 저장소가 손상되어 알 수 없는 값이 있으면 None.
    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// 새 사용자 계정 입력.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// 계정 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    /// 이메일 unique 제약 위반
    #[error("이미 등록된 이메일입니다: {0}")]
    DuplicateEmail(String),
    /// 그 외 저장소 오류
    #[error("계정 저장소 에러: {0}")]
    Backend(String),
}

// ================================================================================================
// Store trait
// ================================================================================================

/// 계정 저장소 인터페이스.
///
/// 동시 읽기에 안전해야 하며, 이메일 유일성은 구현체의 저장 계층에서
/// 보장해야 합니다. 사전 중복 검사만으로는 동시 등록 경합을 막을 수
/// 없습니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 이메일로 계정 조회.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError>;

    /// 새 계정 저장.
    ///
    /// 동일 이메일이 이미 있으면 `DuplicateEmail`.
    async fn insert(&self, input: NewUser) -> Result<UserRecord, UserStoreError>;
}

// ================================================================================================
// PostgreSQL implementation
// ================================================================================================

/// PostgreSQL 기반 계정 저장소.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::Backend(e.to_string()))?;

        Ok(record)
    }

    async fn insert(&self, input: NewUser) -> Result<UserRecord, UserStoreError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // unique 제약 위반은 동시 등록 경합을 포함해 중복으로 처리
            if let sqlx::Error::Database(db) = &e {
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                    return UserStoreError::DuplicateEmail(input.email.clone());
                }
            }
            UserStoreError::Backend(e.to_string())
        })?;

        Ok(record)
    }
}

// ================================================================================================
// In-memory implementation (test-utils)
// ================================================================================================

/// 메모리 기반 계정 저장소.
///
/// DB 없이 라우터와 인증 흐름을 테스트할 때 사용합니다. 쓰기 락 안에서
/// 중복 검사와 삽입을 함께 수행하므로 유일성 보장은 실제 저장소와
/// 동일합니다.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct InMemoryUserStore {
    users: tokio::sync::RwLock<std::collections::HashMap<String, UserRecord>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 계정 수 반환.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// 테스트에서 계정 삭제를 흉내낼 때 사용합니다.
    pub async fn remove(&self, email: &str) -> Option<UserRecord> {
        self.users.write().await.remove(email)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, input: NewUser) -> Result<UserRecord, UserStoreError> {
        let mut users = self.users.write().await;

        if users.contains_key(&input.email) {
            return Err(UserStoreError::DuplicateEmail(input.email));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            password_hash: input.password_hash,
            role: input.role.as_str().to_string(),
            created_at: Utc::now(),
        };
        users.insert(input.email, record.clone());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_insert_and_find() {
        let store = InMemoryUserStore::new();

        let record = store
            .insert(NewUser {
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert_eq!(record.email, "alice@example.com");
        assert_eq!(record.parsed_role(), Some(Role::Admin));

        let found = store.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, record.id);
    }

    #[tokio::test]
    async fn test_in_memory_duplicate_email() {
        let store = InMemoryUserStore::new();

        let input = NewUser {
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Socio,
        };
        store.insert(input.clone()).await.unwrap();

        let result = store.insert(input).await;
        assert!(matches!(result, Err(UserStoreError::DuplicateEmail(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_find_missing() {
        let store = InMemoryUserStore::new();
        let found = store.find_by_email("missing@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: "ADMIN".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
