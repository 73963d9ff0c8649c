//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다. 게이트웨이가
//! 사용하는 토큰 코덱과 계정 저장소는 읽기 전용이므로 별도의 동기화가
//! 필요하지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::{AuthService, JwtCodec};
use crate::repository::UserStore;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 계정 저장소 - 게이트웨이 경로에서는 읽기 전용
    pub users: Arc<dyn UserStore>,

    /// 인증 서비스 - 등록/로그인 오케스트레이션
    pub auth: Arc<AuthService>,

    /// 토큰 코덱 - 프로세스 수명 동안 불변
    pub codec: Arc<JwtCodec>,

    /// 데이터베이스 연결 풀 (PostgreSQL)
    ///
    /// CRUD 리소스 핸들러가 사용합니다. 미설정 시 해당 핸들러는 503을
    /// 반환합니다.
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # Arguments
    /// * `codec` - 설정에서 생성된 토큰 코덱
    /// * `users` - 계정 저장소 구현체
    pub fn new(codec: JwtCodec, users: Arc<dyn UserStore>) -> Self {
        let codec = Arc::new(codec);
        let auth = Arc::new(AuthService::new(users.clone(), codec.clone()));

        Self {
            users,
            auth,
            codec,
            db_pool: None,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 데이터베이스 설정 여부 확인.
    pub fn has_db_pool(&self) -> bool {
        self.db_pool.is_some()
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 테스트할 수 있는 최소한의 상태를 생성합니다.
/// 계정 저장소는 메모리 구현을 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    create_test_state_with_store().0
}

/// 테스트용 AppState와 계정 저장소 핸들을 함께 반환합니다.
///
/// 저장소 내용을 직접 조작해야 하는 테스트(계정 삭제 등)에서 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state_with_store() -> (AppState, Arc<crate::repository::InMemoryUserStore>) {
    use socios_core::AuthConfig;

    let store = Arc::new(crate::repository::InMemoryUserStore::new());
    let codec = JwtCodec::new(&AuthConfig {
        jwt_secret: "test-secret-key-for-router-tests-minimum-32ch".to_string(),
        token_lifetime_secs: 3600,
    });

    let state = AppState::new(codec, store.clone());
    (state, store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_state() {
        let state = create_test_state();

        assert!(!state.has_db_pool());
        assert!(!state.version.is_empty());
        assert!(state.uptime_secs() >= 0);
    }

    #[tokio::test]
    async fn test_db_health_without_pool() {
        let state = create_test_state();
        assert!(!state.is_db_healthy().await);
    }
}
