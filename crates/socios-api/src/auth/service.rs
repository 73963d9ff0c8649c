//! 인증 서비스.
//!
//! 등록(계정 생성 + 토큰 발급)과 로그인(자격 증명 확인 + 토큰 발급)을
//! 오케스트레이션합니다. 호출 간 상태를 갖지 않으며, 등록은 계정 1건을
//! 저장하고 로그인은 아무것도 저장하지 않습니다.

use std::sync::Arc;

use crate::auth::jwt::JwtCodec;
use crate::auth::password::{hash_password, verify_password, PasswordError};
use crate::auth::Role;
use crate::repository::{NewUser, UserStore, UserStoreError};

/// 인증 서비스 에러.
///
/// 로그인 실패는 이메일 부재와 비밀번호 불일치를 구분하지 않고 동일한
/// 문구로 보고합니다. 어느 쪽이 틀렸는지 노출하면 이메일 등록 여부를
/// 탐색할 수 있기 때문입니다. `Internal`의 상세 내용은 서버 로그에만
/// 남기고 호출자에게는 일반 문구만 보여줍니다.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("이미 등록된 이메일입니다: {0}")]
    DuplicateEmail(String),
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,
    #[error("내부 인증 에러")]
    Internal(String),
}

/// 인증 서비스.
///
/// 계정 저장소와 토큰 코덱 참조는 생성 시점에 한 번 주입됩니다.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    codec: Arc<JwtCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, codec: Arc<JwtCodec>) -> Self {
        Self { users, codec }
    }

    /// 계정 등록.
    ///
    /// 중복 검사 → 해싱 → 저장 → 토큰 발급 순서로 진행합니다. 사전
    /// 중복 검사와 별개로 저장 계층의 unique 제약이 동시 등록 경합을
    /// 막습니다. 발급 토큰에 추가 클레임은 없습니다.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        if let Some(_existing) = self
            .users
            .find_by_email(email)
            .await
            .map_err(backend_error)?
        {
            return Err(AuthError::DuplicateEmail(email.to_string()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| AuthError::Internal(format!("비밀번호 해싱 실패: {}", e)))?;

        let record = self
            .users
            .insert(NewUser {
                email: email.to_string(),
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                UserStoreError::DuplicateEmail(email) => AuthError::DuplicateEmail(email),
                UserStoreError::Backend(detail) => AuthError::Internal(detail),
            })?;

        tracing::info!(email = %record.email, role = %record.role, "새 계정 등록");

        self.codec
            .issue_for(&record.email)
            .map_err(|e| AuthError::Internal(format!("토큰 발급 실패: {}", e)))
    }

    /// 로그인.
    ///
    /// 계정 부재와 비밀번호 불일치는 모두 `InvalidCredentials`로
    /// 수렴합니다. 검증 직후 계정을 다시 조회하는 것은 방어적 단계로,
    /// 실패하면 자격 증명 문제가 아니라 내부 일관성 문제입니다.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = match self
            .users
            .find_by_email(email)
            .await
            .map_err(backend_error)?
        {
            Some(user) => user,
            None => {
                tracing::debug!("로그인 실패: 등록되지 않은 이메일");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match verify_password(password, &user.password_hash) {
            Ok(()) => {}
            Err(PasswordError::VerificationFailed) => {
                tracing::debug!(email = %email, "로그인 실패: 비밀번호 불일치");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                return Err(AuthError::Internal(format!(
                    "저장된 해시 처리 실패 ({}): {}",
                    email, e
                )));
            }
        }

        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(backend_error)?
            .ok_or_else(|| {
                AuthError::Internal(format!("검증 직후 계정이 사라졌습니다: {}", email))
            })?;

        self.codec
            .issue_for(&user.email)
            .map_err(|e| AuthError::Internal(format!("토큰 발급 실패: {}", e)))
    }
}

fn backend_error(e: UserStoreError) -> AuthError {
    AuthError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserStore;
    use socios_core::AuthConfig;

    fn test_service() -> (AuthService, Arc<InMemoryUserStore>, Arc<JwtCodec>) {
        let store = Arc::new(InMemoryUserStore::new());
        let codec = Arc::new(JwtCodec::new(&AuthConfig {
            jwt_secret: "test-secret-key-for-auth-service-tests-32ch".to_string(),
            token_lifetime_secs: 3600,
        }));
        let service = AuthService::new(store.clone(), codec.clone());
        (service, store, codec)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _store, codec) = test_service();

        let token_a = service
            .register("alice@example.com", "pw12345", Role::Admin)
            .await
            .unwrap();
        let token_b = service.login("alice@example.com", "pw12345").await.unwrap();

        // 두 토큰 모두 같은 subject로 검증됨
        assert_eq!(codec.parse_subject(&token_a).unwrap(), "alice@example.com");
        assert_eq!(codec.parse_subject(&token_b).unwrap(), "alice@example.com");
        assert!(codec.is_valid(&token_b, "alice@example.com"));
    }

    #[tokio::test]
    async fn test_duplicate_register_keeps_existing_role() {
        let (service, store, _codec) = test_service();

        service
            .register("alice@example.com", "pw12345", Role::Admin)
            .await
            .unwrap();

        let result = service
            .register("alice@example.com", "other-pw", Role::Socio)
            .await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));

        // 기존 계정의 역할은 변경되지 않음
        let existing = store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(existing.parsed_role(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _store, _codec) = test_service();

        service
            .register("alice@example.com", "pw12345", Role::Socio)
            .await
            .unwrap();

        let wrong_password = service
            .login("alice@example.com", "wrong-pw")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "pw12345")
            .await
            .unwrap_err();

        // 문구까지 동일해야 함 (이메일 등록 여부 탐색 방지)
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_token_outlives_deleted_identity() {
        let (service, store, codec) = test_service();

        let token = service
            .register("alice@example.com", "pw12345", Role::Admin)
            .await
            .unwrap();

        // 계정이 삭제되어도 토큰은 자연 만료까지 코덱 수준에서 유효함
        store.remove("alice@example.com").await;
        assert!(codec.is_valid(&token, "alice@example.com"));
    }

    #[tokio::test]
    async fn test_internal_error_is_not_credentials_error() {
        let (service, store, _codec) = test_service();

        // 해시가 손상된 계정은 자격 증명 오류가 아니라 내부 오류
        store
            .insert(NewUser {
                email: "broken@example.com".to_string(),
                password_hash: "not-a-phc-hash".to_string(),
                role: Role::Socio,
            })
            .await
            .unwrap();

        let result = service.login("broken@example.com", "pw12345").await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_internal_error_display_is_generic() {
        let err = AuthError::Internal("검증 직후 계정이 사라졌습니다: x@y".to_string());
        // Display에는 상세 내용이 포함되지 않음
        assert_eq!(err.to_string(), "내부 인증 에러");
    }
}
