//! 회원 관리 시스템의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum SociosError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 비즈니스 규칙 위반 (중복 등록, 잘못된 작업 등)
    #[error("비즈니스 규칙 위반: {0}")]
    BusinessRule(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type SociosResult<T> = Result<T, SociosError>;

impl SociosError {
    /// 호출자 잘못으로 발생한 에러인지 확인합니다.
    ///
    /// 클라이언트 에러는 4xx로, 나머지는 5xx로 응답합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SociosError::BusinessRule(_)
                | SociosError::NotFound(_)
                | SociosError::InvalidInput(_)
                | SociosError::Auth(_)
        )
    }

    /// 상세 내용을 호출자에게 노출해도 되는지 확인합니다.
    ///
    /// 내부 에러는 서버 로그에만 기록하고 응답에는 일반 메시지를 사용합니다.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SociosError::Internal(_) | SociosError::Database(_) | SociosError::Config(_)
        )
    }
}

impl From<serde_json::Error> for SociosError {
    fn from(err: serde_json::Error) -> Self {
        SociosError::Serialization(err.to_string())
    }
}
