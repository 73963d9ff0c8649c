//! 회원 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 게이트웨이 및 역할 기반 접근 제어
//! - 회원/카테고리/결제/알림/보고서/관리자 리소스
//! - 헬스 체크 엔드포인트
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 토큰 코덱, 신원 게이트, 접근 정책
//! - [`repository`]: 데이터베이스 접근 계층
//! - [`error`]: 통합 에러 응답
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI
//!
//! # 요청 처리 흐름
//!
//! `HTTP 요청 → 신원 게이트 → 접근 정책 → 핸들러 → Repository`

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    access_policy, hash_password, identity_gate, verify_password, AuthError, AuthService,
    CurrentUser, JwtClaims, JwtCodec, JwtError, PasswordError, Role,
};
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::{app_router, create_api_router};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, create_test_state_with_store};
