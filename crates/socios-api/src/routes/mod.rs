//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness / readiness)
//! - `/api/auth` - 등록/로그인 (공개)
//! - `/api/members` - 회원 관리 (ADMIN | SOCIO)
//! - `/api/categories` - 카테고리 관리 (ADMIN)
//! - `/api/payments` - 결제 관리 (ADMIN | SOCIO)
//! - `/api/notifications` - 알림 기록 (ADMIN | SOCIO)
//! - `/api/reports` - 재무 보고서 (ADMIN)
//! - `/api/administrators` - 관리자 명부 (ADMIN)
//!
//! 접근 제어는 핸들러가 아니라 신원 게이트와 정책 레이어가 담당합니다.

pub mod administrators;
pub mod auth;
pub mod categories;
pub mod health;
pub mod members;
pub mod notifications;
pub mod payments;
pub mod reports;

pub use administrators::{administrators_router, AdministratorRequest};
pub use auth::{auth_router, AuthResponse, LoginRequest, MeResponse, RegisterRequest};
pub use categories::{categories_router, CategoryRequest};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use members::{members_router, MemberRequest};
pub use notifications::{notifications_router, NotificationRequest};
pub use payments::{payments_router, PaymentRequest, PaymentStatusRequest};
pub use reports::{reports_router, GenerateReportRequest};

use axum::{middleware, Router};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use crate::auth::{access_policy, identity_gate};
use crate::openapi::swagger_ui_router;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다. 접근 제어는
/// 포함하지 않으므로 [`app_router`]를 통해 사용하는 것이 일반적입니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // 인증 엔드포인트 (공개)
        .nest("/api/auth", auth_router())
        // 리소스 엔드포인트
        .nest("/api/members", members_router())
        .nest("/api/categories", categories_router())
        .nest("/api/payments", payments_router())
        .nest("/api/notifications", notifications_router())
        .nest("/api/reports", reports_router())
        .nest("/api/administrators", administrators_router())
}

/// 게이트와 정책 레이어까지 적용된 애플리케이션 라우터 생성.
///
/// 요청 처리 순서: 신원 게이트 → 접근 정책 → 핸들러.
pub fn app_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(access_policy))
        .layer(middleware::from_fn_with_state(state.clone(), identity_gate))
        .with_state(state)
}

// ==================== 날짜 파싱 헬퍼 ====================

/// `DateTime<Utc>`로 유연하게 파싱합니다.
///
/// 지원 형식:
/// - RFC 3339: `2024-01-15T09:30:00Z`, `2024-01-15T09:30:00+09:00`
/// - ISO 8601 날짜만: `2024-01-15` (00:00:00 UTC로 변환)
pub(crate) fn parse_datetime_flexible(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

/// `NaiveDate`로 파싱합니다 (`YYYY-MM-DD`).
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        app_router(Arc::new(create_test_state()))
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn get_with_token(app: &Router, uri: &str, token: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_parse_datetime_flexible() {
        assert!(parse_datetime_flexible("2024-01-15T09:30:00Z").is_some());
        assert!(parse_datetime_flexible("2024-01-15").is_some());
        assert!(parse_datetime_flexible("15/01/2024").is_none());
    }

    #[tokio::test]
    async fn test_register_login_and_role_enforcement() {
        let app = test_app();

        // ADMIN 등록 → 토큰 A
        let (status, body) = post_json(
            &app,
            "/api/auth/register",
            serde_json::json!({
                "email": "alice@example.com",
                "password": "pw12345",
                "role": "ADMIN"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some());

        // 로그인 → 토큰 B
        let (status, body) = post_json(
            &app,
            "/api/auth/login",
            serde_json::json!({
                "email": "alice@example.com",
                "password": "pw12345"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let admin_token = body["token"].as_str().unwrap().to_string();

        // 신원 조회: 토큰 B가 ADMIN으로 해석됨
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(AUTHORIZATION, format!("Bearer {}", admin_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let me: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(me["email"], "alice@example.com");
        assert_eq!(me["role"], "ADMIN");

        // ADMIN 전용 경로: 토큰 B로 접근 제어를 통과해 핸들러까지 도달
        // (테스트 상태에는 DB가 없으므로 핸들러가 503을 반환)
        let status = get_with_token(&app, "/api/categories", Some(&admin_token)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        // 헤더 없이 접근하면 401
        let status = get_with_token(&app, "/api/categories", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // SOCIO 등록
        let (status, body) = post_json(
            &app,
            "/api/auth/register",
            serde_json::json!({
                "email": "bob@example.com",
                "password": "pw999999",
                "role": "SOCIO"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let socio_token = body["token"].as_str().unwrap().to_string();

        // SOCIO 토큰으로 ADMIN 전용 경로는 403
        let status = get_with_token(&app, "/api/categories", Some(&socio_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // 공용 경로는 SOCIO도 접근 제어를 통과해 핸들러까지 도달
        let status = get_with_token(&app, "/api/members", Some(&socio_token)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        // 토큰 없이 /api/auth/me는 추출기 수준에서 401
        let status = get_with_token(&app, "/api/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_register_is_rejected() {
        let app = test_app();

        let payload = serde_json::json!({
            "email": "alice@example.com",
            "password": "pw12345",
            "role": "ADMIN"
        });
        let (status, _) = post_json(&app, "/api/auth/register", payload.clone()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BUSINESS_RULE");
    }

    #[tokio::test]
    async fn test_login_failures_share_wording() {
        let app = test_app();

        post_json(
            &app,
            "/api/auth/register",
            serde_json::json!({
                "email": "alice@example.com",
                "password": "pw12345",
                "role": "SOCIO"
            }),
        )
        .await;

        let (status_wrong, body_wrong) = post_json(
            &app,
            "/api/auth/login",
            serde_json::json!({"email": "alice@example.com", "password": "bad-pw"}),
        )
        .await;
        let (status_missing, body_missing) = post_json(
            &app,
            "/api/auth/login",
            serde_json::json!({"email": "ghost@example.com", "password": "pw12345"}),
        )
        .await;

        assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
        assert_eq!(status_missing, StatusCode::UNAUTHORIZED);
        // 이메일 존재 여부를 드러내지 않도록 문구가 동일해야 함
        assert_eq!(body_wrong["message"], body_missing["message"]);
        assert_eq!(body_wrong["code"], body_missing["code"]);
    }

    #[tokio::test]
    async fn test_expired_token_is_generic_unauthorized() {
        use socios_core::AuthConfig;

        let (state, _store) = crate::state::create_test_state_with_store();
        let state = Arc::new(state);
        let app = app_router(state.clone());

        // 수명이 음수인 코덱으로 만료 토큰을 직접 발급
        let expired_codec = crate::auth::JwtCodec::new(&AuthConfig {
            jwt_secret: "test-secret-key-for-router-tests-minimum-32ch".to_string(),
            token_lifetime_secs: -3600,
        });
        let expired = expired_codec.issue_for("alice@example.com").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/members")
                    .header(AUTHORIZATION, format!("Bearer {}", expired))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // 만료/변조 구분이 응답에 드러나지 않아야 함
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["path"], "/api/members");
    }

    #[tokio::test]
    async fn test_unknown_path_requires_identity() {
        let app = test_app();

        let status = get_with_token(&app, "/api/unknown", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, body) = post_json(
            &app,
            "/api/auth/register",
            serde_json::json!({
                "email": "alice@example.com",
                "password": "pw12345",
                "role": "SOCIO"
            }),
        )
        .await;
        let token = body["token"].as_str().unwrap().to_string();

        // 인증만 되면 미정의 경로는 404
        let status = get_with_token(&app, "/api/unknown", Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = test_app();
        let status = get_with_token(&app, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        // 역할 집합은 ADMIN/SOCIO로 닫혀 있음
        let app = test_app();
        let (status, _) = post_json(
            &app,
            "/api/auth/register",
            serde_json::json!({
                "email": "case@example.com",
                "password": "pw12345",
                "role": "VIEWER"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
