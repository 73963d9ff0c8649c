//! 접근 정책.
//!
//! 경로 패턴과 필요 역할의 고정 테이블. 신원 게이트가 해석을 끝낸 뒤
//! 평가되며, 위에서 아래로 첫 번째로 일치하는 규칙이 적용됩니다.
//! HTTP 메서드는 구분하지 않습니다.
//!
//! 거부는 두 가지로 구분됩니다. 신원이 없으면 401, 신원은 있지만 역할이
//! 부족하면 403. 토큰이 왜 거부되었는지(변조/만료)는 응답에 노출하지
//! 않습니다.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::middleware::CurrentUser;
use crate::auth::Role;
use crate::error;

/// 요청 경로에 대한 접근 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// 허용
    Permitted,
    /// 신원 없음 (401)
    Unauthenticated,
    /// 신원은 있으나 역할 부족 (403)
    Forbidden,
}

/// 인증/문서/헬스 체크 경로. 신원과 무관하게 항상 허용됩니다.
const PUBLIC_PREFIXES: &[&str] = &["/api/auth", "/api-docs", "/swagger-ui", "/health"];

/// 관리자 전용 리소스 (카테고리, 재무 보고서, 관리자 관리).
const ADMIN_PREFIXES: &[&str] = &["/api/categories", "/api/reports", "/api/administrators"];

/// 관리자와 일반 회원이 함께 쓰는 리소스 (회원, 결제, 알림).
const SHARED_PREFIXES: &[&str] = &["/api/members", "/api/payments", "/api/notifications"];

/// 경로가 접두사 규칙과 일치하는지 확인합니다.
///
/// `/api/auth`는 `/api/auth`와 `/api/auth/login`에는 일치하지만
/// `/api/authx`에는 일치하지 않습니다.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn matches_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| matches_prefix(path, prefix))
}

/// 경로와 해석된 역할로 접근 판정을 계산합니다.
///
/// 순수 함수이므로 요청 처리와 무관하게 단위 테스트할 수 있습니다.
pub fn evaluate(path: &str, role: Option<Role>) -> AccessDecision {
    if matches_any(path, PUBLIC_PREFIXES) {
        return AccessDecision::Permitted;
    }

    if matches_any(path, ADMIN_PREFIXES) {
        return match role {
            None => AccessDecision::Unauthenticated,
            Some(Role::Admin) => AccessDecision::Permitted,
            Some(_) => AccessDecision::Forbidden,
        };
    }

    if matches_any(path, SHARED_PREFIXES) {
        return match role {
            None => AccessDecision::Unauthenticated,
            Some(Role::Admin) | Some(Role::Socio) => AccessDecision::Permitted,
        };
    }

    // 그 외 모든 경로는 역할과 무관하게 인증만 요구
    match role {
        Some(_) => AccessDecision::Permitted,
        None => AccessDecision::Unauthenticated,
    }
}

/// 접근 정책 middleware.
///
/// 게이트가 부착한 신원(없을 수도 있음)으로 판정을 내리고, 거부를
/// HTTP 응답으로 변환합니다.
pub async fn access_policy(request: Request, next: Next) -> Response {
    let role = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.role);
    let method = request.method().clone();
    let uri = request.uri().clone();

    match evaluate(uri.path(), role) {
        AccessDecision::Permitted => next.run(request).await,
        AccessDecision::Unauthenticated => {
            tracing::warn!(path = %uri.path(), "인증되지 않은 요청 거부");
            error::reject(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "인증이 필요합니다",
                &method,
                &uri,
            )
            .into_response()
        }
        AccessDecision::Forbidden => {
            tracing::warn!(path = %uri.path(), "권한 부족으로 요청 거부");
            error::reject(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "접근 권한이 없습니다",
                &method,
                &uri,
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths_ignore_identity() {
        for path in [
            "/api/auth/login",
            "/api/auth/register",
            "/api-docs/openapi.json",
            "/swagger-ui/index.html",
            "/health",
            "/health/ready",
        ] {
            assert_eq!(evaluate(path, None), AccessDecision::Permitted, "{}", path);
            assert_eq!(
                evaluate(path, Some(Role::Socio)),
                AccessDecision::Permitted,
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_admin_paths_require_admin() {
        for path in [
            "/api/categories",
            "/api/categories/0195",
            "/api/reports/period",
            "/api/administrators",
        ] {
            assert_eq!(evaluate(path, None), AccessDecision::Unauthenticated, "{}", path);
            assert_eq!(
                evaluate(path, Some(Role::Socio)),
                AccessDecision::Forbidden,
                "{}",
                path
            );
            assert_eq!(
                evaluate(path, Some(Role::Admin)),
                AccessDecision::Permitted,
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_shared_paths_allow_both_roles() {
        for path in ["/api/members", "/api/payments/status/PENDENTE", "/api/notifications"] {
            assert_eq!(evaluate(path, None), AccessDecision::Unauthenticated, "{}", path);
            assert_eq!(
                evaluate(path, Some(Role::Socio)),
                AccessDecision::Permitted,
                "{}",
                path
            );
            assert_eq!(
                evaluate(path, Some(Role::Admin)),
                AccessDecision::Permitted,
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_other_paths_require_any_identity() {
        assert_eq!(evaluate("/api/unknown", None), AccessDecision::Unauthenticated);
        assert_eq!(
            evaluate("/api/unknown", Some(Role::Socio)),
            AccessDecision::Permitted
        );
        assert_eq!(
            evaluate("/api/unknown", Some(Role::Admin)),
            AccessDecision::Permitted
        );
    }

    #[test]
    fn test_prefix_matching_does_not_leak() {
        // 접두사가 경로 세그먼트 경계에서만 일치해야 함
        assert_eq!(evaluate("/api/authx", None), AccessDecision::Unauthenticated);
        assert_eq!(
            evaluate("/api/categoriesx", Some(Role::Socio)),
            AccessDecision::Permitted
        );
    }

    #[test]
    fn test_rule_order_is_stable() {
        // 공개 규칙이 먼저 평가되므로 인증 경로는 역할 규칙에 걸리지 않음
        assert_eq!(
            evaluate("/api/auth/register", Some(Role::Socio)),
            AccessDecision::Permitted
        );
    }
}
