//! 요청 신원 게이트.
//!
//! 모든 인바운드 요청에서 Bearer 토큰을 신원으로 해석하는 middleware.
//! 게이트는 요청을 거부하지 않습니다. 토큰이 없거나 해석에 실패하면
//! 신원 없이 다음 단계로 넘기고, 거부 여부는 접근 정책이 결정합니다.
//!
//! 게이트가 공유하는 상태는 토큰 코덱과 계정 저장소 핸들뿐이며 둘 다
//! 읽기 전용이므로 락 없이 동시 요청을 처리할 수 있습니다.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::auth::Role;
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 요청 컨텍스트에 부착되는 해석된 신원.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    pub role: Role,
}

/// 신원 게이트 middleware.
///
/// 1. Authorization 헤더가 없거나 `Bearer ` 접두사가 아니면 신원 없이 통과
/// 2. 토큰에서 subject 추출. 실패(변조/만료 포함)는 로그만 남기고 통과
/// 3. subject로 계정 조회. 계정이 사라졌으면 신원 없이 통과
/// 4. 조회된 계정 기준으로 토큰을 한 번 더 검증한 뒤 신원 부착
///
/// 어떤 경우에도 게이트 자체가 실패 응답을 만들지 않습니다.
pub async fn identity_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = resolve_identity(&state, request.headers()).await {
        // 이미 부착된 신원은 덮어쓰지 않음
        if request.extensions().get::<CurrentUser>().is_none() {
            request.extensions_mut().insert(user);
        }
    }

    next.run(request).await
}

/// 헤더의 토큰을 신원으로 해석합니다.
///
/// 모든 실패 경로는 None으로 수렴합니다.
async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let auth_header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?;

    let subject = match state.codec.parse_subject(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::warn!("토큰 해석 실패: {}", e);
            return None;
        }
    };

    let user = match state.users.find_by_email(&subject).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("토큰 subject에 해당하는 계정이 없습니다");
            return None;
        }
        Err(e) => {
            tracing::warn!("신원 조회 실패: {}", e);
            return None;
        }
    };

    // 발급 이후 저장소가 변경되었을 수 있으므로 조회된 계정 기준으로 재검증
    if !state.codec.is_valid(token, &user.email) {
        tracing::warn!("토큰과 계정 불일치");
        return None;
    }

    let role = match user.parsed_role() {
        Some(role) => role,
        None => {
            tracing::warn!(email = %user.email, role = %user.role, "알 수 없는 역할 값");
            return None;
        }
    };

    Some(CurrentUser {
        email: user.email,
        role,
    })
}

/// 인증된 사용자 추출기.
///
/// 게이트가 부착한 신원을 핸들러 파라미터로 꺼냅니다. 신원이 없으면
/// 401을 반환하므로, 공개 경로가 아닌 핸들러에서만 사용해야 합니다.
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ApiErrorResponse::new("UNAUTHORIZED", "인증이 필요합니다")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn whoami(request: Request) -> String {
        match request.extensions().get::<CurrentUser>() {
            Some(user) => format!("{}:{}", user.email, user.role),
            None => "anonymous".to_string(),
        }
    }

    fn gate_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state.clone(), identity_gate))
            .with_state(state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_gate_attaches_identity_for_valid_token() {
        let state = Arc::new(create_test_state());
        let token = state
            .auth
            .register("alice@example.com", "pw12345", Role::Admin)
            .await
            .unwrap();

        let response = gate_router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice@example.com:ADMIN");
    }

    #[tokio::test]
    async fn test_gate_passes_through_without_header() {
        let state = Arc::new(create_test_state());

        let response = gate_router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // 게이트는 거부하지 않고 신원 없이 통과시킴
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_gate_swallows_garbage_token() {
        let state = Arc::new(create_test_state());

        let response = gate_router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_gate_ignores_non_bearer_scheme() {
        let state = Arc::new(create_test_state());

        let response = gate_router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, "Basic YWxpY2U6cHc=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_gate_drops_identity_when_account_removed() {
        let (state, users) = crate::state::create_test_state_with_store();
        let state = Arc::new(state);
        let token = state
            .auth
            .register("alice@example.com", "pw12345", Role::Socio)
            .await
            .unwrap();
        users.remove("alice@example.com").await;

        let response = gate_router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // 토큰 자체는 만료 전이지만 계정이 없으므로 신원은 부착되지 않음
        assert_eq!(body_string(response).await, "anonymous");
    }
}
