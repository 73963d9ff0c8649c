//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다. 응답 본문에는
//! 에러 코드, 메시지, 타임스탬프, 요청 메서드/경로가 포함되며 스택
//! 트레이스는 절대 노출되지 않습니다.

use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "카테고리를 찾을 수 없습니다: 0195...",
///   "timestamp": 1738300800,
///   "path": "/api/categories/0195..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "NOT_FOUND", "BUSINESS_RULE", "UNAUTHORIZED")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// HTTP 메서드 (GET, POST 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

// ==================== Result 타입 및 헬퍼 ====================

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 상태 코드와 요청 정보를 포함한 에러 응답 생성.
pub fn reject(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
    method: &Method,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        status,
        Json(ApiErrorResponse::new(code, message).with_request_info(method, uri)),
    )
}

/// 404 Not Found 응답 생성.
pub fn not_found(
    message: impl Into<String>,
    method: &Method,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    reject(StatusCode::NOT_FOUND, "NOT_FOUND", message, method, uri)
}

/// 400 비즈니스 규칙 위반 응답 생성.
pub fn business_rule(
    message: impl Into<String>,
    method: &Method,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    reject(StatusCode::BAD_REQUEST, "BUSINESS_RULE", message, method, uri)
}

/// 500 내부 에러 응답 생성.
///
/// 상세 내용은 로그에만 남기고 응답에는 일반 문구를 사용합니다.
pub fn internal_error(
    detail: impl std::fmt::Display,
    method: &Method,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    tracing::error!(%method, path = %uri.path(), "내부 에러: {}", detail);
    reject(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "서버 내부 오류가 발생했습니다",
        method,
        uri,
    )
}

/// 데이터베이스 미설정(503) 응답 생성.
pub fn db_unavailable(method: &Method, uri: &Uri) -> (StatusCode, Json<ApiErrorResponse>) {
    reject(
        StatusCode::SERVICE_UNAVAILABLE,
        "DB_NOT_CONFIGURED",
        "데이터베이스가 설정되지 않았습니다",
        method,
        uri,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
        assert!(error.method.is_none());
        assert!(error.path.is_none());
    }

    #[test]
    fn test_with_request_info() {
        let uri: Uri = "/api/categories/123".parse().unwrap();
        let error = ApiErrorResponse::new("NOT_FOUND", "Categoria not found")
            .with_request_info(&Method::GET, &uri);

        assert_eq!(error.method, Some("GET".to_string()));
        assert_eq!(error.path, Some("/api/categories/123".to_string()));

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""method":"GET""#));
        assert!(json.contains(r#""path":"/api/categories/123""#));
    }

    #[test]
    fn test_optional_fields_skipped() {
        let error = ApiErrorResponse {
            code: "X".to_string(),
            message: "y".to_string(),
            details: None,
            timestamp: None,
            method: None,
            path: None,
        };
        let json = serde_json::to_string(&error).unwrap();

        assert!(!json.contains("timestamp"));
        assert!(!json.contains("details"));
        assert!(!json.contains("method"));
        assert!(!json.contains("path"));
    }

    #[test]
    fn test_reject_helper_sets_status_and_path() {
        let uri: Uri = "/api/members".parse().unwrap();
        let (status, Json(body)) = not_found("없음", &Method::GET, &uri);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.path, Some("/api/members".to_string()));
    }
}
