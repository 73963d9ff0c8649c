//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서, 스펙 JSON은
//! `/api-docs/openapi.json`에서 사용 가능합니다. 두 경로 모두 접근
//! 정책에서 공개로 분류됩니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::Role;
use crate::error::ApiErrorResponse;
use crate::repository::{
    AdministratorRecord, CategoryRecord, NotificationRecord, PaymentRecord, ReportRecord,
};
use crate::routes::members::MemberResponse;
use crate::routes::{
    administrators::AdministratorUpdateRequest, AdministratorRequest, AuthResponse,
    CategoryRequest, ComponentHealth, ComponentStatus, GenerateReportRequest, HealthResponse,
    LoginRequest, MeResponse, MemberRequest, NotificationRequest, PaymentRequest,
    PaymentStatusRequest, RegisterRequest,
};

/// Socios API 문서.
///
/// 주요 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Socios Membership API",
        version = "0.1.0",
        description = r#"
# 회원 관리 REST API

회원, 카테고리, 결제, 알림, 재무 보고서 관리를 위한 REST API입니다.

## 인증

`/api/auth`와 문서/헬스 체크를 제외한 모든 엔드포인트는 JWT Bearer
토큰 인증이 필요합니다. `Authorization: Bearer <token>` 헤더를
포함하세요.

## 역할

- **ADMIN**: 카테고리, 재무 보고서, 관리자 명부까지 전체 접근
- **SOCIO**: 회원, 결제, 알림 리소스 접근
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Socios Backend Team", url = "https://github.com/user/socios")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 등록 및 로그인"),
        (name = "members", description = "회원 관리 - 회원 CRUD"),
        (name = "categories", description = "카테고리 관리 - 회비 카테고리 CRUD (ADMIN)"),
        (name = "payments", description = "결제 관리 - 결제 등록/조회/상태 변경"),
        (name = "notifications", description = "알림 - 알림 기록 관리"),
        (name = "reports", description = "재무 보고서 - 결제 집계 보고서 (ADMIN)"),
        (name = "administrators", description = "관리자 명부 관리 (ADMIN)")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::members::list_members,
        crate::routes::members::get_member,
        crate::routes::members::create_member,
        crate::routes::categories::list_categories,
        crate::routes::categories::create_category,
        crate::routes::payments::create_payment,
        crate::routes::payments::list_payments,
        crate::routes::notifications::create_notification,
        crate::routes::reports::generate_report,
        crate::routes::reports::list_reports,
        crate::routes::administrators::list_administrators,
        crate::routes::administrators::create_administrator,
    ),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            Role,

            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MeResponse,

            // ===== Members =====
            MemberRequest,
            MemberResponse,

            // ===== Categories =====
            CategoryRequest,
            CategoryRecord,

            // ===== Payments =====
            PaymentRequest,
            PaymentStatusRequest,
            PaymentRecord,

            // ===== Notifications =====
            NotificationRequest,
            NotificationRecord,

            // ===== Reports =====
            GenerateReportRequest,
            ReportRecord,

            // ===== Administrators =====
            AdministratorRequest,
            AdministratorUpdateRequest,
            AdministratorRecord,
        )
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_builds() {
        let spec = ApiDoc::openapi();

        // 주요 경로가 스펙에 포함되어야 함
        let paths = &spec.paths.paths;
        assert!(paths.contains_key("/api/auth/register"));
        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/api/members"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn test_openapi_spec_serializes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("Socios Membership API"));
    }
}
