//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할 정의. 역할 집합은 {ADMIN, SOCIO} 두 값으로 닫혀 있으며
//! 계층이나 스코프는 없습니다. 역할은 등록 시점에 고정됩니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의합니다. 저장소와 JSON 모두
/// 대문자 문자열(`"ADMIN"`, `"SOCIO"`)로 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 관리자 - 카테고리/보고서/관리자 리소스 접근 가능
    Admin,
    /// 일반 회원 - 회원/결제/알림 리소스 접근 가능
    Socio,
}

impl Role {
    /// 관리자 전용 리소스에 접근 가능한지 확인.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "SOCIO" => Some(Role::Socio),
            _ => None,
        }
    }

    /// 저장소에 기록되는 문자열 형태.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Socio => "SOCIO",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("SOCIO"), Some(Role::Socio));
        assert_eq!(Role::parse("Socio"), Some(Role::Socio));
        assert_eq!(Role::parse("viewer"), None);
    }

    #[test]
    fn test_role_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Socio.is_admin());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Socio).unwrap();
        assert_eq!(json, "\"SOCIO\"");

        let parsed: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
