//! 회원 및 결제 상태.

use serde::{Deserialize, Serialize};

/// 회원의 납부 상태.
///
/// 신규 회원은 `Pending` 상태로 등록됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    /// 납부 완료
    #[serde(rename = "PAGO")]
    Paid,
    /// 납부 대기
    #[serde(rename = "PENDENTE")]
    Pending,
    /// 연체
    #[serde(rename = "ATRASADO")]
    Overdue,
}

impl MemberStatus {
    /// 문자열에서 상태 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PAGO" => Some(Self::Paid),
            "PENDENTE" => Some(Self::Pending),
            "ATRASADO" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// 저장소에 기록되는 문자열 형태.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "PAGO",
            Self::Pending => "PENDENTE",
            Self::Overdue => "ATRASADO",
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 개별 결제의 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// 확정
    #[serde(rename = "CONFIRMADO")]
    Confirmed,
    /// 대기
    #[serde(rename = "PENDENTE")]
    Pending,
    /// 거절
    #[serde(rename = "REJEITADO")]
    Rejected,
}

impl PaymentStatus {
    /// 문자열에서 상태 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CONFIRMADO" => Some(Self::Confirmed),
            "PENDENTE" => Some(Self::Pending),
            "REJEITADO" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// 저장소에 기록되는 문자열 형태.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMADO",
            Self::Pending => "PENDENTE",
            Self::Rejected => "REJEITADO",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
