//! 알림 및 보고서 종류.

use serde::{Deserialize, Serialize};

/// 알림 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// 납부 독촉
    #[serde(rename = "PAGAMENTO_PENDENTE")]
    PaymentPending,
    /// 행사 안내
    #[serde(rename = "EVENTO")]
    Event,
    /// 일반 공지
    #[serde(rename = "AVISO")]
    Notice,
}

impl NotificationKind {
    /// 문자열에서 종류 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PAGAMENTO_PENDENTE" => Some(Self::PaymentPending),
            "EVENTO" => Some(Self::Event),
            "AVISO" => Some(Self::Notice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentPending => "PAGAMENTO_PENDENTE",
            Self::Event => "EVENTO",
            Self::Notice => "AVISO",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 재무 보고서 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// 월간 보고서
    #[serde(rename = "MENSAL")]
    Monthly,
    /// 연간 보고서
    #[serde(rename = "ANUAL")]
    Yearly,
    /// 카테고리별 보고서
    #[serde(rename = "POR_CATEGORIA")]
    ByCategory,
}

impl ReportKind {
    /// 문자열에서 종류 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MENSAL" => Some(Self::Monthly),
            "ANUAL" => Some(Self::Yearly),
            "POR_CATEGORIA" => Some(Self::ByCategory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MENSAL",
            Self::Yearly => "ANUAL",
            Self::ByCategory => "POR_CATEGORIA",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_parse() {
        assert_eq!(
            NotificationKind::parse("evento"),
            Some(NotificationKind::Event)
        );
        assert_eq!(NotificationKind::parse("SMS"), None);
    }

    #[test]
    fn test_report_kind_round_trip() {
        for kind in [ReportKind::Monthly, ReportKind::Yearly, ReportKind::ByCategory] {
            assert_eq!(ReportKind::parse(kind.as_str()), Some(kind));
        }
    }
}
