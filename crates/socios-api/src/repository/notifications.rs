//! Notification Repository.
//!
//! 알림 레코드 관련 데이터베이스 연산을 담당합니다. 실제 발송 채널은
//! 없으며 기록 관리만 수행합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 알림 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NotificationRecord {
    pub id: Uuid,
    /// 알림 종류 (PAGAMENTO_PENDENTE, EVENTO, AVISO)
    pub kind: String,
    /// 발송 기록 시각 (서버에서 기록)
    pub sent_at: DateTime<Utc>,
    pub message: String,
    pub member_id: Uuid,
}

/// 새 알림 입력.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: String,
    pub message: String,
    pub member_id: Uuid,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Notification Repository.
pub struct NotificationRepository;

impl NotificationRepository {
    /// 모든 알림 조회.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications ORDER BY sent_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// 알림 상세 조회.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<NotificationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NotificationRecord>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 회원별 알림 조회.
    pub async fn find_by_member(
        pool: &PgPool,
        member_id: Uuid,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications WHERE member_id = $1 ORDER BY sent_at DESC",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
    }

    /// 종류별 알림 조회.
    pub async fn find_by_kind(
        pool: &PgPool,
        kind: &str,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications WHERE kind = $1 ORDER BY sent_at DESC",
        )
        .bind(kind)
        .fetch_all(pool)
        .await
    }

    /// 기간별 알림 조회.
    pub async fn find_by_period(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            r#"
            SELECT * FROM notifications
            WHERE sent_at >= $1 AND sent_at <= $2
            ORDER BY sent_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// 알림 기록 생성.
    ///
    /// `sent_at`은 생성 시점의 서버 시각으로 기록합니다.
    pub async fn create(
        pool: &PgPool,
        input: NewNotification,
    ) -> Result<NotificationRecord, sqlx::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            r#"
            INSERT INTO notifications (id, kind, sent_at, message, member_id)
            VALUES ($1, $2, NOW(), $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.kind)
        .bind(&input.message)
        .bind(input.member_id)
        .fetch_one(pool)
        .await
    }
}
