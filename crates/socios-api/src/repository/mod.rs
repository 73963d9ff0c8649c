//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 계정 저장소(users)만 trait 뒤에 있고, 나머지 Repository는 static
//! methods 패턴을 사용합니다.

pub mod administrators;
pub mod categories;
pub mod members;
pub mod notifications;
pub mod payments;
pub mod reports;
pub mod users;

pub use administrators::{
    AdministratorRecord, AdministratorRepository, NewAdministrator, UpdateAdministrator,
};
pub use categories::{CategoryRecord, CategoryRepository, NewCategory, UpdateCategory};
pub use members::{MemberRecord, MemberRepository, NewMember, UpdateMember};
pub use notifications::{NewNotification, NotificationRecord, NotificationRepository};
pub use payments::{NewPayment, PaymentRecord, PaymentRepository};
pub use reports::{NewReport, ReportRecord, ReportRepository};
pub use users::{NewUser, PgUserStore, UserRecord, UserStore, UserStoreError};

#[cfg(any(test, feature = "test-utils"))]
pub use users::InMemoryUserStore;
