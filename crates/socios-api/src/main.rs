//! 회원 관리 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. 설정과 서명 비밀 키는 시작
//! 시점에 한 번 로드되어 이후 변경되지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use socios_api::routes::app_router;
use socios_api::state::AppState;
use socios_api::JwtCodec;
use socios_api::repository::PgUserStore;
use socios_core::{init_logging_from_env, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (없으면 무시)
    dotenvy::dotenv().ok();

    init_logging_from_env()?;

    let config = AppConfig::from_env();
    let addr = config.server.socket_addr()?;

    // 계정 저장소가 DB에 있으므로 서버 기동에는 DB 연결이 필수
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL 환경 변수가 필요합니다"))?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(&url)
        .await?;
    info!("데이터베이스 연결 성공");

    // 마이그레이션 적용
    sqlx::migrate!("./migrations").run(&pool).await?;

    // 게이트웨이 구성: 코덱과 계정 저장소는 여기서 한 번 생성되어
    // 이후 모든 요청에서 읽기 전용으로 공유됨
    let codec = JwtCodec::new(&config.auth);
    let users = Arc::new(PgUserStore::new(pool.clone()));
    let state = Arc::new(AppState::new(codec, users).with_db_pool(pool));

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    info!(%addr, "API 서버 시작");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API 서버 종료");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM 수신 시 graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl+C 핸들러 설치 실패");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM 핸들러 설치 실패")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("종료 신호 수신");
}
