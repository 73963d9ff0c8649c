//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 서명 비밀 키는 프로세스 시작 시 한 번 로드되고 런타임에는 변경되지 않습니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SociosError, SociosResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    pub fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            host,
            port,
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

/// 인증 설정.
///
/// JWT 서명 비밀 키와 토큰 수명을 관리합니다. 이 값은 시작 시점에 로드되어
/// 토큰 코덱 생성자에 참조로 전달되며, 전역 조회는 사용하지 않습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키 (HMAC-SHA256)
    pub jwt_secret: String,
    /// 토큰 수명 (초)
    pub token_lifetime_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-key-change-in-production".to_string(),
            token_lifetime_secs: 3600,
        }
    }
}

impl AuthConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// `JWT_SECRET`이 없으면 개발용 기본 키를 사용하고 경고를 남깁니다.
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                tracing::warn!("JWT_SECRET 미설정. 개발용 기본 키를 사용합니다");
                AuthConfig::default().jwt_secret
            }
        };
        let token_lifetime_secs = std::env::var("JWT_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Self {
            jwt_secret,
            token_lifetime_secs,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> SociosResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")
            .map_err(config_error)?
            .set_default("server.port", 3000)
            .map_err(config_error)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SOCIOS")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().map_err(config_error)?;
        config.try_deserialize().map_err(config_error)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> SociosResult<Self> {
        Self::load("config/default.toml")
    }

    /// 환경 변수만으로 설정을 구성합니다.
    ///
    /// 설정 파일 없이 배포하는 환경에서 사용합니다.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::default(),
        }
    }
}

fn config_error(e: config::ConfigError) -> SociosError {
    SociosError::Config(e.to_string())
}
