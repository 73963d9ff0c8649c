//! JWT 토큰 처리.
//!
//! 토큰 발급과 검증을 담당하는 코덱. 서명 비밀 키는 생성 시점에
//! [`AuthConfig`](socios_core::AuthConfig)에서 받아 보관하며, 이후
//! 프로세스 수명 동안 변경되지 않습니다. 코덱 자체는 상태를 갖지 않으므로
//! 여러 요청에서 동시에 사용해도 안전합니다.
//!
//! 만료 검사는 라이브러리의 exp 검증 대신 서명 확인 후 직접 수행합니다.
//! 이렇게 해야 `now >= exp`가 leeway 없이 엄격하게 적용되고, 서명 오류와
//! 만료가 별개의 결과 variant로 구분됩니다.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use socios_core::AuthConfig;

/// JWT 페이로드.
///
/// `sub`에는 사용자 이메일이 들어갑니다. 추가 클레임은 게이트웨이가
/// 해석하지 않고 그대로 통과시킵니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject - 사용자 이메일
    pub sub: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp, 초)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp, 초)
    pub exp: i64,
    /// 추가 클레임 (선택적, 게이트웨이는 내용을 해석하지 않음)
    #[serde(flatten, default)]
    pub extra: HashMap<String, Value>,
}

/// 토큰 처리 에러.
///
/// 서명/구조 오류와 만료는 별개 variant로 구분되어 호출자가 분기할 수
/// 있습니다. 단, 이 구분은 경계(HTTP 응답)에서는 노출되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// JWT 코덱.
///
/// 발급(`issue`)과 검증(`parse_subject`, `is_valid`, `extract_expiry`)을
/// 제공합니다. HMAC-SHA256 서명을 사용합니다.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl JwtCodec {
    /// 설정에서 코덱 생성.
    ///
    /// # Arguments
    ///
    /// * `config` - 서명 비밀 키와 토큰 수명을 담은 인증 설정
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            lifetime_secs: config.token_lifetime_secs,
        }
    }

    /// 토큰 수명(초) 반환.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// 토큰 발급.
    ///
    /// `exp = iat + lifetime`. 추가 클레임이 비어 있어도 subject는
    /// 정상적으로 왕복됩니다.
    ///
    /// # Arguments
    ///
    /// * `subject` - 사용자 이메일
    /// * `extra` - 추가 클레임 (키 → JSON 값)
    pub fn issue(
        &self,
        subject: &str,
        extra: HashMap<String, Value>,
    ) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
            extra,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(JwtError::from)
    }

    /// 추가 클레임 없이 토큰 발급.
    pub fn issue_for(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, HashMap::new())
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// 서명을 먼저 확인하고(실패 시 `Malformed`), 그 다음 만료를
    /// 엄격하게 검사합니다(`now >= exp`이면 `Expired`). 만료 시각
    /// 그 자체는 이미 만료된 것으로 취급합니다.
    pub fn decode(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let claims = self.decode_signed(token)?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }

    /// 서명만 검증하고 만료는 검사하지 않는 디코딩.
    ///
    /// 만료된 토큰의 진단(만료 시각 추출 등)에 사용합니다.
    fn decode_signed(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::Malformed)
    }

    /// 토큰에서 subject(이메일) 추출.
    ///
    /// # Returns
    ///
    /// 서명이 유효하고 만료되지 않았으면 subject.
    /// 구조/서명 오류는 `Malformed`, 만료는 `Expired`.
    pub fn parse_subject(&self, token: &str) -> Result<String, JwtError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// 토큰이 주어진 subject에 대해 유효한지 확인.
    ///
    /// 서명이 유효하고 만료되지 않았으며 subject가 정확히(대소문자 구분)
    /// 일치해야 true. 서명은 유효하지만 subject가 다른 "남의 토큰"은
    /// 에러가 아니라 false입니다.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.sub == expected_subject,
            Err(_) => false,
        }
    }

    /// 토큰의 만료 시각 추출.
    ///
    /// 진단 용도이므로 이미 만료된 토큰에서도 동작합니다. 서명이
    /// 유효하지 않으면 `Malformed`.
    pub fn extract_expiry(&self, token: &str) -> Result<DateTime<Utc>, JwtError> {
        let claims = self.decode_signed(token)?;
        DateTime::from_timestamp(claims.exp, 0).ok_or(JwtError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_codec(lifetime_secs: i64) -> JwtCodec {
        JwtCodec::new(&AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            token_lifetime_secs: lifetime_secs,
        })
    }

    #[test]
    fn test_issue_and_parse_subject() {
        let codec = test_codec(3600);
        let token = codec.issue_for("alice@example.com").unwrap();

        assert!(!token.is_empty());
        assert_eq!(codec.parse_subject(&token).unwrap(), "alice@example.com");
        assert!(codec.is_valid(&token, "alice@example.com"));
    }

    #[test]
    fn test_issue_with_extra_claims() {
        let codec = test_codec(3600);
        let mut extra = HashMap::new();
        extra.insert("customClaim".to_string(), Value::from("customValue"));

        let token = codec.issue("alice@example.com", extra).unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.extra.get("customClaim"), Some(&Value::from("customValue")));
    }

    #[test]
    fn test_empty_extra_claims_round_trips_subject() {
        let codec = test_codec(3600);
        let token = codec.issue("socio@example.com", HashMap::new()).unwrap();

        assert_eq!(codec.parse_subject(&token).unwrap(), "socio@example.com");
    }

    #[test]
    fn test_wrong_subject_is_false_not_error() {
        let codec = test_codec(3600);
        let token = codec.issue_for("alice@example.com").unwrap();

        // 서명은 유효하지만 다른 사용자의 토큰
        assert!(!codec.is_valid(&token, "bob@example.com"));
        // 원래 주인에 대해서는 여전히 유효
        assert!(codec.is_valid(&token, "alice@example.com"));
    }

    #[test]
    fn test_expired_token() {
        let codec = test_codec(-10);
        let token = codec.issue_for("alice@example.com").unwrap();

        assert!(matches!(codec.parse_subject(&token), Err(JwtError::Expired)));
        assert!(!codec.is_valid(&token, "alice@example.com"));
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        // exp == now인 토큰은 만료로 취급 (경계는 유효하지 않음)
        let codec = test_codec(0);
        let token = codec.issue_for("alice@example.com").unwrap();

        assert!(matches!(codec.parse_subject(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_tampered_token_is_malformed() {
        let codec = test_codec(3600);
        let token = codec.issue_for("alice@example.com").unwrap();

        // 서명 마지막 바이트 변조
        let mut tampered = token.clone().into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(
            codec.parse_subject(&tampered),
            Err(JwtError::Malformed)
        ));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let codec = test_codec(3600);

        assert!(matches!(
            codec.parse_subject("this.is.not.a.valid.token"),
            Err(JwtError::Malformed)
        ));
        assert!(matches!(codec.parse_subject(""), Err(JwtError::Malformed)));
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let codec = test_codec(3600);
        let other = JwtCodec::new(&AuthConfig {
            jwt_secret: "another-secret-key-for-testing-minimum-32-chars".to_string(),
            token_lifetime_secs: 3600,
        });

        let token = codec.issue_for("alice@example.com").unwrap();
        assert!(matches!(other.parse_subject(&token), Err(JwtError::Malformed)));
    }

    #[test]
    fn test_extract_expiry_works_on_expired_token() {
        let codec = test_codec(-3600);
        let token = codec.issue_for("alice@example.com").unwrap();

        // 만료된 토큰이어도 만료 시각은 추출 가능
        let expiry = codec.extract_expiry(&token).unwrap();
        assert!(expiry < Utc::now());
    }

    #[test]
    fn test_extract_expiry_within_lifetime() {
        let codec = test_codec(3600);
        let before = Utc::now().timestamp();
        let token = codec.issue_for("alice@example.com").unwrap();

        let expiry = codec.extract_expiry(&token).unwrap().timestamp();
        assert!(expiry >= before + 3600);
        assert!(expiry <= Utc::now().timestamp() + 3600 + 1);
    }
}
