//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 비밀번호 해싱 및 검증. 해시 비교는 이 모듈에서만
//! 수행합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용하여 비밀번호를 해싱합니다.
/// 솔트는 자동으로 생성됩니다.
///
/// # Arguments
///
/// * `password` - 해싱할 평문 비밀번호
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트 포함)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 저장된 해시와 입력된 비밀번호를 비교합니다. 불일치는
/// `VerificationFailed`이며, 잘못된 해시 형식(`InvalidHashFormat`)은
/// 호출자가 유발할 수 없는 프로그래밍 오류입니다.
///
/// # Arguments
///
/// * `password` - 검증할 평문 비밀번호
/// * `hash` - 저장된 PHC 형식 해시
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// 비밀번호 강도 검증.
///
/// 등록 요청에서 최소 요구사항(6자 이상)을 확인합니다.
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("비밀번호는 최소 6자 이상이어야 합니다");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "pw12345";
        let hash = hash_password(password).unwrap();

        // 해시 형식 확인 (argon2id)
        assert!(hash.starts_with("$argon2id$"));

        // 올바른 비밀번호 검증
        assert!(verify_password(password, &hash).is_ok());

        // 잘못된 비밀번호 검증
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let hash1 = hash_password("pw12345").unwrap();
        let hash2 = hash_password("pw12345").unwrap();

        // 같은 비밀번호라도 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);

        // 하지만 둘 다 검증 가능
        assert!(verify_password("pw12345", &hash1).is_ok());
        assert!(verify_password("pw12345", &hash2).is_ok());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not-a-valid-hash");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_password_strength_validation() {
        assert!(validate_password_strength("pw12345").is_ok());
        assert!(validate_password_strength("abc123").is_ok());

        // 너무 짧음
        assert!(validate_password_strength("pw999").is_err());
        assert!(validate_password_strength("").is_err());
    }
}
