use std::sync::LazyLock;

use rand::distr::{Alphanumeric, SampleString};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("failed to build regex")
});

/// 校验邮箱格式
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 清洗用户名，用作参考照片的文件名
///
/// 只保留字母数字和 `.`、`_`、`-`，清洗后为空则返回 None。
pub fn sanitize_username(username: &str) -> Option<String> {
    let cleaned: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// 生成带盐的密码哈希，格式为 `blake3$<salt>$<hash>`
pub fn hash_password(password: &str) -> String {
    let salt = Alphanumeric.sample_string(&mut rand::rng(), 16);
    format!("blake3${}${}", salt, digest(&salt, password))
}

/// 校验密码与存储的哈希是否一致，格式不认识一律算不一致
pub fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("blake3"), Some(salt), Some(hash)) => digest(salt, password) == hash,
        _ => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// 生成随机会话 token
pub fn session_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 32)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("a.b-c_d%e+f@sub.domain.org", true)]
    #[case("user@example.c", false)]
    #[case("user@", false)]
    #[case("@example.com", false)]
    #[case("not an email", false)]
    fn test_validate_email(#[case] email: &str, #[case] expected: bool) {
        assert_eq!(validate_email(email), expected);
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter2");
        assert!(hash.starts_with("blake3$"));
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
        // 两次哈希盐不同
        assert_ne!(hash, hash_password("hunter2"));
    }

    #[test]
    fn test_verify_password_bad_format() {
        assert!(!verify_password("plaintext", "plaintext"));
        assert!(!verify_password("md5$x$y", "x"));
        assert!(!verify_password("", ""));
    }

    #[rstest]
    #[case("alice", Some("alice"))]
    #[case("../etc/passwd", Some("..etcpasswd"))]
    #[case("小明", None)]
    #[case("a b/c", Some("abc"))]
    fn test_sanitize_username(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(sanitize_username(input).as_deref(), expected);
    }

    #[test]
    fn test_session_token_length() {
        let token = session_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
