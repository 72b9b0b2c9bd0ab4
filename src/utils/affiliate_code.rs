use rand::Rng;

const SUFFIX_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Builds a shareable affiliate code from the username: up to four uppercase
/// alphanumeric prefix characters plus four random alphanumerics. Collisions
/// are possible; the unique constraint on affiliates.affiliate_code is the
/// actual guarantee, callers retry on insert failure.
pub fn generate_affiliate_code(username: &str) -> String {
    let prefix: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(4)
        .collect::<String>()
        .to_uppercase();

    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect();

    format!("{prefix}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        let code = generate_affiliate_code("joaodriver");
        assert_eq!(code.len(), 8);
        assert!(code.starts_with("JOAO"));
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_short_username() {
        let code = generate_affiliate_code("ed");
        assert_eq!(code.len(), 6);
        assert!(code.starts_with("ED"));
    }

    #[test]
    fn test_non_alphanumeric_stripped() {
        let code = generate_affiliate_code("a.b-c!d_e");
        assert!(code.starts_with("ABCD"));
    }
}
