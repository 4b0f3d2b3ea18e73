//! One-time password generation.

use rand::Rng;

/// Number of digits in an issued code.
pub const OTP_LENGTH: usize = 6;

/// Default validity window for an issued code, in seconds.
pub const DEFAULT_OTP_TTL_SECS: i64 = 600;

/// Generates a six digit numeric code.
///
/// Codes are drawn uniformly from `100000..=999999`, so they never need
/// zero padding.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let code: u32 = 100_000 + rng.gen_range(0..900_000);
    code.to_string()
}

/// Returns true if `code` has the shape of an issued code.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(is_well_formed(&code));
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_generate_code_varies() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("123456"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed("1234567"));
        assert!(!is_well_formed("12a456"));
        assert!(!is_well_formed(""));
    }
}
