//! Common validation utilities.

use chrono::{DateTime, Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref MOBILE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    static ref VIDEO_URL_RE: Regex =
        Regex::new(r"^(?i)https?://([a-z0-9.-]+)(?::[0-9]+)?(?:[/?#].*)?$").unwrap();
}

/// Video hosts accepted for event and lesson links when none are configured.
pub const DEFAULT_VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
    "vimeo.com",
    "player.vimeo.com",
];

/// Validates a ten digit mobile number.
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if MOBILE_RE.is_match(mobile) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mobile_format");
        err.message = Some("Mobile number must be exactly 10 digits".into());
        Err(err)
    }
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a string parses with [`parse_date`].
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if parse_date(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_format");
        err.message = Some("Date must be YYYY-MM-DD, DD/MM/YYYY or RFC 3339".into());
        Err(err)
    }
}

/// Parses the date shapes clients send.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and full RFC 3339 timestamps (the date
/// part is kept). Years must fall in 1..=9999.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .filter(|date| (1..=9999).contains(&date.year()))
}

/// Extracts the lower-cased host of an http(s) URL.
pub fn url_host(link: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(link.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Returns true if `link` is an http(s) URL on one of `allowed_hosts`.
pub fn is_allowed_video_link<S: AsRef<str>>(link: &str, allowed_hosts: &[S]) -> bool {
    match url_host(link) {
        Some(host) => allowed_hosts
            .iter()
            .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(&host)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9998887777").is_ok());
        assert!(validate_mobile("999888777").is_err());
        assert!(validate_mobile("99988877770").is_err());
        assert!(validate_mobile("99988877a7").is_err());
        assert!(validate_mobile("+919998887777").is_err());
    }

    #[test]
    fn test_validate_mobile_error_message() {
        let err = validate_mobile("123").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Mobile number must be exactly 10 digits"
        );
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Hackathon").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(parse_date("2020-01-01"), Some(expected));
        assert_eq!(parse_date("01/01/2020"), Some(expected));
        assert_eq!(parse_date("2020-01-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_date(" 2020-01-01 "), Some(expected));
    }

    #[test]
    fn test_parse_date_day_month_order() {
        assert_eq!(
            parse_date("05/11/2027"),
            NaiveDate::from_ymd_opt(2027, 11, 5)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("2020-13-01"), None);
        assert_eq!(parse_date("31/02/2020"), None);
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_parse_date_rejects_out_of_range_years() {
        assert_eq!(parse_date("-0001-01-01"), None);
        assert_eq!(parse_date("0000-06-01"), None);
        assert_eq!(parse_date("+10000-01-01"), None);
        assert!(validate_date("-0001-01-01").is_err());
        assert_eq!(parse_date("9999-12-31"), NaiveDate::from_ymd_opt(9999, 12, 31));
    }

    #[test]
    fn test_url_host() {
        assert_eq!(
            url_host("https://www.YouTube.com/watch?v=abc"),
            Some("www.youtube.com".to_string())
        );
        assert_eq!(url_host("http://youtu.be:443/abc"), Some("youtu.be".to_string()));
        assert_eq!(url_host("ftp://youtube.com/x"), None);
        assert_eq!(url_host("youtube.com/x"), None);
    }

    #[test]
    fn test_allowed_video_link() {
        assert!(is_allowed_video_link("https://youtu.be/xyz", DEFAULT_VIDEO_HOSTS));
        assert!(is_allowed_video_link(
            "https://vimeo.com/123456",
            DEFAULT_VIDEO_HOSTS
        ));
        assert!(!is_allowed_video_link(
            "https://example.com/video.mp4",
            DEFAULT_VIDEO_HOSTS
        ));
    }

    #[test]
    fn test_allowed_video_link_rejects_userinfo_trick() {
        assert!(!is_allowed_video_link(
            "https://youtube.com@evil.example/watch",
            DEFAULT_VIDEO_HOSTS
        ));
    }

    #[test]
    fn test_allowed_video_link_with_configured_hosts() {
        let hosts = vec!["videos.example.org".to_string()];
        assert!(is_allowed_video_link("https://videos.example.org/a", &hosts));
        assert!(!is_allowed_video_link("https://youtu.be/a", &hosts));
    }
}
