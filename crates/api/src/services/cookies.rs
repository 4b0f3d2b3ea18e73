//! Session cookie helper.
//!
//! Browser clients (the admin dashboard) authenticate with an httpOnly cookie
//! carrying the same session token API clients send as a bearer header.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::CookieJar;

use crate::config::CookieConfig;

#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: CookieConfig,
    /// Session token expiry in seconds (from JWT config)
    max_age_secs: i64,
}

impl CookieHelper {
    pub fn new(config: CookieConfig, max_age_secs: i64) -> Self {
        Self {
            config,
            max_age_secs,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Build a Set-Cookie header value for a freshly issued session token.
    pub fn build_session_cookie(&self, token: &str) -> String {
        self.build_cookie(token, self.max_age_secs)
    }

    /// Build a Set-Cookie header value that clears the session cookie.
    pub fn build_clear_cookie(&self) -> String {
        self.build_cookie("", 0)
    }

    fn build_cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite={}",
            self.config.name,
            value,
            max_age,
            self.same_site()
        );
        if self.config.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn same_site(&self) -> &'static str {
        match self.config.same_site.to_lowercase().as_str() {
            "strict" => "Strict",
            "none" => "None",
            _ => "Lax",
        }
    }

    /// Append the session cookie to response headers.
    pub fn add_session_cookie(&self, headers: &mut HeaderMap, token: &str) {
        if let Ok(value) = HeaderValue::from_str(&self.build_session_cookie(token)) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Append the clearing cookie to response headers (logout).
    pub fn add_clear_cookie(&self, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_cookie()) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Session token from the request cookies, if any.
    pub fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.config.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    fn helper(secure: bool) -> CookieHelper {
        CookieHelper::new(
            CookieConfig {
                name: "eventdesk_token".to_string(),
                secure,
                same_site: "strict".to_string(),
            },
            3600,
        )
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = helper(true).build_session_cookie("abc.def.ghi");
        assert!(cookie.starts_with("eventdesk_token=abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_insecure_cookie_omits_secure_flag() {
        let cookie = helper(false).build_session_cookie("tok");
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires() {
        let cookie = helper(false).build_clear_cookie();
        assert!(cookie.starts_with("eventdesk_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_add_session_cookie_appends_header() {
        let mut headers = HeaderMap::new();
        helper(false).add_session_cookie(&mut headers, "tok");
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 1);
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; eventdesk_token=tok123"),
        );
        assert_eq!(helper(false).extract_token(&headers).as_deref(), Some("tok123"));

        let empty = HeaderMap::new();
        assert!(helper(false).extract_token(&empty).is_none());
    }
}
