use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;

pub const SESSION_COOKIE: &str = "estate_session";

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN")
        .ok()
        .filter(|d| !d.is_empty())
}

/// Cross-site cookies need `SameSite=None`, which browsers only accept with `Secure`.
fn same_site(secure: bool) -> cookie::SameSite {
    if secure {
        cookie::SameSite::None
    } else {
        cookie::SameSite::Lax
    }
}

fn session_cookie(value: &str, max_age: cookie::time::Duration) -> Cookie<'static> {
    let secure = cookie_secure();
    let mut cookie = Cookie::build((SESSION_COOKIE, value.to_string()))
        .http_only(true)
        .same_site(same_site(secure))
        .path("/")
        .max_age(max_age)
        .secure(secure);

    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }
    cookie.build()
}

/// Set-Cookie header value carrying the raw session token.
pub fn build_session_cookie(token: &str, max_age_hours: i64) -> Option<HeaderValue> {
    let cookie = session_cookie(token, cookie::time::Duration::hours(max_age_hours));
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Set-Cookie header value that expires the session cookie.
pub fn build_clear_cookie() -> Option<HeaderValue> {
    let cookie = session_cookie("", cookie::time::Duration::ZERO);
    HeaderValue::from_str(&cookie.to_string()).ok()
}

pub fn set_session_cookie(headers: &mut HeaderMap, token: &str, max_age_hours: i64) {
    if let Some(value) = build_session_cookie(token, max_age_hours) {
        headers.append(header::SET_COOKIE, value);
    }
}

pub fn clear_session_cookie(headers: &mut HeaderMap) {
    if let Some(value) = build_clear_cookie() {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Extract the session token from the cookie (preferred) or a Bearer header (fallback).
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SESSION_COOKIE) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Parse a specific cookie value from the Cookie header.
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = header_value.to_str() {
            for piece in cookie_str.split(';') {
                if let Ok(c) = Cookie::parse(piece.trim().to_string()) {
                    if c.name() == name && !c.value().is_empty() {
                        return Some(c.value().to_string());
                    }
                }
            }
        }
    }
    None
}
