//! Session cookie construction and extraction.
//!
//! The refresh token and session id travel in `httpOnly` cookies whose
//! expiry mirrors the session's refresh-token expiry; the access token is
//! returned in the JSON body and presented back as a Bearer header.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use autolog_core::types::{DbId, Timestamp};

pub const SESSION_COOKIE: &str = "sessionId";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Format a UTC timestamp as an RFC 7231 `Expires` attribute value.
fn http_date(at: Timestamp) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn build_cookie(name: &str, value: &str, expires_at: Timestamp) -> String {
    format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax; Expires={}",
        http_date(expires_at)
    )
}

/// `Set-Cookie` values installing the session id and refresh token.
pub fn session_cookies(
    session_id: DbId,
    refresh_token: &str,
    expires_at: Timestamp,
) -> [String; 2] {
    [
        build_cookie(SESSION_COOKIE, &session_id.to_string(), expires_at),
        build_cookie(REFRESH_COOKIE, refresh_token, expires_at),
    ]
}

/// `Set-Cookie` values clearing both session cookies.
pub fn clear_session_cookies() -> [String; 2] {
    [
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        format!("{REFRESH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    ]
}

/// Read a single cookie value from the request headers.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
        .next()
}
