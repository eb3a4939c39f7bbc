//! wiremock helpers shaped like the auth API

use serde_json::{json, Value};
use wiremock::ResponseTemplate;

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@x.com"),
        "avatar_url": null,
        "bio": null
    })
}

/// `{message, data}` success envelope.
pub fn envelope(status: u16, message: &str, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "message": message, "data": data }))
}

/// Error body as produced by the server's error handler.
pub fn error_body(status: u16, kind: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "error": kind,
        "message": message
    }))
}

/// Add both session cookies to a response.
pub fn with_session_cookies(template: ResponseTemplate, access: &str, refresh: &str) -> ResponseTemplate {
    template
        .append_header(
            "set-cookie",
            format!("accessToken={access}; HttpOnly; SameSite=Lax; Path=/; Max-Age=900"),
        )
        .append_header(
            "set-cookie",
            format!("refreshToken={refresh}; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800"),
        )
}

/// Add removal cookies for both session cookies.
pub fn with_cleared_cookies(template: ResponseTemplate) -> ResponseTemplate {
    template
        .append_header("set-cookie", "accessToken=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
        .append_header("set-cookie", "refreshToken=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
