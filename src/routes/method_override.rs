//! HTML forms can only submit GET and POST. A POST to
//! `/blogs/{id}?_method=PUT` is treated as a PUT, and likewise for DELETE.

use axum::extract::Request;
use axum::http::Method;

pub const PARAM: &str = "_method";

/// Rewrite the method of a POST carrying a `_method` query parameter.
/// Other requests pass through untouched.
pub fn rewrite(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }
    let Some(query) = req.uri().query() else {
        return req;
    };

    let target = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PARAM)
        .and_then(|(_, value)| override_target(&value));

    if let Some(method) = target {
        tracing::debug!("Overriding POST {} as {}", req.uri().path(), method);
        *req.method_mut() = method;
    }
    req
}

fn override_target(value: &str) -> Option<Method> {
    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
