//! Request field validation shared by the route handlers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::AppError;

static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]{1,63}$").expect("valid DNS label regex"));

/// Scope used for slot reads and writes that carry no `userId`.
pub const GLOBAL_SCOPE: &str = "global";

/// Returns the trimmed value, or `None` when the field is absent or blank.
pub fn present(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    Some(value)
}

/// Like [`present`], but a blank field is a `400` carrying `message`.
pub fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AppError> {
    present(value).ok_or_else(|| AppError::bad_request(message))
}

pub fn scope_for(user_id: Option<&str>) -> String {
    present(user_id).unwrap_or(GLOBAL_SCOPE).to_string()
}

/// Lowercased subdomain when it is a single DNS label, otherwise a `400`.
pub fn dns_label(value: &str) -> Result<String, AppError> {
    let label = value.trim().to_ascii_lowercase();
    if !DNS_LABEL.is_match(&label) {
        return Err(AppError::bad_request("Invalid subdomain"));
    }

    Ok(label)
}

/// Field deserializer that never fails: strings pass through, numbers become
/// their decimal text and any other JSON value reads as absent.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Decodes a JSON request body. Empty or malformed bodies decode to the
/// default value so the handler reports the first missing field instead.
pub fn parse_body<T>(body: &[u8]) -> T
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }

    match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed request body");
            T::default()
        }
    }
}
