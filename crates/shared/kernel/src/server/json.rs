use super::error::ApiError;
use axum::body::Bytes;
use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};

/// Decodes a JSON request body.
///
/// Handlers take the raw body and call this after looking the target record
/// up, so a missing record is reported before a malformed body.
///
/// # Errors
/// [`ApiError::BadRequest`] carrying the parser message.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// `deserialize_with` helper for patch fields that may be cleared.
///
/// Paired with `#[serde(default)]` on an `Option<Option<T>>` field: a missing
/// key stays `None`, an explicit `null` becomes `Some(None)`.
///
/// # Errors
/// Whatever `T` fails to decode with.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `deserialize_with` helper for patch fields that cannot be cleared.
///
/// Paired with `#[serde(default)]` on an `Option<T>` field: a missing key
/// keeps the stored value and an explicit `null` is rejected.
///
/// # Errors
/// `invalid type: null` for `null`, otherwise whatever `T` fails to decode with.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
