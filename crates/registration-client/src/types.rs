//! Request and error payload types for the registration API.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key the backend uses for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Body of `POST /register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Validation messages keyed by field name (or [`NON_FIELD_ERRORS`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping holding a single non-field message.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(NON_FIELD_ERRORS, vec![message.into()]);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, messages: Vec<String>) {
        self.0.insert(field.into(), messages);
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn non_field_errors(&self) -> Option<&[String]> {
        self.get(NON_FIELD_ERRORS)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Adopt a server error body.
    ///
    /// Only a non-empty JSON object is usable. Arrays of strings are kept
    /// as-is, a bare string becomes a one-element list and any other value is
    /// kept in its JSON text form.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.is_empty() {
            return None;
        }

        let errors = object
            .iter()
            .map(|(field, messages)| (field.clone(), messages_from_value(messages)))
            .collect();
        Some(Self(errors))
    }
}

fn messages_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(message_text).collect(),
        other => vec![message_text(other)],
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
