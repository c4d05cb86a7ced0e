//! Raw request input with explicit presence tracking.
//!
//! A partial update has to tell "field not sent" apart from "field sent
//! empty", so raw values are kept as [`Field`] until validation.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// A raw input value as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field {
    /// Key not present in the input.
    #[default]
    Absent,
    /// Key present with an explicit JSON `null`.
    Null,
    /// Key present with a value.
    Text(String),
}

impl Field {
    /// Whether the key was supplied at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, Field::Absent)
    }

    /// Raw text, with absent and null read as the empty string.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Text(s) => s,
            Field::Absent | Field::Null => "",
        }
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None => Field::Absent,
            Some(Value::Null) => Field::Null,
            Some(Value::String(s)) => Field::Text(s.clone()),
            // Numbers keep their decimal text so `"dni": 123` works; anything
            // else is kept as JSON text and left to the field rules.
            Some(other) => Field::Text(other.to_string()),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

/// The four raw cliente fields of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientePayload {
    /// Raw `nombre`.
    pub nombre: Field,
    /// Raw `dni`.
    pub dni: Field,
    /// Raw `email`.
    pub email: Field,
    /// Raw `fecha_nacimiento`, in any accepted layout.
    pub fecha_nacimiento: Field,
}

impl ClientePayload {
    /// Reads a JSON request body leniently: anything that is not a JSON
    /// object counts as an empty payload.
    pub fn from_json_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_json_object(&map),
            Ok(_) => {
                tracing::debug!("json body is not an object; treating as empty");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "unparseable json body; treating as empty");
                Self::default()
            }
        }
    }

    /// Reads the cliente keys of a JSON object; other keys are ignored.
    pub fn from_json_object(map: &Map<String, Value>) -> Self {
        Self {
            nombre: Field::from_json(map.get("nombre")),
            dni: Field::from_json(map.get("dni")),
            email: Field::from_json(map.get("email")),
            fecha_nacimiento: Field::from_json(map.get("fecha_nacimiento")),
        }
    }

    /// Reads url-encoded form fields.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let get = |key: &str| match form.get(key) {
            Some(v) => Field::Text(v.clone()),
            None => Field::Absent,
        };
        Self {
            nombre: get("nombre"),
            dni: get("dni"),
            email: get("email"),
            fecha_nacimiento: get("fecha_nacimiento"),
        }
    }
}
