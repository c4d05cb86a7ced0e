//! Cliente records and updates.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identifier of a stored cliente. Assigned on creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClienteId(pub Ulid);

impl ClienteId {
    /// Record key as stored in the `cliente` table.
    pub fn as_key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for ClienteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted customer record, in the shape served by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    /// Record id.
    pub id: ClienteId,
    /// Full name.
    pub nombre: String,
    /// National id number, digits only.
    pub dni: Option<String>,
    /// Contact address.
    pub email: Option<String>,
    /// Canonical `YYYY-MM-DD`.
    pub fecha_nacimiento: Option<String>,
}

impl Cliente {
    /// Builds a record from an id and a set of validated fields.
    pub fn from_fields(id: ClienteId, fields: ClienteFields) -> Self {
        Self {
            id,
            nombre: fields.nombre,
            dni: fields.dni,
            email: fields.email,
            fecha_nacimiento: fields.fecha_nacimiento,
        }
    }

    /// Applies a set of changes in place. Fields left unset are untouched.
    pub fn apply(&mut self, changes: &ClienteChanges) {
        if let Some(nombre) = &changes.nombre {
            self.nombre = nombre.clone();
        }
        if let Some(dni) = &changes.dni {
            self.dni = dni.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(fecha) = &changes.fecha_nacimiento {
            self.fecha_nacimiento = fecha.clone();
        }
    }
}

/// Normalized field values of a cliente, without an id.
///
/// Produced only by [`crate::validate_fields`], so every instance upholds the
/// record invariants: non-empty `nombre`, numeric `dni`, `email` containing
/// `@` and canonical `fecha_nacimiento`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClienteFields {
    /// Trimmed, never empty.
    pub nombre: String,
    /// Digits with an optional sign.
    pub dni: Option<String>,
    /// Contains `@`.
    pub email: Option<String>,
    /// Canonical `YYYY-MM-DD`.
    pub fecha_nacimiento: Option<String>,
}

/// Field-by-field update.
///
/// The outer `Option` says whether a field is touched; for the optional
/// fields the inner `Option` is the new value (`None` clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClienteChanges {
    /// New name. May be empty on partial updates.
    pub nombre: Option<String>,
    /// New or cleared `dni`.
    pub dni: Option<Option<String>>,
    /// New or cleared `email`.
    pub email: Option<Option<String>>,
    /// New or cleared `fecha_nacimiento`, already canonical.
    pub fecha_nacimiento: Option<Option<String>>,
}

impl ClienteChanges {
    /// Changes that overwrite all four fields.
    pub fn replace_all(fields: ClienteFields) -> Self {
        Self {
            nombre: Some(fields.nombre),
            dni: Some(fields.dni),
            email: Some(fields.email),
            fecha_nacimiento: Some(fields.fecha_nacimiento),
        }
    }
}
