//! Field rules for cliente input.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ClienteChanges, ClienteFields};
use crate::payload::ClientePayload;

/// Accepted input layouts for `fecha_nacimiento`, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const CANONICAL_DATE: &str = "%Y-%m-%d";

/// A single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    /// `nombre` is missing or blank.
    NombreRequerido,
    /// `dni` is not an integer.
    DniNoNumerico,
    /// `email` has no `@`.
    EmailInvalido,
    /// `fecha_nacimiento` matches neither accepted layout.
    FechaInvalida,
}

impl FieldError {
    /// Message flashed to form users.
    pub fn form_message(&self) -> &'static str {
        match self {
            Self::NombreRequerido => "Nombre es requerido",
            Self::DniNoNumerico => "DNI debe ser numérico",
            Self::EmailInvalido => "Email inválido",
            Self::FechaInvalida => "Fecha con formato incorrecto (YYYY-MM-DD o DD/MM/YYYY)",
        }
    }

    /// Message returned in JSON error bodies.
    pub fn api_message(&self) -> &'static str {
        match self {
            Self::NombreRequerido => "nombre es requerido",
            Self::DniNoNumerico => "dni debe ser numérico",
            Self::EmailInvalido => "email inválido",
            Self::FechaInvalida => "fecha inválida",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_message())
    }
}

/// Validates and normalizes a full record.
///
/// Every rule runs; on failure all triggered errors are returned in field
/// order. Absent fields are read as empty strings.
pub fn validate_fields(raw: &ClientePayload) -> Result<ClienteFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let nombre = raw.nombre.as_str().trim();
    if nombre.is_empty() {
        errors.push(FieldError::NombreRequerido);
    }

    let dni = normalize_dni(raw.dni.as_str()).unwrap_or_else(|e| {
        errors.push(e);
        None
    });
    let email = normalize_email(raw.email.as_str()).unwrap_or_else(|e| {
        errors.push(e);
        None
    });
    let fecha_nacimiento = normalize_fecha(raw.fecha_nacimiento.as_str()).unwrap_or_else(|e| {
        errors.push(e);
        None
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ClienteFields {
        nombre: nombre.to_string(),
        dni,
        email,
        fecha_nacimiento,
    })
}

/// Validates a partial update.
///
/// Only fields present in the payload are checked and included. `nombre` is
/// trimmed but may be empty here. The first failing field aborts the patch.
pub fn validate_patch(raw: &ClientePayload) -> Result<ClienteChanges, FieldError> {
    let mut changes = ClienteChanges::default();

    if raw.nombre.is_present() {
        changes.nombre = Some(raw.nombre.as_str().trim().to_string());
    }
    if raw.dni.is_present() {
        changes.dni = Some(normalize_dni(raw.dni.as_str())?);
    }
    if raw.email.is_present() {
        changes.email = Some(normalize_email(raw.email.as_str())?);
    }
    if raw.fecha_nacimiento.is_present() {
        changes.fecha_nacimiento = Some(normalize_fecha(raw.fecha_nacimiento.as_str())?);
    }

    Ok(changes)
}

/// Normalizes a birth date to `YYYY-MM-DD`.
///
/// Empty input means no date. Otherwise `YYYY-MM-DD` is tried before
/// `DD/MM/YYYY` and the first match wins.
pub fn normalize_fecha(raw: &str) -> Result<Option<String>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| Some(date.format(CANONICAL_DATE).to_string()))
        .ok_or(FieldError::FechaInvalida)
}

fn normalize_dni(raw: &str) -> Result<Option<String>, FieldError> {
    let dni = raw.trim();
    if dni.is_empty() {
        return Ok(None);
    }
    if !is_integer(dni) {
        return Err(FieldError::DniNoNumerico);
    }
    Ok(Some(dni.to_string()))
}

fn normalize_email(raw: &str) -> Result<Option<String>, FieldError> {
    let email = raw.trim();
    if email.is_empty() {
        return Ok(None);
    }
    if !email.contains('@') {
        return Err(FieldError::EmailInvalido);
    }
    Ok(Some(email.to_string()))
}

/// Optional sign followed by at least one ASCII digit. No width limit, so
/// long ids with leading zeros are accepted as-is.
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
