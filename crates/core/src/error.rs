//! Operation errors.

use thiserror::Error;

use crate::validation::FieldError;

/// Errors raised while serving a cliente operation.
#[derive(Debug, Error)]
pub enum ClienteError {
    /// One or more fields failed validation, in field order.
    #[error("validation failed: {}", join_messages(.0))]
    Validation(Vec<FieldError>),
    /// No record has the given id.
    #[error("cliente not found")]
    NotFound,
    /// The id is not a well-formed cliente id.
    #[error("invalid cliente id: {0:?}")]
    InvalidId(String),
    /// The store is unreachable or failed. Not recovered by the surfaces.
    #[error("persistence failure: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl ClienteError {
    /// Message used in JSON error bodies.
    pub fn api_message(&self) -> &'static str {
        match self {
            Self::Validation(errors) => errors
                .first()
                .map(FieldError::api_message)
                .unwrap_or("datos inválidos"),
            Self::NotFound => "cliente no encontrado",
            Self::InvalidId(_) => "id inválido",
            Self::Persistence(_) => "error interno",
        }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.form_message())
        .collect::<Vec<_>>()
        .join("; ")
}
