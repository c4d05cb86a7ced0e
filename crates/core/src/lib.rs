#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and validation for the clientes service.

pub mod api;
pub mod error;
pub mod model;
pub mod payload;
pub mod validation;

mod util;

pub use error::ClienteError;
pub use model::{Cliente, ClienteChanges, ClienteFields, ClienteId};
pub use payload::{ClientePayload, Field};
pub use util::{new_cliente_id, parse_identifier};
pub use validation::{normalize_fecha, validate_fields, validate_patch, FieldError};
