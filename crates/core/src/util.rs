use std::sync::{Mutex, OnceLock};

use ulid::{Generator, Ulid};

use crate::{ClienteError, ClienteId};

fn generator() -> &'static Mutex<Generator> {
    static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(Generator::new()))
}

/// Generates a fresh cliente id.
///
/// Ids come from one process-wide monotonic generator, so they sort in
/// creation order even when several are made within the same millisecond.
pub fn new_cliente_id() -> ClienteId {
    let mut ids = generator().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match ids.generate() {
        Ok(id) => ClienteId(id),
        // The random part overflowed within one millisecond. Wait for the
        // clock to move on rather than break ordering.
        Err(_) => loop {
            std::thread::yield_now();
            if let Ok(id) = ids.generate() {
                break ClienteId(id);
            }
        },
    }
}

/// Parses a raw path segment into a cliente id.
///
/// Must be checked before every lookup so malformed ids never reach the store.
pub fn parse_identifier(raw: &str) -> Result<ClienteId, ClienteError> {
    Ulid::from_string(raw.trim())
        .map(ClienteId)
        .map_err(|_| ClienteError::InvalidId(raw.to_string()))
}
