//! Domain types.

mod entry;
mod external_secret;
mod properties;

pub use entry::{EntryError, SecretError};
pub use external_secret::{BackendKind, DataEntry, ExternalSecret};
pub use properties::{KeyProperties, PropertyValue};
