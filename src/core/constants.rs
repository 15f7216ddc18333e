//! Constants used throughout backfill.
//!
//! Centralizes magic strings and configuration values.

/// Settings file name (.backfill.toml).
pub const CONFIG_FILE: &str = ".backfill.toml";

/// Default schema location, relative to the working directory.
pub const SCHEMA_FILE: &str = ".backfill/secret-schema.yaml";

/// Default ExternalSecret manifest location.
pub const SECRETS_FILE: &str = ".backfill/external-secrets.yaml";

/// Default root directory of the filesystem secret store.
pub const STORE_DIR: &str = ".backfill/store";

/// Requirements file looked up in the requirements directory.
pub const REQUIREMENTS_FILE: &str = "jx-requirements.yml";

/// Namespace used when neither the CLI nor the settings name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Separator between namespace and name in qualified secret names.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Separator between username and hash in htpasswd lines.
pub const HTPASSWD_SEPARATOR: char = ':';

/// Schema label holding the property kind.
pub const LABEL_KIND: &str = "kind";

/// Property kind resolved through a yes/no confirmation.
pub const KIND_CONFIRM: &str = "confirm";
