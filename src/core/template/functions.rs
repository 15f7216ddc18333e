//! Secret lookup functions for templates.
//!
//! | Function | Result |
//! |---|---|
//! | `secret(name, key)` | value of `key` in secret `name` |
//! | `htpasswdSecret(name, username_key, password_key)` | `user:<bcrypt hash>` |
//! | `auth(name, username_key, password_key)` | `user:password` |
//!
//! `name` may be qualified as `namespace.name`. Missing secrets or keys never
//! fail the template: the function logs a warning and yields an empty string.
//! A call with missing or non-string arguments is a template error.

use std::collections::HashMap;
use std::sync::Arc;

use tera::{Tera, Value};
use tracing::warn;

use crate::core::constants::HTPASSWD_SEPARATOR;
use crate::core::names::resolve_name;
use crate::core::store::SecretReader;
use crate::core::types::Payload;

/// The evaluation a function call belongs to; used for namespace defaults
/// and log context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub namespace: String,
    pub secret: String,
    pub property: String,
}

impl Scope {
    pub fn new(namespace: &str, secret: &str, property: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            secret: secret.to_string(),
            property: property.to_string(),
        }
    }
}

/// Shared library of secret lookup functions.
///
/// Cheap to clone; registers scoped function objects into a `Tera` instance
/// per evaluation.
#[derive(Debug, Clone)]
pub struct FunctionLibrary {
    reader: Arc<SecretReader>,
    hash_cost: u32,
}

impl FunctionLibrary {
    pub fn new(reader: Arc<SecretReader>) -> Self {
        Self {
            reader,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost used by `htpasswdSecret`.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Register `secret`, `htpasswdSecret` and `auth` for one evaluation.
    pub fn register(&self, tera: &mut Tera, scope: &Scope) {
        let (lib, s) = (self.clone(), scope.clone());
        tera.register_function("secret", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let name = string_arg(args, "secret", "name")?;
            let key = string_arg(args, "secret", "key")?;
            Ok(Value::String(lib.secret(&s, &name, &key)))
        });

        let (lib, s) = (self.clone(), scope.clone());
        tera.register_function("htpasswdSecret", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let name = string_arg(args, "htpasswdSecret", "name")?;
            let username_key = string_arg(args, "htpasswdSecret", "username_key")?;
            let password_key = string_arg(args, "htpasswdSecret", "password_key")?;
            Ok(Value::String(lib.htpasswd(
                &s,
                &name,
                &username_key,
                &password_key,
            )))
        });

        let (lib, s) = (self.clone(), scope.clone());
        tera.register_function("auth", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let name = string_arg(args, "auth", "name")?;
            let username_key = string_arg(args, "auth", "username_key")?;
            let password_key = string_arg(args, "auth", "password_key")?;
            Ok(Value::String(lib.auth(&s, &name, &username_key, &password_key)))
        });
    }

    /// Value of `key` in secret `name`, or `""`.
    pub fn secret(&self, scope: &Scope, name: &str, key: &str) -> String {
        match self.lookup(scope, name) {
            Some(data) => entry(&data, key, scope, name),
            None => String::new(),
        }
    }

    /// `username:<bcrypt hash>` from two keys of secret `name`, or `""`.
    pub fn htpasswd(
        &self,
        scope: &Scope,
        name: &str,
        username_key: &str,
        password_key: &str,
    ) -> String {
        let (secret, namespace) = resolve_name(name, &scope.namespace);
        let Some(data) = self.lookup(scope, name) else {
            warn!(secret, namespace, "failed to create htpasswd: no secret");
            return String::new();
        };

        let username = value_of(&data, username_key);
        if username.is_empty() {
            warn!(
                secret,
                namespace,
                key = username_key,
                "failed to create htpasswd: secret has no username entry"
            );
            return String::new();
        }
        if username.contains(HTPASSWD_SEPARATOR) {
            warn!(secret, namespace, username = %username, "invalid htpasswd username");
            return String::new();
        }

        let password = value_of(&data, password_key);
        if password.is_empty() {
            warn!(
                secret,
                namespace,
                key = password_key,
                "failed to create htpasswd: secret has no password entry"
            );
            return String::new();
        }

        match bcrypt::hash(password.as_bytes(), self.hash_cost) {
            Ok(hash) => format!("{}{}{}", username, HTPASSWD_SEPARATOR, hash),
            Err(e) => {
                warn!(secret, namespace, error = %e, "failed to create htpasswd");
                String::new()
            }
        }
    }

    /// `username:password` from two keys of secret `name`, or `""`.
    pub fn auth(&self, scope: &Scope, name: &str, username_key: &str, password_key: &str) -> String {
        match self.lookup(scope, name) {
            Some(data) => format!(
                "{}:{}",
                entry(&data, username_key, scope, name),
                entry(&data, password_key, scope, name)
            ),
            None => String::new(),
        }
    }

    /// Fetch secret `name`, logging and swallowing every failure.
    fn lookup(&self, scope: &Scope, name: &str) -> Option<Payload> {
        let (secret, namespace) = resolve_name(name, &scope.namespace);
        match self.reader.fetch(secret, namespace) {
            Ok(Some(data)) => Some(data),
            Ok(None) => {
                warn!(
                    secret,
                    namespace,
                    for_secret = %scope.secret,
                    property = %scope.property,
                    "secret not found, template value will be empty"
                );
                None
            }
            Err(e) => {
                warn!(
                    secret,
                    namespace,
                    for_secret = %scope.secret,
                    property = %scope.property,
                    error = %e,
                    "failed to read secret, template value will be empty"
                );
                None
            }
        }
    }
}

fn value_of(data: &Payload, key: &str) -> String {
    data.get(key)
        .map(|v| String::from_utf8_lossy(v).into_owned())
        .unwrap_or_default()
}

/// Like `value_of`, but warns when the secret has no `key` entry.
fn entry(data: &Payload, key: &str, scope: &Scope, name: &str) -> String {
    if !data.contains_key(key) {
        let (secret, namespace) = resolve_name(name, &scope.namespace);
        warn!(
            secret,
            namespace,
            key,
            for_secret = %scope.secret,
            property = %scope.property,
            "secret has no such key, template value will be empty"
        );
    }
    value_of(data, key)
}

fn string_arg(args: &HashMap<String, Value>, function: &str, arg: &str) -> tera::Result<String> {
    match args.get(arg) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(tera::Error::msg(format!(
            "function `{}` expects `{}` to be a string, got {}",
            function, arg, other
        ))),
        None => Err(tera::Error::msg(format!(
            "function `{}` requires the `{}` argument",
            function, arg
        ))),
    }
}
