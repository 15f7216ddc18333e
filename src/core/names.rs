//! Namespace-qualified resource names.

use crate::core::constants::NAMESPACE_SEPARATOR;

/// Split a possibly qualified name into `(name, namespace)`.
///
/// `"ns.name"` resolves to `("name", "ns")`; the first `.` splits, so
/// `"ns.a.b"` gives `("a.b", "ns")`. Unqualified names keep
/// `current_namespace`.
pub fn resolve_name<'a>(name: &'a str, current_namespace: &'a str) -> (&'a str, &'a str) {
    match name.split_once(NAMESPACE_SEPARATOR) {
        Some((namespace, local)) => (local, namespace),
        None => (name, current_namespace),
    }
}
