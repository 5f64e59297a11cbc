//! Synthetic facility-id derivation.
//!
//! Submissions without an explicit id get a stable synthetic one: a role
//! prefix plus a slug of the facility name. The same name always derives
//! the same id, so repeated submissions line up across engine runs. When
//! the name yields no usable slug (empty, all punctuation), a
//! deterministic UUIDv5 over the raw name takes its place.

use uuid::Uuid;

use crate::config::PortalConfig;

const SLUG_MAX_LEN: usize = 10;

/// Derives `PREFIX_SLUG` from a facility name, falling back to
/// `PREFIX_<uuidv5>` when no slug survives sanitization.
pub(crate) fn derive_facility_id(name: &str, role_prefix: &str, cfg: &PortalConfig) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        let material = format!("{role_prefix}\u{0}{name}");
        let fallback = Uuid::new_v5(&cfg.id_namespace, material.as_bytes());
        format!("{role_prefix}_{fallback}")
    } else {
        format!("{role_prefix}_{slug}")
    }
}

/// Uppercases and collapses non-alphanumeric runs to single underscores,
/// truncated to a short fixed length.
fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_separator = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c.to_ascii_uppercase());
        } else {
            pending_separator = true;
        }
        if slug.len() >= SLUG_MAX_LEN {
            break;
        }
    }
    slug.truncate(SLUG_MAX_LEN);
    slug
}
