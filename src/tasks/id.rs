//! Task ID generation.
//!
//! Task IDs are the slugified title followed by 8 random hex characters, e.g.
//! `write-release-notes-3fa91c07`. Titles with no ASCII alphanumerics fall back
//! to `task-<hex>`. Uniqueness against the live collection is enforced by the
//! store, which re-mints on collision.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum slug length kept in an ID.
const MAX_SLUG_LEN: usize = 40;

/// Mixed into every suffix so IDs minted within the same clock tick differ.
static MINT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Convert a title to a slug.
///
/// Lowercases ASCII alphanumerics, turns every other run of characters into a
/// single hyphen, trims hyphens at both ends and truncates to 40 characters.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len().min(MAX_SLUG_LEN + 1));
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Generate an 8-character hex suffix.
#[allow(clippy::cast_possible_truncation)]
fn random_suffix() -> String {
    let mut hasher = RandomState::new().build_hasher();
    // Truncation is fine, only entropy matters here
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    );
    hasher.write_u64(MINT_COUNTER.fetch_add(1, Ordering::Relaxed));
    format!("{:08x}", hasher.finish() & 0xFFFF_FFFF)
}

/// Generate a task ID from a title.
#[must_use]
pub fn generate_task_id(title: &str) -> String {
    let slug = slugify(title);
    let suffix = random_suffix();

    if slug.is_empty() {
        format!("task-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}
