//! # Identifier & Secret Generation
//!
//! Random strings of an exact length drawn from a fixed alphabet. Used for
//! organisation keys and secrets, application ids and purpose ids.
//!
//! Uniqueness is only as strong as the collision probability of the random
//! source. Nothing here consults the store.

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

/// Letters, digits, `-` and `_`.
const URL_SAFE: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

const HEX: &[u8] = b"0123456789abcdef";

/// Length of a generated organisation key.
pub const ORG_KEY_LEN: usize = 32;
/// Length of a generated organisation secret.
pub const ORG_SECRET_LEN: usize = 48;
/// Length of a generated application id.
pub const APP_ID_LEN: usize = 16;
/// Length of a generated purpose id.
pub const PURPOSE_ID_LEN: usize = 16;

/// `len` characters from `[A-Za-z0-9]`.
pub fn alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `len` characters from `[A-Za-z0-9_-]`.
pub fn url_safe_token(len: usize) -> String {
    from_charset(URL_SAFE, len)
}

/// `len` lowercase hex characters.
pub fn hex(len: usize) -> String {
    from_charset(HEX, len)
}

/// `len` hex characters taken from v4 UUIDs with the hyphens removed.
///
/// Lengths above 32 concatenate further UUIDs.
pub fn uuid_derived(len: usize) -> String {
    let mut out = String::with_capacity(len + 32);
    while out.len() < len {
        out.push_str(&Uuid::new_v4().simple().to_string());
    }
    out.truncate(len);
    out
}

fn from_charset(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(charset[rng.gen_range(0..charset.len())]))
        .collect()
}
