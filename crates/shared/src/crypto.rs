//! Random code and token generation for teams and invites.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{Rng, RngCore};

/// Length of a human-readable team code.
pub const TEAM_CODE_LEN: usize = 8;

/// Number of random bytes in an invite token before encoding.
const INVITE_TOKEN_BYTES: usize = 32;

/// Generates a short, human-readable team code (uppercase alphanumeric).
///
/// Team codes are typed by users joining a team, so ambiguity-prone
/// characters are excluded.
pub fn generate_team_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    (0..TEAM_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generates a URL-safe invite token for shareable invite links.
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; INVITE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
