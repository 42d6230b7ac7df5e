//! Monotonic time source, id minting, and session-id caching (§4.8).

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::RngCore;
use std::sync::OnceLock;

static SESSION_ID: OnceLock<String> = OnceLock::new();

/// Thin wrapper so tests can inject a fixed instant without threading a
/// trait object through every call site; production code just constructs
/// `Clock::system()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock;

impl Clock {
    pub fn system() -> Self {
        Clock
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    pub fn today_local_ymd(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn time_hhmm(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }

    /// `mint_id` (§4.8): >=48 bits of entropy, base36, length 6-10.
    pub fn mint_id(&self) -> String {
        mint_id()
    }

    /// Session id is cached process-local; seeded from `MEMEX_SESSION_ID` if
    /// present, else from a CSPRNG (§4.8).
    pub fn session_id(&self) -> &'static str {
        SESSION_ID.get_or_init(|| {
            std::env::var("MEMEX_SESSION_ID").unwrap_or_else(|_| mint_id())
        })
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 72 bits of entropy encoded as base36 (§3.1 "mint from 72 bits of entropy,
/// base36"), which comfortably exceeds the 48-bit floor stated in §4.8.
pub fn mint_id() -> String {
    let mut bytes = [0u8; 9]; // 72 bits
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut value: u128 = 0;
    for b in bytes {
        value = (value << 8) | b as u128;
    }
    let mut out = Vec::with_capacity(14);
    if value == 0 {
        out.push(BASE36[0]);
    }
    while value > 0 {
        let digit = (value % 36) as usize;
        out.push(BASE36[digit]);
        value /= 36;
    }
    out.reverse();
    let mut s = String::from_utf8(out).expect("base36 alphabet is ascii");
    while s.len() < crate::constants::ID_MIN_LEN {
        s.insert(0, '0');
    }
    s.truncate(crate::constants::ID_MAX_LEN);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_id_is_within_length_bounds() {
        for _ in 0..100 {
            let id = mint_id();
            assert!(id.len() >= crate::constants::ID_MIN_LEN);
            assert!(id.len() <= crate::constants::ID_MAX_LEN);
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn mint_id_is_not_trivially_repeated() {
        let a = mint_id();
        let b = mint_id();
        assert_ne!(a, b);
    }
}
