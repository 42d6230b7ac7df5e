//! Temporal decay × tier weight × confidence multiplier scoring
//! (§4.3 step 5). Grounded structurally on `cortex-decay::formula`, which
//! composes its own temporal/usage factors the same multiplicative way.

use chrono::NaiveDate;

use memex_core::constants::confidence_multiplier;
use memex_core::{constants::tier_weight, Entry};

/// `decay = 0.5 ^ (age_days / half_life)`.
pub fn decay(age_days: i64, half_life_days: f64) -> f64 {
    0.5_f64.powf(age_days as f64 / half_life_days)
}

/// `score = rrf * decay * tier_weight * confidence` (§4.3 step 5).
pub fn score_entry(entry: &Entry, rrf: f64, today: NaiveDate, half_life_days: f64) -> f64 {
    let age_days = entry.age_days(today);
    rrf * decay(age_days, half_life_days)
        * tier_weight(entry.tier)
        * confidence_multiplier(entry.access_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_age_has_no_decay() {
        assert!((decay(0, 30.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn decay_halves_at_half_life() {
        assert!((decay(30, 30.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn older_entries_score_lower_all_else_equal() {
        use memex_core::{EntryType, Tier};
        let today = NaiveDate::from_ymd_opt(2026, 7, 30).unwrap();
        let mut old = Entry::new(
            "a".into(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "10:00".into(),
            EntryType::Insight,
            vec![],
            "x".into(),
            Some(Tier::Working),
        );
        let mut recent = old.clone();
        recent.date = today;
        old.access_count = 2;
        recent.access_count = 2;

        let s_old = score_entry(&old, 1.0, today, 30.0);
        let s_recent = score_entry(&recent, 1.0, today, 30.0);
        assert!(s_recent > s_old);
    }
}
