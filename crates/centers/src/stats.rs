//! Deterministic placeholder donation figures.
//!
//! Nothing here is real data. Figures are derived from a string key (a user id
//! or a center id) so the same key always shows the same numbers.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Linear transform parameters: `amount = (seed * amount_mul) % amount_mod +
/// amount_offset`, same shape for the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatParams {
    pub amount_mul: u64,
    pub amount_mod: u64,
    pub amount_offset: u64,
    pub count_mul: u64,
    pub count_mod: u64,
    pub count_offset: u64,
}

/// Personal totals: 10,000,000..60,000,000 won over 10..60 donations.
pub const PERSONAL: StatParams = StatParams {
    amount_mul: 12_345,
    amount_mod: 50_000_000,
    amount_offset: 10_000_000,
    count_mul: 67_890,
    count_mod: 50,
    count_offset: 10,
};

/// Per-center figures: total raised in `amount`, the user's share in `count`.
pub const CENTER: StatParams = StatParams {
    amount_mul: 12_345,
    amount_mod: 10_000_000,
    amount_offset: 1_000_000,
    count_mul: 67_890,
    count_mod: 100_000,
    count_offset: 10_000,
};

/// Platform totals shown to anonymous visitors.
pub const GLOBAL_AMOUNT: u64 = 21_378_786_975;
pub const GLOBAL_COUNT: u64 = 567_923;

/// Amount/count pair produced for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PseudoStat {
    pub amount: u64,
    pub count: u64,
}

/// Mock donations for a center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CenterDonations {
    pub total_amount: u64,
    pub my_amount: u64,
}

/// Sum of the first and last UTF-16 code units; 0 for an empty key.
pub fn seed(key: &str) -> u64 {
    let mut units = key.encode_utf16();
    match units.next() {
        None => 0,
        Some(first) => {
            let last = units.last().unwrap_or(first);
            u64::from(first) + u64::from(last)
        }
    }
}

/// Personal figures for `key`.
pub fn seeded_pseudo_stat(key: &str) -> PseudoStat {
    seeded_pseudo_stat_with(key, &PERSONAL)
}

pub fn seeded_pseudo_stat_with(key: &str, params: &StatParams) -> PseudoStat {
    let seed = seed(key);
    PseudoStat {
        amount: (seed * params.amount_mul) % params.amount_mod + params.amount_offset,
        count: (seed * params.count_mul) % params.count_mod + params.count_offset,
    }
}

/// Mock totals for a center id.
pub fn center_mock_donation(center_id: &str) -> CenterDonations {
    let stat = seeded_pseudo_stat_with(center_id, &CENTER);
    CenterDonations {
        total_amount: stat.amount,
        my_amount: stat.count,
    }
}

pub fn global_totals() -> PseudoStat {
    PseudoStat {
        amount: GLOBAL_AMOUNT,
        count: GLOBAL_COUNT,
    }
}

/// Figures for the stats panel: personal when signed in, global otherwise.
pub fn stats_for(user_id: Option<&str>) -> PseudoStat {
    user_id.map_or_else(global_totals, seeded_pseudo_stat)
}

/// `YYYY.MM.DD HH시 기준`
pub fn as_of_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y.%m.%d %H시 기준").to_string()
}
