//! Passive income.
//!
//! Earnings are never ticked by the server. They are computed lazily from the
//! time since the user's last accrual whenever their state is touched.

use chrono::Utc;

use music_clicker_model::{User, user::Equipped};

/// The current time, in milliseconds since the epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// The passive income of a loadout, in money per second.
///
/// Each equipped item contributes a tenth of its rarity.
pub fn earnings_rate(equipped: &Equipped) -> f64 {
    equipped
        .rarities()
        .map(|rarity| f64::from(rarity) / 10.0)
        .sum()
}

/// Credits a user with everything they earned since their last accrual.
///
/// Only whole seconds are credited. If less than a second has passed (or the
/// clock went backwards) nothing changes, including `last_update`, so the
/// fractional second is picked up by the next call. Otherwise `last_update`
/// moves to `now_ms` and any sub-second remainder is dropped.
///
/// Returns the amount credited.
pub fn apply_earnings(user: &mut User, now_ms: i64) -> f64 {
    let elapsed = (now_ms - user.last_update).div_euclid(1000);

    if elapsed <= 0 {
        return 0.0;
    }

    let earned = earnings_rate(&user.equipped) * elapsed as f64;

    user.money += earned;
    user.last_update = now_ms;

    earned
}
