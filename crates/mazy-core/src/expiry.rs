//! Subscription-expiry arithmetic.

use chrono::{DateTime, Duration, Utc};

/// Compute a new subscription expiry after extending by `days`.
///
/// The baseline is the current expiry only while it is still in the future;
/// a past or absent expiry baselines at `now`, so expired subscriptions do
/// not compound.
#[must_use]
pub fn extend_expiry(
    current: Option<DateTime<Utc>>,
    days: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let baseline = match current {
        Some(expiry) if expiry > now => expiry,
        _ => now,
    };
    baseline + Duration::days(days)
}
