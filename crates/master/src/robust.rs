//! Robust price selection over prioritized observation groups.
//!
//! The pooled median anchors outlier detection: an observation P is accepted
//! when `min(P/ME, ME/P)` is strictly above the configured threshold. Groups
//! are scanned in priority order (reversed for framework agreements) and the
//! first accepted observation becomes the robust price.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tenderfuse_core::Price;

use crate::config::{InGroupOrder, PriceConfig};
use crate::groups::{GroupOrigin, PriceGroup, PriceObservation};
use crate::stats::{median_index, mode};

/// The observation chosen by [`select`], with the context it was chosen in.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub chosen: PriceObservation<'a>,
    /// Group the observation was taken from. `None` when the median was zero
    /// and returned directly.
    pub group: Option<GroupOrigin>,
    pub median: Decimal,
}

/// Robust price of the given groups, or `None` when no price can be determined.
/// A price is only produced whole: if its reliability cannot be computed the
/// target stays unset.
pub fn robust_price(
    groups: Vec<PriceGroup<'_>>,
    framework_agreement: bool,
    config: &PriceConfig,
) -> Option<Price> {
    let pool = pool_sorted(&groups);
    let selection = select(groups, &pool, framework_agreement, config)?;
    log::debug!(
        "robust price {} from {} (median {}, pool {})",
        selection.chosen.value,
        selection.group.map_or_else(|| "median".to_string(), |g| g.to_string()),
        selection.median,
        pool.len()
    );

    let Some(score) = reliability(&pool, selection.chosen.value, config) else {
        log::warn!(
            "robust price {} dropped: reliability out of decimal range (pool {})",
            selection.chosen.value,
            pool.len()
        );
        return None;
    };

    Some(Price {
        net_amount: Some(selection.chosen.value),
        currency: selection.chosen.origin.currency.clone(),
        vat: vat_mode(&pool),
        reliability: Some(score),
    })
}

/// All observations of all groups, stably sorted by value. Equal values keep
/// group order, then collection order within the group.
pub fn pool_sorted<'a>(groups: &[PriceGroup<'a>]) -> Vec<PriceObservation<'a>> {
    let mut pool = Vec::with_capacity(groups.iter().map(PriceGroup::len).sum());
    for group in groups {
        pool.extend(group.observations.iter().copied());
    }
    pool.sort_by(|a, b| a.value.cmp(&b.value));
    pool
}

/// Pick the robust observation. `pool` must be [`pool_sorted`] of `groups`.
pub fn select<'a>(
    mut groups: Vec<PriceGroup<'a>>,
    pool: &[PriceObservation<'a>],
    framework_agreement: bool,
    config: &PriceConfig,
) -> Option<Selection<'a>> {
    if pool.is_empty() {
        return None;
    }
    let median = pool[median_index(pool.len())];

    if median.value.is_zero() {
        return Some(Selection {
            chosen: median,
            group: None,
            median: median.value,
        });
    }

    if framework_agreement {
        groups.reverse();
    }

    for group in groups.iter().filter(|g| !g.is_empty()) {
        for obs in scan_order(group, median.value, config) {
            if obs.value.is_zero() {
                continue;
            }
            let accepted = closeness(obs.value, median.value, config)
                .is_some_and(|score| score > config.outlier_threshold);
            if accepted {
                return Some(Selection {
                    chosen: obs,
                    group: Some(group.origin),
                    median: median.value,
                });
            }
        }
    }

    None
}

/// `min(value/median, median/value)`; 1 means equal to the median.
/// `None` when either side is zero.
pub fn closeness(value: Decimal, median: Decimal, config: &PriceConfig) -> Option<Decimal> {
    let up = config.divide(value, median)?;
    let down = config.divide(median, value)?;
    Some(up.min(down))
}

fn scan_order<'a>(
    group: &PriceGroup<'a>,
    median: Decimal,
    config: &PriceConfig,
) -> Vec<PriceObservation<'a>> {
    match config.in_group_order {
        InGroupOrder::Construction => group.observations.clone(),
        InGroupOrder::Closeness => {
            let mut scored: Vec<(Decimal, PriceObservation<'a>)> = group
                .observations
                .iter()
                .map(|obs| {
                    let score = closeness(obs.value, median, config).unwrap_or(Decimal::ZERO);
                    (score, *obs)
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            scored.into_iter().map(|(_, obs)| obs).collect()
        }
    }
}

/// Most frequent VAT among the pooled origins, in pool order. Missing VATs are skipped.
pub fn vat_mode(pool: &[PriceObservation<'_>]) -> Option<Decimal> {
    mode(pool.iter().filter_map(|obs| obs.origin.vat))
}

/// Confidence in the chosen value `p` relative to the pool mean `m`:
///
/// - `(N - 0.5) * min(p/m, m/p) / N` normally,
/// - `(N - 0.5 - nonzero) / N` when `p` or `m` is zero.
pub fn reliability(
    pool: &[PriceObservation<'_>],
    p: Decimal,
    config: &PriceConfig,
) -> Option<f64> {
    let n = Decimal::from(pool.len() as u64);
    let sum = pool
        .iter()
        .try_fold(Decimal::ZERO, |acc, obs| acc.checked_add(obs.value))?;
    let m = config.divide(sum, n)?;
    let half = Decimal::new(5, 1);

    let value = if p.is_zero() || m.is_zero() {
        let non_zero = pool.iter().filter(|obs| !obs.value.is_zero()).count();
        config.divide(n - half - Decimal::from(non_zero as u64), n)?
    } else {
        let ratio = closeness(p, m, config)?;
        config.divide((n - half).checked_mul(ratio)?, n)?
    };
    value.to_f64()
}
