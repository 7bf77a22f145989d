//! Price observation groups collected for one robust price target.
//!
//! Groups are returned in priority order; the selector relies on that order.

use rust_decimal::Decimal;
use serde::Serialize;
use tenderfuse_core::{MasterBid, MasterLot, Price, SourceBid, SourceIndex, SourceLot, SourceRecord};

use crate::config::PriceConfig;

/// Where the observations of a group come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrigin {
    /// A source bid's own price.
    BidPrice,
    /// Tender final price divided by the number of master lots.
    TenderFinalSpread,
    /// A source lot's own estimated price.
    LotEstimated,
    /// Tender estimated price divided by the number of master lots.
    TenderEstimatedSpread,
}

impl std::fmt::Display for GroupOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BidPrice => write!(f, "bid_price"),
            Self::TenderFinalSpread => write!(f, "tender_final_spread"),
            Self::LotEstimated => write!(f, "lot_estimated"),
            Self::TenderEstimatedSpread => write!(f, "tender_estimated_spread"),
        }
    }
}

/// One candidate value. `value` may differ from `origin.net_amount` when the
/// origin is a tender-level price spread across lots.
#[derive(Debug, Clone, Copy)]
pub struct PriceObservation<'a> {
    pub value: Decimal,
    pub origin: &'a Price,
}

#[derive(Debug, Clone)]
pub struct PriceGroup<'a> {
    pub origin: GroupOrigin,
    pub observations: Vec<PriceObservation<'a>>,
}

impl PriceGroup<'_> {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Groups for a lot's robust estimated price: lot estimates, then the tender
/// estimate spread over `lot_count` lots.
pub fn lot_estimated_groups<'a>(
    lot: &MasterLot,
    sources: &SourceIndex<'a>,
    lot_count: usize,
    price: &PriceConfig,
) -> Vec<PriceGroup<'a>> {
    let source_lots = sources.resolve_lots(&lot.source_lot_ids);
    vec![
        lot_estimated(&source_lots),
        tender_spread(
            sources.records(),
            GroupOrigin::TenderEstimatedSpread,
            |r| r.estimated_price.as_ref(),
            lot_count,
            price,
        ),
    ]
}

/// Groups for a winning bid's robust price: bid prices, tender final price
/// spread, owning lot estimates, tender estimate spread.
pub fn bid_price_groups<'a>(
    bid: &MasterBid,
    sources: &SourceIndex<'a>,
    lot_count: usize,
    price: &PriceConfig,
) -> Vec<PriceGroup<'a>> {
    let source_bids = sources.resolve_bids(&bid.source_bid_ids);
    let source_lots = sources.resolve_lots_of_bids(&bid.source_bid_ids);
    vec![
        bid_prices(&source_bids),
        tender_spread(
            sources.records(),
            GroupOrigin::TenderFinalSpread,
            |r| r.final_price.as_ref(),
            lot_count,
            price,
        ),
        lot_estimated(&source_lots),
        tender_spread(
            sources.records(),
            GroupOrigin::TenderEstimatedSpread,
            |r| r.estimated_price.as_ref(),
            lot_count,
            price,
        ),
    ]
}

fn observe(price: Option<&Price>) -> Option<PriceObservation<'_>> {
    let price = price?;
    price.net_amount.map(|value| PriceObservation { value, origin: price })
}

fn lot_estimated<'a>(lots: &[&'a SourceLot]) -> PriceGroup<'a> {
    PriceGroup {
        origin: GroupOrigin::LotEstimated,
        observations: lots
            .iter()
            .filter_map(|lot| observe(lot.estimated_price.as_ref()))
            .collect(),
    }
}

fn bid_prices<'a>(bids: &[&'a SourceBid]) -> PriceGroup<'a> {
    PriceGroup {
        origin: GroupOrigin::BidPrice,
        observations: bids
            .iter()
            .filter_map(|bid| observe(bid.price.as_ref()))
            .collect(),
    }
}

fn tender_spread<'a>(
    records: &'a [SourceRecord],
    origin: GroupOrigin,
    pick: impl Fn(&'a SourceRecord) -> Option<&'a Price>,
    lot_count: usize,
    price: &PriceConfig,
) -> PriceGroup<'a> {
    let lots = Decimal::from(lot_count as u64);
    let observations = records
        .iter()
        .filter_map(|r| observe(pick(r)))
        .filter_map(|obs| {
            price
                .divide(obs.value, lots)
                .map(|value| PriceObservation { value, origin: obs.origin })
        })
        .collect();
    PriceGroup { origin, observations }
}
