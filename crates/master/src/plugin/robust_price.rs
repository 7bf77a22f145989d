use tenderfuse_core::{MasterRecord, SourceIndex};

use super::{MasterContext, MasterPlugin};
use crate::config::PluginKind;
use crate::error::MasterError;
use crate::groups::{bid_price_groups, lot_estimated_groups};
use crate::robust::robust_price;

/// Sets the robust estimated price of every master lot and the robust price
/// of each lot's winning bid. Prices are net of VAT.
pub struct RobustPricePlugin;

impl MasterPlugin for RobustPricePlugin {
    fn kind(&self) -> PluginKind {
        PluginKind::RobustPrice
    }

    fn reconcile(
        &self,
        sources: &SourceIndex<'_>,
        mut record: MasterRecord,
        ctx: &MasterContext<'_>,
    ) -> Result<MasterRecord, MasterError> {
        if record.lots.is_empty() {
            return Err(MasterError::NoLots {
                record_id: record.display_id().to_string(),
            });
        }

        let price = &ctx.config.price;
        let lot_count = record.lots.len();
        let framework_agreement = record.is_framework_agreement();
        let record_id = record.display_id().to_string();

        for (i, lot) in record.lots.iter_mut().enumerate() {
            lot.robust_estimated_price = if lot.source_lot_ids.is_empty() {
                None
            } else {
                let groups = lot_estimated_groups(lot, sources, lot_count, price);
                robust_price(groups, framework_agreement, price)
            };
            if lot.robust_estimated_price.is_none() {
                log::debug!("{record_id} lot #{i}: no robust estimated price");
            }

            let Some(bid) = lot.winning_bid_mut() else {
                continue;
            };
            bid.robust_price = if bid.source_bid_ids.is_empty() {
                None
            } else {
                let groups = bid_price_groups(bid, sources, lot_count, price);
                robust_price(groups, framework_agreement, price)
            };
            if bid.robust_price.is_none() {
                log::debug!("{record_id} lot #{i}: no robust winning bid price");
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MasterConfig;
    use rust_decimal_macros::dec;
    use tenderfuse_core::{
        MasterBid, MasterLot, Price, SourceBid, SourceLot, SourceRecord, StructuredBidRef,
        StructuredLotRef,
    };

    fn sources() -> Vec<SourceRecord> {
        vec![
            SourceRecord {
                id: "a".into(),
                estimated_price: Some(Price::net(dec!(2000))),
                lots: vec![SourceLot {
                    lot_id: "1".into(),
                    estimated_price: Some(Price::net(dec!(1000)).with_vat(dec!(20))),
                    bids: vec![SourceBid {
                        bid_id: "x".into(),
                        price: Some(Price::net(dec!(950))),
                        is_winning: Some(true),
                    }],
                }],
                ..SourceRecord::default()
            },
            SourceRecord {
                id: "b".into(),
                lots: vec![SourceLot {
                    lot_id: "1".into(),
                    estimated_price: Some(Price::net(dec!(1100))),
                    bids: vec![],
                }],
                ..SourceRecord::default()
            },
        ]
    }

    fn run(records: &[SourceRecord], master: MasterRecord) -> Result<MasterRecord, MasterError> {
        let config = MasterConfig::default();
        let ctx = MasterContext { config: &config };
        RobustPricePlugin.reconcile(&SourceIndex::new(records), master, &ctx)
    }

    #[test]
    fn prices_lots_and_winning_bid() {
        let master = MasterRecord {
            lots: vec![MasterLot {
                source_lot_ids: vec![
                    StructuredLotRef::new("a", "1"),
                    StructuredLotRef::new("b", "1"),
                ],
                bids: vec![
                    MasterBid {
                        is_winning: Some(false),
                        source_bid_ids: vec![StructuredBidRef::new("a", "1", "x")],
                        ..MasterBid::default()
                    },
                    MasterBid {
                        is_winning: Some(true),
                        source_bid_ids: vec![StructuredBidRef::new("a", "1", "x")],
                        ..MasterBid::default()
                    },
                ],
                ..MasterLot::default()
            }],
            ..MasterRecord::default()
        };
        let out = run(&sources(), master).unwrap();
        let lot = &out.lots[0];
        // pool 1000, 1100, 2000 -> median 1100, first lot estimate 1000 accepted
        let est = lot.robust_estimated_price.as_ref().unwrap();
        assert_eq!(est.net_amount, Some(dec!(1000)));
        assert_eq!(est.vat, Some(dec!(20)));

        assert!(lot.bids[0].robust_price.is_none());
        let bid = lot.bids[1].robust_price.as_ref().unwrap();
        assert_eq!(bid.net_amount, Some(dec!(950)));
    }

    #[test]
    fn lot_without_refs_left_unset() {
        let master = MasterRecord {
            lots: vec![MasterLot::default()],
            ..MasterRecord::default()
        };
        let out = run(&sources(), master).unwrap();
        assert!(out.lots[0].robust_estimated_price.is_none());
    }

    #[test]
    fn unresolvable_bid_refs_left_unset() {
        let records = vec![SourceRecord {
            id: "z".into(),
            lots: vec![SourceLot {
                lot_id: "1".into(),
                ..SourceLot::default()
            }],
            ..SourceRecord::default()
        }];
        let master = MasterRecord {
            lots: vec![MasterLot {
                source_lot_ids: vec![StructuredLotRef::new("z", "1")],
                bids: vec![MasterBid {
                    is_winning: Some(true),
                    source_bid_ids: vec![StructuredBidRef::new("z", "1", "missing")],
                    ..MasterBid::default()
                }],
                ..MasterLot::default()
            }],
            ..MasterRecord::default()
        };
        let out = run(&records, master).unwrap();
        assert!(out.lots[0].robust_estimated_price.is_none());
        assert!(out.lots[0].bids[0].robust_price.is_none());
    }

    #[test]
    fn record_without_lots_rejected() {
        let master = MasterRecord {
            id: Some("m1".into()),
            ..MasterRecord::default()
        };
        let err = run(&sources(), master).unwrap_err();
        assert_eq!(err, MasterError::NoLots { record_id: "m1".into() });
    }
}
