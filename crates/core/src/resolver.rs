use std::collections::{HashMap, HashSet};

use crate::model::{SourceBid, SourceLot, SourceRecord, StructuredBidRef, StructuredLotRef};

/// Id-addressable view over the source records of one entity group.
///
/// Structured references are resolved against this index on demand; no
/// pointers between master and source sub-entities are ever stored.
pub struct SourceIndex<'a> {
    records: &'a [SourceRecord],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> SourceIndex<'a> {
    pub fn new(records: &'a [SourceRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_id.contains_key(record.id.as_str()) {
                log::warn!("duplicate source record id '{}', keeping first occurrence", record.id);
                continue;
            }
            by_id.insert(record.id.as_str(), idx);
        }
        Self { records, by_id }
    }

    /// All source records, in input order.
    pub fn records(&self) -> &'a [SourceRecord] {
        self.records
    }

    pub fn record(&self, record_id: &str) -> Option<&'a SourceRecord> {
        self.by_id.get(record_id).map(|&idx| &self.records[idx])
    }

    pub fn lot(&self, record_id: &str, lot_id: &str) -> Option<&'a SourceLot> {
        self.record(record_id)?.lots.iter().find(|l| l.lot_id == lot_id)
    }

    pub fn bid(&self, r: &StructuredBidRef) -> Option<&'a SourceBid> {
        self.lot(&r.record_id, &r.lot_id)?
            .bids
            .iter()
            .find(|b| b.bid_id == r.bid_id)
    }

    /// Source lots referenced by `refs`, in reference order. Unknown refs are dropped.
    pub fn resolve_lots(&self, refs: &[StructuredLotRef]) -> Vec<&'a SourceLot> {
        refs.iter()
            .filter_map(|r| {
                let lot = self.lot(&r.record_id, &r.lot_id);
                if lot.is_none() {
                    log::debug!("lot ref {}/{} not found in group", r.record_id, r.lot_id);
                }
                lot
            })
            .collect()
    }

    /// Source bids referenced by `refs`, in reference order. Unknown refs are dropped.
    pub fn resolve_bids(&self, refs: &[StructuredBidRef]) -> Vec<&'a SourceBid> {
        refs.iter()
            .filter_map(|r| {
                let bid = self.bid(r);
                if bid.is_none() {
                    log::debug!(
                        "bid ref {}/{}/{} not found in group",
                        r.record_id,
                        r.lot_id,
                        r.bid_id
                    );
                }
                bid
            })
            .collect()
    }

    /// Lots owning the bids referenced by `refs`. Each lot appears once, at
    /// the position of its first referencing bid. The bid itself need not exist.
    pub fn resolve_lots_of_bids(&self, refs: &[StructuredBidRef]) -> Vec<&'a SourceLot> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut lots = Vec::new();
        for r in refs {
            if !seen.insert((r.record_id.as_str(), r.lot_id.as_str())) {
                continue;
            }
            if let Some(lot) = self.lot(&r.record_id, &r.lot_id) {
                lots.push(lot);
            }
        }
        lots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Price;
    use rust_decimal_macros::dec;

    fn lot(id: &str, estimated: i64, bids: Vec<SourceBid>) -> SourceLot {
        SourceLot {
            lot_id: id.into(),
            estimated_price: Some(Price::net(estimated.into())),
            bids,
        }
    }

    fn bid(id: &str, price: i64) -> SourceBid {
        SourceBid {
            bid_id: id.into(),
            price: Some(Price::net(price.into())),
            is_winning: Some(true),
        }
    }

    fn records() -> Vec<SourceRecord> {
        vec![
            SourceRecord {
                id: "t1".into(),
                lots: vec![lot("l1", 600, vec![]), lot("l2", 900, vec![])],
                ..SourceRecord::default()
            },
            SourceRecord {
                id: "t2".into(),
                lots: vec![lot("l1", 700, vec![bid("b1", 650), bid("b2", 660)])],
                ..SourceRecord::default()
            },
        ]
    }

    #[test]
    fn resolves_lots_in_ref_order() {
        let recs = records();
        let index = SourceIndex::new(&recs);
        let lots = index.resolve_lots(&[
            StructuredLotRef::new("t2", "l1"),
            StructuredLotRef::new("t1", "l1"),
        ]);
        let prices: Vec<_> = lots
            .iter()
            .map(|l| l.estimated_price.as_ref().unwrap().net_amount.unwrap())
            .collect();
        assert_eq!(prices, vec![dec!(700), dec!(600)]);
    }

    #[test]
    fn unknown_refs_are_dropped() {
        let recs = records();
        let index = SourceIndex::new(&recs);
        let lots = index.resolve_lots(&[
            StructuredLotRef::new("t9", "l1"),
            StructuredLotRef::new("t1", "l9"),
            StructuredLotRef::new("t1", "l2"),
        ]);
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].lot_id, "l2");

        let bids = index.resolve_bids(&[StructuredBidRef::new("t2", "l1", "nope")]);
        assert!(bids.is_empty());
    }

    #[test]
    fn resolves_bids_and_their_lots_once() {
        let recs = records();
        let index = SourceIndex::new(&recs);
        let refs = [
            StructuredBidRef::new("t2", "l1", "b2"),
            StructuredBidRef::new("t2", "l1", "b1"),
        ];
        let bids = index.resolve_bids(&refs);
        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].bid_id, "b2");
        assert_eq!(bids[1].bid_id, "b1");

        let lots = index.resolve_lots_of_bids(&refs);
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].lot_id, "l1");
    }

    #[test]
    fn duplicate_record_ids_keep_first() {
        let mut recs = records();
        recs.push(SourceRecord {
            id: "t1".into(),
            lots: vec![lot("l1", 1, vec![])],
            ..SourceRecord::default()
        });
        let index = SourceIndex::new(&recs);
        let l = index.lot("t1", "l1").unwrap();
        assert_eq!(l.estimated_price.as_ref().unwrap().net_amount, Some(dec!(600)));
        assert_eq!(index.records().len(), 3);
    }
}
