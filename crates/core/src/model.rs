use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

/// A monetary amount as reported by a source or chosen by the master engine.
///
/// `net_amount` and `vat` are exact decimals. `reliability` is only set on
/// robust prices produced by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,
}

impl Price {
    /// Price with only a net amount.
    pub fn net(amount: Decimal) -> Self {
        Self {
            net_amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn with_vat(mut self, vat: Decimal) -> Self {
        self.vat = Some(vat);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Matched (source) records
// ---------------------------------------------------------------------------

/// One source system's report of a tender. Immutable once ingested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_price: Option<Price>,
    #[serde(default)]
    pub lots: Vec<SourceLot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_framework_agreement: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceLot {
    pub lot_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Price>,
    #[serde(default)]
    pub bids: Vec<SourceBid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceBid {
    pub bid_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_winning: Option<bool>,
}

// ---------------------------------------------------------------------------
// Structured references
// ---------------------------------------------------------------------------

/// Lookup key of a source lot: (source record id, lot id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredLotRef {
    pub record_id: String,
    pub lot_id: String,
}

impl StructuredLotRef {
    pub fn new(record_id: impl Into<String>, lot_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            lot_id: lot_id.into(),
        }
    }
}

/// Lookup key of a source bid: (source record id, lot id, bid id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredBidRef {
    pub record_id: String,
    pub lot_id: String,
    pub bid_id: String,
}

impl StructuredBidRef {
    pub fn new(
        record_id: impl Into<String>,
        lot_id: impl Into<String>,
        bid_id: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            lot_id: lot_id.into(),
            bid_id: bid_id.into(),
        }
    }

    /// Reference to the lot owning this bid.
    pub fn lot_ref(&self) -> StructuredLotRef {
        StructuredLotRef::new(self.record_id.clone(), self.lot_id.clone())
    }
}

// ---------------------------------------------------------------------------
// Master (canonical) records
// ---------------------------------------------------------------------------

/// The fused record being built by the master pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_framework_agreement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_price: Option<Price>,
    #[serde(default)]
    pub lots: Vec<MasterLot>,
}

impl MasterRecord {
    /// Identifier used in logs and batch outcomes.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("<unnamed>")
    }

    pub fn is_framework_agreement(&self) -> bool {
        self.is_framework_agreement == Some(true)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterLot {
    #[serde(default)]
    pub source_lot_ids: Vec<StructuredLotRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robust_estimated_price: Option<Price>,
    #[serde(default)]
    pub bids: Vec<MasterBid>,
}

impl MasterLot {
    /// The first bid flagged as winning, if any.
    pub fn winning_bid_mut(&mut self) -> Option<&mut MasterBid> {
        self.bids.iter_mut().find(|b| b.is_winning == Some(true))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterBid {
    #[serde(default)]
    pub source_bid_ids: Vec<StructuredBidRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_winning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robust_price: Option<Price>,
}
