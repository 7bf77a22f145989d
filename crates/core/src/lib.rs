//! `tenderfuse-core` — matched and master procurement records.
//!
//! Plain data types plus the structured-reference resolver that joins master
//! lots/bids back to the source sub-entities they summarize.

pub mod model;
pub mod resolver;

pub use model::{
    MasterBid, MasterLot, MasterRecord, Price, SourceBid, SourceLot, SourceRecord,
    StructuredBidRef, StructuredLotRef,
};
pub use resolver::SourceIndex;
