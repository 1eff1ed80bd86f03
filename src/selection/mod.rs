//! Selection state: regions, range merging, the selection store, and the
//! observer lists used to publish changes.

/// Range consolidation (overlap/adjacency merging per chain).
pub mod merge;
/// Change-listener lists and subscription tokens.
pub mod observer;
/// Region and residue-range value types.
pub mod region;
/// The authoritative selection store.
pub mod store;

pub use merge::{merge_positions, merge_ranges};
pub use observer::{Listener, Listeners, SubscriptionToken};
pub use region::{Region, ResidueRange};
pub use store::{
    Constraints, RejectReason, Selection, SelectionMode, SelectionStore,
};
