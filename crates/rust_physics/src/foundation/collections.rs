//! Specialized collection types

use slotmap::new_key_type;

pub use slotmap::SlotMap;

new_key_type! {
    /// Stable handle to a body owned by a [`Scene`](crate::physics::scene::Scene)
    ///
    /// Handles stay valid while the body is alive and never alias a body that
    /// replaced a pruned one in the same slot.
    pub struct BodyHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<BodyHandle, T>;
