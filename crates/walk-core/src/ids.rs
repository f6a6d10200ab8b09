//! Dense integer handles for network nodes, network edges and green zones.
//!
//! Every id is the position of its element in the owning collection, so the
//! ids double as `Vec` indices (`.index()`).  They are only meaningful
//! together with the network (or zone slice) that issued them.

use std::fmt;

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident, $tag:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Id of the element at position `i`.
            ///
            /// Collections are capped at `u32::MAX` elements; positions past
            /// that are a construction bug.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize, "{} index {i} out of range", $tag);
                $name(i as u32)
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $tag, self.0)
            }
        }
    };
}

dense_id! {
    /// Street-network node.  Stable for the life of a `WalkNetwork`.
    NodeId, "node"
}

dense_id! {
    /// Undirected street-network edge.
    EdgeId, "edge"
}

dense_id! {
    /// Green zone, by position in the zone slice handed to the planner.
    ZoneId, "zone"
}
