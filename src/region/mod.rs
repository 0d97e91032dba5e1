//! Region directory helpers: ancestry resolution for an admin's assigned
//! region and the cascading picker state it pre-populates.

pub mod chain;
pub mod resolver;

pub use chain::RegionChain;
pub use resolver::{resolve_chain, resolve_chain_cancellable, RegionLookup};
