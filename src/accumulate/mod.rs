//! Accumulation module
//!
//! Turns paginated JSON into a deduplicated, limited sequence of domain
//! objects, either as a `Vec` (materialized mode) or through a per-item
//! callback (streaming mode).

mod accumulator;
mod types;

pub use accumulator::Accumulator;
pub use types::{
    AccumulateOptions, AccumulateOptionsBuilder, AccumulationState, Factory, Identity,
};

#[cfg(test)]
mod tests;
