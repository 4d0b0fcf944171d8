pub(crate) mod env;
pub mod rng;

pub use rng::{PivotRng, SeedSource};
