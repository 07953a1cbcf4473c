//! Planning Strategies
//!
//! - LP: builds the product-mix model with good_lp and hands it to the solver
//! - Ratio: closed-form fill by profit per mill hour, no solver needed

pub mod lp;
pub mod ratio;

pub use lp::*;
pub use ratio::*;
