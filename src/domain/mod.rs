pub mod plan;
pub mod product;

pub use plan::*;
pub use product::*;
