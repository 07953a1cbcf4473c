//! Steel production planning.
//!
//! Decides how many tons of each product to roll in a week so that revenue is
//! maximised within market demand and available mill hours. The LP itself is
//! handed to an external solver through `good_lp`.

pub mod config;
pub mod domain;
pub mod error;
pub mod planner;
pub mod report;
pub mod sensitivity;
pub mod telemetry;

pub use domain::{Product, ProductionPlan};
pub use error::{PlanningError, Result};
pub use planner::{ProductionPlanner, Solution, SolveStatus, StrategyKind};
pub use report::PlanReport;
