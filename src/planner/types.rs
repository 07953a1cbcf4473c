use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use super::{LpPlanner, RatioPlanner, SolverBackend};
use crate::domain::ProductionPlan;
use crate::error::{PlanningError, Result};

/// Outcome reported by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Lp,
    Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOutput {
    pub product: String,
    pub tons: f64,
}

/// What a strategy returns. Values are gated on the status: reading the
/// objective or production of a non-optimal solution is an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub strategy: String,
    pub status: SolveStatus,
    pub message: String,
    objective: Option<f64>,
    production: Vec<ProductOutput>,
}

impl Solution {
    pub fn optimal(
        strategy: &str,
        plan: &ProductionPlan,
        tons: Vec<f64>,
        message: impl Into<String>,
    ) -> Self {
        let production: Vec<ProductOutput> = plan
            .products
            .iter()
            .zip(tons)
            .map(|(p, tons)| ProductOutput {
                product: p.name.clone(),
                tons,
            })
            .collect();
        let objective: f64 = plan
            .products
            .iter()
            .zip(&production)
            .map(|(p, out)| p.revenue_for(out.tons))
            .sum();

        Self {
            strategy: strategy.to_string(),
            status: SolveStatus::Optimal,
            message: message.into(),
            objective: Some(objective),
            production,
        }
    }

    pub fn not_solved(strategy: &str, status: SolveStatus, message: impl Into<String>) -> Self {
        Self {
            strategy: strategy.to_string(),
            status,
            message: message.into(),
            objective: None,
            production: Vec::new(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    fn ensure_optimal(&self) -> Result<()> {
        if self.is_optimal() {
            Ok(())
        } else {
            Err(PlanningError::NotOptimal {
                status: self.status,
                message: self.message.clone(),
            })
        }
    }

    pub fn objective(&self) -> Result<f64> {
        self.ensure_optimal()?;
        self.objective
            .ok_or_else(|| PlanningError::Solver("optimal solution without objective".to_string()))
    }

    pub fn production(&self) -> Result<&[ProductOutput]> {
        self.ensure_optimal()?;
        Ok(&self.production)
    }

    pub fn tons(&self, product: &str) -> Result<f64> {
        self.production()?
            .iter()
            .find(|out| out.product == product)
            .map(|out| out.tons)
            .ok_or_else(|| PlanningError::UnknownProduct(product.to_string()))
    }
}

#[async_trait]
pub trait PlanningStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn plan(&self, plan: &ProductionPlan) -> Result<Solution>;
}

pub struct ProductionPlanner {
    pub strategy: Box<dyn PlanningStrategy>,
}

impl ProductionPlanner {
    pub fn new(strategy: Box<dyn PlanningStrategy>) -> Self {
        Self { strategy }
    }

    pub fn from_kind(kind: StrategyKind) -> Self {
        Self::with_backend(kind, SolverBackend::default())
    }

    /// `backend` only matters for the LP strategy.
    pub fn with_backend(kind: StrategyKind, backend: SolverBackend) -> Self {
        match kind {
            StrategyKind::Lp => Self::new(Box::new(LpPlanner::with_backend(backend))),
            StrategyKind::Ratio => Self::new(Box::new(RatioPlanner)),
        }
    }

    pub async fn solve(&self, plan: &ProductionPlan) -> Result<Solution> {
        plan.validate()?;
        debug!(
            strategy = self.strategy.name(),
            products = plan.products.len(),
            available_hours = plan.available_hours,
            "solving production plan"
        );

        let solution = self.strategy.plan(plan).await?;
        match solution.objective() {
            Ok(objective) => info!(strategy = %solution.strategy, objective, "optimal plan found"),
            Err(_) => warn!(
                strategy = %solution.strategy,
                status = %solution.status,
                message = %solution.message,
                "no optimal plan"
            ),
        }
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_not_solved_gates_values() {
        let solution =
            Solution::not_solved("lp", SolveStatus::Infeasible, "commitments exceed capacity");
        assert!(!solution.is_optimal());
        assert!(matches!(
            solution.objective(),
            Err(PlanningError::NotOptimal { status: SolveStatus::Infeasible, .. })
        ));
        assert!(solution.production().is_err());
        assert!(solution.tons("bands").is_err());
    }

    #[test]
    fn test_optimal_computes_objective() {
        let plan = ProductionPlan::steel_mill();
        let solution = Solution::optimal("test", &plan, vec![6000.0, 1400.0], "ok");
        assert_eq!(solution.objective().unwrap(), 192_000.0);
        assert_eq!(solution.tons("coils").unwrap(), 1400.0);
        assert!(matches!(solution.tons("plates"), Err(PlanningError::UnknownProduct(_))));
    }

    #[test]
    fn test_strategy_kind_parsing() {
        assert_eq!(StrategyKind::from_str("ratio").unwrap(), StrategyKind::Ratio);
        assert_eq!(StrategyKind::Lp.to_string(), "lp");
        assert_eq!(SolveStatus::Unbounded.to_string(), "unbounded");
    }

    #[tokio::test]
    async fn test_planner_rejects_invalid_plan() {
        let planner = ProductionPlanner::from_kind(StrategyKind::Ratio);
        let plan = ProductionPlan::new(vec![], 40.0);
        assert!(matches!(planner.solve(&plan).await, Err(PlanningError::InvalidPlan(_))));
    }
}
