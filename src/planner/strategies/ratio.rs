use std::cmp::Reverse;

use async_trait::async_trait;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::domain::ProductionPlan;
use crate::error::Result;
use crate::planner::{PlanningStrategy, Solution, SolveStatus};

/// Closed-form planner for a single capacity row.
///
/// Commitments are rolled first. The remaining hours then go to products in
/// descending order of revenue per mill hour, each filled up to its demand.
/// With one capacity constraint this greedy fill is the LP optimum, so it
/// doubles as a solver-free cross-check.
pub struct RatioPlanner;

/// Slack allowed when comparing committed hours to the week.
const HOURS_EPSILON: f64 = 1e-9;

impl RatioPlanner {
    fn fill(plan: &ProductionPlan) -> Solution {
        let committed = plan.committed_hours();
        if committed > plan.available_hours + HOURS_EPSILON {
            return Solution::not_solved(
                "ratio",
                SolveStatus::Infeasible,
                format!(
                    "committed output needs {:.2} h, only {:.2} h available",
                    committed, plan.available_hours
                ),
            );
        }

        let mut tons: Vec<f64> = plan.products.iter().map(|p| p.commitment).collect();
        let mut remaining = (plan.available_hours - committed).max(0.0);

        let mut order: Vec<usize> = (0..plan.products.len()).collect();
        order.sort_by_key(|&i| Reverse(OrderedFloat(plan.products[i].profit_per_hour())));

        for i in order {
            if remaining <= 0.0 {
                break;
            }
            let product = &plan.products[i];
            let headroom = product.demand - tons[i];
            let extra = headroom.min(remaining * product.rate);
            tons[i] += extra;
            remaining -= product.hours_for(extra);
            debug!(
                product = %product.name,
                tons = tons[i],
                remaining_hours = remaining,
                "filled product"
            );
        }

        Solution::optimal("ratio", plan, tons, "closed-form optimum")
    }
}

#[async_trait]
impl PlanningStrategy for RatioPlanner {
    fn name(&self) -> &'static str {
        "ratio"
    }

    async fn plan(&self, plan: &ProductionPlan) -> Result<Solution> {
        Ok(Self::fill(plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[tokio::test]
    async fn test_steel_mill_closed_form() {
        let solution = RatioPlanner.plan(&ProductionPlan::steel_mill()).await.unwrap();

        assert_eq!(solution.tons("bands").unwrap(), 6000.0);
        assert!((solution.tons("coils").unwrap() - 1400.0).abs() < 1e-9);
        assert!((solution.objective().unwrap() - 192_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_zero_hours_produces_nothing() {
        let plan = ProductionPlan::steel_mill().with_available_hours(0.0);
        let solution = RatioPlanner.plan(&plan).await.unwrap();

        assert_eq!(solution.tons("bands").unwrap(), 0.0);
        assert_eq!(solution.tons("coils").unwrap(), 0.0);
        assert_eq!(solution.objective().unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_overcommitted_is_infeasible() {
        let bands = Product::new("bands", 25.0, 200.0, 6000.0).with_commitment(6000.0);
        let plan = ProductionPlan::new(vec![bands], 10.0);
        let solution = RatioPlanner.plan(&plan).await.unwrap();
        assert_eq!(solution.status, SolveStatus::Infeasible);
    }

    #[tokio::test]
    async fn test_ample_hours_meets_all_demand() {
        let plan = ProductionPlan::steel_mill().with_available_hours(1000.0);
        let solution = RatioPlanner.plan(&plan).await.unwrap();

        assert_eq!(solution.tons("bands").unwrap(), 6000.0);
        assert_eq!(solution.tons("coils").unwrap(), 4000.0);
    }
}
