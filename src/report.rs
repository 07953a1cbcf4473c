//! Result reporting
//!
//! Turns a [`Solution`] back into plan terms (hours, revenue, demand share)
//! and renders it as a text table or JSON.

use std::fmt;

use serde::Serialize;

use crate::domain::ProductionPlan;
use crate::error::{PlanningError, Result};
use crate::planner::{Solution, SolveStatus};

#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub product: String,
    pub tons: f64,
    pub hours: f64,
    pub revenue: f64,
    pub commitment: f64,
    pub demand: f64,
    /// Fraction of market demand met; 1.0 when demand is zero
    pub demand_share: f64,
}

fn demand_share(tons: f64, demand: f64) -> f64 {
    if demand > 0.0 {
        tons / demand
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub strategy: String,
    pub status: SolveStatus,
    pub message: String,
    pub objective: Option<f64>,
    pub hours_available: f64,
    pub hours_used: Option<f64>,
    pub slack_hours: Option<f64>,
    pub rows: Vec<ProductRow>,
}

impl PlanReport {
    pub fn from_solution(plan: &ProductionPlan, solution: &Solution) -> Self {
        let rows: Vec<ProductRow> = match solution.production() {
            Ok(production) => plan
                .products
                .iter()
                .zip(production)
                .map(|(p, out)| ProductRow {
                    product: p.name.clone(),
                    tons: out.tons,
                    hours: p.hours_for(out.tons),
                    revenue: p.revenue_for(out.tons),
                    commitment: p.commitment,
                    demand: p.demand,
                    demand_share: demand_share(out.tons, p.demand),
                })
                .collect(),
            Err(_) => Vec::new(),
        };

        let hours_used = solution
            .is_optimal()
            .then(|| rows.iter().map(|r| r.hours).sum::<f64>());

        Self {
            strategy: solution.strategy.clone(),
            status: solution.status,
            message: solution.message.clone(),
            objective: solution.objective().ok(),
            hours_available: plan.available_hours,
            hours_used,
            slack_hours: hours_used.map(|used| plan.available_hours - used),
            rows,
        }
    }

    pub fn row(&self, product: &str) -> Option<&ProductRow> {
        self.rows.iter().find(|r| r.product == product)
    }

    /// Re-checks the reported values against the bounds and the capacity row.
    /// Non-finite values never pass.
    pub fn verify(&self, tolerance: f64) -> Result<()> {
        if self.status != SolveStatus::Optimal {
            return Err(PlanningError::NotOptimal {
                status: self.status,
                message: self.message.clone(),
            });
        }

        match self.objective {
            Some(objective) if objective.is_finite() => {}
            other => {
                return Err(PlanningError::Solver(format!(
                    "objective is not a finite number: {other:?}"
                )));
            }
        }

        for row in &self.rows {
            let within = row.tons.is_finite()
                && row.tons >= row.commitment - tolerance
                && row.tons <= row.demand + tolerance;
            if !within {
                return Err(PlanningError::Solver(format!(
                    "{}: {} tons outside [{}, {}]",
                    row.product, row.tons, row.commitment, row.demand
                )));
            }
        }

        let used = self.hours_used.unwrap_or(f64::NAN);
        if !used.is_finite() || used > self.hours_available + tolerance {
            return Err(PlanningError::Solver(format!(
                "plan uses {used} h but only {} h are available",
                self.hours_available
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy: {}", self.strategy)?;
        writeln!(f, "Status:   {} ({})", self.status, self.message)?;

        let Some(objective) = self.objective else {
            return Ok(());
        };

        writeln!(f, "Revenue:  {objective:.2}")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>12} {:>10} {:>14} {:>8}",
            "product", "tons", "hours", "revenue", "demand"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:>12.2} {:>10.2} {:>14.2} {:>7.1}%",
                row.product,
                row.tons,
                row.hours,
                row.revenue,
                row.demand_share * 100.0
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "Mill hours: {:.2} used of {:.2} ({:.2} slack)",
            self.hours_used.unwrap_or_default(),
            self.hours_available,
            self.slack_hours.unwrap_or_default()
        )
    }
}
