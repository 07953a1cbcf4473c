//! Linear programming strategy
//!
//! One continuous variable per product, bounded by its commitment and market
//! demand, one capacity row over mill hours, revenue maximised. The model is
//! built with good_lp and handed to a solver backend:
//! - `minilp`: compiled into the binary, always available
//! - `cbc` / `glpk`: the external command-line solvers, reached through
//!   good_lp's `lp-solvers` backend (`external-solver` feature). They must
//!   be on `PATH` at runtime.

use async_trait::async_trait;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution as _, Solver,
    SolverModel, Variable,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::domain::{Product, ProductionPlan};
use crate::error::{PlanningError, Result};
use crate::planner::{PlanningStrategy, Solution, SolveStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SolverBackend {
    /// Pure-Rust simplex built into good_lp
    #[default]
    Minilp,
    /// COIN-OR `cbc` binary
    Cbc,
    /// GNU `glpsol` binary
    Glpk,
}

impl SolverBackend {
    pub fn is_external(&self) -> bool {
        !matches!(self, SolverBackend::Minilp)
    }
}

/// The built model, before a solver is attached.
struct MillModel {
    vars: ProblemVariables,
    make: Vec<Variable>,
    revenue: Expression,
    mill_hours: Expression,
    available: f64,
}

impl MillModel {
    fn build(plan: &ProductionPlan) -> Self {
        let mut vars = ProblemVariables::new();
        let make: Vec<Variable> = plan
            .products
            .iter()
            .map(|p| {
                vars.add(
                    variable()
                        .min(p.commitment)
                        .max(p.demand)
                        .name(format!("make_{}", p.name)),
                )
            })
            .collect();

        let revenue: Expression = plan
            .products
            .iter()
            .zip(&make)
            .map(|(p, &x)| x * p.price)
            .sum();
        let mill_hours: Expression = plan
            .products
            .iter()
            .zip(&make)
            .map(|(p, &x)| x * (1.0 / p.rate))
            .sum();

        Self {
            vars,
            make,
            revenue,
            mill_hours,
            available: plan.available_hours,
        }
    }

    /// Solves with `solver` and reads one value per product, in plan order.
    fn solve_with<S>(self, solver: S) -> Result<Vec<f64>, ResolutionError>
    where
        S: Solver,
        S::Model: SolverModel<Error = ResolutionError>,
    {
        let Self {
            vars,
            make,
            revenue,
            mill_hours,
            available,
        } = self;

        let solution = vars
            .maximise(revenue)
            .using(solver)
            .with(constraint!(mill_hours <= available))
            .solve()?;
        Ok(make.iter().map(|&x| solution.value(x)).collect())
    }
}

pub struct LpPlanner {
    /// Distance from a bound under which a solver value is snapped onto it
    pub bound_tolerance: f64,
    pub backend: SolverBackend,
}

impl Default for LpPlanner {
    fn default() -> Self {
        Self {
            bound_tolerance: 1e-9,
            backend: SolverBackend::Minilp,
        }
    }
}

impl LpPlanner {
    pub fn new(bound_tolerance: f64, backend: SolverBackend) -> Self {
        Self {
            bound_tolerance,
            backend,
        }
    }

    pub fn with_backend(backend: SolverBackend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    fn snap(&self, value: f64, product: &Product) -> f64 {
        let scale = product.demand.abs().max(1.0);
        let tol = self.bound_tolerance * scale;
        if (value - product.commitment).abs() <= tol {
            product.commitment
        } else if (value - product.demand).abs() <= tol {
            product.demand
        } else {
            value
        }
    }

    #[cfg(feature = "external-solver")]
    fn run(&self, model: MillModel) -> Result<Result<Vec<f64>, ResolutionError>> {
        use good_lp::solvers::lp_solvers::{CbcSolver, GlpkSolver, LpSolver};

        Ok(match self.backend {
            SolverBackend::Minilp => model.solve_with(good_lp::solvers::minilp::minilp),
            SolverBackend::Cbc => model.solve_with(LpSolver(CbcSolver::new())),
            SolverBackend::Glpk => model.solve_with(LpSolver(GlpkSolver::new())),
        })
    }

    #[cfg(not(feature = "external-solver"))]
    fn run(&self, model: MillModel) -> Result<Result<Vec<f64>, ResolutionError>> {
        match self.backend {
            SolverBackend::Minilp => Ok(model.solve_with(good_lp::solvers::minilp::minilp)),
            backend => Err(PlanningError::SolverUnavailable {
                backend: backend.to_string(),
                message: "built without the 'external-solver' feature".to_string(),
            }),
        }
    }

    fn solve_lp(&self, plan: &ProductionPlan) -> Result<Solution> {
        let model = MillModel::build(plan);
        let available = model.available;
        debug!(
            variables = model.make.len(),
            available_hours = available,
            backend = %self.backend,
            "built LP model"
        );

        match self.run(model)? {
            Ok(values) => {
                let tons: Vec<f64> = plan
                    .products
                    .iter()
                    .zip(values)
                    .map(|(p, value)| self.snap(value, p))
                    .collect();
                let non_finite = plan.products.iter().zip(&tons).find(|(_, t)| !t.is_finite());
                if let Some((p, value)) = non_finite {
                    return Err(PlanningError::Solver(format!(
                        "solver returned a non-finite value for {}: {value}",
                        p.name
                    )));
                }

                let solution =
                    Solution::optimal(self.name(), plan, tons, "solver reached optimality");
                let objective = solution.objective()?;
                if !objective.is_finite() {
                    return Err(PlanningError::Solver(format!(
                        "solver returned a non-finite objective: {objective}"
                    )));
                }
                Ok(solution)
            }
            Err(ResolutionError::Infeasible) => Ok(Solution::not_solved(
                self.name(),
                SolveStatus::Infeasible,
                format!(
                    "committed output needs {:.2} h, only {:.2} h available",
                    plan.committed_hours(),
                    available
                ),
            )),
            Err(ResolutionError::Unbounded) => Ok(Solution::not_solved(
                self.name(),
                SolveStatus::Unbounded,
                "objective is unbounded",
            )),
            // A command-line solver that cannot be spawned, or leaves no
            // readable solution behind, surfaces here.
            Err(other) if self.backend.is_external() => {
                warn!(backend = %self.backend, error = %other, "external solver failed");
                Err(PlanningError::SolverUnavailable {
                    backend: self.backend.to_string(),
                    message: other.to_string(),
                })
            }
            Err(other) => Err(PlanningError::Solver(other.to_string())),
        }
    }
}

#[async_trait]
impl PlanningStrategy for LpPlanner {
    fn name(&self) -> &'static str {
        "lp"
    }

    async fn plan(&self, plan: &ProductionPlan) -> Result<Solution> {
        self.solve_lp(plan)
    }
}
