use serde::Serialize;
use tracing::debug;

use crate::domain::ProductionPlan;
use crate::error::Result;
use crate::planner::{ProductionPlanner, SolveStatus};

/// One re-solve of the plan at a different week length.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub available_hours: f64,
    pub status: SolveStatus,
    pub objective: Option<f64>,
}

/// Re-solves `plan` once per entry in `hours`, keeping everything else fixed.
pub async fn sweep_hours(
    planner: &ProductionPlanner,
    plan: &ProductionPlan,
    hours: impl IntoIterator<Item = f64>,
) -> Result<Vec<SweepPoint>> {
    let mut points = Vec::new();
    for available_hours in hours {
        let variant = plan.clone().with_available_hours(available_hours);
        let solution = planner.solve(&variant).await?;
        let point = SweepPoint {
            available_hours,
            status: solution.status,
            objective: solution.objective().ok(),
        };
        debug!(available_hours, objective = ?point.objective, "sweep point");
        points.push(point);
    }
    Ok(points)
}

/// True when the optimal revenue never drops as hours grow. Points are
/// compared in ascending hour order; non-optimal points are skipped.
pub fn is_non_decreasing(points: &[SweepPoint], tolerance: f64) -> bool {
    let mut solved: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| p.objective.map(|obj| (p.available_hours, obj)))
        .collect();
    solved.sort_by(|a, b| a.0.total_cmp(&b.0));
    solved.windows(2).all(|w| w[1].1 + tolerance >= w[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::StrategyKind;

    #[tokio::test]
    async fn test_sweep_is_monotone_and_saturates() {
        let planner = ProductionPlanner::from_kind(StrategyKind::Ratio);
        let hours = [0.0, 10.0, 30.0, 40.0, 50.0, 58.57, 100.0];
        let points = sweep_hours(&planner, &ProductionPlan::steel_mill(), hours).await.unwrap();

        assert_eq!(points.len(), hours.len());
        assert!(is_non_decreasing(&points, 1e-9));
        assert_eq!(points[0].objective, Some(0.0));
        // all demand met: 6000 * 25 + 4000 * 30
        assert_eq!(points.last().unwrap().objective, Some(270_000.0));
    }

    #[test]
    fn test_non_decreasing_detects_drop() {
        let points = vec![
            SweepPoint {
                available_hours: 10.0,
                status: SolveStatus::Optimal,
                objective: Some(5.0),
            },
            SweepPoint {
                available_hours: 20.0,
                status: SolveStatus::Optimal,
                objective: Some(4.0),
            },
        ];
        assert!(!is_non_decreasing(&points, 1e-9));
    }
}
