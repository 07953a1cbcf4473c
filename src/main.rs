use anyhow::{Context, Result};
use config::{Config, OutputFormat};
use planner::ProductionPlanner;
use report::PlanReport;
use steel_planning::{config, planner, report, sensitivity, telemetry};
use telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => Config::load().context("loading config")?,
    };

    init_tracing(cfg.output.log_format);

    let planner = ProductionPlanner::with_backend(cfg.planning.strategy, cfg.planning.solver);
    info!(
        strategy = %cfg.planning.strategy,
        solver = %cfg.planning.solver,
        products = cfg.plan.products.len(),
        available_hours = cfg.plan.available_hours,
        "planning production"
    );

    let solution = planner
        .solve(&cfg.plan)
        .await
        .context("production planning failed")?;
    let report = PlanReport::from_solution(&cfg.plan, &solution);

    match cfg.output.format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if !cfg.output.sweep_hours.is_empty() {
        let hours = cfg.output.sweep_hours.iter().copied();
        let points = sensitivity::sweep_hours(&planner, &cfg.plan, hours)
            .await
            .context("hours sweep failed")?;
        match cfg.output.format {
            OutputFormat::Text => {
                println!();
                println!("{:>10} {:>14}", "hours", "revenue");
                for point in &points {
                    match point.objective {
                        Some(objective) => {
                            println!("{:>10.2} {:>14.2}", point.available_hours, objective)
                        }
                        None => {
                            println!("{:>10.2} {:>14}", point.available_hours, point.status)
                        }
                    }
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
        }
    }

    if !solution.is_optimal() {
        anyhow::bail!(
            "solver finished with status {}: {}",
            solution.status,
            solution.message
        );
    }
    Ok(())
}
