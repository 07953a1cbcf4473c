use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// A finished product the mill can roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Revenue per ton
    pub price: f64,
    /// Tons rolled per mill hour
    pub rate: f64,
    /// Most the market will take this week (tons)
    pub demand: f64,
    /// Contracted minimum output (tons)
    #[serde(default)]
    pub commitment: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, rate: f64, demand: f64) -> Self {
        Self {
            name: name.into(),
            price,
            rate,
            demand,
            commitment: 0.0,
        }
    }

    pub fn with_commitment(mut self, tons: f64) -> Self {
        self.commitment = tons;
        self
    }

    /// Mill hours needed to roll `tons`
    pub fn hours_for(&self, tons: f64) -> f64 {
        tons / self.rate
    }

    pub fn revenue_for(&self, tons: f64) -> f64 {
        tons * self.price
    }

    /// Revenue earned per hour of mill time spent on this product.
    ///
    /// With a single capacity row this is the LP's reduced-cost ranking:
    /// the optimum fills products in descending order of this value.
    pub fn profit_per_hour(&self) -> f64 {
        self.price * self.rate
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PlanningError::InvalidPlan(msg));

        if self.name.trim().is_empty() {
            return invalid("product name must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return invalid(format!(
                "{}: price must be finite and >= 0, got {}",
                self.name, self.price
            ));
        }
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return invalid(format!(
                "{}: rate must be finite and > 0, got {}",
                self.name, self.rate
            ));
        }
        if !self.demand.is_finite() || self.demand < 0.0 {
            return invalid(format!(
                "{}: demand must be finite and >= 0, got {}",
                self.name, self.demand
            ));
        }
        if !self.commitment.is_finite() || self.commitment < 0.0 {
            return invalid(format!(
                "{}: commitment must be finite and >= 0, got {}",
                self.name, self.commitment
            ));
        }
        if self.commitment > self.demand {
            return invalid(format!(
                "{}: commitment {} exceeds demand {}",
                self.name, self.commitment, self.demand
            ));
        }
        // The model divides by the rate and multiplies demand out, so the
        // derived coefficients must stay representable too.
        let derived = [
            ("hours per ton", 1.0 / self.rate),
            ("hours at full demand", self.hours_for(self.demand)),
            ("revenue at full demand", self.revenue_for(self.demand)),
            ("profit per hour", self.profit_per_hour()),
        ];
        if let Some((what, value)) = derived.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{}: {what} overflows ({value})", self.name));
        }
        Ok(())
    }
}
