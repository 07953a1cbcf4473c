use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Product;
use crate::error::{PlanningError, Result};

/// One week of mill time to be split across products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    pub products: Vec<Product>,
    /// Mill hours available this week
    pub available_hours: f64,
}

impl Default for ProductionPlan {
    fn default() -> Self {
        Self::steel_mill()
    }
}

impl ProductionPlan {
    pub fn new(products: Vec<Product>, available_hours: f64) -> Self {
        Self {
            products,
            available_hours,
        }
    }

    /// The classic two-product mill: bands and coils over a 40 hour week.
    pub fn steel_mill() -> Self {
        Self::new(
            vec![
                Product::new("bands", 25.0, 200.0, 6000.0),
                Product::new("coils", 30.0, 140.0, 4000.0),
            ],
            40.0,
        )
    }

    pub fn with_available_hours(mut self, hours: f64) -> Self {
        self.available_hours = hours;
        self
    }

    /// Replace the demand bound of one product.
    pub fn with_demand(mut self, name: &str, demand: f64) -> Result<Self> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| PlanningError::UnknownProduct(name.to_string()))?;
        product.demand = demand;
        Ok(self)
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Hours already spoken for by contracted minimums.
    pub fn committed_hours(&self) -> f64 {
        self.products.iter().map(|p| p.hours_for(p.commitment)).sum()
    }

    /// Checks the data, not feasibility. Commitments that overrun the week are
    /// left for the solver to report as infeasible.
    pub fn validate(&self) -> Result<()> {
        if self.products.is_empty() {
            return Err(PlanningError::InvalidPlan(
                "plan must contain at least one product".to_string(),
            ));
        }
        if !self.available_hours.is_finite() || self.available_hours < 0.0 {
            return Err(PlanningError::InvalidPlan(format!(
                "available hours must be finite and >= 0, got {}",
                self.available_hours
            )));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            product.validate()?;
            if !seen.insert(product.name.as_str()) {
                return Err(PlanningError::InvalidPlan(format!(
                    "duplicate product name: {}",
                    product.name
                )));
            }
        }

        let full_hours: f64 = self.products.iter().map(|p| p.hours_for(p.demand)).sum();
        let full_revenue: f64 = self.products.iter().map(|p| p.revenue_for(p.demand)).sum();
        if !full_hours.is_finite() || !full_revenue.is_finite() {
            return Err(PlanningError::InvalidPlan(
                "total hours or revenue at full demand overflows".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steel_mill_is_valid() {
        let plan = ProductionPlan::steel_mill();
        assert!(plan.validate().is_ok());
        assert_eq!(plan.products.len(), 2);
        assert_eq!(plan.available_hours, 40.0);
        assert_eq!(plan.product("coils").map(|p| p.rate), Some(140.0));
    }

    #[test]
    fn test_with_demand() {
        let plan = ProductionPlan::steel_mill().with_demand("bands", 0.0).unwrap();
        assert_eq!(plan.product("bands").unwrap().demand, 0.0);

        let err = ProductionPlan::steel_mill().with_demand("plates", 10.0).unwrap_err();
        assert!(matches!(err, PlanningError::UnknownProduct(name) if name == "plates"));
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicates() {
        assert!(ProductionPlan::new(vec![], 40.0).validate().is_err());

        let dup = ProductionPlan::new(
            vec![
                Product::new("bands", 25.0, 200.0, 6000.0),
                Product::new("bands", 30.0, 140.0, 4000.0),
            ],
            40.0,
        );
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let plan = ProductionPlan::steel_mill().with_available_hours(-1.0);
        assert!(matches!(plan.validate(), Err(PlanningError::InvalidPlan(_))));
    }

    #[test]
    fn test_overcommitted_plan_still_validates() {
        let bands = Product::new("bands", 25.0, 200.0, 6000.0).with_commitment(6000.0);
        let plan = ProductionPlan::new(vec![bands], 10.0);
        assert!(plan.validate().is_ok());
        assert_eq!(plan.committed_hours(), 30.0);
    }

    #[test]
    fn test_validate_rejects_overflowing_totals() {
        // each product is representable on its own, the sum is not
        let plan = ProductionPlan::new(
            vec![
                Product::new("a", 1e299, 1.0, 1e9),
                Product::new("b", 1e299, 1.0, 1e9),
            ],
            40.0,
        );
        assert!(plan.products.iter().all(|p| p.validate().is_ok()));
        assert!(matches!(plan.validate(), Err(PlanningError::InvalidPlan(_))));
    }
}
