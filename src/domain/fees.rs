//! Transaction fees.

use serde::Serialize;
use std::ops::Add;

/// Flat fee per order plus a rate on the order volume.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeeModel {
    pub fixed: f64,
    pub variable: f64,
}

/// Itemized cost of one or more orders.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Costs {
    pub fixed: f64,
    pub variable: f64,
    pub total: f64,
}

impl FeeModel {
    pub fn new(fixed: f64, variable: f64) -> Self {
        FeeModel { fixed, variable }
    }

    /// Cost of an order whose volume is (number of shares) x (price per share).
    pub fn costs(&self, order_volume: f64) -> Costs {
        let variable = self.variable * order_volume;
        Costs {
            fixed: self.fixed,
            variable,
            total: self.fixed + variable,
        }
    }
}

impl Add for Costs {
    type Output = Costs;

    fn add(self, rhs: Costs) -> Costs {
        Costs {
            fixed: self.fixed + rhs.fixed,
            variable: self.variable + rhs.variable,
            total: self.total + rhs.total,
        }
    }
}
