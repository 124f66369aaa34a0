use std::fmt;

use serde::{Deserialize, Serialize};

const FULLNESS_REFERENCE: f64 = 5000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVector {
    #[serde(default)]
    pub water: i64,
    #[serde(default)]
    pub shampoo: i64,
    #[serde(default)]
    pub wax: i64,
}

impl ResourceVector {
    pub fn new(water: i64, shampoo: i64, wax: i64) -> Self {
        Self {
            water,
            shampoo,
            wax,
        }
    }

    pub fn scaled(&self, count: i64) -> Self {
        Self {
            water: self.water * count,
            shampoo: self.shampoo * count,
            wax: self.wax * count,
        }
    }
}

/// Shared consumable stock. Consumption is all-or-nothing across the three
/// resources; no operation leaves a counter negative.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    stock: ResourceVector,
}

impl Inventory {
    pub fn new(stock: ResourceVector) -> Self {
        Self {
            stock: ResourceVector {
                water: stock.water.max(0),
                shampoo: stock.shampoo.max(0),
                wax: stock.wax.max(0),
            },
        }
    }

    pub fn water(&self) -> i64 {
        self.stock.water
    }

    pub fn shampoo(&self) -> i64 {
        self.stock.shampoo
    }

    pub fn wax(&self) -> i64 {
        self.stock.wax
    }

    /// Deducts `need * count` for every resource if all three are covered by
    /// the current stock. Performs no mutation otherwise.
    pub fn try_consume(&mut self, need: &ResourceVector, count: i64) -> bool {
        if count <= 0 {
            return true;
        }
        let required = need.scaled(count);
        if required.water <= self.stock.water
            && required.shampoo <= self.stock.shampoo
            && required.wax <= self.stock.wax
        {
            self.stock.water -= required.water;
            self.stock.shampoo -= required.shampoo;
            self.stock.wax -= required.wax;
            return true;
        }
        false
    }

    /// Adds the non-negative fields of `amounts`; negative fields are ignored.
    pub fn restock(&mut self, amounts: &ResourceVector) {
        if amounts.water > 0 {
            self.stock.water += amounts.water;
        }
        if amounts.shampoo > 0 {
            self.stock.shampoo += amounts.shampoo;
        }
        if amounts.wax > 0 {
            self.stock.wax += amounts.wax;
        }
    }

    pub fn fullness_percent(&self) -> f64 {
        let fractions = [
            self.stock.water as f64 / FULLNESS_REFERENCE,
            self.stock.shampoo as f64 / FULLNESS_REFERENCE,
            self.stock.wax as f64 / FULLNESS_REFERENCE,
        ];
        fractions.iter().sum::<f64>() / 3.0 * 100.0
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "water={}L shampoo={}ml wax={}ml ({:.1}% full)",
            self.stock.water,
            self.stock.shampoo,
            self.stock.wax,
            self.fullness_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_deducts_all_three_resources() {
        let mut inventory = Inventory::new(ResourceVector::new(100, 100, 100));
        let need = ResourceVector::new(10, 5, 0);
        assert!(inventory.try_consume(&need, 5));
        assert_eq!(inventory.water(), 50);
        assert_eq!(inventory.shampoo(), 75);
        assert_eq!(inventory.wax(), 100);
    }

    #[test]
    fn consume_is_atomic_on_shortage() {
        let mut inventory = Inventory::new(ResourceVector::new(50, 75, 100));
        let need = ResourceVector::new(10, 5, 0);
        assert!(!inventory.try_consume(&need, 20));
        assert_eq!(inventory.water(), 50);
        assert_eq!(inventory.shampoo(), 75);
        assert_eq!(inventory.wax(), 100);
    }

    #[test]
    fn consume_with_non_positive_count_is_a_no_op() {
        let mut inventory = Inventory::new(ResourceVector::new(10, 10, 10));
        assert!(inventory.try_consume(&ResourceVector::new(100, 0, 0), 0));
        assert!(inventory.try_consume(&ResourceVector::new(100, 0, 0), -3));
        assert_eq!(inventory.water(), 10);
    }

    #[test]
    fn restock_ignores_negative_fields() {
        let mut inventory = Inventory::new(ResourceVector::new(10, 10, 10));
        inventory.restock(&ResourceVector::new(5, -4, 0));
        assert_eq!(inventory.water(), 15);
        assert_eq!(inventory.shampoo(), 10);
        assert_eq!(inventory.wax(), 10);
    }
}
