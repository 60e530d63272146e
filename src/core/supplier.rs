use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a supplier on the marketplace.
///
/// # Examples
///
/// ```
/// use supplier_selection::core::supplier::SupplierId;
///
/// let a = SupplierId::new("SUP-ACME");
/// let b = SupplierId::new("SUP-GLOBEX");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(String);

impl SupplierId {
    /// Create a new supplier identifier.
    ///
    /// Convention: `SUP-` prefix followed by the marketplace account code.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this supplier ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SupplierId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Rolling delivery and quality aggregate for one supplier.
///
/// Maintained by order-completion processes outside this crate; the
/// selection engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub supplier_id: SupplierId,
    /// Share of orders delivered successfully, 0–1.
    pub delivery_success_rate: f64,
    /// Quality score, 0–1 (1 is flawless).
    pub quality_score: f64,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub late_deliveries: u32,
    #[serde(default)]
    pub quality_rejections: u32,
    #[serde(default)]
    pub quality_complaints: u32,
    #[serde(default)]
    pub avg_delivery_days: Option<f64>,
}

impl SupplierPerformance {
    pub fn new(supplier_id: SupplierId, delivery_success_rate: f64, quality_score: f64) -> Self {
        Self {
            supplier_id,
            delivery_success_rate,
            quality_score,
            total_orders: 0,
            late_deliveries: 0,
            quality_rejections: 0,
            quality_complaints: 0,
            avg_delivery_days: None,
        }
    }

    pub fn with_orders(mut self, total_orders: u32) -> Self {
        self.total_orders = total_orders;
        self
    }

    pub fn with_late_deliveries(mut self, late_deliveries: u32) -> Self {
        self.late_deliveries = late_deliveries;
        self
    }

    pub fn with_quality_issues(mut self, rejections: u32, complaints: u32) -> Self {
        self.quality_rejections = rejections;
        self.quality_complaints = complaints;
        self
    }

    pub fn with_avg_delivery_days(mut self, days: f64) -> Self {
        self.avg_delivery_days = Some(days);
        self
    }

    /// `count / total_orders`, or `None` when there are no orders to divide by.
    pub fn ratio_of(&self, count: u32) -> Option<f64> {
        if self.total_orders == 0 {
            None
        } else {
            Some(f64::from(count) / f64::from(self.total_orders))
        }
    }
}

/// Aggregate for one (supplier, category) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierCategoryPerformance {
    pub supplier_id: SupplierId,
    pub category: String,
    /// Times this supplier was the L1 winner in the category.
    #[serde(default)]
    pub l1_wins: u32,
    pub avg_price_per_unit: Decimal,
    #[serde(default)]
    pub successful_deliveries: u32,
    #[serde(default)]
    pub total_orders: u32,
}

impl SupplierCategoryPerformance {
    pub fn new(
        supplier_id: SupplierId,
        category: impl Into<String>,
        l1_wins: u32,
        avg_price_per_unit: Decimal,
    ) -> Self {
        Self {
            supplier_id,
            category: category.into(),
            l1_wins,
            avg_price_per_unit,
            successful_deliveries: 0,
            total_orders: 0,
        }
    }

    pub fn with_deliveries(mut self, successful: u32, total: u32) -> Self {
        self.successful_deliveries = successful;
        self.total_orders = total;
        self
    }

    /// Category-specific success rate, or `None` without any orders.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_orders == 0 {
            None
        } else {
            Some(f64::from(self.successful_deliveries) / f64::from(self.total_orders))
        }
    }
}

/// Stock a supplier reports as available in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInventorySignal {
    pub supplier_id: SupplierId,
    pub category: String,
    pub available_quantity: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl SupplierInventorySignal {
    pub fn new(
        supplier_id: SupplierId,
        category: impl Into<String>,
        available_quantity: Decimal,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            supplier_id,
            category: category.into(),
            available_quantity,
            unit: None,
            last_updated,
        }
    }

    pub fn can_cover(&self, quantity: Decimal) -> bool {
        self.available_quantity >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_supplier_display() {
        assert_eq!(format!("{}", SupplierId::new("SUP-7")), "SUP-7");
    }

    #[test]
    fn test_ratio_without_orders() {
        let perf = SupplierPerformance::new(SupplierId::new("S"), 0.9, 0.9);
        assert_eq!(perf.ratio_of(3), None);

        let perf = perf.with_orders(20);
        assert_eq!(perf.ratio_of(5), Some(0.25));
    }

    #[test]
    fn test_category_success_rate() {
        let cat = SupplierCategoryPerformance::new(SupplierId::new("S"), "steel", 4, dec!(500));
        assert_eq!(cat.success_rate(), None);
        assert_eq!(cat.with_deliveries(9, 10).success_rate(), Some(0.9));
    }

    #[test]
    fn test_inventory_cover() {
        let signal = SupplierInventorySignal::new(SupplierId::new("S"), "steel", dec!(100), Utc::now());
        assert!(signal.can_cover(dec!(100)));
        assert!(!signal.can_cover(dec!(100.5)));
    }

    #[test]
    fn test_performance_row_defaults() {
        let row = r#"{"supplier_id": "S-1", "delivery_success_rate": 0.8, "quality_score": 0.7}"#;
        let perf: SupplierPerformance = serde_json::from_str(row).unwrap();
        assert_eq!(perf.total_orders, 0);
        assert_eq!(perf.avg_delivery_days, None);
    }
}
