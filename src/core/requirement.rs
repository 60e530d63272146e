use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a buyer's procurement requirement.
///
/// # Examples
///
/// ```
/// use supplier_selection::core::requirement::RequirementId;
///
/// let id = RequirementId::new("REQ-1042");
/// assert_eq!(id.as_str(), "REQ-1042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(String);

impl RequirementId {
    /// Create a new requirement identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this requirement ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequirementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Buyer's budget range. Either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl BudgetRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    /// The budget ceiling, ignoring a zero ceiling the same way a missing one is ignored.
    pub fn ceiling(&self) -> Option<Decimal> {
        self.max.filter(|m| *m != Decimal::ZERO)
    }

    /// The budget floor, ignoring a zero floor.
    pub fn floor(&self) -> Option<Decimal> {
        self.min.filter(|m| *m != Decimal::ZERO)
    }
}

/// Where and by when the buyer needs the goods delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConstraints {
    #[serde(default)]
    pub delivery_location: Option<String>,
    #[serde(default)]
    pub deadline_days: Option<u32>,
}

/// A buyer's procurement request.
///
/// Read-only for the duration of a selection call. Field names follow the
/// `requirements` store columns so snapshots deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: RequirementId,
    pub product_category: String,
    /// Requested quantity, expressed in `unit`.
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub budget_min: Option<Decimal>,
    #[serde(default)]
    pub budget_max: Option<Decimal>,
    #[serde(flatten)]
    pub delivery: DeliveryConstraints,
}

impl Requirement {
    pub fn new(id: RequirementId, product_category: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            id,
            product_category: product_category.into(),
            quantity,
            unit: None,
            budget_min: None,
            budget_max: None,
            delivery: DeliveryConstraints::default(),
        }
    }

    pub fn with_budget(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.budget_min = min;
        self.budget_max = max;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn budget(&self) -> BudgetRange {
        BudgetRange::new(self.budget_min, self.budget_max)
    }
}
