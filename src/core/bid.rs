use crate::core::requirement::RequirementId;
use crate::core::supplier::SupplierId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a supplier or logistics bid.
///
/// # Examples
///
/// ```
/// use supplier_selection::core::bid::BidId;
///
/// let id = BidId::new("BID-0001-02");
/// assert_eq!(id.as_str(), "BID-0001-02");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(String);

impl BidId {
    /// Create a new bid identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this bid ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BidId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A supplier's offer against a requirement. `bid_amount` is the material cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub requirement_id: RequirementId,
    pub supplier_id: SupplierId,
    pub bid_amount: Decimal,
    pub status: BidStatus,
}

impl Bid {
    /// A pending bid, the only kind the selection engine competes.
    pub fn pending(
        id: BidId,
        requirement_id: RequirementId,
        supplier_id: SupplierId,
        bid_amount: Decimal,
    ) -> Self {
        Self {
            id,
            requirement_id,
            supplier_id,
            bid_amount,
            status: BidStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }
}

/// A logistics partner's freight quote for delivering a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsBid {
    pub id: BidId,
    pub requirement_id: RequirementId,
    pub bid_amount: Decimal,
    pub status: BidStatus,
}

impl LogisticsBid {
    pub fn accepted(id: BidId, requirement_id: RequirementId, bid_amount: Decimal) -> Self {
        Self {
            id,
            requirement_id,
            bid_amount,
            status: BidStatus::Accepted,
        }
    }
}
