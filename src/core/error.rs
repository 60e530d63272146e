use crate::core::requirement::RequirementId;
use crate::core::supplier::SupplierId;
use thiserror::Error;

/// Errors raised by the collaborator stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid marketplace snapshot: {0}")]
    Snapshot(String),
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that end a selection call without a decision.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("requirementId is required")]
    MissingRequirementId,
    #[error("requirement {0} not found")]
    RequirementNotFound(RequirementId),
    #[error("No suitable suppliers found for auto-assignment (category: {category})")]
    NoSuppliersAvailable { category: String },
    #[error("landed cost for supplier {supplier_id} is out of range")]
    CostOverflow { supplier_id: SupplierId },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SelectionError {
    /// Client input errors: the request could never succeed as sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, SelectionError::MissingRequirementId)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SelectionError::RequirementNotFound(_))
    }
}
