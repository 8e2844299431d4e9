use crate::id::ElementId;
use thiserror::Error;

/// Hard faults raised by the core.
///
/// Physics routines never fail; only construction and configuration do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The factory was asked for an element type it does not know.
    #[error("unknown element type: {0}")]
    UnknownElementType(String),

    /// A message referenced an element that is not in the diagram.
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),

    /// A physics constant is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
