use thiserror::Error;

use crate::config::ValidationReport;
use crate::dom::ElementId;

/// Library error type for carousel construction.
#[derive(Debug, Error)]
pub enum Error {
    /// The container selector matched no element.
    #[error("container element not found: {0}")]
    MissingContainer(String),

    /// The container selector is not `#id` or a tag name.
    #[error("invalid container selector: {0:?}")]
    InvalidSelector(String),

    /// An element handle that does not belong to the document.
    #[error("element {} does not belong to this document", .0.index())]
    UnknownElement(ElementId),

    /// One or more configuration values are out of range.
    #[error("invalid configuration:\n{0}")]
    InvalidConfig(ValidationReport),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
