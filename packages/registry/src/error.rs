use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Widget type already registered: {0}")]
    DuplicateWidget(String),

    #[error("Widget type tag is empty")]
    EmptyTag,

    #[error("Container widget {0} must declare at least one column")]
    EmptyContainer(String),
}
