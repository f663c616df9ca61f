//! Error types for the dashboard core
//!
//! None of these cross the public `StateManager` API for expected failures;
//! they travel inside events (`import-error`, `load-error`, `storage-error`)
//! and through the internal `Result` layer (storage, decoding, factories).

/// Failure talking to the persistent store.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// The backing store does not exist or refused access.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store rejected a write because it is full.
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Reading the stored document failed.
    #[error("storage read failed: {0}")]
    Read(String),

    /// Writing the document failed for a reason other than quota.
    #[error("storage write failed: {0}")]
    Write(String),

    /// The state could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// A state or layout document failed validation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// The text is not valid JSON.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The top-level value is not a JSON object.
    #[error("document is not an object")]
    NotAnObject,

    /// The `widgets` field is absent.
    #[error("document has no widgets field")]
    MissingWidgets,

    /// The `widgets` field is present but not an array.
    #[error("widgets field is not a list")]
    WidgetsNotList,

    /// One widget entry could not be decoded.
    #[error("widget {index} is invalid: {reason}")]
    InvalidWidget { index: usize, reason: String },

    /// A top-level field has the wrong shape.
    #[error("field {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Restoring the persisted state failed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// A widget could not be instantiated.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// No factory is registered for the type tag.
    #[error("unknown widget type: {0}")]
    UnknownType(String),

    /// The factory ran but refused to build the widget.
    #[error("failed to construct {widget_type} widget: {reason}")]
    Construction { widget_type: String, reason: String },
}
