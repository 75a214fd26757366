//! Error types for the Boreal runtime.
//!
//! Uses `thiserror` for ergonomic error definition. The taxonomy separates
//! caller mistakes (`Argument`), recoverable lookups (`NotFound`), data
//! problems that abort one load (`CorruptData`), and features a given engine
//! family does not have (`Unsupported`).

use thiserror::Error;

use crate::family::EngineFamily;
use crate::object::ObjectId;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Boreal operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an invalid-argument error. Fail fast: these indicate caller
    /// bugs, not runtime conditions.
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Argument {
            message: message.into(),
        })
    }

    /// Creates a missing module/resource error. Recoverable; the caller may
    /// retry with a different name.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound {
            resource: resource.into(),
        })
    }

    /// Creates a malformed-data error. Aborts the specific load only.
    #[must_use]
    pub fn corrupt_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptData {
            message: message.into(),
        })
    }

    /// Creates an error for an operation a given engine family does not
    /// support.
    #[must_use]
    pub fn unsupported(family: EngineFamily, operation: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported {
            family,
            operation: operation.into(),
        })
    }

    /// Creates an unknown-object error.
    #[must_use]
    pub fn object_not_found(id: ObjectId) -> Self {
        Self::new(ErrorKind::ObjectNotFound(id))
    }

    /// Creates a destroyed-object error.
    #[must_use]
    pub fn object_destroyed(id: ObjectId) -> Self {
        Self::new(ErrorKind::ObjectDestroyed(id))
    }

    /// Creates an I/O error carrying the rendered cause.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io {
            message: message.into(),
        })
    }

    /// Wraps a failure in a module-load error carrying the module name, as
    /// surfaced by `load_module`.
    #[must_use]
    pub fn module_load(module: impl Into<String>, cause: Error) -> Self {
        Self::new(ErrorKind::ModuleLoad {
            module: module.into(),
            cause: Box::new(cause),
        })
    }

    /// Returns the module name and cause if this is a module-load failure.
    #[must_use]
    pub fn as_module_load(&self) -> Option<(&str, &Error)> {
        match &self.kind {
            ErrorKind::ModuleLoad { module, cause } => Some((module, cause)),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Invalid constructor or call argument.
    #[error("invalid argument: {message}")]
    Argument {
        /// What was wrong with the argument.
        message: String,
    },

    /// A module or resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The missing module/resource name.
        resource: String,
    },

    /// Malformed save or area data.
    #[error("corrupt data: {message}")]
    CorruptData {
        /// Description of the corruption.
        message: String,
    },

    /// The operation does not exist in the given engine family.
    #[error("unsupported by {family} family: {operation}")]
    Unsupported {
        /// The engine family lacking the feature.
        family: EngineFamily,
        /// The operation that was requested.
        operation: String,
    },

    /// The object id was never allocated in this world.
    #[error("object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// The object was destroyed; component access is an error afterwards.
    #[error("object destroyed: {0:?}")]
    ObjectDestroyed(ObjectId),

    /// Underlying I/O failure.
    #[error("io error: {message}")]
    Io {
        /// Rendered cause.
        message: String,
    },

    /// A module failed to load; carries the module name and the cause.
    #[error("failed to load module '{module}': {cause}")]
    ModuleLoad {
        /// The module that failed.
        module: String,
        /// The underlying failure.
        cause: Box<Error>,
    },
}
