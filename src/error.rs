use thiserror::Error;

use crate::{symbols::DocumentId, token::Token};

macro_rules! invalid_tree_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidTree {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidTree {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! sink_error {
    ($operation:expr, $msg:expr) => {
        crate::Error::SinkFailure {
            operation: $operation,
            message: $msg.to_string(),
        }
    };

    ($operation:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::SinkFailure {
            operation: $operation,
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant is fatal for the rewrite that produced it: a symbol store that saw an error
/// mid-walk is incomplete and must be discarded by the caller, never published or patched.
///
/// # Error Categories
///
/// ## Tree Errors
/// - [`Error::InvalidTree`] - A structural invariant of the debug-info tree does not hold
/// - [`Error::RecursionLimit`] - Scopes are nested deeper than the configured limit
/// - [`Error::UnknownDocument`] - A line group references a document that cannot be registered
///
/// ## Backend Errors
/// - [`Error::SinkFailure`] - The symbol sink rejected a call
///
/// ## Blob Errors
/// - [`Error::Malformed`] - A custom metadata blob is inconsistent
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of a blob
///
/// ## Input Errors
/// - [`Error::Empty`] - A debug-info source had nothing to load
///
/// # Examples
///
/// ```rust
/// use symremap::{Error, PathMap, RecordingSink, SymbolRewriter};
/// use symremap::symbols::DebugInfo;
///
/// let rewriter = SymbolRewriter::default();
/// match rewriter.rewrite(DebugInfo::default(), &PathMap::new(), RecordingSink::new()) {
///     Ok(summary) => println!("emitted {} functions", summary.functions),
///     Err(Error::InvalidTree { message, file, line }) => {
///         eprintln!("Invalid tree: {} ({}:{})", message, file, line);
///     }
///     Err(Error::SinkFailure { operation, message }) => {
///         eprintln!("Backend rejected {}: {}", operation, message);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The debug-info tree violates a structural invariant.
    ///
    /// Raised before a function is opened on the sink, e.g. when a child scope is not
    /// contained in its parent or an offset range overflows. The error includes the
    /// source location where the violation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the violated invariant
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid tree - {file}:{line}: {message}")]
    InvalidTree {
        /// The message to be printed for the InvalidTree error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A line group references a document that cannot be registered.
    ///
    /// Either the document id points outside the document arena of the tree, or the
    /// document has no path. Dropping the group would truncate the line table, so the
    /// whole rewrite is aborted instead.
    #[error("Method {method} references unknown document {document}")]
    UnknownDocument {
        /// The method whose line table references the document
        method: Token,
        /// The unresolvable document id
        document: DocumentId,
    },

    /// The symbol sink rejected a call.
    ///
    /// The emission protocol is stateful, so a rejected call is never retried.
    #[error("Symbol sink rejected {operation}: {message}")]
    SinkFailure {
        /// The protocol operation that failed
        operation: &'static str,
        /// Backend supplied failure description
        message: String,
    },

    /// Recursion limit reached.
    ///
    /// Scope trees are walked recursively; to prevent stack overflow on hostile input a
    /// maximum nesting depth is enforced. The associated value is the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A custom metadata blob is damaged and could not be decoded.
    ///
    /// Raised by the blob decoder for bad versions, lengths, counts or padding.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding or encoding a blob.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    ///
    /// Returned by debug-info sources that were already drained or never held a tree.
    #[error("Provided input was empty")]
    Empty,
}
