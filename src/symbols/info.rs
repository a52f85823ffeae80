//! The complete debug-info tree of one program.

use std::collections::BTreeSet;

use crate::{
    symbols::{DocumentId, SourceDocument, SymFunction},
    token::Token,
    Error, Result,
};

/// All debug information of one program: a document arena and the functions whose line
/// tables point into it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DebugInfo {
    /// Document arena, indexed by [`DocumentId`]
    pub documents: Vec<SourceDocument>,
    /// Functions, in store order
    pub functions: Vec<SymFunction>,
    /// User entry point method, if the program has one
    pub entry_point: Option<Token>,
}

impl DebugInfo {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        DebugInfo::default()
    }

    /// Append `document` to the arena and return its id.
    pub fn add_document(&mut self, document: SourceDocument) -> DocumentId {
        self.documents.push(document);
        DocumentId(self.documents.len() - 1)
    }

    /// Look up a document by id.
    #[must_use]
    pub fn document(&self, id: DocumentId) -> Option<&SourceDocument> {
        self.documents.get(id.0)
    }

    /// Look up a document by id for modification.
    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut SourceDocument> {
        self.documents.get_mut(id.0)
    }

    /// Ids of all documents referenced by at least one line group, in ascending order.
    ///
    /// Dangling ids are included; callers resolving them decide how to treat them.
    #[must_use]
    pub fn referenced_documents(&self) -> BTreeSet<DocumentId> {
        self.functions
            .iter()
            .flat_map(|function| function.lines.iter().map(|group| group.document))
            .collect()
    }

    /// Find a function by its method token.
    #[must_use]
    pub fn function(&self, token: Token) -> Option<&SymFunction> {
        self.functions.iter().find(|function| function.token == token)
    }
}

/// Decoder collaborator: produces the debug-info tree of a symbol store.
///
/// Implementations must preserve the original ordering of functions, line groups, sequence
/// points, scopes, variables and constants.
pub trait DebugInfoSource {
    /// Load the full tree.
    ///
    /// # Errors
    /// Implementation specific; [`crate::Error::Empty`] when there is nothing to load.
    fn load(&mut self) -> Result<DebugInfo>;
}

/// An already decoded tree, handed out once.
impl DebugInfoSource for Option<DebugInfo> {
    fn load(&mut self) -> Result<DebugInfo> {
        self.take().ok_or(Error::Empty)
    }
}
