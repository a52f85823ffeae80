//! One complete rewrite: load, remap, emit.

use crate::{
    config::RewriteOptions,
    emit::{SinkSession, SymbolEmitter, SymbolSink, TokenResolver},
    remap::{remap_documents, PathMap},
    symbols::{DebugInfo, DebugInfoSource},
    Result,
};

/// What a successful rewrite did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteSummary {
    /// Functions emitted
    pub functions: usize,
    /// Documents whose path was changed by the mapping
    pub documents_remapped: usize,
    /// Distinct documents registered with the sink
    pub documents_registered: usize,
    /// Sequence points emitted
    pub sequence_points: usize,
    /// Scopes emitted
    pub scopes: usize,
    /// Custom metadata attributes emitted
    pub attributes: usize,
}

/// Rewrites the source paths of a debug-info tree into a new symbol store.
///
/// The sink is owned for the whole rewrite. On success it is closed; on any error it is
/// aborted and the partial store must be discarded.
///
/// # Examples
///
/// ```rust
/// use symremap::symbols::{DebugInfo, DocumentLines, SequencePoint, SourceDocument, SymFunction};
/// use symremap::token::Token;
/// use symremap::{PathMap, RecordingSink, SymbolRewriter};
///
/// let mut info = DebugInfo::new();
/// let doc = info.add_document(SourceDocument::csharp("C:\\build\\a.cs"));
/// let mut function = SymFunction::new(Token(0x06000001), 8);
/// function.lines.push(DocumentLines::new(doc, vec![SequencePoint::new(0, 1, 1, 1, 9)]));
/// info.functions.push(function);
///
/// let map: PathMap = [("C:\\build\\a.cs", "/src/a.cs")].into_iter().collect();
/// let mut sink = RecordingSink::new();
/// let summary = SymbolRewriter::default().rewrite(info, &map, &mut sink)?;
///
/// assert_eq!(summary.documents_remapped, 1);
/// assert_eq!(sink.documents()[0].path, "/src/a.cs");
/// # Ok::<(), symremap::Error>(())
/// ```
#[derive(Default)]
pub struct SymbolRewriter<'r> {
    options: RewriteOptions,
    resolver: Option<&'r dyn TokenResolver>,
}

impl<'r> SymbolRewriter<'r> {
    /// Create a rewriter with the given options.
    #[must_use]
    pub fn new(options: RewriteOptions) -> Self {
        SymbolRewriter {
            options,
            resolver: None,
        }
    }

    /// Use `resolver` to label methods in log output.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'r dyn TokenResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> RewriteOptions {
        self.options
    }

    /// Remap `info` with `map` and emit the result to `sink`.
    ///
    /// # Errors
    /// Any error of the emitter or the sink. The sink has been aborted when this returns an
    /// error.
    pub fn rewrite<S: SymbolSink>(
        &self,
        mut info: DebugInfo,
        map: &PathMap,
        sink: S,
    ) -> Result<RewriteSummary> {
        let mut session = SinkSession::new(sink);

        let documents_remapped = remap_documents(&mut info, map);

        let mut emitter = SymbolEmitter::new(self.options);
        if let Some(resolver) = self.resolver {
            emitter = emitter.with_resolver(resolver);
        }
        emitter.emit(&info, session.sink()?)?;
        session.finish()?;

        let stats = emitter.stats();
        let summary = RewriteSummary {
            functions: stats.functions,
            documents_remapped,
            documents_registered: stats.documents_registered,
            sequence_points: stats.sequence_points,
            scopes: stats.scopes,
            attributes: stats.attributes,
        };

        log::info!(
            "Rewrote {} functions: {} documents remapped, {} registered, {} sequence points",
            summary.functions,
            summary.documents_remapped,
            summary.documents_registered,
            summary.sequence_points
        );
        Ok(summary)
    }

    /// Load a tree from `source`, then [`SymbolRewriter::rewrite`] it.
    ///
    /// # Errors
    /// Any error of the source, and everything [`SymbolRewriter::rewrite`] returns. A failing
    /// source aborts the sink as well.
    pub fn rewrite_from<D: DebugInfoSource + ?Sized, S: SymbolSink>(
        &self,
        source: &mut D,
        map: &PathMap,
        mut sink: S,
    ) -> Result<RewriteSummary> {
        match source.load() {
            Ok(info) => self.rewrite(info, map, sink),
            Err(error) => {
                sink.abort();
                Err(error)
            }
        }
    }
}
