//! Serialization of a debug-info tree onto a [`SymbolSink`].

use std::collections::HashMap;

use crate::{
    config::RewriteOptions,
    customdebuginfo::{encode_iterator_class, encode_iterator_scopes, CUSTOM_METADATA_ATTRIBUTE},
    emit::{
        AddressKind, DocumentHandle, LocalVariableDef, SequencePointBatch, SymbolSink,
        TokenResolver,
    },
    symbols::{DebugInfo, SourceDocument, SymConstant, SymFunction, SymScope},
    token::Token,
    Error, Result,
};

/// Counters collected while emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitStats {
    /// Methods opened and closed
    pub functions: usize,
    /// Distinct documents registered with the sink
    pub documents_registered: usize,
    /// Sequence points defined, across all batches
    pub sequence_points: usize,
    /// `DefineSequencePoints` calls
    pub batches: usize,
    /// Scopes opened and closed
    pub scopes: usize,
    /// Local variables defined
    pub variables: usize,
    /// Constants defined
    pub constants: usize,
    /// Custom metadata attributes attached
    pub attributes: usize,
}

struct RegisteredDocument {
    handle: DocumentHandle,
    document: SourceDocument,
}

/// Walks a [`DebugInfo`] tree and drives the emission protocol of a [`SymbolSink`].
///
/// One emitter serves one rewrite: its document cache maps each path to the handle the sink
/// returned when the path was first registered, so a document shared by several functions is
/// registered exactly once.
///
/// Per function the emitter first validates the scope tree and resolves every line group to
/// a handle, then opens the method. Errors caused by the tree itself are therefore reported
/// before any call for that method reaches the sink.
///
/// # Examples
///
/// ```rust
/// use symremap::emit::{RecordingSink, SinkCall, SymbolEmitter};
/// use symremap::symbols::{DebugInfo, SymFunction};
/// use symremap::token::Token;
/// use symremap::RewriteOptions;
///
/// let mut info = DebugInfo::new();
/// info.functions.push(SymFunction::new(Token(0x06000001), 4));
///
/// let mut sink = RecordingSink::new();
/// let mut emitter = SymbolEmitter::new(RewriteOptions::default());
/// emitter.emit(&info, &mut sink)?;
///
/// assert_eq!(sink.calls()[0], SinkCall::OpenMethod(Token(0x06000001)));
/// assert_eq!(emitter.stats().scopes, 1);
/// # Ok::<(), symremap::Error>(())
/// ```
pub struct SymbolEmitter<'r> {
    options: RewriteOptions,
    resolver: Option<&'r dyn TokenResolver>,
    documents: HashMap<String, RegisteredDocument>,
    stats: EmitStats,
}

impl<'r> SymbolEmitter<'r> {
    /// Create an emitter with an empty document cache.
    #[must_use]
    pub fn new(options: RewriteOptions) -> Self {
        SymbolEmitter {
            options,
            resolver: None,
            documents: HashMap::new(),
            stats: EmitStats::default(),
        }
    }

    /// Use `resolver` to label methods in log output.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'r dyn TokenResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Counters collected so far.
    #[must_use]
    pub fn stats(&self) -> EmitStats {
        self.stats
    }

    /// Emit the entry point and every function of `info`, in tree order.
    ///
    /// Does not close the sink.
    ///
    /// # Errors
    /// - [`Error::InvalidTree`] / [`Error::RecursionLimit`] for a malformed scope tree
    /// - [`Error::UnknownDocument`] for a line group without a registrable document
    /// - [`Error::SinkFailure`] or any other error returned by the sink
    pub fn emit<S: SymbolSink + ?Sized>(&mut self, info: &DebugInfo, sink: &mut S) -> Result<()> {
        if self.options.emit_entry_point {
            if let Some(entry_point) = info.entry_point {
                log::debug!("Setting user entry point {}", self.label(entry_point));
                sink.set_user_entry_point(entry_point)?;
            }
        }

        for function in &info.functions {
            self.emit_function(info, function, sink)?;
        }

        Ok(())
    }

    /// Emit a single function.
    ///
    /// # Errors
    /// See [`SymbolEmitter::emit`].
    pub fn emit_function<S: SymbolSink + ?Sized>(
        &mut self,
        info: &DebugInfo,
        function: &SymFunction,
        sink: &mut S,
    ) -> Result<()> {
        self.validate(function)?;
        let batches = self.resolve_lines(info, function, sink)?;

        let class_blob = if function.is_iterator() {
            Some(encode_iterator_class(&function.iterator_class)?)
        } else {
            None
        };
        let scopes_blob = if function.iterator_scopes.is_empty() {
            None
        } else {
            Some(encode_iterator_scopes(&function.iterator_scopes)?)
        };

        log::debug!(
            "Emitting method {} ({} sequence points in {} documents)",
            self.label(function.token),
            function.sequence_point_count(),
            batches.len()
        );

        sink.open_method(function.token)?;

        for (handle, batch) in &batches {
            sink.define_sequence_points(*handle, batch)?;
            self.stats.batches += 1;
            self.stats.sequence_points += batch.len();
        }

        self.emit_scope(
            function,
            &function.scope,
            Some(function.constants.as_slice()),
            1,
            sink,
        )?;

        for blob in [class_blob, scopes_blob].into_iter().flatten() {
            sink.set_symbol_attribute(function.token, CUSTOM_METADATA_ATTRIBUTE, &blob)?;
            self.stats.attributes += 1;
        }

        sink.close_method()?;
        self.stats.functions += 1;
        Ok(())
    }

    fn emit_scope<S: SymbolSink + ?Sized>(
        &mut self,
        function: &SymFunction,
        scope: &SymScope,
        function_constants: Option<&[SymConstant]>,
        depth: usize,
        sink: &mut S,
    ) -> Result<()> {
        if depth > self.options.max_scope_depth {
            return Err(Error::RecursionLimit(self.options.max_scope_depth));
        }

        let end = scope.end()?;
        log::trace!(
            "Scope [0x{:x}, 0x{:x}) of {}: {} variables, {} constants",
            scope.offset,
            end,
            function.token,
            scope.variables.len(),
            scope.constants.len()
        );

        sink.open_scope(scope.offset)?;

        for variable in &scope.variables {
            sink.define_local_variable(&LocalVariableDef {
                name: &variable.name,
                attributes: variable.attributes,
                signature: function.slot_token,
                address_kind: AddressKind::IlOffset,
                slot: variable.slot,
                start_offset: scope.offset,
                end_offset: end,
            })?;
            self.stats.variables += 1;
        }

        let constants = scope
            .constants
            .iter()
            .chain(function_constants.unwrap_or_default());
        for constant in constants {
            sink.define_constant(&constant.name, &constant.value, constant.token)?;
            self.stats.constants += 1;
        }

        for child in &scope.scopes {
            self.emit_scope(function, child, None, depth + 1, sink)?;
        }

        sink.close_scope(end)?;
        self.stats.scopes += 1;
        Ok(())
    }

    /// Resolve every non-empty line group of `function` to a registered handle and merge
    /// groups sharing a handle, in first-appearance order.
    fn resolve_lines<S: SymbolSink + ?Sized>(
        &mut self,
        info: &DebugInfo,
        function: &SymFunction,
        sink: &mut S,
    ) -> Result<Vec<(DocumentHandle, SequencePointBatch)>> {
        let mut batches: Vec<(DocumentHandle, SequencePointBatch)> = Vec::new();

        for group in function.lines.iter().filter(|group| !group.is_empty()) {
            let document = info
                .document(group.document)
                .filter(|document| !document.path.is_empty())
                .ok_or(Error::UnknownDocument {
                    method: function.token,
                    document: group.document,
                })?;

            let handle = self.register(document, sink)?;
            match batches.iter_mut().find(|(existing, _)| *existing == handle) {
                Some((_, batch)) => batch.extend(&group.lines),
                None => batches.push((handle, group.lines.iter().collect())),
            }
        }

        Ok(batches)
    }

    fn register<S: SymbolSink + ?Sized>(
        &mut self,
        document: &SourceDocument,
        sink: &mut S,
    ) -> Result<DocumentHandle> {
        if let Some(registered) = self.documents.get(&document.path) {
            if !registered.document.same_kind(document) {
                log::warn!(
                    "Document {} appears with different language/vendor/type GUIDs; keeping the first registration",
                    document.path
                );
            }
            return Ok(registered.handle);
        }

        let handle = sink.define_document(document)?;
        log::debug!("Registered document {} as {handle}", document.path);

        self.documents.insert(
            document.path.clone(),
            RegisteredDocument {
                handle,
                document: document.clone(),
            },
        );
        self.stats.documents_registered += 1;
        Ok(handle)
    }

    fn validate(&self, function: &SymFunction) -> Result<()> {
        if function.scope.exceeds_depth(self.options.max_scope_depth) {
            return Err(Error::RecursionLimit(self.options.max_scope_depth));
        }

        if !self.options.validate_scopes {
            return Ok(());
        }

        Self::validate_scope(function.token, &function.scope)?;
        for scope in &function.iterator_scopes {
            scope.end()?;
        }
        Ok(())
    }

    fn validate_scope(method: Token, scope: &SymScope) -> Result<()> {
        scope.end()?;
        for child in &scope.scopes {
            if !scope.contains(child) {
                return Err(invalid_tree_error!(
                    "Scope [0x{:x}+0x{:x}] of method {} is not contained in its parent [0x{:x}+0x{:x}]",
                    child.offset,
                    child.length,
                    method,
                    scope.offset,
                    scope.length
                ));
            }
            Self::validate_scope(method, child)?;
        }
        Ok(())
    }

    fn label(&self, token: Token) -> String {
        match self.resolver {
            Some(resolver) => resolver.label(token),
            None => token.to_string(),
        }
    }
}
