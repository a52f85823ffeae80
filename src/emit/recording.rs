//! An in-memory sink that records the protocol and checks its state machine.
//!
//! [`RecordingSink`] keeps every accepted call as a [`SinkCall`], in order, and rejects calls
//! that a native backend would silently misinterpret: nested methods, scopes outside a method,
//! unbalanced scopes, a second root scope, sequence points for handles it never issued, and
//! anything after the store was closed. It is the reference backend for tests and dry runs.

use crate::{
    emit::{AddressKind, DocumentHandle, LocalVariableDef, SequencePointBatch, SymbolSink},
    symbols::{ConstantValue, SourceDocument, VariableAttributes},
    token::Token,
    Result,
};

/// One accepted protocol call.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    /// `DefineDocument`
    DefineDocument {
        /// Registered path
        path: String,
        /// Handle returned to the caller
        handle: DocumentHandle,
    },
    /// `SetUserEntryPoint`
    SetUserEntryPoint(Token),
    /// `OpenMethod`
    OpenMethod(Token),
    /// `CloseMethod`
    CloseMethod,
    /// `OpenScope` with the start offset
    OpenScope(u32),
    /// `CloseScope` with the exclusive end offset
    CloseScope(u32),
    /// `DefineSequencePoints`
    DefineSequencePoints {
        /// Target document
        document: DocumentHandle,
        /// The batch
        points: SequencePointBatch,
    },
    /// `DefineLocalVariable`
    DefineLocalVariable {
        /// Variable name
        name: String,
        /// Variable attributes
        attributes: VariableAttributes,
        /// Local signature token
        signature: Token,
        /// Address kind
        address_kind: AddressKind,
        /// Slot index
        slot: u32,
        /// Visibility start
        start_offset: u32,
        /// Visibility end
        end_offset: u32,
    },
    /// `DefineConstant`
    DefineConstant {
        /// Constant name
        name: String,
        /// Constant value
        value: ConstantValue,
        /// Signature token
        signature: Token,
    },
    /// `SetSymbolAttribute`
    SetSymbolAttribute {
        /// Owning method
        parent: Token,
        /// Attribute name
        name: String,
        /// Raw blob
        data: Vec<u8>,
    },
    /// `Close`
    Close,
    /// The sink was aborted
    Aborted,
}

/// Protocol-checking in-memory sink.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
    documents: Vec<SourceDocument>,
    method: Option<Token>,
    root_scopes: usize,
    scopes: Vec<u32>,
    finished: bool,
    aborted: bool,
    fail_on: Option<&'static str>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        RecordingSink::default()
    }

    /// Make the first call of `operation` (e.g. `"open_scope"`) fail.
    #[must_use]
    pub fn failing_on(operation: &'static str) -> Self {
        RecordingSink {
            fail_on: Some(operation),
            ..RecordingSink::default()
        }
    }

    /// Accepted calls, in order.
    #[must_use]
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Consume the sink, returning the accepted calls.
    #[must_use]
    pub fn into_calls(self) -> Vec<SinkCall> {
        self.calls
    }

    /// Registered documents, indexed by handle.
    #[must_use]
    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    /// The document registered under `handle`.
    #[must_use]
    pub fn document(&self, handle: DocumentHandle) -> Option<&SourceDocument> {
        self.documents.get(handle.0 as usize)
    }

    /// True once [`SymbolSink::close`] succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.finished && !self.aborted
    }

    /// True once the sink was aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    fn check(&mut self, operation: &'static str) -> Result<()> {
        if self.finished {
            return Err(sink_error!(operation, "sink is already closed"));
        }
        if self.fail_on == Some(operation) {
            self.fail_on = None;
            return Err(sink_error!(operation, "injected failure"));
        }
        Ok(())
    }

    fn check_in_method(&mut self, operation: &'static str) -> Result<Token> {
        self.check(operation)?;
        self.method
            .ok_or_else(|| sink_error!(operation, "no method is open"))
    }

    fn check_in_scope(&mut self, operation: &'static str) -> Result<()> {
        self.check_in_method(operation)?;
        if self.scopes.is_empty() {
            return Err(sink_error!(operation, "no scope is open"));
        }
        Ok(())
    }
}

impl SymbolSink for RecordingSink {
    fn define_document(&mut self, document: &SourceDocument) -> Result<DocumentHandle> {
        self.check("define_document")?;
        let handle = u32::try_from(self.documents.len())
            .map(DocumentHandle)
            .map_err(|_| sink_error!("define_document", "too many documents"))?;

        self.documents.push(document.clone());
        self.calls.push(SinkCall::DefineDocument {
            path: document.path.clone(),
            handle,
        });
        Ok(handle)
    }

    fn set_user_entry_point(&mut self, method: Token) -> Result<()> {
        self.check("set_user_entry_point")?;
        self.calls.push(SinkCall::SetUserEntryPoint(method));
        Ok(())
    }

    fn open_method(&mut self, method: Token) -> Result<()> {
        self.check("open_method")?;
        if let Some(open) = self.method {
            return Err(sink_error!(
                "open_method",
                "method {} opened while {} is still open",
                method,
                open
            ));
        }

        self.method = Some(method);
        self.root_scopes = 0;
        self.calls.push(SinkCall::OpenMethod(method));
        Ok(())
    }

    fn close_method(&mut self) -> Result<()> {
        let method = self.check_in_method("close_method")?;
        if !self.scopes.is_empty() {
            return Err(sink_error!(
                "close_method",
                "method {} closed with {} open scopes",
                method,
                self.scopes.len()
            ));
        }
        if self.root_scopes != 1 {
            return Err(sink_error!(
                "close_method",
                "method {} has {} root scopes",
                method,
                self.root_scopes
            ));
        }

        self.method = None;
        self.calls.push(SinkCall::CloseMethod);
        Ok(())
    }

    fn open_scope(&mut self, start_offset: u32) -> Result<()> {
        self.check_in_method("open_scope")?;
        if self.scopes.is_empty() {
            if self.root_scopes > 0 {
                return Err(sink_error!("open_scope", "second root scope"));
            }
            self.root_scopes += 1;
        }

        self.scopes.push(start_offset);
        self.calls.push(SinkCall::OpenScope(start_offset));
        Ok(())
    }

    fn close_scope(&mut self, end_offset: u32) -> Result<()> {
        self.check_in_scope("close_scope")?;
        let start = self.scopes.last().copied().unwrap_or_default();
        if end_offset < start {
            return Err(sink_error!(
                "close_scope",
                "scope closed at 0x{:x} before its start 0x{:x}",
                end_offset,
                start
            ));
        }

        self.scopes.pop();
        self.calls.push(SinkCall::CloseScope(end_offset));
        Ok(())
    }

    fn define_sequence_points(
        &mut self,
        document: DocumentHandle,
        points: &SequencePointBatch,
    ) -> Result<()> {
        self.check_in_method("define_sequence_points")?;
        if self.document(document).is_none() {
            return Err(sink_error!(
                "define_sequence_points",
                "unknown document handle {}",
                document
            ));
        }
        if !points.is_consistent() {
            return Err(sink_error!(
                "define_sequence_points",
                "parallel arrays differ in length"
            ));
        }

        self.calls.push(SinkCall::DefineSequencePoints {
            document,
            points: points.clone(),
        });
        Ok(())
    }

    fn define_local_variable(&mut self, variable: &LocalVariableDef<'_>) -> Result<()> {
        self.check_in_scope("define_local_variable")?;
        self.calls.push(SinkCall::DefineLocalVariable {
            name: variable.name.to_string(),
            attributes: variable.attributes,
            signature: variable.signature,
            address_kind: variable.address_kind,
            slot: variable.slot,
            start_offset: variable.start_offset,
            end_offset: variable.end_offset,
        });
        Ok(())
    }

    fn define_constant(
        &mut self,
        name: &str,
        value: &ConstantValue,
        signature: Token,
    ) -> Result<()> {
        self.check_in_scope("define_constant")?;
        self.calls.push(SinkCall::DefineConstant {
            name: name.to_string(),
            value: value.clone(),
            signature,
        });
        Ok(())
    }

    fn set_symbol_attribute(&mut self, parent: Token, name: &str, data: &[u8]) -> Result<()> {
        let method = self.check_in_method("set_symbol_attribute")?;
        if parent != method {
            return Err(sink_error!(
                "set_symbol_attribute",
                "attribute for {} while {} is open",
                parent,
                method
            ));
        }

        self.calls.push(SinkCall::SetSymbolAttribute {
            parent,
            name: name.to_string(),
            data: data.to_vec(),
        });
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.check("close")?;
        if let Some(method) = self.method {
            return Err(sink_error!("close", "method {} is still open", method));
        }

        self.finished = true;
        self.calls.push(SinkCall::Close);
        Ok(())
    }

    fn abort(&mut self) {
        if !self.aborted {
            self.finished = true;
            self.aborted = true;
            self.calls.push(SinkCall::Aborted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{symbols::SequencePoint, Error};

    fn open(sink: &mut RecordingSink) {
        sink.open_method(Token(0x06000001)).unwrap();
        sink.open_scope(0).unwrap();
    }

    #[test]
    fn test_well_formed_method() {
        let mut sink = RecordingSink::new();
        let handle = sink
            .define_document(&SourceDocument::csharp("/src/a.cs"))
            .unwrap();
        open(&mut sink);
        let batch: SequencePointBatch = [SequencePoint::new(0, 1, 1, 1, 5)].iter().collect();
        sink.define_sequence_points(handle, &batch).unwrap();
        sink.define_constant("c", &ConstantValue::I4(2), Token(0))
            .unwrap();
        sink.close_scope(10).unwrap();
        sink.set_symbol_attribute(Token(0x06000001), "MD2", &[4, 1, 0, 0])
            .unwrap();
        sink.close_method().unwrap();
        sink.close().unwrap();

        assert!(sink.is_closed());
        assert_eq!(sink.calls().len(), 9);
        assert_eq!(sink.document(handle).unwrap().path, "/src/a.cs");
    }

    #[test]
    fn test_nested_method_rejected() {
        let mut sink = RecordingSink::new();
        open(&mut sink);
        assert!(matches!(
            sink.open_method(Token(0x06000002)),
            Err(Error::SinkFailure {
                operation: "open_method",
                ..
            })
        ));
    }

    #[test]
    fn test_scope_discipline() {
        let mut sink = RecordingSink::new();
        assert!(sink.open_scope(0).is_err());

        open(&mut sink);
        assert!(sink.close_method().is_err());
        assert!(sink.close_scope(0).is_ok());
        assert!(sink.close_scope(0).is_err());
        assert!(sink.open_scope(0).is_err());
        assert!(sink.close_method().is_ok());

        sink.open_method(Token(0x06000002)).unwrap();
        sink.open_scope(8).unwrap();
        assert!(sink.close_scope(4).is_err());
    }

    #[test]
    fn test_method_without_root_scope_rejected() {
        let mut sink = RecordingSink::new();
        sink.open_method(Token(0x06000001)).unwrap();
        assert!(sink.close_method().is_err());
    }

    #[test]
    fn test_variables_need_scope() {
        let mut sink = RecordingSink::new();
        sink.open_method(Token(0x06000001)).unwrap();
        let variable = LocalVariableDef {
            name: "a",
            attributes: VariableAttributes::empty(),
            signature: Token(0x11000001),
            address_kind: AddressKind::IlOffset,
            slot: 0,
            start_offset: 0,
            end_offset: 4,
        };
        assert!(sink.define_local_variable(&variable).is_err());
        assert!(sink
            .define_constant("c", &ConstantValue::Null, Token(0))
            .is_err());
        sink.open_scope(0).unwrap();
        assert!(sink.define_local_variable(&variable).is_ok());
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut sink = RecordingSink::new();
        open(&mut sink);
        assert!(sink
            .define_sequence_points(DocumentHandle(0), &SequencePointBatch::new())
            .is_err());
    }

    #[test]
    fn test_attribute_parent_must_be_open_method() {
        let mut sink = RecordingSink::new();
        assert!(sink
            .set_symbol_attribute(Token(0x06000001), "MD2", &[])
            .is_err());
        open(&mut sink);
        assert!(sink
            .set_symbol_attribute(Token(0x06000002), "MD2", &[])
            .is_err());
    }

    #[test]
    fn test_closed_sink_rejects_calls() {
        let mut sink = RecordingSink::new();
        sink.close().unwrap();
        assert!(sink
            .define_document(&SourceDocument::csharp("a"))
            .is_err());
        assert!(sink.close().is_err());
        assert!(!sink.is_aborted());
    }

    #[test]
    fn test_injected_failure_and_abort() {
        let mut sink = RecordingSink::failing_on("open_scope");
        sink.open_method(Token(0x06000001)).unwrap();
        assert!(matches!(
            sink.open_scope(0),
            Err(Error::SinkFailure {
                operation: "open_scope",
                ..
            })
        ));
        assert!(sink.open_scope(0).is_ok());

        sink.abort();
        sink.abort();
        assert!(sink.is_aborted());
        assert!(!sink.is_closed());
        assert_eq!(
            sink.calls()
                .iter()
                .filter(|call| **call == SinkCall::Aborted)
                .count(),
            1
        );
    }
}
