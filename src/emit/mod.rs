//! Symbol emission.
//!
//! The emitter serializes a [`crate::symbols::DebugInfo`] tree onto an abstract backend that
//! implements the [`SymbolSink`] protocol. The protocol is a state machine: methods and scopes
//! must be opened and closed in strict stack order, documents are registered before their
//! sequence points are defined, and nothing may follow the final close.
//!
//! # Key Components
//!
//! - [`SymbolSink`] - The backend protocol
//! - [`SymbolEmitter`] - Walks the tree and drives a sink, caching document handles
//! - [`SinkSession`] - Closes the sink on success, aborts it on every other exit path
//! - [`RecordingSink`] - In-memory backend that enforces the protocol
//! - [`XmlSink`] - Backend writing a readable XML dump
//! - [`TokenResolver`] - Token to name lookup used for labels
//!
//! # Examples
//!
//! ```rust
//! use symremap::emit::{RecordingSink, SinkSession, SymbolEmitter};
//! use symremap::symbols::{DebugInfo, SymFunction};
//! use symremap::token::Token;
//! use symremap::RewriteOptions;
//!
//! let mut info = DebugInfo::new();
//! info.functions.push(SymFunction::new(Token(0x06000001), 8));
//!
//! let mut session = SinkSession::new(RecordingSink::new());
//! SymbolEmitter::new(RewriteOptions::default()).emit(&info, session.sink()?)?;
//! let sink = session.finish()?;
//! assert!(sink.is_closed());
//! # Ok::<(), symremap::Error>(())
//! ```

mod emitter;
mod recording;
mod resolver;
mod session;
mod sink;
mod xml;

pub use emitter::{EmitStats, SymbolEmitter};
pub use recording::{RecordingSink, SinkCall};
pub use resolver::{MemberDescriptor, TokenResolver};
pub use session::SinkSession;
pub use sink::{AddressKind, DocumentHandle, LocalVariableDef, SequencePointBatch, SymbolSink};
pub use xml::XmlSink;
