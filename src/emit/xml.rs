//! A sink that writes the emitted store as a readable XML document.
//!
//! # Output Format
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <symbols>
//!   <entryPoint token="0x06000001" name="Program::Main"/>
//!   <document id="0" path="/src/a.cs" language="..." vendor="..." type="..."/>
//!   <method token="0x06000001" name="Program::Main">
//!     <sequencePoints document="0">
//!       <entry offset="0x0" startLine="5" startColumn="9" endLine="5" endColumn="10"/>
//!     </sequencePoints>
//!     <scope startOffset="0x0">
//!       <local name="a" slot="0" signature="0x11000001" addressKind="IlOffset" startOffset="0x0" endOffset="0x12" attributes="0"/>
//!       <constant name="c" type="I4" value="2" signature="0x00000000"/>
//!       <end offset="0x12"/>
//!     </scope>
//!     <attribute parent="0x06000001" name="MD2" data="04010000..."/>
//!   </method>
//! </symbols>
//! ```
//!
//! Elements are written as the calls arrive, so documents appear where they are first
//! registered and a scope's end offset is written as its last child.
//!
//! Free text (paths, names, string constants) survives a round trip through a conforming
//! reader: tabs and line breaks are written as character references, and the other C0
//! control characters, which XML 1.0 cannot carry, are written as `\u{..}` escapes.

use std::{borrow::Cow, fmt::Write as _, io::Write};

use quick_xml::{
    events::{attributes::Attribute, BytesDecl, BytesEnd, BytesStart, Event},
    name::QName,
    Writer,
};

use crate::{
    emit::{DocumentHandle, LocalVariableDef, SequencePointBatch, SymbolSink, TokenResolver},
    symbols::{ConstantValue, SourceDocument},
    token::Token,
    Result,
};

/// Streaming XML backend.
pub struct XmlSink<'r, W: Write> {
    writer: Writer<W>,
    resolver: Option<&'r dyn TokenResolver>,
    next_handle: u32,
    open: Vec<&'static str>,
    finished: bool,
}

impl<'r, W: Write> XmlSink<'r, W> {
    /// Start a document on `inner`, writing the declaration and the root element.
    ///
    /// # Errors
    /// Returns [`crate::Error::SinkFailure`] if `inner` cannot be written.
    pub fn new(inner: W) -> Result<Self> {
        let mut sink = XmlSink {
            writer: Writer::new_with_indent(inner, b' ', 2),
            resolver: None,
            next_handle: 0,
            open: Vec::new(),
            finished: false,
        };

        sink.write(
            "open",
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
        sink.start("open", BytesStart::new("symbols"), "symbols")?;
        Ok(sink)
    }

    /// Annotate methods and the entry point with names from `resolver`.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'r dyn TokenResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, operation: &'static str, event: Event<'_>) -> Result<()> {
        if self.finished {
            return Err(sink_error!(operation, "sink is already closed"));
        }
        self.writer
            .write_event(event)
            .map_err(|error| sink_error!(operation, "{}", error))
    }

    fn start(
        &mut self,
        operation: &'static str,
        element: BytesStart<'_>,
        name: &'static str,
    ) -> Result<()> {
        self.write(operation, Event::Start(element))?;
        self.open.push(name);
        Ok(())
    }

    fn expect_open(&self, operation: &'static str, name: &'static str) -> Result<()> {
        match self.open.last() {
            Some(&open) if open == name => Ok(()),
            Some(&open) => Err(sink_error!(
                operation,
                "cannot close <{}> while <{}> is open",
                name,
                open
            )),
            None => Err(sink_error!(operation, "no <{}> is open", name)),
        }
    }

    fn end(&mut self, operation: &'static str, name: &'static str) -> Result<()> {
        self.expect_open(operation, name)?;
        self.write(operation, Event::End(BytesEnd::new(name)))?;
        self.open.pop();
        Ok(())
    }

    fn token_element(&self, name: &'static str, token: Token) -> BytesStart<'static> {
        let mut element = BytesStart::new(name);
        element.push_attribute(("token", token.to_string().as_str()));
        if let Some(member) = self.resolver.and_then(|resolver| resolver.resolve(token)) {
            element.push_attribute(text_attribute("name", &member.full_name()));
        }
        element
    }
}

/// Escape `value` for use inside a double-quoted attribute.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if c.is_ascii_control() && c != '\u{7f}' => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// An attribute holding free text, escaped by [`escape_attribute`].
fn text_attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    }
}

fn hex_offset(value: u32) -> String {
    format!("0x{value:x}")
}

fn hex_bytes(data: &[u8]) -> String {
    data.iter().fold(String::with_capacity(data.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02X}");
        out
    })
}

impl<W: Write> SymbolSink for XmlSink<'_, W> {
    fn define_document(&mut self, document: &SourceDocument) -> Result<DocumentHandle> {
        let handle = DocumentHandle(self.next_handle);

        let mut element = BytesStart::new("document");
        element.push_attribute(("id", handle.0.to_string().as_str()));
        element.push_attribute(text_attribute("path", &document.path));
        element.push_attribute(("language", document.language.to_string().as_str()));
        element.push_attribute(("vendor", document.vendor.to_string().as_str()));
        element.push_attribute(("type", document.document_type.to_string().as_str()));
        self.write("define_document", Event::Empty(element))?;

        self.next_handle += 1;
        Ok(handle)
    }

    fn set_user_entry_point(&mut self, method: Token) -> Result<()> {
        let element = self.token_element("entryPoint", method);
        self.write("set_user_entry_point", Event::Empty(element))
    }

    fn open_method(&mut self, method: Token) -> Result<()> {
        let element = self.token_element("method", method);
        self.start("open_method", element, "method")
    }

    fn close_method(&mut self) -> Result<()> {
        self.end("close_method", "method")
    }

    fn open_scope(&mut self, start_offset: u32) -> Result<()> {
        let mut element = BytesStart::new("scope");
        element.push_attribute(("startOffset", hex_offset(start_offset).as_str()));
        self.start("open_scope", element, "scope")
    }

    fn close_scope(&mut self, end_offset: u32) -> Result<()> {
        self.expect_open("close_scope", "scope")?;
        let mut element = BytesStart::new("end");
        element.push_attribute(("offset", hex_offset(end_offset).as_str()));
        self.write("close_scope", Event::Empty(element))?;
        self.end("close_scope", "scope")
    }

    fn define_sequence_points(
        &mut self,
        document: DocumentHandle,
        points: &SequencePointBatch,
    ) -> Result<()> {
        if !points.is_consistent() {
            return Err(sink_error!(
                "define_sequence_points",
                "sequence point arrays differ in length"
            ));
        }

        let mut element = BytesStart::new("sequencePoints");
        element.push_attribute(("document", document.0.to_string().as_str()));
        self.start("define_sequence_points", element, "sequencePoints")?;

        for point in points.points() {
            let mut entry = BytesStart::new("entry");
            entry.push_attribute(("offset", hex_offset(point.il_offset).as_str()));
            if point.is_hidden() {
                entry.push_attribute(("hidden", "true"));
            } else {
                entry.push_attribute(("startLine", point.start_line.to_string().as_str()));
                entry.push_attribute(("startColumn", point.start_col.to_string().as_str()));
                entry.push_attribute(("endLine", point.end_line.to_string().as_str()));
                entry.push_attribute(("endColumn", point.end_col.to_string().as_str()));
            }
            self.write("define_sequence_points", Event::Empty(entry))?;
        }

        self.end("define_sequence_points", "sequencePoints")
    }

    fn define_local_variable(&mut self, variable: &LocalVariableDef<'_>) -> Result<()> {
        let mut element = BytesStart::new("local");
        element.push_attribute(text_attribute("name", variable.name));
        element.push_attribute(("slot", variable.slot.to_string().as_str()));
        element.push_attribute(("signature", variable.signature.to_string().as_str()));
        element.push_attribute(("addressKind", variable.address_kind.to_string().as_str()));
        element.push_attribute(("startOffset", hex_offset(variable.start_offset).as_str()));
        element.push_attribute(("endOffset", hex_offset(variable.end_offset).as_str()));
        element.push_attribute((
            "attributes",
            variable.attributes.bits().to_string().as_str(),
        ));
        self.write("define_local_variable", Event::Empty(element))
    }

    fn define_constant(
        &mut self,
        name: &str,
        value: &ConstantValue,
        signature: Token,
    ) -> Result<()> {
        let mut element = BytesStart::new("constant");
        element.push_attribute(text_attribute("name", name));
        element.push_attribute(("type", value.kind()));
        element.push_attribute(text_attribute("value", &value.to_string()));
        element.push_attribute(("signature", signature.to_string().as_str()));
        self.write("define_constant", Event::Empty(element))
    }

    fn set_symbol_attribute(&mut self, parent: Token, name: &str, data: &[u8]) -> Result<()> {
        let mut element = BytesStart::new("attribute");
        element.push_attribute(("parent", parent.to_string().as_str()));
        element.push_attribute(text_attribute("name", name));
        element.push_attribute(("data", hex_bytes(data).as_str()));
        self.write("set_symbol_attribute", Event::Empty(element))
    }

    fn close(&mut self) -> Result<()> {
        if self.open.len() != 1 {
            return Err(sink_error!(
                "close",
                "{} elements still open",
                self.open.len().saturating_sub(1)
            ));
        }

        self.end("close", "symbols")?;
        self.writer
            .get_mut()
            .flush()
            .map_err(|error| sink_error!("close", "{}", error))?;
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        if !self.finished {
            self.finished = true;
            if let Err(error) = self.writer.get_mut().flush() {
                log::warn!("Failed to flush aborted XML output: {error}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        emit::{AddressKind, MemberDescriptor},
        symbols::{SequencePoint, VariableAttributes},
        Error,
    };

    fn output(sink: XmlSink<'_, Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_full_method() {
        let mut names = HashMap::new();
        names.insert(Token(0x06000001), MemberDescriptor::member("Program", "Main"));

        let mut sink = XmlSink::new(Vec::new()).unwrap().with_resolver(&names);
        sink.set_user_entry_point(Token(0x06000001)).unwrap();
        let handle = sink
            .define_document(&SourceDocument::csharp("/src/a&b.cs"))
            .unwrap();
        sink.open_method(Token(0x06000001)).unwrap();
        let batch: SequencePointBatch = [
            SequencePoint::new(0, 5, 9, 5, 10),
            SequencePoint::hidden(6),
        ]
        .iter()
        .collect();
        sink.define_sequence_points(handle, &batch).unwrap();
        sink.open_scope(0).unwrap();
        sink.define_local_variable(&LocalVariableDef {
            name: "a",
            attributes: VariableAttributes::empty(),
            signature: Token(0x11000001),
            address_kind: AddressKind::IlOffset,
            slot: 0,
            start_offset: 0,
            end_offset: 0x12,
        })
        .unwrap();
        sink.define_constant("c", &ConstantValue::I4(2), Token(0))
            .unwrap();
        sink.close_scope(0x12).unwrap();
        sink.set_symbol_attribute(Token(0x06000001), "MD2", &[4, 1, 0, 0])
            .unwrap();
        sink.close_method().unwrap();
        sink.close().unwrap();

        let xml = output(sink);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<entryPoint token=\"0x06000001\" name=\"Program::Main\"/>"));
        assert!(xml.contains("path=\"/src/a&amp;b.cs\""));
        assert!(xml.contains("language=\"3f5162f8-07c6-11d3-9053-00c04fa302a1\""));
        assert!(xml.contains("<method token=\"0x06000001\" name=\"Program::Main\">"));
        assert!(xml.contains(
            "<entry offset=\"0x0\" startLine=\"5\" startColumn=\"9\" endLine=\"5\" endColumn=\"10\"/>"
        ));
        assert!(xml.contains("<entry offset=\"0x6\" hidden=\"true\"/>"));
        assert!(xml.contains("<local name=\"a\" slot=\"0\" signature=\"0x11000001\" addressKind=\"IlOffset\""));
        assert!(xml.contains("<constant name=\"c\" type=\"I4\" value=\"2\""));
        assert!(xml.contains("<end offset=\"0x12\"/>"));
        assert!(xml.contains("name=\"MD2\" data=\"04010000\""));
        assert!(xml.trim_end().ends_with("</symbols>"));
    }

    #[test]
    fn test_mismatched_close() {
        let mut sink = XmlSink::new(Vec::new()).unwrap();
        sink.open_method(Token(0x06000001)).unwrap();
        assert!(matches!(
            sink.close_scope(4),
            Err(Error::SinkFailure {
                operation: "close_scope",
                ..
            })
        ));
        assert!(sink.close().is_err());
    }

    #[test]
    fn test_abort_stops_writing() {
        let mut sink = XmlSink::new(Vec::new()).unwrap();
        sink.open_method(Token(0x06000001)).unwrap();
        sink.abort();
        assert!(sink.open_scope(0).is_err());

        let xml = output(sink);
        assert!(xml.contains("<method token=\"0x06000001\">"));
        assert!(!xml.contains("</symbols>"));
    }

    #[test]
    fn test_control_characters_escaped() {
        let mut sink = XmlSink::new(Vec::new()).unwrap();
        sink.define_document(&SourceDocument::csharp("/src/tab\tname.cs"))
            .unwrap();
        sink.open_method(Token(0x06000001)).unwrap();
        sink.open_scope(0).unwrap();
        sink.define_constant(
            "banner",
            &ConstantValue::String("line1\r\nline2".to_string()),
            Token(0),
        )
        .unwrap();
        sink.define_constant("bell", &ConstantValue::String("a\u{1}b".to_string()), Token(0))
            .unwrap();
        sink.close_scope(4).unwrap();
        sink.close_method().unwrap();
        sink.close().unwrap();

        let xml = output(sink);
        assert!(xml.contains("path=\"/src/tab&#x9;name.cs\""));
        assert!(xml.contains("value=\"line1&#xD;&#xA;line2\""));
        assert!(xml.contains("value=\"a\\u{1}b\""));
        assert!(!xml.contains('\u{1}'));
        assert!(!xml.contains("line1\r"));
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute("plain"), "plain");
        assert_eq!(escape_attribute("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
        assert_eq!(escape_attribute("\"\u{1f}\u{7f}é"), "&quot;\\u{1f}\u{7f}é");
    }

    #[test]
    fn test_inconsistent_batch_rejected() {
        let mut sink = XmlSink::new(Vec::new()).unwrap();
        let handle = sink
            .define_document(&SourceDocument::csharp("/src/a.cs"))
            .unwrap();
        sink.open_method(Token(0x06000001)).unwrap();

        let mut batch: SequencePointBatch = [SequencePoint::new(0, 1, 1, 1, 2)].iter().collect();
        batch.end_columns.clear();
        assert!(matches!(
            sink.define_sequence_points(handle, &batch),
            Err(Error::SinkFailure {
                operation: "define_sequence_points",
                ..
            })
        ));
    }

    /// Accepts `budget` bytes, then fails; flushing always fails.
    struct BrokenWriter {
        budget: usize,
    }

    impl Write for BrokenWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.len() > self.budget {
                return Err(std::io::Error::other("disk full"));
            }
            self.budget -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk gone"))
        }
    }

    #[test]
    fn test_io_failures_are_sink_failures() {
        assert!(matches!(
            XmlSink::new(BrokenWriter { budget: 0 }),
            Err(Error::SinkFailure {
                operation: "open",
                ..
            })
        ));

        let mut sink = XmlSink::new(BrokenWriter { budget: 4096 }).unwrap();
        assert!(matches!(
            sink.close(),
            Err(Error::SinkFailure {
                operation: "close",
                ..
            })
        ));
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes(&[0x04, 0xAB, 0x00]), "04AB00");
        assert_eq!(hex_bytes(&[]), "");
    }
}
