//! JSON input: the debug-info tree and the path mapping.
//!
//! A tree file looks like
//!
//! ```json
//! {
//!   "documents": [{ "path": "C:\\build\\Program.cs" }],
//!   "entryPoint": "0x06000001",
//!   "names": { "0x06000001": { "type": "Program", "name": "Main" } },
//!   "functions": [{
//!     "token": "0x06000001",
//!     "slotToken": "0x11000001",
//!     "lines": [{ "document": 0, "points": [[0, 5, 9, 5, 10]] }],
//!     "scope": { "offset": 0, "length": 18, "variables": [{ "name": "a", "slot": 0 }] }
//!   }]
//! }
//! ```

use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use symremap::{
    emit::MemberDescriptor,
    symbols::{
        ConstantValue, DebugInfo, DebugInfoSource, DocumentId, DocumentLines, IteratorScope,
        SequencePoint, SourceDocument, SymConstant, SymFunction, SymScope, SymVariable,
        VariableAttributes,
    },
    token::Token,
    PathMap,
};
use uguid::Guid;

/// Token as JSON: a number or a `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct TokenField(pub Token);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToken {
    Number(u32),
    Text(String),
}

impl TryFrom<RawToken> for TokenField {
    type Error = String;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        match raw {
            RawToken::Number(value) => Ok(TokenField(Token(value))),
            RawToken::Text(text) => parse_token(&text).map(TokenField),
        }
    }
}

fn parse_token(text: &str) -> Result<Token, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed
        .map(Token)
        .map_err(|_| format!("invalid token '{text}'"))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "String")]
struct GuidField(Guid);

impl TryFrom<String> for GuidField {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
            .map(GuidField)
            .map_err(|_| format!("invalid GUID '{text}'"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentDto {
    path: String,
    language: Option<GuidField>,
    vendor: Option<GuidField>,
    document_type: Option<GuidField>,
}

impl From<DocumentDto> for SourceDocument {
    fn from(dto: DocumentDto) -> Self {
        let mut document = SourceDocument::csharp(dto.path);
        if let Some(GuidField(language)) = dto.language {
            document.language = language;
        }
        if let Some(GuidField(vendor)) = dto.vendor {
            document.vendor = vendor;
        }
        if let Some(GuidField(document_type)) = dto.document_type {
            document.document_type = document_type;
        }
        document
    }
}

#[derive(Debug, Deserialize)]
struct LinesDto {
    document: usize,
    /// `[offset, startLine, startColumn, endLine, endColumn]`
    points: Vec<(u32, u32, u16, u32, u16)>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariableDto {
    name: String,
    slot: u32,
    #[serde(default)]
    compiler_generated: bool,
}

#[derive(Debug, Deserialize)]
struct ConstantDto {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    value: serde_json::Value,
    #[serde(default)]
    token: Option<TokenField>,
}

impl ConstantDto {
    fn into_constant(self) -> anyhow::Result<SymConstant> {
        let value = constant_value(&self.kind, &self.value)
            .with_context(|| format!("constant '{}'", self.name))?;
        let token = self.token.map_or(Token(0), |TokenField(token)| token);
        Ok(SymConstant::new(self.name, value, token))
    }
}

fn constant_value(kind: &str, value: &serde_json::Value) -> anyhow::Result<ConstantValue> {
    use serde_json::Value;

    fn integer<T: TryFrom<i64>>(value: &Value) -> anyhow::Result<T> {
        value
            .as_i64()
            .and_then(|number| T::try_from(number).ok())
            .with_context(|| format!("{value} is out of range"))
    }

    Ok(match kind {
        "null" => ConstantValue::Null,
        "bool" => ConstantValue::Boolean(value.as_bool().context("expected a boolean")?),
        "i1" => ConstantValue::I1(integer(value)?),
        "u1" => ConstantValue::U1(integer(value)?),
        "i2" => ConstantValue::I2(integer(value)?),
        "u2" => ConstantValue::U2(integer(value)?),
        "i4" => ConstantValue::I4(integer(value)?),
        "u4" => ConstantValue::U4(integer(value)?),
        "i8" => ConstantValue::I8(integer(value)?),
        "u8" => ConstantValue::U8(value.as_u64().context("expected an unsigned integer")?),
        #[allow(clippy::cast_possible_truncation)]
        "r4" => ConstantValue::R4(value.as_f64().context("expected a number")? as f32),
        "r8" => ConstantValue::R8(value.as_f64().context("expected a number")?),
        "string" => ConstantValue::String(
            value
                .as_str()
                .context("expected a string")?
                .to_string(),
        ),
        other => bail!("unknown constant type '{other}'"),
    })
}

#[derive(Debug, Deserialize)]
struct ScopeDto {
    offset: u32,
    length: u32,
    #[serde(default)]
    variables: Vec<VariableDto>,
    #[serde(default)]
    constants: Vec<ConstantDto>,
    #[serde(default)]
    scopes: Vec<ScopeDto>,
}

impl ScopeDto {
    fn into_scope(self) -> anyhow::Result<SymScope> {
        let mut scope = SymScope::new(self.offset, self.length);
        scope.variables = self
            .variables
            .into_iter()
            .map(|variable| {
                let mut converted = SymVariable::new(variable.name, variable.slot);
                if variable.compiler_generated {
                    converted.attributes |= VariableAttributes::COMPILER_GENERATED;
                }
                converted
            })
            .collect();
        scope.constants = self
            .constants
            .into_iter()
            .map(ConstantDto::into_constant)
            .collect::<anyhow::Result<_>>()?;
        scope.scopes = self
            .scopes
            .into_iter()
            .map(ScopeDto::into_scope)
            .collect::<anyhow::Result<_>>()?;
        Ok(scope)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionDto {
    token: TokenField,
    #[serde(default)]
    slot_token: Option<TokenField>,
    #[serde(default)]
    lines: Vec<LinesDto>,
    scope: ScopeDto,
    #[serde(default)]
    constants: Vec<ConstantDto>,
    #[serde(default)]
    iterator_class: String,
    /// `[offset, length]` pairs
    #[serde(default)]
    iterator_scopes: Vec<(u32, u32)>,
}

impl FunctionDto {
    fn into_function(self) -> anyhow::Result<SymFunction> {
        let token = self.token.0;
        let mut function = SymFunction::new(token, 0);
        function.scope = self
            .scope
            .into_scope()
            .with_context(|| format!("function {token}"))?;
        function.slot_token = self.slot_token.map_or(Token(0), |TokenField(slot)| slot);
        function.lines = self
            .lines
            .into_iter()
            .map(|group| {
                let points = group
                    .points
                    .into_iter()
                    .map(|(offset, start_line, start_col, end_line, end_col)| {
                        SequencePoint::new(offset, start_line, start_col, end_line, end_col)
                    })
                    .collect();
                DocumentLines::new(DocumentId(group.document), points)
            })
            .collect();
        function.constants = self
            .constants
            .into_iter()
            .map(ConstantDto::into_constant)
            .collect::<anyhow::Result<_>>()
            .with_context(|| format!("function {token}"))?;
        function.iterator_class = self.iterator_class;
        function.iterator_scopes = self
            .iterator_scopes
            .into_iter()
            .map(|(offset, length)| IteratorScope::new(offset, length))
            .collect();
        Ok(function)
    }
}

#[derive(Debug, Deserialize)]
struct NameDto {
    #[serde(rename = "type")]
    declaring_type: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeDto {
    #[serde(default)]
    documents: Vec<DocumentDto>,
    #[serde(default)]
    functions: Vec<FunctionDto>,
    #[serde(default)]
    entry_point: Option<TokenField>,
    #[serde(default)]
    names: HashMap<String, NameDto>,
}

/// A debug-info tree read from a JSON file, plus the member names it carries.
pub struct TreeFile {
    info: Option<DebugInfo>,
    names: HashMap<Token, MemberDescriptor>,
}

impl TreeFile {
    /// Read and convert the tree at `path`.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read tree: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse tree: {}", path.display()))
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        let dto: TreeDto = serde_json::from_str(text)?;

        let mut info = DebugInfo::new();
        for document in dto.documents {
            info.add_document(document.into());
        }
        info.functions = dto
            .functions
            .into_iter()
            .map(FunctionDto::into_function)
            .collect::<anyhow::Result<_>>()?;
        info.entry_point = dto.entry_point.map(|TokenField(token)| token);

        let mut names = HashMap::with_capacity(dto.names.len());
        for (token, name) in dto.names {
            let token = parse_token(&token).map_err(anyhow::Error::msg)?;
            let descriptor = match name.declaring_type {
                Some(declaring_type) => MemberDescriptor::member(declaring_type, name.name),
                None => MemberDescriptor {
                    name: name.name,
                    ..MemberDescriptor::default()
                },
            };
            names.insert(token, descriptor);
        }

        Ok(TreeFile {
            info: Some(info),
            names,
        })
    }

    /// Member names keyed by token, usable as a token resolver.
    pub fn names(&self) -> &HashMap<Token, MemberDescriptor> {
        &self.names
    }
}

impl DebugInfoSource for TreeFile {
    fn load(&mut self) -> symremap::Result<DebugInfo> {
        self.info.load()
    }
}

/// Read a path mapping: a JSON object of old path to new path.
pub fn read_map(path: &Path) -> anyhow::Result<PathMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map: {}", path.display()))?;
    let entries: HashMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse map: {}", path.display()))?;
    Ok(entries.into_iter().collect())
}
