// Strongly-typed IR shared by every front-end and every emitter.
//
// One `Ty` per field, one `Struct` per emitted declaration. Emitters only
// read the string hooks defined here; they never match on front-end details.

use crate::ident::{self, Acronyms};

/// Where a struct-like declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StructLikeSource {
    #[default]
    Struct,
    Union,
    /// A by-name reference whose declaration kind is not known (IDL sources).
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Any,
    Bool,
    Float32,
    Float64,
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Binary,
    Array(Box<Ty>),
    Map { key: Box<Ty>, value: Box<Ty> },
    Set(Box<Ty>),
    Enum { name: String },
    StructLike { name: String, source: StructLikeSource },
}

impl Ty {
    pub fn array(child: Ty) -> Self {
        Ty::Array(Box::new(child))
    }

    pub fn map(key: Ty, value: Ty) -> Self {
        Ty::Map { key: Box::new(key), value: Box::new(value) }
    }

    pub fn set(key: Ty) -> Self {
        Ty::Set(Box::new(key))
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Ty::StructLike { name: name.into(), source: StructLikeSource::Struct }
    }

    pub fn union(name: impl Into<String>) -> Self {
        Ty::StructLike { name: name.into(), source: StructLikeSource::Union }
    }

    /// Named reference to a declaration we have not seen.
    pub fn reference(name: impl Into<String>) -> Self {
        Ty::StructLike { name: name.into(), source: StructLikeSource::Unknown }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Ty::Enum { name: name.into() }
    }

    /// JSON-shape name. Doubles as the scalar fingerprint.
    pub fn json(&self) -> String {
        match self {
            Ty::Any => "null".into(),
            Ty::Bool => "bool".into(),
            Ty::Float32 | Ty::Float64 => "number".into(),
            Ty::Int8 | Ty::Int16 | Ty::Int32 | Ty::Int64 => "number".into(),
            Ty::Uint8 | Ty::Uint16 | Ty::Uint32 | Ty::Uint64 => "number".into(),
            Ty::String | Ty::Binary => "string".into(),
            Ty::Array(child) => format!("[]{}", child.json()),
            Ty::Map { .. } | Ty::Set(_) => "{}".into(),
            Ty::Enum { name } | Ty::StructLike { name, .. } => name.clone(),
        }
    }

    pub fn go(&self) -> String {
        match self {
            Ty::Any => "any".into(),
            Ty::Bool => "bool".into(),
            Ty::Float32 => "float32".into(),
            Ty::Float64 => "float64".into(),
            Ty::String => "string".into(),
            Ty::Int8 => "int8".into(),
            Ty::Int16 => "int16".into(),
            Ty::Int32 => "int32".into(),
            Ty::Int64 => "int64".into(),
            Ty::Uint8 => "uint8".into(),
            Ty::Uint16 => "uint16".into(),
            Ty::Uint32 => "uint32".into(),
            Ty::Uint64 => "uint64".into(),
            Ty::Binary => "[]byte".into(),
            Ty::Array(child) => format!("[]{}", child.go()),
            Ty::Map { key, value } => format!("map[{}]{}", key.go(), value.go()),
            Ty::Set(key) => format!("map[{}]bool", key.go()),
            Ty::Enum { name } => name.clone(),
            Ty::StructLike { name, .. } => format!("*{}", go_qualified(name)),
        }
    }

    pub fn proto(&self) -> String {
        match self {
            Ty::Any => "google.protobuf.Any".into(),
            Ty::Bool => "bool".into(),
            Ty::Float32 => "float".into(),
            Ty::Float64 => "double".into(),
            Ty::String => "string".into(),
            Ty::Int8 | Ty::Int16 | Ty::Int32 => "int32".into(),
            Ty::Int64 => "int64".into(),
            Ty::Uint8 | Ty::Uint16 | Ty::Uint32 => "uint32".into(),
            Ty::Uint64 => "uint64".into(),
            Ty::Binary => "bytes".into(),
            Ty::Array(child) => format!("repeated {}", child.proto()),
            Ty::Map { key, value } => format!("map<{}, {}>", key.proto(), value.proto()),
            Ty::Set(key) => format!("map<{}, bool>", key.proto()),
            Ty::Enum { name } | Ty::StructLike { name, .. } => name.clone(),
        }
    }

    pub fn thrift(&self) -> String {
        match self {
            Ty::Any => "binary".into(),
            Ty::Bool => "bool".into(),
            Ty::Float32 | Ty::Float64 => "double".into(),
            Ty::String => "string".into(),
            Ty::Int8 | Ty::Uint8 => "byte".into(),
            Ty::Int16 | Ty::Uint16 => "i16".into(),
            Ty::Int32 | Ty::Uint32 => "i32".into(),
            Ty::Int64 | Ty::Uint64 => "i64".into(),
            Ty::Binary => "binary".into(),
            Ty::Array(child) => format!("list<{}>", child.thrift()),
            Ty::Map { key, value } => format!("map<{}, {}>", key.thrift(), value.thrift()),
            Ty::Set(key) => format!("set<{}>", key.thrift()),
            Ty::Enum { name } | Ty::StructLike { name, .. } => name.clone(),
        }
    }

    /// Scalar numeric/bool/string kinds. Optional basic fields become `*T` in Go.
    pub fn is_basic(&self) -> bool {
        matches!(
            self,
            Ty::Bool
                | Ty::Float32
                | Ty::Float64
                | Ty::String
                | Ty::Int8
                | Ty::Int16
                | Ty::Int32
                | Ty::Int64
                | Ty::Uint8
                | Ty::Uint16
                | Ty::Uint32
                | Ty::Uint64
        )
    }
}

// "google.protobuf.Any" → "protobuf.Any": Go only sees the last package segment.
fn go_qualified(name: &str) -> String {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() <= 2 {
        return name.to_string();
    }
    segments[segments.len() - 2..].join(".")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub beginning_comments: Vec<String>,
    pub inline_comment: String,
}

impl Comment {
    pub fn is_empty(&self) -> bool {
        self.beginning_comments.is_empty() && self.inline_comment.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub field: String,
    pub ty: Ty,
    /// 1-based position, or the numeric value for enum members.
    pub index: i64,
    pub optional: bool,
    pub comment: Comment,
    /// Complete Go struct-tag annotations, e.g. `json:"a,omitempty"`.
    pub tags: Vec<String>,
}

impl Member {
    pub fn new(field: impl Into<String>, ty: Ty) -> Self {
        Self {
            field: field.into(),
            ty,
            index: 0,
            optional: false,
            comment: Comment::default(),
            tags: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = index;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn field_camel(&self) -> String {
        self.field_camel_with(&Acronyms::none())
    }

    pub fn field_camel_with(&self, acronyms: &Acronyms) -> String {
        ident::camel_case(&ident::normalize_token(&self.field, "Field"), acronyms)
    }

    pub fn go(&self) -> String {
        let name = self.ty.go();
        if self.optional && self.ty.is_basic() {
            format!("*{name}")
        } else {
            name
        }
    }

    pub fn proto(&self) -> String {
        self.ty.proto()
    }

    pub fn thrift(&self) -> String {
        self.ty.thrift()
    }

    /// All tag annotations joined by spaces inside backticks; empty when untagged.
    pub fn go_tag(&self) -> String {
        if self.tags.is_empty() {
            return String::new();
        }
        format!("`{}`", self.tags.join(" "))
    }
}

/// How a data format annotates the Go fields it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagStyle {
    None,
    Json,
    Yaml,
    Toml,
    Csv,
    Xml { attribute_prefix: String, content_prefix: String },
}

impl TagStyle {
    pub fn annotate(&self, field: &str) -> Option<String> {
        match self {
            TagStyle::None => None,
            TagStyle::Json => Some(format!(r#"json:"{field},omitempty""#)),
            TagStyle::Yaml => Some(format!(r#"yaml:"{field}""#)),
            TagStyle::Toml => Some(format!(r#"toml:"{field}""#)),
            TagStyle::Csv => Some(format!(r#"csv:"{field}""#)),
            TagStyle::Xml { attribute_prefix, content_prefix } => {
                if !content_prefix.is_empty() && field == format!("{content_prefix}content") {
                    return Some(r#"xml:",chardata""#.to_string());
                }
                if !attribute_prefix.is_empty()
                    && let Some(name) = field.strip_prefix(attribute_prefix.as_str())
                {
                    return Some(format!(r#"xml:"{name},attr""#));
                }
                Some(format!(r#"xml:"{field}""#))
            }
        }
    }
}

/// One emittable top-level declaration. `ty` is always `StructLike` or `Enum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub members: Vec<Member>,
    pub ty: Ty,
    pub comment: Comment,
}

impl Struct {
    pub fn new(ty: Ty) -> Self {
        Self { members: Vec::new(), ty, comment: Comment::default() }
    }

    pub fn struct_name(&self) -> &str {
        match &self.ty {
            Ty::Enum { name } | Ty::StructLike { name, .. } => name,
            _ => "",
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.ty, Ty::Enum { .. })
    }

    pub fn proto_keyword(&self) -> &'static str {
        if self.is_enum() { "enum" } else { "message" }
    }

    pub fn thrift_keyword(&self) -> &'static str {
        match &self.ty {
            Ty::Enum { .. } => "enum",
            Ty::StructLike { source: StructLikeSource::Union, .. } => "union",
            _ => "struct",
        }
    }
}
