use once_cell::unsync::OnceCell;

use super::value::Value;
use crate::ir::Ty;

/// What to do with an array that has no element to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyArrays {
    /// No child; the member is elided during unification (JSON).
    Drop,
    /// One synthetic `Any` child, so the member becomes `Array<Any>` (YAML, TOML, XML).
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Scalar(Ty),
    Array,
    Object,
}

/// Shape-annotated mirror of a decoded value.
///
/// Object children are sorted by field name; array nodes hold at most the
/// first element. The fingerprint is computed once and cached.
#[derive(Debug, Clone)]
pub struct Node {
    pub field: String,
    pub kind: NodeKind,
    pub children: Vec<Node>,
    fingerprint: OnceCell<String>,
}

impl Node {
    pub fn new(field: impl Into<String>, kind: NodeKind, children: Vec<Node>) -> Self {
        Self { field: field.into(), kind, children, fingerprint: OnceCell::new() }
    }

    pub fn scalar(field: impl Into<String>, ty: Ty) -> Self {
        Self::new(field, NodeKind::Scalar(ty), Vec::new())
    }

    pub fn build(field: &str, value: &Value, empty: EmptyArrays) -> Self {
        match value {
            Value::Null => Self::scalar(field, Ty::Any),
            Value::Bool(_) => Self::scalar(field, Ty::Bool),
            Value::Int(_) => Self::scalar(field, Ty::Int64),
            Value::Float(_) => Self::scalar(field, Ty::Float64),
            Value::String(_) => Self::scalar(field, Ty::String),
            Value::Array(items) => {
                let children = match (items.first(), empty) {
                    (Some(first), _) => vec![Self::build("", first, empty)],
                    (None, EmptyArrays::Any) => vec![Self::scalar("", Ty::Any)],
                    (None, EmptyArrays::Drop) => Vec::new(),
                };
                Self::new(field, NodeKind::Array, children)
            }
            Value::Object(map) => {
                let mut children: Vec<Node> = map
                    .iter()
                    .map(|(k, v)| Self::build(k, v, empty))
                    .collect();
                children.sort_by(|a, b| a.field.cmp(&b.field));
                Self::new(field, NodeKind::Object, children)
            }
        }
    }

    /// Canonical structural signature; equal fingerprints mean one shared declaration.
    pub fn fingerprint(&self) -> &str {
        self.fingerprint.get_or_init(|| self.compute_fingerprint())
    }

    fn compute_fingerprint(&self) -> String {
        match &self.kind {
            NodeKind::Scalar(ty) => ty.json(),
            NodeKind::Array => match self.children.first() {
                Some(child) => format!("[{}:{}]", child.field, child.fingerprint()),
                None => "[null]".to_string(),
            },
            NodeKind::Object => {
                let parts: Vec<String> = self
                    .children
                    .iter()
                    .map(|child| format!("{}:{}", child.field, child.fingerprint()))
                    .collect();
                format!("{{{}}}", parts.join(";"))
            }
        }
    }
}
