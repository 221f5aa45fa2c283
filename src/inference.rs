//! Schema unification engine.
//!
//! Walk a shape-annotated [`Node`] tree bottom-up, merge structurally
//! identical objects into one named declaration, and collect declarations in
//! dependency order (children before parents, root last).
//!
//! Design goals:
//! - Dedup key is the node fingerprint; equal shape ⇒ one declaration.
//! - Names are unique per run; collisions resolve deterministically.
//! - All run state lives in a [`Unifier`] that is consumed by [`Unifier::unify`],
//!   so two conversions never observe each other's names or fingerprints.
pub mod node;
pub mod value;

use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

pub use node::{EmptyArrays, Node, NodeKind};
pub use value::Value;

use crate::ident::{self, Acronyms};
use crate::ir::{Member, Struct, TagStyle, Ty};

// ------------------------------- Policy ---------------------------------- //

const MAX_NUMERIC_SUFFIX: u32 = 999; // seed01 ..= seed999, then seed + "a"
const FALLBACK_NAME: &str = "Struct";

// ------------------------------- State ----------------------------------- //

/// Per-run unification context.
pub struct Unifier<'a> {
    tags: &'a TagStyle,
    by_fingerprint: HashMap<String, String>,
    names: HashSet<String>,
    structs: Vec<Struct>,
}

// ------------------------------ Driver ----------------------------------- //

impl<'a> Unifier<'a> {
    pub fn new(tags: &'a TagStyle) -> Self {
        Self {
            tags,
            by_fingerprint: HashMap::new(),
            names: HashSet::new(),
            structs: Vec::new(),
        }
    }

    /// Unify `root` and return every emitted declaration plus the member
    /// describing the root itself (`None` when the root is an empty array).
    pub fn unify(mut self, root: &Node) -> (Vec<Struct>, Option<Member>) {
        let member = self.unify_node(root, &root.field);
        debug!(
            structs = self.structs.len(),
            shapes = self.by_fingerprint.len(),
            "unified node tree"
        );
        (self.structs, member)
    }

    fn unify_node(&mut self, node: &Node, field: &str) -> Option<Member> {
        match &node.kind {
            NodeKind::Scalar(ty) => Some(self.member(field, ty.clone())),
            NodeKind::Array => {
                // The sampled element is named after the array that holds it.
                let child = node.children.first()?;
                let child_ty = self
                    .unify_node(child, field)
                    .map(|m| m.ty)
                    .unwrap_or(Ty::Any);
                Some(self.member(field, Ty::array(child_ty)))
            }
            NodeKind::Object => Some(self.unify_object(node, field)),
        }
    }

    fn unify_object(&mut self, node: &Node, field: &str) -> Member {
        let fingerprint = node.fingerprint();
        if let Some(name) = self.by_fingerprint.get(fingerprint).cloned() {
            trace!(field, name = name.as_str(), "reusing declaration for identical shape");
            return self.member(field, Ty::structure(name));
        }

        let name = self.unique_name(&seed_name(field));
        self.names.insert(name.clone());

        let mut decl = Struct::new(Ty::structure(name.clone()));
        for (position, child) in node.children.iter().enumerate() {
            if let Some(member) = self.unify_node(child, &child.field) {
                decl.members.push(member.with_index(position as i64 + 1));
            }
        }
        trace!(name = name.as_str(), members = decl.members.len(), "declared struct");
        self.structs.push(decl);
        self.by_fingerprint.insert(fingerprint.to_string(), name.clone());

        self.member(field, Ty::structure(name))
    }

    fn member(&self, field: &str, ty: Ty) -> Member {
        let member = Member::new(field, ty);
        match self.tags.annotate(field) {
            Some(tag) => member.with_tag(tag),
            None => member,
        }
    }

    fn unique_name(&self, seed: &str) -> String {
        if !self.names.contains(seed) {
            return seed.to_string();
        }
        for n in 1..=MAX_NUMERIC_SUFFIX {
            let candidate = format!("{seed}{n:02}");
            if !self.names.contains(&candidate) {
                trace!(seed, name = candidate.as_str(), "resolved name collision");
                return candidate;
            }
        }
        self.unique_name(&format!("{seed}a"))
    }
}

// ------------------------- INTERNAL HELPERS ------------------------------ //

fn seed_name(field: &str) -> String {
    ident::camel_case(&ident::normalize_token(field, FALLBACK_NAME), &Acronyms::none())
}
