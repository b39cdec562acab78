use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::constants::path;

/// Shared handle to a node. Aliases clone the handle, never the subtree.
pub type NodeRef = Rc<Node>;

/// Mapping with insertion order preserved.
pub type Mapping = IndexMap<String, NodeRef>;

/// A resolved document node: a scalar, a sequence or a mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	Seq(Vec<NodeRef>),
	Map(Mapping),
}

impl Node {
	pub fn type_name(&self) -> &'static str {
		match self {
			Node::Null => "null",
			Node::Bool(_) => "bool",
			Node::Int(_) => "int",
			Node::Float(_) => "float",
			Node::Str(_) => "string",
			Node::Seq(_) => "sequence",
			Node::Map(_) => "mapping",
		}
	}

	pub fn is_scalar(&self) -> bool {
		!matches!(self, Node::Seq(_) | Node::Map(_))
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Node::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Node::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Node::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Floats, with integers widened
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Node::Float(f) => Some(*f),
			Node::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Node::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_seq(&self) -> Option<&[NodeRef]> {
		match self {
			Node::Seq(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&Mapping> {
		match self {
			Node::Map(map) => Some(map),
			_ => None,
		}
	}

	/// Looks up a key when this node is a mapping
	pub fn get(&self, key: &str) -> Option<&NodeRef> {
		self.as_map().and_then(|map| map.get(key))
	}

	/// True when this node is a mapping carrying `target_key`
	pub fn is_target(&self, target_key: &str) -> bool {
		self.get(target_key).is_some()
	}

	/// Follows a dotted path such as `model.layers.0`. Numeric segments index
	/// into sequences; an empty path returns `node` itself.
	pub fn select(node: &NodeRef, dotted: &str) -> Option<NodeRef> {
		let mut current = Rc::clone(node);
		if dotted.is_empty() {
			return Some(current);
		}
		for segment in dotted.split(path::SEPARATOR) {
			let next = match &*current {
				Node::Map(map) => map.get(segment).cloned(),
				Node::Seq(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
				_ => None,
			}?;
			current = next;
		}
		Some(current)
	}

	/// Text used when a scalar appears as a mapping key
	pub fn key_text(&self) -> Option<String> {
		match self {
			Node::Null => Some("null".to_string()),
			Node::Bool(b) => Some(b.to_string()),
			Node::Int(i) => Some(i.to_string()),
			Node::Float(f) => Some(f.to_string()),
			Node::Str(s) => Some(s.clone()),
			Node::Seq(_) | Node::Map(_) => None,
		}
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match serde_json::to_string(self) {
			Ok(text) => write!(f, "{}", text),
			Err(_) => write!(f, "<{}>", self.type_name()),
		}
	}
}

impl Serialize for Node {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Node::Null => serializer.serialize_unit(),
			Node::Bool(b) => serializer.serialize_bool(*b),
			Node::Int(i) => serializer.serialize_i64(*i),
			Node::Float(f) => serializer.serialize_f64(*f),
			Node::Str(s) => serializer.serialize_str(s),
			Node::Seq(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(&**item)?;
				}
				seq.end()
			}
			Node::Map(map) => {
				let mut out = serializer.serialize_map(Some(map.len()))?;
				for (key, value) in map {
					out.serialize_entry(key, &**value)?;
				}
				out.end()
			}
		}
	}
}

/// Appends a key or index to a dotted document path
pub(crate) fn join_path(parent: &str, segment: &str) -> String {
	if parent.is_empty() || parent == path::ROOT {
		segment.to_string()
	} else {
		format!("{}{}{}", parent, path::SEPARATOR, segment)
	}
}

pub(crate) fn display_path(path: &str) -> String {
	if path.is_empty() {
		path::ROOT.to_string()
	} else {
		path.to_string()
	}
}
