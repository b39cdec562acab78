use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::json;

use super::registry::{Arguments, Constructor};
use crate::constants::keys;
use crate::document::Node;
use crate::error::BuildError;

/// Anything a constructor can hand back inside an [`Object`].
pub trait Instance: fmt::Debug + 'static {
	fn as_any(&self) -> &dyn Any;

	fn to_json(&self) -> serde_json::Value {
		serde_json::Value::String(format!("{:?}", self))
	}
}

/// A constructed object. Clones share the same instance.
#[derive(Clone)]
pub struct Object {
	target: Rc<str>,
	instance: Rc<dyn Instance>,
}

impl Object {
	pub fn new<T: Instance>(target: &str, instance: T) -> Self {
		Object {
			target: Rc::from(target),
			instance: Rc::new(instance),
		}
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn instance(&self) -> &dyn Instance {
		&*self.instance
	}

	pub fn downcast_ref<T: Instance>(&self) -> Option<&T> {
		self.instance.as_any().downcast_ref::<T>()
	}

	/// Identity comparison
	pub fn ptr_eq(a: &Object, b: &Object) -> bool {
		Rc::as_ptr(&a.instance) as *const u8 == Rc::as_ptr(&b.instance) as *const u8
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self.instance.to_json() {
			serde_json::Value::Object(fields) => {
				let mut out = serde_json::Map::new();
				out.insert(keys::TARGET.to_string(), json!(self.target()));
				for (key, value) in fields {
					out.entry(key).or_insert(value);
				}
				serde_json::Value::Object(out)
			}
			other => {
				let mut out = serde_json::Map::new();
				out.insert(keys::TARGET.to_string(), json!(self.target()));
				out.insert("value".to_string(), other);
				serde_json::Value::Object(out)
			}
		}
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Object")
			.field("target", &self.target())
			.field("instance", &self.instance)
			.finish()
	}
}

/// A deferred constructor call with some arguments already bound.
pub struct Partial {
	target: String,
	path: String,
	constructor: Constructor,
	arguments: Arguments,
}

impl Partial {
	pub(crate) fn new(target: &str, path: &str, constructor: Constructor, arguments: Arguments) -> Self {
		Partial {
			target: target.to_string(),
			path: path.to_string(),
			constructor,
			arguments,
		}
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	/// Document path the partial was declared at
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn arguments(&self) -> &Arguments {
		&self.arguments
	}

	/// Invokes the constructor. Bound positionals come first; keywords given
	/// here replace bound keywords of the same name.
	pub fn call(&self, arguments: Arguments) -> Result<Value, BuildError> {
		let combined = self.arguments.clone().extend(arguments);
		self.constructor.invoke(&self.target, &self.path, combined)
	}

	pub fn to_json(&self) -> serde_json::Value {
		let mut out = serde_json::Map::new();
		out.insert(keys::TARGET.to_string(), json!(self.target));
		out.insert(keys::PARTIAL.to_string(), json!(true));
		if !self.arguments.positional.is_empty() {
			out.insert(
				keys::ARGS.to_string(),
				serde_json::Value::Array(self.arguments.positional.iter().map(Value::to_json).collect()),
			);
		}
		for (key, value) in &self.arguments.keyword {
			out.insert(key.clone(), value.to_json());
		}
		serde_json::Value::Object(out)
	}
}

impl fmt::Debug for Partial {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Partial")
			.field("target", &self.target)
			.field("path", &self.path)
			.field("arguments", &self.arguments)
			.finish()
	}
}

/// Result of building a node: plain data, constructed objects, or deferred calls.
#[derive(Debug, Clone)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	List(Vec<Value>),
	Dict(IndexMap<String, Value>),
	Object(Object),
	Partial(Rc<Partial>),
}

impl Value {
	/// Plain conversion without instantiating anything
	pub fn from_node(node: &Node) -> Value {
		match node {
			Node::Null => Value::Null,
			Node::Bool(b) => Value::Bool(*b),
			Node::Int(i) => Value::Int(*i),
			Node::Float(f) => Value::Float(*f),
			Node::Str(s) => Value::Str(s.clone()),
			Node::Seq(items) => Value::List(items.iter().map(|item| Value::from_node(item)).collect()),
			Node::Map(map) => Value::Dict(
				map.iter()
					.map(|(key, value)| (key.clone(), Value::from_node(value)))
					.collect(),
			),
		}
	}

	/// Conversion from JSON data, as used for declared parameter defaults
	pub fn from_json(json: &serde_json::Value) -> Value {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(*b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Value::Str(s.clone()),
			serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
			serde_json::Value::Object(map) => Value::Dict(
				map.iter()
					.map(|(key, value)| (key.clone(), Value::from_json(value)))
					.collect(),
			),
		}
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
			Value::List(_) => "list",
			Value::Dict(_) => "dict",
			Value::Object(_) => "object",
			Value::Partial(_) => "partial",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float(f) => Some(*f),
			Value::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&IndexMap<String, Value>> {
		match self {
			Value::Dict(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Value::Object(object) => Some(object),
			_ => None,
		}
	}

	pub fn as_partial(&self) -> Option<&Rc<Partial>> {
		match self {
			Value::Partial(partial) => Some(partial),
			_ => None,
		}
	}

	/// Looks up a key when this value is a dict
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_dict().and_then(|map| map.get(key))
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => json!(b),
			Value::Int(i) => json!(i),
			Value::Float(f) => serde_json::Number::from_f64(*f)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::Str(s) => json!(s),
			Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
			Value::Dict(map) => serde_json::Value::Object(
				map.iter()
					.map(|(key, value)| (key.clone(), value.to_json()))
					.collect(),
			),
			Value::Object(object) => object.to_json(),
			Value::Partial(partial) => partial.to_json(),
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Value::List(items.into_iter().map(Into::into).collect())
	}
}

impl From<Object> for Value {
	fn from(object: Object) -> Self {
		Value::Object(object)
	}
}

/// Generic instance for targets that only record their bound arguments.
#[derive(Debug)]
pub struct Component {
	pub target: String,
	pub args: IndexMap<String, Value>,
}

impl Instance for Component {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.args
				.iter()
				.map(|(key, value)| (key.clone(), value.to_json()))
				.collect(),
		)
	}
}
