use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::value::{Component, Object, Value};
use crate::config_file::TargetSection;
use crate::error::{ArgumentErrorKind, BuildError, ConfigError, Result};

/// Constructor parameter; `default: None` marks it required.
#[derive(Debug, Clone)]
pub struct Param {
	pub name: String,
	pub default: Option<Value>,
}

impl Param {
	pub fn is_required(&self) -> bool {
		self.default.is_none()
	}
}

/// Ordered parameter list of a constructor.
#[derive(Debug, Clone, Default)]
pub struct Signature {
	params: Vec<Param>,
	variadic: bool,
}

impl Signature {
	pub fn new() -> Self {
		Self::default()
	}

	/// Signature accepting any keyword arguments and no positionals
	pub fn variadic() -> Self {
		Signature {
			params: Vec::new(),
			variadic: true,
		}
	}

	pub fn required(mut self, name: impl Into<String>) -> Self {
		self.params.push(Param {
			name: name.into(),
			default: None,
		});
		self
	}

	pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
		self.params.push(Param {
			name: name.into(),
			default: Some(default.into()),
		});
		self
	}

	pub fn with_variadic(mut self, variadic: bool) -> Self {
		self.variadic = variadic;
		self
	}

	pub fn params(&self) -> &[Param] {
		&self.params
	}

	pub fn is_variadic(&self) -> bool {
		self.variadic
	}

	/// Binds call arguments to parameters. With `allow_missing` set, required
	/// parameters may stay unbound (used for partial calls).
	pub fn bind(&self, arguments: Arguments, allow_missing: bool) -> std::result::Result<BoundArguments, ArgumentErrorKind> {
		let Arguments { positional, keyword } = arguments;
		if positional.len() > self.params.len() {
			return Err(ArgumentErrorKind::TooManyPositional {
				expected: self.params.len(),
				given: positional.len(),
			});
		}

		let mut given: IndexMap<String, Value> = self
			.params
			.iter()
			.zip(positional)
			.map(|(param, value)| (param.name.clone(), value))
			.collect();

		let mut extra = IndexMap::new();
		for (name, value) in keyword {
			if self.params.iter().any(|param| param.name == name) {
				if given.contains_key(&name) {
					return Err(ArgumentErrorKind::Duplicate(name));
				}
				given.insert(name, value);
			} else if self.variadic {
				extra.insert(name, value);
			} else {
				return Err(ArgumentErrorKind::Unexpected(name));
			}
		}

		let mut values = IndexMap::new();
		for param in &self.params {
			match given.swap_remove(&param.name) {
				Some(value) => {
					values.insert(param.name.clone(), value);
				}
				None => match &param.default {
					Some(default) => {
						values.insert(param.name.clone(), default.clone());
					}
					None if allow_missing => {}
					None => return Err(ArgumentErrorKind::Missing(param.name.clone())),
				},
			}
		}

		Ok(BoundArguments { values, extra })
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut parts: Vec<String> = self
			.params
			.iter()
			.map(|param| match &param.default {
				None => param.name.clone(),
				Some(default) => format!("{}={}", param.name, default.to_json()),
			})
			.collect();
		if self.variadic {
			parts.push("**kwargs".to_string());
		}
		write!(f, "({})", parts.join(", "))
	}
}

/// Unbound call arguments.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
	pub positional: Vec<Value>,
	pub keyword: IndexMap<String, Value>,
}

impl Arguments {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn arg(mut self, value: impl Into<Value>) -> Self {
		self.positional.push(value.into());
		self
	}

	pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.keyword.insert(name.into(), value.into());
		self
	}

	/// Appends positionals and overrides keywords with those of `later`
	pub fn extend(mut self, later: Arguments) -> Self {
		self.positional.extend(later.positional);
		for (name, value) in later.keyword {
			self.keyword.insert(name, value);
		}
		self
	}

	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.keyword.is_empty()
	}
}

/// Arguments after binding, in signature order with defaults filled.
#[derive(Debug, Clone, Default)]
pub struct BoundArguments {
	values: IndexMap<String, Value>,
	extra: IndexMap<String, Value>,
}

impl BoundArguments {
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name).or_else(|| self.extra.get(name))
	}

	pub fn value(&self, name: &str) -> std::result::Result<&Value, String> {
		self.get(name).ok_or_else(|| format!("argument '{}' is not bound", name))
	}

	pub fn int(&self, name: &str) -> std::result::Result<i64, String> {
		let value = self.value(name)?;
		value
			.as_i64()
			.ok_or_else(|| format!("'{}' must be an int, found a {}", name, value.type_name()))
	}

	pub fn int_list(&self, name: &str) -> std::result::Result<Vec<i64>, String> {
		let value = self.value(name)?;
		let items = value
			.as_list()
			.ok_or_else(|| format!("'{}' must be a list of ints, found a {}", name, value.type_name()))?;
		items
			.iter()
			.map(|item| {
				item.as_i64()
					.ok_or_else(|| format!("'{}' must contain only ints, found a {}", name, item.type_name()))
			})
			.collect()
	}

	pub fn str_list(&self, name: &str) -> std::result::Result<Vec<String>, String> {
		let value = self.value(name)?;
		let items = value
			.as_list()
			.ok_or_else(|| format!("'{}' must be a list of strings, found a {}", name, value.type_name()))?;
		items
			.iter()
			.map(|item| {
				item.as_str()
					.map(str::to_string)
					.ok_or_else(|| format!("'{}' must contain only strings, found a {}", name, item.type_name()))
			})
			.collect()
	}

	pub fn object(&self, name: &str) -> std::result::Result<Object, String> {
		let value = self.value(name)?;
		value
			.as_object()
			.cloned()
			.ok_or_else(|| format!("'{}' must be a built object, found a {}", name, value.type_name()))
	}

	pub fn extra(&self) -> &IndexMap<String, Value> {
		&self.extra
	}

	/// All bound values followed by the variadic extras
	pub fn into_map(self) -> IndexMap<String, Value> {
		let mut all = self.values;
		all.extend(self.extra);
		all
	}
}

pub type ConstructorFn = dyn Fn(BoundArguments) -> std::result::Result<Value, String>;

/// A named constructor: signature plus the function invoked with bound arguments.
#[derive(Clone)]
pub struct Constructor {
	signature: Rc<Signature>,
	func: Rc<ConstructorFn>,
}

impl Constructor {
	pub fn new<F>(signature: Signature, func: F) -> Self
	where
		F: Fn(BoundArguments) -> std::result::Result<Value, String> + 'static,
	{
		Constructor {
			signature: Rc::new(signature),
			func: Rc::new(func),
		}
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	/// Binds strictly and calls the constructor, attributing failures to `target` at `path`
	pub fn invoke(&self, target: &str, path: &str, arguments: Arguments) -> std::result::Result<Value, BuildError> {
		let bound = self.signature.bind(arguments, false).map_err(|kind| BuildError::Argument {
			target: target.to_string(),
			path: path.to_string(),
			kind,
		})?;
		(self.func)(bound).map_err(|message| BuildError::Construction {
			target: target.to_string(),
			path: path.to_string(),
			message,
		})
	}
}

impl fmt::Debug for Constructor {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Constructor{}", self.signature)
	}
}

/// Maps target names to constructors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
	constructors: IndexMap<String, Constructor>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry preloaded with the ESRGAN discriminator constructors
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		crate::models::register_builtins(&mut registry);
		registry
	}

	pub fn register<F>(&mut self, name: &str, signature: Signature, func: F) -> &mut Self
	where
		F: Fn(BoundArguments) -> std::result::Result<Value, String> + 'static,
	{
		self.constructors.insert(name.to_string(), Constructor::new(signature, func));
		self
	}

	/// Registers a target whose instances are [`Component`]s recording their arguments
	pub fn register_component(&mut self, name: &str, signature: Signature) -> &mut Self {
		let target = name.to_string();
		self.register(name, signature, move |bound| {
			Ok(Value::Object(Object::new(
				&target,
				Component {
					target: target.clone(),
					args: bound.into_map(),
				},
			)))
		})
	}

	/// Makes `alias` resolve to the constructor registered as `existing`
	pub fn alias(&mut self, alias: &str, existing: &str) -> Result<&mut Self> {
		let constructor = self
			.constructors
			.get(existing)
			.cloned()
			.ok_or_else(|| ConfigError::InvalidParameter(format!("Cannot alias unknown target '{}'", existing)))?;
		self.constructors.insert(alias.to_string(), constructor);
		Ok(self)
	}

	/// Registers a target declared in a settings file, together with its aliases
	pub fn register_declared(&mut self, declared: &TargetSection) -> Result<&mut Self> {
		let signature = declared.to_signature()?;
		self.register_component(&declared.name, signature);
		for alias in &declared.aliases {
			self.alias(alias, &declared.name)?;
		}
		Ok(self)
	}

	pub fn get(&self, name: &str) -> Option<&Constructor> {
		self.constructors.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.constructors.contains_key(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.constructors.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.constructors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.constructors.is_empty()
	}
}
