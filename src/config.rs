use crate::constants::keys;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone)]
pub struct LoaderConfig {
	pub merge_key: String,
	pub allow_duplicate_keys: bool,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			merge_key: keys::MERGE.to_string(),
			allow_duplicate_keys: false,
		}
	}
}

impl LoaderConfig {
	pub fn builder() -> LoaderConfigBuilder {
		LoaderConfigBuilder::default()
	}

	pub fn validate(&self) -> Result<()> {
		if self.merge_key.is_empty() {
			return Err(ConfigError::InvalidParameter("Merge key must not be empty".into()));
		}
		Ok(())
	}
}

#[derive(Default)]
pub struct LoaderConfigBuilder {
	merge_key: Option<String>,
	allow_duplicate_keys: Option<bool>,
}

impl LoaderConfigBuilder {
	pub fn merge_key(mut self, key: impl Into<String>) -> Self {
		self.merge_key = Some(key.into());
		self
	}

	pub fn allow_duplicate_keys(mut self, allow: bool) -> Self {
		self.allow_duplicate_keys = Some(allow);
		self
	}

	pub fn build(self) -> LoaderConfig {
		LoaderConfig {
			merge_key: self.merge_key.unwrap_or_else(|| keys::MERGE.to_string()),
			allow_duplicate_keys: self.allow_duplicate_keys.unwrap_or(false),
		}
	}
}

/// Reserved key names recognised inside target mappings.
#[derive(Debug, Clone)]
pub struct BuildConfig {
	pub target_key: String,
	pub partial_key: String,
	pub args_key: String,
	pub recursive_key: String,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			target_key: keys::TARGET.to_string(),
			partial_key: keys::PARTIAL.to_string(),
			args_key: keys::ARGS.to_string(),
			recursive_key: keys::RECURSIVE.to_string(),
		}
	}
}

impl BuildConfig {
	pub fn builder() -> BuildConfigBuilder {
		BuildConfigBuilder::default()
	}

	pub fn validate(&self) -> Result<()> {
		let named = [
			("Target key", &self.target_key),
			("Partial key", &self.partial_key),
			("Args key", &self.args_key),
			("Recursive key", &self.recursive_key),
		];
		for (label, key) in named.iter() {
			if key.is_empty() {
				return Err(ConfigError::InvalidParameter(format!("{} must not be empty", label)));
			}
		}
		for (i, (label, key)) in named.iter().enumerate() {
			if let Some((other, _)) = named[i + 1..].iter().find(|(_, k)| k == key) {
				return Err(ConfigError::InvalidParameter(format!(
					"{} and {} must differ (both are '{}')",
					label, other, key
				)));
			}
		}
		Ok(())
	}

	/// True for the reserved keys that never become constructor arguments
	pub fn is_reserved(&self, key: &str) -> bool {
		key == self.target_key || key == self.partial_key || key == self.args_key || key == self.recursive_key
	}
}

#[derive(Default)]
pub struct BuildConfigBuilder {
	target_key: Option<String>,
	partial_key: Option<String>,
	args_key: Option<String>,
	recursive_key: Option<String>,
}

impl BuildConfigBuilder {
	pub fn target_key(mut self, key: impl Into<String>) -> Self {
		self.target_key = Some(key.into());
		self
	}

	pub fn partial_key(mut self, key: impl Into<String>) -> Self {
		self.partial_key = Some(key.into());
		self
	}

	pub fn args_key(mut self, key: impl Into<String>) -> Self {
		self.args_key = Some(key.into());
		self
	}

	pub fn recursive_key(mut self, key: impl Into<String>) -> Self {
		self.recursive_key = Some(key.into());
		self
	}

	pub fn build(self) -> BuildConfig {
		BuildConfig {
			target_key: self.target_key.unwrap_or_else(|| keys::TARGET.to_string()),
			partial_key: self.partial_key.unwrap_or_else(|| keys::PARTIAL.to_string()),
			args_key: self.args_key.unwrap_or_else(|| keys::ARGS.to_string()),
			recursive_key: self.recursive_key.unwrap_or_else(|| keys::RECURSIVE.to_string()),
		}
	}
}
