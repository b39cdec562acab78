use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning document text into a resolved node tree.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("Parse error at line {line}, column {column}: {message}")]
	Parse { line: usize, column: usize, message: String },

	#[error("Unresolved anchor '{name}' at line {line}, column {column}")]
	UnresolvedAnchor { name: String, line: usize, column: usize },
}

impl LoadError {
	pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
		LoadError::Parse {
			line,
			column,
			message: message.into(),
		}
	}

	/// 1-based line and column of the offending token
	pub fn location(&self) -> (usize, usize) {
		match self {
			LoadError::Parse { line, column, .. } | LoadError::UnresolvedAnchor { line, column, .. } => {
				(*line, *column)
			}
		}
	}
}

/// Why a set of arguments could not be bound to a constructor signature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentErrorKind {
	#[error("missing required argument '{0}'")]
	Missing(String),

	#[error("unexpected argument '{0}'")]
	Unexpected(String),

	#[error("argument '{0}' given both positionally and by keyword")]
	Duplicate(String),

	#[error("takes at most {expected} positional arguments but {given} were given")]
	TooManyPositional { expected: usize, given: usize },
}

/// Errors raised while instantiating target mappings.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("Unknown target '{target}' at {path}")]
	UnknownTarget { target: String, path: String },

	#[error("Invalid arguments for '{target}' at {path}: {kind}")]
	Argument {
		target: String,
		path: String,
		kind: ArgumentErrorKind,
	},

	#[error("Malformed target mapping at {path}: {message}")]
	MalformedTarget { path: String, message: String },

	#[error("Failed to construct '{target}' at {path}: {message}")]
	Construction {
		target: String,
		path: String,
		message: String,
	},
}

impl BuildError {
	/// Document path of the target mapping that failed
	pub fn path(&self) -> &str {
		match self {
			BuildError::UnknownTarget { path, .. }
			| BuildError::Argument { path, .. }
			| BuildError::MalformedTarget { path, .. }
			| BuildError::Construction { path, .. } => path,
		}
	}
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error(transparent)]
	Load(#[from] LoadError),

	#[error(transparent)]
	Build(#[from] BuildError),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("Serialization error: {0}")]
	Serialization(String),

	#[error("Invalid parameter: {0}")]
	InvalidParameter(String),

	#[error("Invalid input: {0}")]
	InvalidInput(String),

	#[error("File not found: {}", .0.display())]
	FileNotFound(PathBuf),
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		ConfigError::Serialization(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, ConfigError>;
