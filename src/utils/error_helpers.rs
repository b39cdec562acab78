use crate::error::{ConfigError, Result};
use std::io;

pub trait IoErrorMapper<T> {
    fn map_io_err(self) -> Result<T>;
}

impl<T> IoErrorMapper<T> for std::result::Result<T, io::Error> {
    fn map_io_err(self) -> Result<T> {
        self.map_err(ConfigError::Io)
    }
}

pub trait ParseErrorMapper<T> {
    fn map_parse_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ParseErrorMapper<T> for std::result::Result<T, E> {
    fn map_parse_err(self, context: &str) -> Result<T> {
        self.map_err(|e| ConfigError::Parse(format!("{}: {}", context, e)))
    }
}

pub trait SerializeErrorMapper<T> {
    fn map_serialize_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> SerializeErrorMapper<T> for std::result::Result<T, E> {
    fn map_serialize_err(self, context: &str) -> Result<T> {
        self.map_err(|e| ConfigError::Serialization(format!("{}: {}", context, e)))
    }
}
