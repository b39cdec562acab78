mod common;
pub mod build;
pub mod check;
pub mod generate_config;
pub mod resolve;
pub mod targets;

pub use self::build::build;
pub use self::check::check;
pub use self::common::settings_from_args;
pub use self::generate_config::generate_config;
pub use self::resolve::resolve;
pub use self::targets::targets;
