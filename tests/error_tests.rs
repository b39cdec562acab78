use srgan_config::error::{ArgumentErrorKind, BuildError, ConfigError, LoadError};
use srgan_config::{load_str, ObjectGraphBuilder, Registry};
use std::io;
use std::path::PathBuf;

#[test]
fn test_io_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
    let config_err: ConfigError = io_err.into();

    match config_err {
        ConfigError::Io(_) => (),
        _ => panic!("Expected Io error variant"),
    }
}

#[test]
fn test_error_display() {
    let err = ConfigError::InvalidParameter("test parameter".to_string());
    assert_eq!(format!("{}", err), "Invalid parameter: test parameter");

    let err = ConfigError::FileNotFound(PathBuf::from("/test/path"));
    assert_eq!(format!("{}", err), "File not found: /test/path");

    let err = LoadError::parse(3, 7, "did not find expected node content");
    assert_eq!(
        format!("{}", err),
        "Parse error at line 3, column 7: did not find expected node content"
    );

    let err = BuildError::Argument {
        target: "torch.optim.Adam".to_string(),
        path: "optimizer".to_string(),
        kind: ArgumentErrorKind::Missing("params".to_string()),
    };
    assert_eq!(
        format!("{}", err),
        "Invalid arguments for 'torch.optim.Adam' at optimizer: missing required argument 'params'"
    );
}

#[test]
fn test_load_error_is_transparent() {
    let load_err = load_str("a: *nowhere\n").unwrap_err();
    let message = load_err.to_string();
    let config_err: ConfigError = load_err.into();
    assert_eq!(config_err.to_string(), message);
    assert!(matches!(config_err, ConfigError::Load(LoadError::UnresolvedAnchor { .. })));
}

#[test]
fn test_build_error_conversion() {
    let root = load_str("model: {_target_: Missing}\n").unwrap();
    let build_err = ObjectGraphBuilder::new(&Registry::new()).build(&root).unwrap_err();
    assert_eq!(build_err.path(), "model");
    let config_err: ConfigError = build_err.into();
    assert_eq!(config_err.to_string(), "Unknown target 'Missing' at model");
}

#[test]
fn test_serde_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let config_err: ConfigError = json_err.into();
    assert!(matches!(config_err, ConfigError::Serialization(_)));
}

#[test]
fn test_too_many_positional_display() {
    let kind = ArgumentErrorKind::TooManyPositional { expected: 1, given: 3 };
    assert_eq!(kind.to_string(), "takes at most 1 positional arguments but 3 were given");
}
