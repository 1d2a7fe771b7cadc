//! Module argument loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ModuleArgs;
use crate::config::validation::{validate_args, ValidationError};

/// Key under which the orchestration engine may wrap the arguments.
const ARGS_ENVELOPE: &str = "ANSIBLE_MODULE_ARGS";

/// Error type for argument loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Parse error: {}", e),
            ConfigError::Toml(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Args file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgsFormat {
    Json,
    Toml,
}

impl ArgsFormat {
    /// `.toml` files are TOML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ArgsFormat::Toml,
            _ => ArgsFormat::Json,
        }
    }
}

/// Parse and validate arguments from a string.
pub fn parse_args(content: &str, format: ArgsFormat) -> Result<ModuleArgs, ConfigError> {
    let args: ModuleArgs = match format {
        ArgsFormat::Toml => toml::from_str(content).map_err(ConfigError::Toml)?,
        ArgsFormat::Json => {
            let mut value: serde_json::Value =
                serde_json::from_str(content).map_err(ConfigError::Json)?;
            if let Some(inner) = value.get_mut(ARGS_ENVELOPE) {
                value = inner.take();
            }
            serde_json::from_value(value).map_err(ConfigError::Json)?
        }
    };

    validate_args(&args).map_err(ConfigError::Validation)?;

    Ok(args)
}

/// Load and validate arguments from a JSON or TOML file.
pub fn load_args(path: &Path) -> Result<ModuleArgs, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_args(&content, ArgsFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::State;

    #[test]
    fn test_envelope_is_unwrapped() {
        let args = parse_args(
            r#"{"ANSIBLE_MODULE_ARGS": {"vpc_id": "vpc-1", "state": "absent"}}"#,
            ArgsFormat::Json,
        )
        .unwrap();
        assert_eq!(args.vpc_id, "vpc-1");
        assert_eq!(args.state, State::Absent);
    }

    #[test]
    fn test_toml_args() {
        let args = parse_args(
            r#"
vpc_id = "vpc-1"
subnets = ["subnet-1", "Database Subnet"]

[resource_tags]
Name = "Public"

[[routes]]
dest = "0.0.0.0/0"
gateway_id = "igw"
"#,
            ArgsFormat::Toml,
        )
        .unwrap();
        assert_eq!(args.resource_tags.unwrap().get("Name").unwrap(), "Public");
        assert_eq!(args.routes.unwrap().len(), 1);
        assert_eq!(args.subnets.unwrap()[1], "Database Subnet");
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = parse_args(
            r#"{"vpc_id": "", "subnets": [""]}"#,
            ArgsFormat::Json,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: vpc_id is required, subnets[0] is empty"
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ArgsFormat::from_path(Path::new("args.TOML")), ArgsFormat::Toml);
        assert_eq!(ArgsFormat::from_path(Path::new("/tmp/tmpab12cd")), ArgsFormat::Json);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_args(Path::new("/nonexistent/args.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
