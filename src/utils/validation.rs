use crate::utils::error::{Result, RunnerError};
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();

    if raw.is_empty() {
        return Err(RunnerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.contains('\0') {
        return Err(RunnerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A file name placed inside each experiment entry: exactly one normal component.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RunnerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name cannot be empty or whitespace-only".to_string(),
        });
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\', '\0']) => Ok(()),
        _ => Err(RunnerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Must be a plain file name without directory parts".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| RunnerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("executable", Path::new("/code/build/src/21344")).is_ok());
        assert!(validate_path("executable", Path::new("")).is_err());
        assert!(validate_path("executable", Path::new("bad\0path")).is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("layout.config_file", "config.json").is_ok());
        assert!(validate_file_name("layout.config_file", "").is_err());
        assert!(validate_file_name("layout.config_file", "  ").is_err());
        assert!(validate_file_name("layout.config_file", "sub/config.json").is_err());
        assert!(validate_file_name("layout.config_file", "..").is_err());
        assert!(validate_file_name("layout.config_file", ".").is_err());
        assert!(validate_file_name("layout.config_file", "/abs.json").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("runner.executable", &missing),
            Err(RunnerError::MissingConfigError { .. })
        ));

        let present = Some("x".to_string());
        assert_eq!(validate_required_field("runner.executable", &present).unwrap(), "x");
    }
}
