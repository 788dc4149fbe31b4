use serde::{Deserialize, Serialize};

/// Outcome of validating a rule or filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result from collected error messages; no errors means valid
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn ok() -> Self {
        Self::from_errors(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_errors() {
        assert!(ValidationResult::ok().valid);
        let result = ValidationResult::from_errors(vec!["bad".to_string()]);
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["bad"]);
    }
}
