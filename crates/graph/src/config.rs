use serde::{Deserialize, Serialize};

/// Product type CocoaPods uses for resource bundles. Bundles cannot hold
/// executables on iOS, so no build artifacts need dependency ordering.
pub const RESOURCE_BUNDLE_PRODUCT_TYPE: &str = "com.apple.product-type.bundle";

/// Worklist pops allowed per target during closure expansion
pub const DEFAULT_STEP_BUDGET: usize = 10_000;

/// Configuration for dependency resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Ceiling on worklist pops per target. The `seen` set already guarantees
    /// termination; hitting this means the graph is larger than expected.
    pub step_budget: usize,

    /// Native targets with one of these product types are not candidates and
    /// never appear as anyone's dependency
    pub excluded_product_types: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            step_budget: DEFAULT_STEP_BUDGET,
            excluded_product_types: vec![RESOURCE_BUNDLE_PRODUCT_TYPE.to_string()],
        }
    }
}

impl ResolverConfig {
    /// Override the step budget
    pub fn with_step_budget(mut self, step_budget: usize) -> Self {
        self.step_budget = step_budget;
        self
    }

    pub fn is_excluded(&self, product_type: Option<&str>) -> bool {
        product_type.is_some_and(|ty| self.excluded_product_types.iter().any(|ex| ex == ty))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.step_budget == 0 {
            return Err("step_budget must be > 0".to_string());
        }

        if let Some(empty) = self.excluded_product_types.iter().position(|ty| ty.trim().is_empty()) {
            return Err(format!("excluded_product_types[{empty}] is empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_resource_bundles() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_excluded(Some(RESOURCE_BUNDLE_PRODUCT_TYPE)));
        assert!(!config.is_excluded(Some("com.apple.product-type.framework")));
        assert!(!config.is_excluded(None));
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = ResolverConfig::default().with_step_budget(0);
        assert!(config.validate().unwrap_err().contains("step_budget"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"step_budget": 64}"#).unwrap();
        assert_eq!(config.step_budget, 64);
        assert_eq!(
            config.excluded_product_types,
            vec![RESOURCE_BUNDLE_PRODUCT_TYPE.to_string()]
        );
    }
}
