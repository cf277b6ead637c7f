//! Component registry: which repositories to verify and how to run them.
//!
//! The registry is a YAML document (`components.yaml` by convention) with an
//! ordered list of components plus optional command overrides:
//!
//! ```yaml
//! components:
//!   - name: lib-parser
//!     repo: https://github.com/example/lib-parser
//!     default_version: "2.1"
//! install_command: ["composer", "install", "--no-interaction"]
//! test_command: ["vendor/bin/phpunit"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RelcheckError, Result};

/// One verifiable component: a named git repository with an optional
/// default version prefix used when the invoker supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,

    /// Clone URL or local path of the component repository.
    pub repo: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
}

/// Parsed registry document.
///
/// Component order is preserved; reports list components in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub components: Vec<Component>,

    /// Dependency installation argv, run inside each sandbox after checkout.
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,

    /// Test suite argv, run inside each sandbox after installation.
    #[serde(default = "default_test_command")]
    pub test_command: Vec<String>,
}

fn default_install_command() -> Vec<String> {
    vec![
        "composer".to_string(),
        "install".to_string(),
        "--no-interaction".to_string(),
        "--prefer-dist".to_string(),
        "--no-ansi".to_string(),
    ]
}

fn default_test_command() -> Vec<String> {
    vec![
        "php".to_string(),
        "vendor/bin/micro-testing-tool".to_string(),
        "test:all".to_string(),
    ]
}

impl Registry {
    /// Load and validate a registry file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RelcheckError::RegistryNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        let registry: Registry = serde_yaml::from_str(&raw)?;
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(RelcheckError::EmptyRegistry);
        }
        for component in &self.components {
            if component.name.trim().is_empty() {
                return Err(RelcheckError::InvalidRegistry(
                    "component with empty name".to_string(),
                ));
            }
            if component.repo.trim().is_empty() {
                return Err(RelcheckError::InvalidRegistry(format!(
                    "component '{}' has no repo",
                    component.name
                )));
            }
        }
        if self.install_command.is_empty() {
            return Err(RelcheckError::InvalidRegistry(
                "install_command must not be empty".to_string(),
            ));
        }
        if self.test_command.is_empty() {
            return Err(RelcheckError::InvalidRegistry(
                "test_command must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Select components to verify: `"all"` keeps every entry in registry
    /// order, any other value selects the single component with that name.
    pub fn select(&self, component_filter: &str) -> Result<Vec<Component>> {
        if component_filter == "all" {
            return Ok(self.components.clone());
        }
        let selected: Vec<Component> = self
            .components
            .iter()
            .filter(|c| c.name == component_filter)
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(RelcheckError::UnknownComponent(
                component_filter.to_string(),
            ));
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> Registry {
        serde_yaml::from_str(
            r#"
components:
  - name: lib-parser
    repo: https://github.com/example/lib-parser
    default_version: "2.1"
  - name: lib-codec
    repo: https://github.com/example/lib-codec
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_components() {
        let registry = sample_registry();
        assert_eq!(registry.components.len(), 2);
        assert_eq!(registry.components[0].name, "lib-parser");
        assert_eq!(
            registry.components[0].default_version.as_deref(),
            Some("2.1")
        );
        assert_eq!(registry.components[1].default_version, None);
    }

    #[test]
    fn test_default_commands() {
        let registry = sample_registry();
        assert_eq!(registry.install_command[0], "composer");
        assert_eq!(registry.test_command[0], "php");
    }

    #[test]
    fn test_command_overrides() {
        let registry: Registry = serde_yaml::from_str(
            r#"
components:
  - name: svc
    repo: https://github.com/example/svc
install_command: ["npm", "ci"]
test_command: ["npm", "test"]
"#,
        )
        .unwrap();
        assert_eq!(registry.install_command, vec!["npm", "ci"]);
        assert_eq!(registry.test_command, vec!["npm", "test"]);
    }

    #[test]
    fn test_select_all_preserves_order() {
        let registry = sample_registry();
        let selected = registry.select("all").unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "lib-parser");
        assert_eq!(selected[1].name, "lib-codec");
    }

    #[test]
    fn test_select_single() {
        let registry = sample_registry();
        let selected = registry.select("lib-codec").unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "lib-codec");
    }

    #[test]
    fn test_select_unknown_component() {
        let registry = sample_registry();
        let err = registry.select("nope").unwrap_err();
        assert!(matches!(err, RelcheckError::UnknownComponent(name) if name == "nope"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Registry::load(&dir.path().join("components.yaml")).unwrap_err();
        assert!(matches!(err, RelcheckError::RegistryNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.yaml");
        std::fs::write(
            &path,
            "components:\n  - name: svc\n    repo: https://github.com/example/svc\n",
        )
        .unwrap();
        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.components.len(), 1);
    }

    #[test]
    fn test_empty_registry_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.yaml");
        std::fs::write(&path, "components: []\n").unwrap();
        let err = Registry::load(&path).unwrap_err();
        assert!(matches!(err, RelcheckError::EmptyRegistry));
    }

    #[test]
    fn test_component_without_repo_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.yaml");
        std::fs::write(&path, "components:\n  - name: svc\n    repo: \"\"\n").unwrap();
        let err = Registry::load(&path).unwrap_err();
        assert!(matches!(err, RelcheckError::InvalidRegistry(_)));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components.yaml");
        std::fs::write(&path, "components: {not a list").unwrap();
        let err = Registry::load(&path).unwrap_err();
        assert!(matches!(err, RelcheckError::Yaml(_)));
    }
}
