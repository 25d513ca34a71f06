//! Configuration for flowgate components.
//!
//! Configuration sources (highest priority first):
//! 1. Explicit `--config` path
//! 2. Config file (.flowgate/config.yaml) found in the current directory or a parent
//! 3. Defaults: a single file-backed component under $FLOWGATE_HOME (~/.flowgate)
//!
//! Relative paths in a config file are resolved against the project root,
//! the directory containing `.flowgate/`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::adapters::{FileEngine, MemoryEngine, WorkflowComponent};
use crate::core::ComponentRegistry;

/// Name of the component used when no config file exists
pub const DEFAULT_COMPONENT_NAME: &str = "default";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub default_component: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// State directory for file components (relative to the project root)
    #[serde(default)]
    pub state_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Memory,
    File,
}

/// A component ready to be instantiated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedComponent {
    Memory { name: String },
    File { name: String, state_dir: PathBuf },
}

impl ResolvedComponent {
    pub fn name(&self) -> &str {
        match self {
            Self::Memory { name } | Self::File { name, .. } => name,
        }
    }

    /// Instantiate the engine behind this component
    pub async fn build(&self) -> Result<Arc<dyn WorkflowComponent>> {
        let component: Arc<dyn WorkflowComponent> = match self {
            Self::Memory { .. } => Arc::new(MemoryEngine::new()),
            Self::File { name, state_dir } => Arc::new(
                FileEngine::open(state_dir)
                    .await
                    .with_context(|| format!("Failed to open component '{}'", name))?,
            ),
        };
        Ok(component)
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to flowgate home
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Component used when a caller does not name one
    pub default_component: Option<String>,
    pub components: Vec<ResolvedComponent>,
}

impl ResolvedConfig {
    /// Build the component registry shared by all calls
    pub async fn build_registry(&self) -> Result<ComponentRegistry> {
        let mut registry = ComponentRegistry::new();
        for component in &self.components {
            let engine = component.build().await?;
            debug!(name = component.name(), kind = engine.name(), "Registered workflow component");
            registry.register(component.name(), engine);
        }
        Ok(registry)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".flowgate").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Default home directory ($FLOWGATE_HOME or ~/.flowgate)
fn flowgate_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("FLOWGATE_HOME") {
        return Ok(PathBuf::from(home));
    }

    Ok(dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".flowgate"))
}

/// Resolve components and check the file for inconsistencies
fn resolve_config(
    config: ConfigFile,
    config_path: &Path,
    home: PathBuf,
) -> Result<ResolvedConfig> {
    // .flowgate/config.yaml -> project root
    let base_dir = config_path
        .parent()
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));

    if config.components.is_empty() {
        anyhow::bail!("Config file {} defines no components", config_path.display());
    }

    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(config.components.len());
    for component in config.components {
        if component.name.is_empty() {
            anyhow::bail!("Component names must not be empty");
        }
        if !seen.insert(component.name.clone()) {
            anyhow::bail!("Component '{}' is defined more than once", component.name);
        }

        components.push(match component.kind {
            ComponentKind::Memory => ResolvedComponent::Memory {
                name: component.name,
            },
            ComponentKind::File => {
                let state_dir = match component.state_dir {
                    Some(ref dir) => resolve_path(base_dir, dir),
                    None => home.join("state").join(&component.name),
                };
                ResolvedComponent::File {
                    name: component.name,
                    state_dir,
                }
            }
        });
    }

    if let Some(ref default) = config.default_component {
        if !seen.contains(default) {
            anyhow::bail!("Default component '{}' is not defined", default);
        }
    }

    Ok(ResolvedConfig {
        home,
        config_file: Some(config_path.to_path_buf()),
        default_component: config.default_component,
        components,
    })
}

/// Configuration used when no config file exists
fn default_config(home: PathBuf) -> ResolvedConfig {
    let state_dir = home.join("state");
    ResolvedConfig {
        home,
        config_file: None,
        default_component: Some(DEFAULT_COMPONENT_NAME.to_string()),
        components: vec![ResolvedComponent::File {
            name: DEFAULT_COMPONENT_NAME.to_string(),
            state_dir,
        }],
    }
}

/// Load configuration, from `explicit` if given, otherwise by discovery
pub fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let home = flowgate_home()?;

    let config_path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    match config_path {
        Some(path) => {
            let config = load_config_file(&path)?;
            resolve_config(config, &path, home)
        }
        None => Ok(default_config(home)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, yaml: &str) -> PathBuf {
        let dir = temp.path().join(".flowgate");
        std::fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", yaml).unwrap();
        config_path
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
default_component: local
components:
  - name: local
    type: file
    state_dir: ./state
  - name: scratch
    type: memory
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.default_component.as_deref(), Some("local"));
        assert_eq!(config.components.len(), 2);
        assert_eq!(config.components[0].kind, ComponentKind::File);
        assert_eq!(config.components[1].kind, ComponentKind::Memory);
        assert!(config.components[1].state_dir.is_none());

        let home = PathBuf::from("/test/.flowgate");
        let resolved = resolve_config(config, &config_path, home).unwrap();
        assert_eq!(
            resolved.components[0],
            ResolvedComponent::File {
                name: "local".to_string(),
                state_dir: temp.path().join("./state"),
            }
        );
        assert_eq!(resolved.components[1].name(), "scratch");
        assert_eq!(resolved.config_file, Some(config_path));
    }

    #[test]
    fn test_file_component_defaults_to_home_state() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
components:
  - name: durable
    type: file
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        let resolved =
            resolve_config(config, &config_path, PathBuf::from("/test/.flowgate")).unwrap();
        assert_eq!(
            resolved.components[0],
            ResolvedComponent::File {
                name: "durable".to_string(),
                state_dir: PathBuf::from("/test/.flowgate/state/durable"),
            }
        );
        assert!(resolved.default_component.is_none());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let cases = [
            "version: \"1.0\"\ncomponents: []\n",
            "version: \"1.0\"\ncomponents:\n  - name: \"\"\n    type: memory\n",
            concat!(
                "version: \"1.0\"\ncomponents:\n",
                "  - name: a\n    type: memory\n",
                "  - name: a\n    type: memory\n",
            ),
            "version: \"1.0\"\ndefault_component: b\ncomponents:\n  - name: a\n    type: memory\n",
        ];

        for yaml in cases {
            let temp = TempDir::new().unwrap();
            let config_path = write_config(&temp, yaml);
            let config = load_config_file(&config_path).unwrap();
            assert!(
                resolve_config(config, &config_path, PathBuf::from("/home")).is_err(),
                "expected rejection of:\n{yaml}"
            );
        }
    }

    #[test]
    fn test_unknown_component_type_fails_to_parse() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            "version: \"1.0\"\ncomponents:\n  - name: a\n    type: redis\n",
        );
        assert!(load_config_file(&config_path).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = default_config(PathBuf::from("/test/.flowgate"));
        assert!(config.config_file.is_none());
        assert_eq!(config.default_component.as_deref(), Some(DEFAULT_COMPONENT_NAME));
        assert_eq!(
            config.components,
            vec![ResolvedComponent::File {
                name: DEFAULT_COMPONENT_NAME.to_string(),
                state_dir: PathBuf::from("/test/.flowgate/state"),
            }]
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/./subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[tokio::test]
    async fn test_build_registry() {
        let temp = TempDir::new().unwrap();
        let config = ResolvedConfig {
            home: temp.path().to_path_buf(),
            config_file: None,
            default_component: None,
            components: vec![
                ResolvedComponent::Memory {
                    name: "scratch".to_string(),
                },
                ResolvedComponent::File {
                    name: "durable".to_string(),
                    state_dir: temp.path().join("state"),
                },
            ],
        };

        let registry = config.build_registry().await.unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["durable", "scratch"]);
        assert_eq!(registry.get("durable").unwrap().name(), "file");
        assert!(temp.path().join("state").is_dir());
    }
}
