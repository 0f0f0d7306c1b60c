//! External tool detection.
//!
//! The [`ToolRegistry`] discovers and caches the location of the external
//! transcoder binary and provides lookup for the rest of the crate.

use std::collections::HashMap;
use std::path::PathBuf;

use clipkit_core::{EngineConfig, Error, Result};

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg"];

/// Configuration for a single external tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Human-readable tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Registry holding discovered tool configurations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// If the config supplies a custom path **and** that path exists, it is
    /// used directly. Otherwise [`which::which`] locates the tool in `PATH`.
    /// Tools that are not found are silently omitted from the registry;
    /// lookup through [`require`](Self::require) reports them.
    pub fn discover(config: &EngineConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffmpeg" => config.ffmpeg_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                _ => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Return the [`ToolConfig`] for the given tool, or [`Error::Tool`] if
    /// the tool was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| Error::Tool {
            tool: name.to_string(),
            message: format!("{name} not found; is it installed and in PATH?"),
        })
    }

    /// Whether the named tool was found.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_with_default_config() {
        // ffmpeg may or may not be installed in CI, but discovery itself
        // must not panic either way.
        let registry = ToolRegistry::discover(&EngineConfig::default());
        let _ = registry.contains("ffmpeg");
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::discover(&EngineConfig::default());
        let result = registry.require("nonexistent_tool_xyz");
        assert!(result.is_err());
    }

    #[test]
    fn nonexistent_override_falls_back_to_path() {
        let config = EngineConfig {
            ffmpeg_path: Some(PathBuf::from("/definitely/not/here/ffmpeg")),
            temp_dir: None,
        };
        let registry = ToolRegistry::discover(&config);
        if let Ok(tool) = registry.require("ffmpeg") {
            assert_ne!(tool.path, PathBuf::from("/definitely/not/here/ffmpeg"));
        }
    }
}
