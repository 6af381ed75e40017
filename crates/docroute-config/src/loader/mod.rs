//! Layered configuration loader with requirement constraints.
//!
//! Discovers configuration layers (system/user/project/etc), validates schema,
//! merges them honoring locked requirement keys, and produces a final
//! `DocrouteConfig`.

mod layer_io;
mod merge;
mod schema;
mod utils;


use crate::{ConfigError, DocrouteConfig, IntentTriggers, UrgencyKeywords};
use docroute_protocol::IntentLabel;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "docroute.json5";
/// Default config directory under user or repo roots.
const DEFAULT_CONFIG_DIR: &str = ".docroute";
/// Marker files/dirs that identify a project root.
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

#[cfg(unix)]
/// Default system config path on Unix.
const SYSTEM_CONFIG_PATH: &str = "/etc/docroute/docroute.json5";
#[cfg(unix)]
/// Default requirements path on Unix.
const SYSTEM_REQUIREMENTS_PATH: &str = "/etc/docroute/requirements.json5";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: DocrouteConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// Locked keys that later layers cannot override.
    Requirements,
    /// System-wide configuration.
    System,
    /// User-specific configuration.
    User,
    /// Project root configuration.
    Project,
    /// Current working directory configuration.
    Cwd,
    /// Repo-local configuration.
    Repo,
    /// Runtime overrides (highest precedence).
    Runtime,
}

impl ConfigLayerSource {
    /// Short name used in logs and error paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLayerSource::Requirements => "requirements",
            ConfigLayerSource::System => "system",
            ConfigLayerSource::User => "user",
            ConfigLayerSource::Project => "project",
            ConfigLayerSource::Cwd => "cwd",
            ConfigLayerSource::Repo => "repo",
            ConfigLayerSource::Runtime => "runtime",
        }
    }
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to resolve local layers.
    pub cwd: PathBuf,
    /// Optional system config path (defaults to `/etc/docroute/docroute.json5` on Unix).
    pub system_config_path: Option<PathBuf>,
    /// Optional user config path (defaults to `~/.docroute/docroute.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Optional requirements path for locked settings.
    pub requirements_path: Option<PathBuf>,
    /// Runtime override config paths applied last.
    pub runtime_paths: Vec<PathBuf>,
    /// Marker files/dirs used to detect the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::default_system_config_path(),
            user_config_path: layer_io::default_user_config_path(),
            requirements_path: layer_io::default_requirements_path(),
            runtime_paths: Vec::new(),
            project_root_markers: DEFAULT_PROJECT_ROOT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl DocrouteConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations and overrides.
    ///
    /// Layer precedence (low -> high): system, user, project, cwd, repo,
    /// runtime overrides. Keys present in the requirements layer are locked
    /// to the requirement value.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        debug!("normalized cwd for config load: {}", cwd.display());

        let requirements = layer_io::load_optional_layer(
            ConfigLayerSource::Requirements,
            options.requirements_path.as_deref(),
        )?;

        let mut candidates: Vec<(ConfigLayerSource, PathBuf)> = Vec::new();
        if let Some(path) = options.system_config_path.clone() {
            candidates.push((ConfigLayerSource::System, path));
        }
        if let Some(path) = options.user_config_path.clone() {
            candidates.push((ConfigLayerSource::User, path));
        }
        match utils::find_project_root(&cwd, &options.project_root_markers) {
            Some(project_root) => {
                debug!("resolved project root: {}", project_root.display());
                candidates.push((
                    ConfigLayerSource::Project,
                    project_root.join(DEFAULT_CONFIG_FILE),
                ));
                candidates.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE)));
                candidates.push((
                    ConfigLayerSource::Repo,
                    project_root
                        .join(DEFAULT_CONFIG_DIR)
                        .join(DEFAULT_CONFIG_FILE),
                ));
            }
            None => {
                debug!("project root not found; skipping project/repo layers");
                candidates.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE)));
            }
        }

        let mut seen_paths = HashSet::new();
        let mut loaded = Vec::new();
        for (source, path) in candidates {
            if !seen_paths.insert(utils::unique_path(&path)) {
                debug!(
                    "skipping duplicate layer (source={}, path={})",
                    source.as_str(),
                    path.display()
                );
                continue;
            }
            if let Some(layer) = layer_io::load_optional_layer(source, Some(&path))? {
                loaded.push(layer);
            }
        }
        for path in &options.runtime_paths {
            loaded.push(layer_io::load_required_layer(
                ConfigLayerSource::Runtime,
                path,
            )?);
        }

        let locked = requirements.as_ref().map(|layer| &layer.value);
        let mut merged = Value::Object(serde_json::Map::new());
        for layer in &loaded {
            merge::merge_layer(&mut merged, &layer.value, locked);
        }
        if let Some(locked) = locked {
            merge::merge_layer(&mut merged, locked, None);
        }

        let mut layers: Vec<ConfigLayer> = Vec::new();
        layers.extend(requirements.map(|layer| layer.meta));
        layers.extend(loaded.into_iter().map(|layer| layer.meta));

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_triggers(&self.classifier.triggers)?;
        let min_score = self.classifier.min_score;
        if !(0.0..1.0).contains(&min_score) {
            return Err(invalid("classifier.min_score", "must be within [0, 1)"));
        }
        if self.detector.email_header_window == 0 {
            return Err(invalid(
                "detector.email_header_window",
                "must be greater than zero",
            ));
        }
        validate_urgency(&self.handlers.urgency)?;
        let sizes = [
            ("handlers.body_excerpt_chars", self.handlers.body_excerpt_chars),
            ("handlers.text_excerpt_chars", self.handlers.text_excerpt_chars),
            ("memory.excerpt_chars", self.memory.excerpt_chars),
        ];
        if let Some((path, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(invalid(path, "must be greater than zero"));
        }
        if self.memory.max_records == Some(0) {
            return Err(invalid("memory.max_records", "must be greater than zero"));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(invalid(
                "server.max_upload_bytes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn validate_triggers(triggers: &IntentTriggers) -> Result<(), ConfigError> {
    for intent in IntentLabel::PRIORITY {
        for (idx, trigger) in triggers.for_intent(intent).iter().enumerate() {
            if trigger.trim().is_empty() {
                return Err(invalid(
                    &format!("classifier.triggers.{intent}[{idx}]"),
                    "trigger must not be empty",
                ));
            }
        }
    }
    Ok(())
}

fn validate_urgency(urgency: &UrgencyKeywords) -> Result<(), ConfigError> {
    for (level, keywords) in [("high", &urgency.high), ("medium", &urgency.medium)] {
        if let Some(idx) = keywords.iter().position(|keyword| keyword.trim().is_empty()) {
            return Err(invalid(
                &format!("handlers.urgency.{level}[{idx}]"),
                "keyword must not be empty",
            ));
        }
    }
    Ok(())
}

fn invalid(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn config_from_value(value: Value, label: &str) -> Result<DocrouteConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: DocrouteConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
