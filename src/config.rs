//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sundial/sundial.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `SUNDIAL__*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::LayoutConfig;
use crate::infrastructure::svg::SvgStyle;

const ENV_PREFIX: &str = "SUNDIAL";

/// How records become a hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HierarchySettings {
    /// Reject duplicate ids and unresolved parents instead of warning
    pub strict: bool,
}

/// Unified configuration for sundial.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub hierarchy: HierarchySettings,
    pub svg: SvgStyle,
}

/// Get the XDG config directory for sundial.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sundial").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sundial.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// A missing global file is skipped; a missing `local` file is an error.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(
            global.as_deref(),
            local,
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Load from explicit sources; `env` is the last layer.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        let defaults = toml::to_string(&Settings::default()).map_err(|e| ApplicationError::Config {
            message: format!("serialize defaults: {e}"),
        })?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(path) = global {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        if let Some(path) = local {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(env.separator("__").try_parsing(true));

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        let layout = &self.layout;
        if !(layout.max_radius.is_finite() && layout.max_radius > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("layout.max_radius must be positive, got {}", layout.max_radius),
            });
        }
        if !(layout.margin.is_finite() && layout.margin >= 0.0) {
            return Err(ApplicationError::Config {
                message: format!("layout.margin must not be negative, got {}", layout.margin),
            });
        }
        if !(self.svg.max_weight.is_finite() && self.svg.max_weight > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("svg.max_weight must be positive, got {}", self.svg.max_weight),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sundial configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sundial/sundial.toml
#   Local:  file passed with --config
#   Env:    SUNDIAL__<SECTION>__<KEY>, e.g. SUNDIAL__LAYOUT__MAX_RADIUS=400

[layout]
# Outer radius of the chart area
# max_radius = 290.0

# Gap subtracted from both sides of every ring
# margin = 5.0

# "split" always slices, "single_slice_ring" draws an only child as a full ring
# render_mode = "split"

# "equal_split" shares the span equally when sibling weights are unusable,
# "propagate" keeps NaN angles
# weight_policy = "equal_split"

# Deepest ring to draw below the focus (unbounded when unset)
# max_depth = 4

[hierarchy]
# Fail on duplicate ids and unknown parents instead of warning
# strict = false

[svg]
# padding = 10.0
# stroke = "white"
# supporting_rgb = [0, 128, 0]
# opposing_rgb = [255, 0, 0]

# Weight at which an arc becomes fully transparent
# max_weight = 10.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RenderMode, WeightPolicy};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> Environment {
        Environment::with_prefix("SUNDIAL_TEST_NONE").source(Some(HashMap::new()))
    }

    #[test]
    fn given_no_files_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None, no_env()).expect("load defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.layout.max_radius, 290.0);
        assert!(!settings.hierarchy.strict);
    }

    #[test]
    fn given_global_and_local_when_loading_then_local_wins() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        fs::write(&global, "[layout]\nmax_radius = 400.0\nmargin = 2.0\n").unwrap();
        fs::write(&local, "[layout]\nmargin = 1.0\nrender_mode = \"single_slice_ring\"\n").unwrap();

        // Act
        let settings = Settings::load_from(Some(&global), Some(&local), no_env()).unwrap();

        // Assert
        assert_eq!(settings.layout.max_radius, 400.0);
        assert_eq!(settings.layout.margin, 1.0);
        assert_eq!(settings.layout.render_mode, RenderMode::SingleSliceRing);
        assert_eq!(settings.layout.weight_policy, WeightPolicy::EqualSplit);
    }

    #[test]
    fn given_env_override_when_loading_then_env_wins() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("local.toml");
        fs::write(&local, "[hierarchy]\nstrict = false\n").unwrap();
        let env = Environment::with_prefix("SUNDIAL").source(Some(HashMap::from([
            ("SUNDIAL__HIERARCHY__STRICT".to_string(), "true".to_string()),
            ("SUNDIAL__LAYOUT__MAX_DEPTH".to_string(), "3".to_string()),
        ])));

        let settings = Settings::load_from(None, Some(&local), env).unwrap();

        assert!(settings.hierarchy.strict);
        assert_eq!(settings.layout.max_depth, Some(3));
    }

    #[test]
    fn given_missing_local_file_when_loading_then_config_error() {
        let result = Settings::load_from(None, Some(Path::new("/nonexistent/sundial.toml")), no_env());
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_negative_radius_when_loading_then_rejected() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("local.toml");
        fs::write(&local, "[layout]\nmax_radius = -1.0\n").unwrap();

        let result = Settings::load_from(None, Some(&local), no_env());

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
