//! Layered configuration loading.
//!
//! Later layers win: built-in defaults, the per-user `config.toml`, an
//! explicitly named file, then `DARKROOM_*` environment variables.

use crate::error::{ErrorKind, Result};
use crate::gallery::GalleryConfig;
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::Path;
use tracing::instrument;

pub const APP_NAME: &str = "darkroom";
pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "DARKROOM_";

/// Loads and validates the gallery configuration.
///
/// `explicit` must exist when given; its format follows its extension
/// (`.yaml`/`.yml`, `.json`, anything else is TOML). Nested environment keys
/// are separated by `__`.
///
/// # Errors
///
/// [`ErrorKind::Load`] if a source cannot be read or parsed, otherwise the
/// first validation error.
#[instrument(skip_all, fields(explicit = ?explicit))]
pub fn load(explicit: Option<&Path>) -> Result<GalleryConfig> {
    let mut figment = Figment::from(Serialized::defaults(GalleryConfig::default()));

    if let Some(dirs) = ProjectDirs::from("", "", APP_NAME) {
        let user = dirs.config_dir().join(CONFIG_FILE);
        tracing::debug!(path = %user.display(), exists = user.is_file(), "User configuration");
        figment = figment.merge(Toml::file(user));
    }

    if let Some(path) = explicit {
        if !path.is_file() {
            exn::bail!(ErrorKind::Load(format!("no such file: {}", path.display())));
        }
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        figment = match extension.as_deref() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            _ => figment.merge(Toml::file_exact(path)),
        };
    }

    let config: GalleryConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ErrorKind::Load(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
