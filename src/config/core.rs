use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::Serialize;
use std::path::Path;

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct PwordcountConfig {
    figment: Figment,
}

impl PwordcountConfig {
    /// Build the layered configuration.
    ///
    /// Priority, lowest first: embedded defaults, user config, repository
    /// config, `custom_config`, `PWORDCOUNT_` environment variables, then
    /// `cli_overrides`.
    pub fn load<T: Serialize>(custom_config: Option<&str>, cli_overrides: Option<T>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let user_base = Self::user_config_base_path();
        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            // User config - support multiple formats
            .merge(Toml::file(format!("{user_base}.toml")))
            .merge(Json::file(format!("{user_base}.json")))
            .merge(Yaml::file(format!("{user_base}.yaml")))
            // Repository config - support multiple formats
            .merge(Toml::file("pwordcount.toml"))
            .merge(Json::file("pwordcount.json"))
            .merge(Yaml::file("pwordcount.yaml"));

        if let Some(custom_path) = custom_config {
            figment = Self::merge_custom(figment, custom_path)?;
        }

        // Environment variables override every file
        figment = figment.merge(Env::prefixed("PWORDCOUNT_").split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(PwordcountConfig { figment })
    }

    /// An explicitly requested file must exist; its format follows the extension
    fn merge_custom(figment: Figment, custom_path: &str) -> Result<Figment> {
        let path = Path::new(custom_path);
        if !path.is_file() {
            bail!("Config file not found: {}", custom_path);
        }
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => figment.merge(Json::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
        Ok(figment)
    }

    /// The typed, validated settings
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .context("Invalid pwordcount configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// The effective settings rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        let settings = self.settings()?;
        toml::to_string_pretty(&settings).context("Failed to render configuration")
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/pwordcount/config", home),
            Err(_) => "~/.config/pwordcount/config".to_string(),
        }
    }
}
