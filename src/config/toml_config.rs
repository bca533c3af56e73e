use crate::core::catalog::AddonBindings;
use crate::domain::ports::{BindingProvider, ConfigProvider};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub bindings: AddonBindings,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: String,
    pub seed_defaults: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "catalog.json".to_string(),
            seed_defaults: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            formats: vec!["json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl PricingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            PricingError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&mut self, data_dir: Option<&str>, catalog_path: Option<&str>) {
        if let Some(dir) = data_dir {
            tracing::debug!("data_dir overridden to {}", dir);
            self.output.data_dir = dir.to_string();
        }
        if let Some(path) = catalog_path {
            tracing::debug!("catalog.path overridden to {}", path);
            self.catalog.path = path.to_string();
        }
    }

    pub fn addon_bindings(&self) -> AddonBindings {
        AddonBindings::from_provider(self)
    }

    /// Audit the catalog before each checkout and log what it finds.
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("catalog.path", &self.catalog.path)?;
        validation::validate_path("output.data_dir", &self.output.data_dir)?;

        validation::validate_non_empty_string("bindings.f4", &self.bindings.f4)?;
        validation::validate_non_empty_string("bindings.a3", &self.bindings.a3)?;
        validation::validate_non_empty_string("bindings.full_color", &self.bindings.full_color)?;

        if self.output.formats.is_empty() {
            return Err(PricingError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        validation::validate_allowed_values("output.formats", &self.output.formats, &OUTPUT_FORMATS)?;

        if let Some(level) = self.log_level() {
            validation::validate_allowed_values(
                "monitoring.log_level",
                &[level.to_string()],
                &LOG_LEVELS,
            )?;
        }

        Ok(())
    }
}

impl BindingProvider for PricingConfig {
    fn f4_fragment(&self) -> &str {
        &self.bindings.f4
    }

    fn a3_fragment(&self) -> &str {
        &self.bindings.a3
    }

    fn full_color_fragment(&self) -> &str {
        &self.bindings.full_color
    }
}

impl ConfigProvider for PricingConfig {
    fn catalog_path(&self) -> &str {
        &self.catalog.path
    }

    fn data_dir(&self) -> &str {
        &self.output.data_dir
    }

    fn seed_defaults(&self) -> bool {
        self.catalog.seed_defaults
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for PricingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
