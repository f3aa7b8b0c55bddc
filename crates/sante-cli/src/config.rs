//! Pipeline configuration loaded from `sante.toml`.
//!
//! Every section is optional; a missing file means the built-in defaults,
//! which describe the public datasets the pipeline was built for.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sante_ingest::ContainerKind;
use sante_model::RegionCorrections;
use sante_store::WriteMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "sante.toml";

/// Name of the quality report written next to the merged CSV.
pub const REPORT_FILE_NAME: &str = "rapport_qualite.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub database: DatabaseConfig,
    /// Region corrections merged over the built-in table.
    pub regions: BTreeMap<String, String>,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub output_file: PathBuf,
    /// Where stored rows are exported before a replace; no backup when unset.
    pub backup_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("donnees_sante"),
            output_file: PathBuf::from("sortie/maladies_clean.csv"),
            backup_dir: Some(PathBuf::from("sortie/sauvegardes")),
        }
    }
}

impl PathsConfig {
    /// Directory receiving the per-disease CSVs and the quality report.
    pub fn output_dir(&self) -> PathBuf {
        self.output_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    pub fn report_file(&self) -> PathBuf {
        self.output_dir().join(REPORT_FILE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub mode: WriteMode,
    pub enabled: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sortie/sante.db"),
            mode: WriteMode::Replace,
            enabled: true,
        }
    }
}

/// One source file and the disease its rows belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Path relative to `paths.data_dir` (or absolute).
    pub file: PathBuf,
    pub disease: String,
    /// Container kind; inferred from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContainerKind>,
    /// Where the file is published. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SourceConfig {
    pub fn new(name: &str, file: &str, disease: &str) -> Self {
        Self {
            name: name.to_string(),
            file: PathBuf::from(file),
            disease: disease.to_string(),
            kind: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.file)
    }

    pub fn resolved_kind(&self) -> Option<ContainerKind> {
        self.kind.or_else(|| ContainerKind::from_path(&self.file))
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("inca_mco", "inca_donnees_mco_2025.xlsx", "cancer").with_url(
            "https://static.data.gouv.fr/resources/donnees-dactivite-de-cancerologie-des-etablissements-de-sante-en-france/20251022-142956/inca-donnees-mco-10.2025.xlsx",
        ),
        SourceConfig::new("inca_smr", "inca_donnees_smr_2025.xlsx", "cancer").with_url(
            "https://static.data.gouv.fr/resources/donnees-dactivite-de-cancerologie-des-etablissements-de-sante-en-france/20251022-143107/inca-donnees-smr-10.2025.xlsx",
        ),
        SourceConfig::new("inca_had", "inca_donnees_had_2025.xlsx", "cancer").with_url(
            "https://static.data.gouv.fr/resources/donnees-dactivite-en-lien-avec-le-cancer-dans-les-etablissements-de-sante-en-france/20251104-131101/inca-donnees-had-10.2025.xlsx",
        ),
        SourceConfig::new("hdh_top_diabete", "top_diabete.zip", "diabete").with_url(
            "https://static.data.gouv.fr/resources/donnees-synthetiques-top-diabete/20240425-162212/snds-20240425t154700z-001.zip",
        ),
        SourceConfig::new(
            "cardio_mortalite",
            "cardio_mortalite_page.html",
            "cardiovasculaire",
        )
        .with_url("https://www.data.gouv.fr/fr/datasets/mortalite-due-aux-maladies-cardiovasculaires/"),
        SourceConfig::new("deces_sida", "deces_sida_page.html", "sida")
            .with_url("https://www.data.gouv.fr/fr/datasets/deces-par-sida-vih/"),
        SourceConfig::new("insee_pop", "insee_population_2019.csv", "insee").with_url(
            "https://www.insee.fr/fr/statistiques/fichier/3698339/population-legale-2019.csv",
        ),
        SourceConfig::new("diabete", "diabete.csv", "diabete"),
        SourceConfig::new("cardio", "cardio.csv", "cardio"),
        SourceConfig::new("cancer", "cancer.csv", "cancer"),
    ]
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        tracing::info!(path = %path.display(), sources = config.sources.len(), "loaded config");
        Ok(config)
    }

    /// Loads `explicit` when given, else `./sante.toml` when it exists, else
    /// the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(fallback)
        } else {
            tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    /// Built-in region corrections extended with the configured ones.
    pub fn region_corrections(&self) -> RegionCorrections {
        RegionCorrections::default().with_overrides(
            self.regions
                .iter()
                .map(|(from, to)| (from.clone(), to.clone())),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            database: DatabaseConfig::default(),
            regions: BTreeMap::new(),
            sources: default_sources(),
        }
    }
}
