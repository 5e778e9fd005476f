//! Catalog records and loaders for the Orrery workspace.
//!
//! A catalog maps body names to [`BodyRecord`]s. Every quantity is SI and
//! every angle is in radians. Catalogs can be YAML, TOML or JSON files, or a
//! directory of TOML files that each hold part of the catalog.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body records keyed by body name.
pub type Catalog = BTreeMap<String, BodyRecord>;

/// One celestial body as written in a catalog.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BodyRecord {
    #[serde(default)]
    pub radius: f64,
    /// Takes precedence over `mass` when both are non-zero.
    #[serde(default)]
    pub gravitational_parameter: f64,
    #[serde(default)]
    pub mass: f64,
    /// Sidereal rotation period (s); negative for retrograde rotation, zero
    /// for a tidally locked body.
    #[serde(default)]
    pub rotational_period: f64,
    #[serde(default, alias = "north_pole")]
    pub positive_pole: Option<PoleRecord>,
    #[serde(default)]
    pub orbit: Option<OrbitRecord>,
}

/// Equatorial direction of a rotational pole.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoleRecord {
    pub right_ascension: f64,
    pub declination: f64,
    #[serde(default = "infinite_distance")]
    pub distance: f64,
}

fn infinite_distance() -> f64 {
    f64::INFINITY
}

/// Keplerian elements of a body around a named primary.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OrbitRecord {
    pub primary: String,
    pub semi_major_axis: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub longitude_of_ascending_node: f64,
    #[serde(default)]
    pub inclination: f64,
    #[serde(default)]
    pub argument_of_periapsis: f64,
    /// Seconds since J2000.
    #[serde(default)]
    pub epoch: f64,
    #[serde(default)]
    pub mean_anomaly_at_epoch: f64,
}

/// Vehicle configuration parsed from vehicle catalogs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VehicleConfig {
    pub name: String,
    pub dry_mass_kg: f64,
    pub propellant_mass_kg: f64,
    pub thrust_newtons: f64,
    pub isp_seconds: f64,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("body '{name}' is defined twice (again in {path})")]
    DuplicateBody { name: String, path: PathBuf },
}

/// On-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// `.toml` and `.json` are recognised; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Format::Toml,
            Some("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Parse a catalog held in memory.
pub fn parse_catalog(contents: &str, format: Format) -> Result<Catalog, ConfigError> {
    Ok(match format {
        Format::Yaml => serde_yaml::from_str(contents)?,
        Format::Toml => toml::from_str(contents)?,
        Format::Json => serde_json::from_str(contents)?,
    })
}

/// Load a body catalog from a file or from a directory of TOML files.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    if path.is_dir() {
        return read_dir_catalog(path);
    }
    let contents = std::fs::read_to_string(path)?;
    parse_catalog(&contents, Format::from_path(path))
}

fn read_dir_catalog(dir: &Path) -> Result<Catalog, ConfigError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();

    let mut catalog = Catalog::new();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let part: Catalog = toml::from_str(&contents)?;
        for (name, record) in part {
            if catalog.contains_key(&name) {
                return Err(ConfigError::DuplicateBody { name, path });
            }
            catalog.insert(name, record);
        }
    }
    Ok(catalog)
}

/// Load vehicle configurations from a YAML file.
pub fn load_vehicle_configs<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleConfig>, ConfigError> {
    let reader = File::open(path)?;
    Ok(serde_yaml::from_reader(reader)?)
}
