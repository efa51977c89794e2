//! Points of interest, grouped by province.
//!
//! The catalog is loaded once at startup from `pois_<province>.json` files and is
//! read-only afterwards. Vehicles keep a shared handle to their province's list.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::SimError;
use crate::spatial::Coordinate;

const FILE_PREFIX: &str = "pois_";
const FILE_SUFFIX: &str = ".json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointOfInterest {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Error)]
enum PoiFileError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode POI list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Province id → ordered POI list.
#[derive(Debug, Clone, Default)]
pub struct PoiCatalog {
    provinces: BTreeMap<String, Arc<[PointOfInterest]>>,
}

impl PoiCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, province: impl Into<String>, pois: Vec<PointOfInterest>) {
        self.provinces.insert(province.into(), pois.into());
    }

    pub fn with_province(
        mut self,
        province: impl Into<String>,
        pois: Vec<PointOfInterest>,
    ) -> Self {
        self.insert(province, pois);
        self
    }

    pub fn get(&self, province: &str) -> Option<&Arc<[PointOfInterest]>> {
        self.provinces.get(province)
    }

    pub fn provinces(&self) -> impl Iterator<Item = &str> {
        self.provinces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    /// Loads every `pois_<province>.json` file in `dir`.
    ///
    /// Unreadable or malformed files are logged and skipped; zero loaded provinces
    /// (including a missing directory) is an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, SimError> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(dir = %dir.display(), %error, "POI directory is not readable");
                return Err(SimError::NoProvincesLoaded {
                    dir: dir.to_path_buf(),
                });
            }
        };

        let mut files: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let province = province_from_file_name(file_name.to_str()?)?;
                Some((province.to_string(), entry.path()))
            })
            .collect();
        files.sort();

        for (province, path) in files {
            match read_poi_file(&path) {
                Ok(pois) => {
                    info!(province = %province, count = pois.len(), "loaded POIs");
                    catalog.insert(province, pois);
                }
                Err(error) => {
                    warn!(file = %path.display(), %error, "skipping POI source");
                }
            }
        }

        if catalog.is_empty() {
            return Err(SimError::NoProvincesLoaded {
                dir: dir.to_path_buf(),
            });
        }
        Ok(catalog)
    }
}

/// `pois_corrientes.json` → `corrientes`.
pub fn province_from_file_name(file_name: &str) -> Option<&str> {
    let province = file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?;
    (!province.is_empty()).then_some(province)
}

fn read_poi_file(path: &Path) -> Result<Vec<PointOfInterest>, PoiFileError> {
    let raw = fs::read_to_string(path)?;
    let pois: Vec<PointOfInterest> = serde_json::from_str(&raw)?;
    Ok(pois
        .into_iter()
        .filter(|poi| {
            let valid = poi.coordinate().is_valid();
            if !valid {
                warn!(
                    file = %path.display(),
                    poi = %poi.name,
                    "dropping POI with invalid coordinates"
                );
            }
            valid
        })
        .collect())
}
