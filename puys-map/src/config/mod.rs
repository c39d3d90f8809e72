//! Configuration du rendu

use std::path::Path;

use anyhow::{Context, Result};
use puys::Thresholds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration invalide
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid threshold: {0}")]
    Threshold(String),

    #[error("{name} must be a finite value > 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("boundary_stride must be >= 1")]
    Stride,
}

/// Configuration principale (fichier JSON optionnel, surchargé par la CLI)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Seuils du simplificateur, en unités du plan
    #[serde(flatten)]
    pub thresholds: Thresholds,

    /// Ne dessiner que les courbes dont le barycentre est à moins de cette
    /// distance d'un sommet
    pub focus_distance: Option<f64>,

    /// Garder un point du contour du département sur `boundary_stride`
    pub boundary_stride: usize,

    /// Largeur du plan de dessin
    pub width: f64,

    /// Titre de la page
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            focus_distance: None,
            boundary_stride: 10,
            width: puys::projection::DEFAULT_TARGET_WIDTH,
            title: "Chaîne des Puys".to_string(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Vérifie la cohérence des valeurs
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate().map_err(ConfigError::Threshold)?;

        if let Some(distance) = self.focus_distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(ConfigError::NotPositive {
                    name: "focus_distance",
                    value: distance,
                });
            }
        }

        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "width",
                value: self.width,
            });
        }

        if self.boundary_stride == 0 {
            return Err(ConfigError::Stride);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"merge_distance": 2.5, "focus_distance": 30}"#).unwrap();
        assert_eq!(config.thresholds.merge_distance, 2.5);
        assert_eq!(config.thresholds.min_length, Thresholds::default().min_length);
        assert_eq!(config.focus_distance, Some(30.0));
        assert_eq!(config.boundary_stride, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.thresholds.closure_distance = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Threshold(_))));

        let config = Config {
            boundary_stride: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Stride));

        let config = Config {
            focus_distance: Some(0.0),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "focus_distance", .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(Path::new("nonexistent.json")).is_err());
    }
}
