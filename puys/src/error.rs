//! Types d'erreurs pour le crate puys

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs pouvant survenir lors du chargement des données
#[derive(Debug, Error)]
pub enum PuysError {
    /// Erreur d'I/O lors de la lecture d'un fichier d'entrée
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Enregistrement malformé dans un fichier d'entrée
    #[error("Parse error in {file} (line {line}): {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    /// Fichier sans aucune donnée exploitable
    #[error("No usable data in {0}")]
    Empty(String),

    /// Étendue dégénérée, impossible de projeter
    #[error("Projection error: {0}")]
    Projection(String),
}

impl PuysError {
    /// Crée une erreur de parsing avec contexte
    pub fn parse_error(file: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Crée une erreur d'I/O rattachée à un chemin
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
