//! Rapport de génération
//!
//! Compteurs de chaque étape et empreinte blake3 de la page produite, pour
//! vérifier qu'une nouvelle exécution donne exactement le même document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use puys::SimplifyStats;
use serde::Serialize;

/// Rapport complet d'une génération
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    /// Page HTML produite
    pub output: PathBuf,
    /// Durée totale
    pub duration_secs: f64,

    /// Courbes de niveau chargées (ways avec tag `ele`)
    pub contour_ways: usize,
    /// Compteurs du simplificateur
    pub simplify: SimplifyStats,
    /// Courbes fermées écartées car loin de tout sommet
    pub out_of_focus: usize,
    /// Courbes effectivement dessinées
    pub contours_drawn: usize,

    /// Nombre de sommets
    pub summits: usize,
    /// Nombre de sommets gravis
    pub visited: usize,
    /// Points du contour du département dessinés
    pub boundary_points: usize,

    /// Fichiers écrits
    pub files_written: Vec<PathBuf>,
    /// Empreinte blake3 (hex) du document HTML
    pub digest: String,
}

impl RenderReport {
    /// Affiche le résumé sur la sortie standard
    pub fn print_summary(&self) {
        println!("\n=== Summary ===");
        println!("Output: {}", self.output.display());
        println!("Contour ways: {}", self.contour_ways);
        println!("  too short: {}", self.simplify.too_short);
        println!("  already closed: {}", self.simplify.already_closed);
        println!("  self-closed: {}", self.simplify.self_closed);
        println!("  merges: {}", self.simplify.merges);
        println!("  closed after merge: {}", self.simplify.closed_after_merge);
        println!("  left open (not drawn): {}", self.simplify.open);
        if self.out_of_focus > 0 {
            println!("  out of focus: {}", self.out_of_focus);
        }
        println!("Contours drawn: {}", self.contours_drawn);
        println!("Summits: {} ({} visited)", self.summits, self.visited);
        println!("Boundary points: {}", self.boundary_points);
        for file in &self.files_written {
            println!("Written: {}", file.display());
        }
        println!("Digest (blake3): {}", self.digest);
        println!("Duration: {:.2}s", self.duration_secs);
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}

/// Empreinte blake3 (hex) d'un contenu
pub fn digest(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(digest(b"puy de dome"), digest(b"puy de dome"));
        assert_ne!(digest(b"puy de dome"), digest(b"puy de come"));
        assert_eq!(digest(b"").len(), 64);
    }

    #[test]
    fn test_save_json() {
        let report = RenderReport {
            output: PathBuf::from("map.html"),
            contour_ways: 12,
            summits: 3,
            visited: 1,
            digest: digest(b"<html></html>"),
            ..RenderReport::default()
        };
        let path = std::env::temp_dir().join("puys_map_report_test.json");
        report.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["contour_ways"], 12);
        assert_eq!(value["simplify"]["merges"], 0);
        assert_eq!(value["output"], "map.html");

        std::fs::remove_file(path).ok();
    }
}
