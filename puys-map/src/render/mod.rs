//! Rendu de la page HTML et de ses fichiers statiques

pub mod html;
pub mod style;
pub mod svg;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geo::LineString;
use puys::{Polyline, Summit};
use tracing::debug;

pub use self::svg::Scene;

/// Feuille de style copiée à côté de la page
pub const STYLE_CSS: &str = include_str!("../../assets/style.css");
/// Script de la page (déplacement, zoom, panneaux)
pub const SCRIPT_JS: &str = include_str!("../../assets/script.js");

/// Options de mise en page
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Titre de la page
    pub title: String,
    /// Garder un point du contour sur `boundary_stride`
    pub boundary_stride: usize,
}

/// Données projetées d'une page
#[derive(Debug, Clone, Copy)]
pub struct PageInput<'a> {
    pub boundary_title: &'a str,
    pub boundary: &'a LineString<f64>,
    pub contours: &'a [Polyline],
    pub summits: &'a [Summit],
}

/// Produit le document HTML complet, en mémoire
///
/// Les sommets sont dessinés et listés du nord au sud.
pub fn render_page(input: &PageInput, options: &PageOptions) -> Result<String> {
    let mut summits = input.summits.to_vec();
    summits.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

    let scene = Scene {
        boundary: input.boundary,
        contours: input.contours,
        summits: &summits,
    };
    let document = self::svg::build_document(&scene, options.boundary_stride);

    let (visited, total, percent) = html::visit_stats(&summits);
    let visit_current = visited.to_string();
    let visit_total = total.to_string();
    let visit_percent = format!("{:.0}", percent);
    let title = html::escape_html(&options.title);
    let boundary = html::escape_html(input.boundary_title);
    let svg = document.to_string();
    let visit_list = html::visit_list(&summits);

    let page = html::fill_template(
        html::TEMPLATE,
        &[
            ("title", &title),
            ("boundary", &boundary),
            ("visit_current", &visit_current),
            ("visit_total", &visit_total),
            ("visit_percent", &visit_percent),
            ("svg", &svg),
            ("visit_list", &visit_list),
        ],
    )?;

    debug!(
        bytes = page.len(),
        contours = input.contours.len(),
        summits = summits.len(),
        "Page rendered"
    );

    Ok(page)
}

/// Écrit, si demandé, `style.css` et `script.js`, puis la page
///
/// La page est écrite en dernier: un échec sur un fichier statique ne laisse
/// pas de page orpheline. Retourne la liste des fichiers écrits.
pub fn write_page(page: &str, output: &Path, with_assets: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if with_assets {
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        for (name, content) in [("style.css", STYLE_CSS), ("script.js", SCRIPT_JS)] {
            let path = dir.join(name);
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
    }

    std::fs::write(output, page)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    written.push(output.to_path_buf());

    Ok(written)
}
