//! Simplification des courbes de niveau
//!
//! Transforme un ensemble de courbes brutes, souvent fragmentées ou
//! ouvertes, en polygones fermés prêts à être dessinés:
//!
//! 1. filtre de longueur
//! 2. fermeture des courbes dont les extrémités sont proches
//! 3. fusion des courbes ouvertes (file de travail jusqu'au point fixe)
//! 4. nouvelle tentative de fermeture sur les courbes fusionnées
//!
//! Les courbes restées ouvertes ne sont pas dessinées: elles sont rendues à
//! part dans [`Simplified::open`].

pub mod closure;
pub mod merge;

use serde::Serialize;
use tracing::debug;

use crate::types::{Polyline, Thresholds};

/// Compteurs d'une passe de simplification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimplifyStats {
    /// Courbes en entrée
    pub input: usize,
    /// Courbes écartées car trop courtes
    pub too_short: usize,
    /// Courbes déjà fermées en entrée
    pub already_closed: usize,
    /// Courbes fermées à l'étape 2
    pub self_closed: usize,
    /// Fusions effectuées
    pub merges: usize,
    /// Courbes fermées après fusion
    pub closed_after_merge: usize,
    /// Courbes restées ouvertes
    pub open: usize,
}

/// Résultat de la simplification
#[derive(Debug, Clone)]
pub struct Simplified {
    /// Polygones fermés, dans l'ordre d'apparition
    pub closed: Vec<Polyline>,
    /// Courbes impossibles à fermer (non dessinées)
    pub open: Vec<Polyline>,
    pub stats: SimplifyStats,
}

/// Simplifie un ensemble de courbes selon les seuils donnés
pub fn simplify(polylines: Vec<Polyline>, thresholds: &Thresholds) -> Simplified {
    let mut stats = SimplifyStats {
        input: polylines.len(),
        ..SimplifyStats::default()
    };

    let mut closed = Vec::new();
    let mut open = Vec::new();

    for mut polyline in polylines {
        if polyline.line.0.len() < 2 || polyline.length() < thresholds.min_length {
            stats.too_short += 1;
            continue;
        }

        if polyline.is_closed() {
            stats.already_closed += 1;
            closed.push(polyline);
        } else if closure::close_if_near(&mut polyline, thresholds.closure_distance) {
            stats.self_closed += 1;
            closed.push(polyline);
        } else {
            open.push(polyline);
        }
    }

    let outcome = merge::merge_open(open, thresholds.merge_distance);
    stats.merges = outcome.merges;

    let mut leftovers = Vec::new();
    for mut polyline in outcome.polylines {
        if closure::close_if_near(&mut polyline, thresholds.closure_distance) {
            stats.closed_after_merge += 1;
            closed.push(polyline);
        } else {
            leftovers.push(polyline);
        }
    }
    stats.open = leftovers.len();

    debug!(
        input = stats.input,
        too_short = stats.too_short,
        merges = stats.merges,
        closed = closed.len(),
        open = stats.open,
        "Contours simplified"
    );

    Simplified {
        closed,
        open: leftovers,
        stats,
    }
}
