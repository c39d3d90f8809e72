//! Fermeture des courbes dont les extrémités sont proches

use crate::types::Polyline;

/// Ferme la courbe si l'écart entre ses extrémités est sous le seuil
///
/// La fermeture duplique le premier point en fin de courbe. Une courbe déjà
/// fermée n'est pas modifiée. Retourne `true` si la courbe est fermée en
/// sortie.
pub fn close_if_near(polyline: &mut Polyline, closure_distance: f64) -> bool {
    if polyline.is_closed() {
        return true;
    }

    if polyline.endpoint_gap() <= closure_distance {
        let first = polyline.first();
        polyline.line.0.push(first);
        return true;
    }

    false
}
