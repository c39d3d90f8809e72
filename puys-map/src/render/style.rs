//! Couleurs et épaisseurs des éléments dessinés

/// Altitude en dessous de laquelle la courbe est blanche
pub const MIN_ELEVATION: f64 = 300.0;
/// Altitude du vert franc
pub const MID_ELEVATION: f64 = 900.0;
/// Altitude au-delà de laquelle la courbe est brune
pub const MAX_ELEVATION: f64 = 1200.0;

pub const VISITED_COLOR: &str = "rgba(50, 50, 255, 1)";
pub const NOT_VISITED_COLOR: &str = "rgba(255, 50, 50, 1)";
pub const BOUNDARY_COLOR: &str = "grey";

type Rgb = (f64, f64, f64);

const WHITE: Rgb = (255.0, 255.0, 255.0);
const GREEN: Rgb = (27.0, 126.0, 14.0);
const BROWN: Rgb = (87.0, 53.0, 0.0);

/// Couleur de remplissage d'une courbe selon son altitude
///
/// Blanc -> vert entre 300 et 900 m, vert -> brun entre 900 et 1200 m.
pub fn contour_fill(elevation: i32) -> String {
    let elevation = f64::from(elevation);
    let (start, end, percent) = if elevation > MID_ELEVATION {
        (
            GREEN,
            BROWN,
            (elevation - MID_ELEVATION) / (MAX_ELEVATION - MID_ELEVATION),
        )
    } else {
        (
            WHITE,
            GREEN,
            (elevation - MIN_ELEVATION) / (MID_ELEVATION - MIN_ELEVATION),
        )
    };
    let percent = percent.clamp(0.0, 1.0);
    let mix = |a: f64, b: f64| percent * b + (1.0 - percent) * a;

    format!(
        "rgba({:.0}, {:.0}, {:.0}, .3)",
        mix(start.0, end.0),
        mix(start.1, end.1),
        mix(start.2, end.2)
    )
}

/// Épaisseur du trait: courbes maîtresses (multiples de 50 m) plus épaisses
pub fn contour_stroke_width(elevation: i32) -> f64 {
    if elevation % 50 == 0 {
        0.6
    } else {
        0.3
    }
}

pub fn summit_color(visited: bool) -> &'static str {
    if visited {
        VISITED_COLOR
    } else {
        NOT_VISITED_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contour_fill_gradient() {
        assert_eq!(contour_fill(200), "rgba(255, 255, 255, .3)");
        assert_eq!(contour_fill(900), "rgba(27, 126, 14, .3)");
        assert_eq!(contour_fill(1200), "rgba(87, 53, 0, .3)");
        assert_eq!(contour_fill(1465), "rgba(87, 53, 0, .3)");
        assert_eq!(contour_fill(1080), "rgba(63, 82, 6, .3)");
    }

    #[test]
    fn test_stroke_width() {
        assert_eq!(contour_stroke_width(1000), 0.6);
        assert_eq!(contour_stroke_width(1010), 0.3);
    }

    #[test]
    fn test_summit_color() {
        assert_eq!(summit_color(true), VISITED_COLOR);
        assert_eq!(summit_color(false), NOT_VISITED_COLOR);
    }
}
