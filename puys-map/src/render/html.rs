//! Page HTML: gabarit embarqué, compteur de visites et liste des puys

use std::fmt::Write;

use puys::Summit;
use thiserror::Error;

/// Gabarit de la page (placeholders `{{nom}}`)
pub const TEMPLATE: &str = include_str!("../../assets/template.html");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template placeholder: {0}")]
    UnknownPlaceholder(String),

    #[error("Unterminated template placeholder at byte {0}")]
    Unterminated(usize),
}

/// Remplit un gabarit en une seule passe
///
/// Les valeurs insérées ne sont jamais réinterprétées comme placeholders.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or(TemplateError::Unterminated(offset + start))?;
        let key = after[..end].trim();
        let value = values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| TemplateError::UnknownPlaceholder(key.to_string()))?;
        out.push_str(value);

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Échappe une chaîne pour du texte ou un attribut HTML
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}

/// Liste `<li>` des puys, les visités portant la classe `visited`
pub fn visit_list(summits: &[Summit]) -> String {
    let mut list = String::new();
    for summit in summits {
        let label = match summit.name.as_deref() {
            Some(name) => escape_html(name),
            None => escape_html(&summit.full_label()),
        };
        let class = if summit.visited { " class=\"visited\"" } else { "" };
        // Écriture dans une String: infaillible
        let _ = writeln!(list, "<li{}>{}</li>", class, label);
    }
    list
}

/// Compteurs de visite: (visités, total, pourcentage)
pub fn visit_stats(summits: &[Summit]) -> (usize, usize, f64) {
    let visited = summits.iter().filter(|s| s.visited).count();
    let total = summits.len();
    let percent = if total == 0 {
        0.0
    } else {
        100.0 * visited as f64 / total as f64
    };
    (visited, total, percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    fn summit(name: &str, visited: bool) -> Summit {
        Summit {
            name: Some(name.to_string()),
            position: Coord { x: 0.0, y: 0.0 },
            elevation: None,
            visited,
        }
    }

    #[test]
    fn test_fill_template() {
        let filled = fill_template("<h1>{{title}}</h1>{{ svg }}", &[("title", "Puys"), ("svg", "<svg/>")]);
        assert_eq!(filled.unwrap(), "<h1>Puys</h1><svg/>");
    }

    #[test]
    fn test_fill_template_values_not_reinterpreted() {
        let filled = fill_template("{{a}}", &[("a", "{{b}}")]).unwrap();
        assert_eq!(filled, "{{b}}");
    }

    #[test]
    fn test_fill_template_errors() {
        assert_eq!(
            fill_template("{{missing}}", &[]),
            Err(TemplateError::UnknownPlaceholder("missing".to_string()))
        );
        assert_eq!(
            fill_template("ok {{oops", &[]),
            Err(TemplateError::Unterminated(3))
        );
    }

    #[test]
    fn test_embedded_template_placeholders() {
        let keys = [
            "title",
            "boundary",
            "visit_current",
            "visit_total",
            "visit_percent",
            "svg",
            "visit_list",
        ];
        let values: Vec<(&str, &str)> = keys.iter().map(|k| (*k, "")).collect();
        assert!(fill_template(TEMPLATE, &values).is_ok());
    }

    #[test]
    fn test_visit_list() {
        let list = visit_list(&[summit("Puy de Dôme", true), summit("Puy <Chopine>", false)]);
        assert_eq!(
            list,
            "<li class=\"visited\">Puy de Dôme</li>\n<li>Puy &lt;Chopine&gt;</li>\n"
        );
    }

    #[test]
    fn test_visit_stats() {
        let (visited, total, percent) =
            visit_stats(&[summit("A", true), summit("B", false), summit("C", false), summit("D", true)]);
        assert_eq!((visited, total), (2, 4));
        assert!((percent - 50.0).abs() < 1e-9);
        assert_eq!(visit_stats(&[]).2, 0.0);
    }
}
