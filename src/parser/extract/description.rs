use crate::parser::patterns::{group, AGENDA_RE, DESCRIPTION_RE};

/// Prefix for pages whose description could not be isolated; the full page
/// text follows it.
pub const NO_MATCH: &str = "NO MATCH -- FULL TEXT: ";

pub fn extract(text: &str) -> String {
    [&*AGENDA_RE, &*DESCRIPTION_RE]
        .into_iter()
        .find_map(|re| {
            let caps = re.captures(text)?;
            let description = group(&caps, "description")?.replace('\n', "");
            Some(description).filter(|d| !d.is_empty())
        })
        .unwrap_or_else(|| format!("{}{}", NO_MATCH, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAP: &str = "\n\n\n\n\n\n\n\n\n";

    #[test]
    fn body_between_time_and_gap() {
        let text = format!("Hearing: 6:30 Case 12 variance\nfor fence{}123 Main St 15213", GAP);
        assert_eq!(extract(&text), " Case 12 variancefor fence");
    }

    #[test]
    fn loose_colon_fallback() {
        let text = format!("Agenda: Items to be heard{}Ross Street", GAP);
        assert_eq!(extract(&text), " Items to be heard");
    }

    #[test]
    fn empty_body_falls_through() {
        // the time is followed directly by the gap, so the colon pattern gets a turn
        let text = format!("Note: board recess 6:30{}end", GAP);
        assert_eq!(extract(&text), " board recess 6:30");
    }

    #[test]
    fn short_gap_is_no_match() {
        let text = "Hearing: 6:30 text\n\n\nmore";
        let description = extract(text);
        assert!(description.starts_with(NO_MATCH));
        assert!(description.ends_with(text));
    }

    #[test]
    fn never_empty() {
        assert_eq!(extract(""), NO_MATCH);
    }
}
