use crate::meeting::Location;
use crate::parser::patterns::{group, ADDRESS_RE, AGENDA_RE};

pub const DEFAULT_ADDRESS: &str =
    "200 Ross Street, Third Floor\nPittsburgh, Pennsylvania 15219 DEFAULT";
pub const DEFAULT_NAME: &str = "City of Pittsburgh, Department of City Planning";

/// Hearing location from the text after the agenda gap: a name prefix and a
/// street-number-to-zip address. The loose address search only runs when the
/// page has no agenda layout at all.
pub fn extract(text: &str) -> Location {
    let (name, address) = match AGENDA_RE.captures(text) {
        Some(caps) => (group(&caps, "address1"), group(&caps, "address2")),
        None => (None, ADDRESS_RE.find(text).map(|m| m.as_str())),
    };

    Location {
        name: name.unwrap_or(DEFAULT_NAME).to_string(),
        address: address.unwrap_or(DEFAULT_ADDRESS).to_string(),
        coordinates: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAP: &str = "\n\n\n\n\n\n\n\n\n";

    #[test]
    fn address_after_gap() {
        let text = format!("Hearing 6:30 body{}123 Main St, Pittsburgh, PA 15213", GAP);
        let loc = extract(&text);
        assert_eq!(loc.address, "123 Main St, Pittsburgh, PA 15213");
        assert_eq!(loc.name, DEFAULT_NAME);
        assert!(loc.coordinates.is_none());
    }

    #[test]
    fn name_prefix_before_street_number() {
        let text = format!("6:30 body{}Council Chambers, 414 Grant Street, Pittsburgh 15219", GAP);
        let loc = extract(&text);
        assert_eq!(loc.name, "Council Chambers, ");
        assert_eq!(loc.address, "414 Grant Street, Pittsburgh 15219");
    }

    #[test]
    fn address_only_fallback() {
        let text = "Meet at 1000 Liberty Avenue Pittsburgh PA 15222 please";
        let loc = extract(text);
        assert_eq!(loc.address, "1000 Liberty Avenue Pittsburgh PA 15222");
        assert_eq!(loc.name, DEFAULT_NAME);
    }

    #[test]
    fn time_without_address_uses_defaults() {
        let text = format!("Hearing at 6:30 for the variance{}see you there", GAP);
        let loc = extract(&text);
        assert_eq!(loc.address, DEFAULT_ADDRESS);
        assert_eq!(loc.name, DEFAULT_NAME);
    }

    #[test]
    fn numbers_in_body_are_not_an_address() {
        let text = format!(
            "Zoning Hearing January 10, 2019 Date of Hearing: 6:30 Case 12345 appeal{}thank you",
            GAP
        );
        let loc = extract(&text);
        assert_eq!(loc.address, DEFAULT_ADDRESS);
        assert_eq!(loc.name, DEFAULT_NAME);
    }
}
