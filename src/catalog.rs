//! Canonical stop catalog.
//!
//! A static table of well-known stops consulted before any external lookup.

use serde::{Deserialize, Serialize};

use crate::place::{normalize_name, Place};

/// A canonical stop record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStop {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CatalogStop {
    pub fn new(id: &str, name: &str, lat: f64, lng: f64, aliases: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lng,
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_place(&self) -> Place {
        Place::new(self.name.clone(), self.lat, self.lng)
    }

    fn matches(&self, wanted: &str) -> bool {
        normalize_name(&self.name) == wanted
            || self.aliases.iter().any(|alias| normalize_name(alias) == wanted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopCatalog {
    entries: Vec<CatalogStop>,
}

impl StopCatalog {
    pub fn new(entries: Vec<CatalogStop>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of catalog records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Exact, case-insensitive match on name or alias. First entry wins.
    pub fn find(&self, name: &str) -> Option<&CatalogStop> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| entry.matches(&wanted))
    }

    pub fn entries(&self) -> &[CatalogStop] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Built-in table of common New Zealand road-trip stops.
    pub fn new_zealand() -> Self {
        Self::new(vec![
            CatalogStop::new("akl", "Auckland", -36.8485, 174.7633, &["Tāmaki Makaurau", "AKL"]),
            CatalogStop::new("wlg", "Wellington", -41.2866, 174.7756, &["Te Whanganui-a-Tara", "WLG"]),
            CatalogStop::new("chc", "Christchurch", -43.5321, 172.6362, &["Ōtautahi", "CHC"]),
            CatalogStop::new("zqn", "Queenstown", -45.0312, 168.6626, &["ZQN"]),
            CatalogStop::new("rot", "Rotorua", -38.1368, 176.2497, &[]),
            CatalogStop::new("tpo", "Taupo", -38.6857, 176.0702, &["Taupō"]),
            CatalogStop::new("npe", "Napier", -39.4928, 176.9120, &[]),
            CatalogStop::new("tga", "Tauranga", -37.6878, 176.1651, &[]),
            CatalogStop::new("hlz", "Hamilton", -37.7870, 175.2793, &["Kirikiriroa"]),
            CatalogStop::new("npl", "New Plymouth", -39.0556, 174.0752, &[]),
            CatalogStop::new("pcn", "Picton", -41.2906, 174.0010, &[]),
            CatalogStop::new("nsn", "Nelson", -41.2706, 173.2840, &["Whakatū"]),
            CatalogStop::new("kai", "Kaikoura", -42.4008, 173.6814, &["Kaikōura"]),
            CatalogStop::new("hkk", "Hokitika", -42.7167, 170.9667, &[]),
            CatalogStop::new("wka", "Wanaka", -44.7031, 169.1321, &["Wānaka"]),
            CatalogStop::new("dud", "Dunedin", -45.8788, 170.5028, &["Ōtepoti"]),
            CatalogStop::new("tek", "Lake Tekapo", -44.0047, 170.4772, &["Tekapo", "Takapō"]),
            CatalogStop::new("mfd", "Milford Sound", -44.6414, 167.8974, &["Piopiotahi"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_case_insensitive() {
        let catalog = StopCatalog::new_zealand();
        let stop = catalog.find("  queenstown").expect("queenstown present");
        assert_eq!(stop.id, "zqn");
    }

    #[test]
    fn test_find_by_alias() {
        let catalog = StopCatalog::new_zealand();
        assert_eq!(catalog.find("tekapo").map(|s| s.id.as_str()), Some("tek"));
        assert_eq!(catalog.find("AKL").map(|s| s.name.as_str()), Some("Auckland"));
    }

    #[test]
    fn test_find_requires_exact_match() {
        let catalog = StopCatalog::new_zealand();
        assert!(catalog.find("Queens").is_none());
        assert!(catalog.find("").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "x1", "name": "Oamaru", "lat": -45.097, "lng": 170.970, "aliases": ["Te Oha-a-Maru"]},
            {"id": "x2", "name": "Timaru", "lat": -44.396, "lng": 171.254}
        ]"#;
        let catalog = StopCatalog::from_json(json).expect("valid catalog json");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("te oha-a-maru").map(|s| s.id.as_str()), Some("x1"));
        assert!(catalog.find("Timaru").expect("timaru").aliases.is_empty());
    }
}
