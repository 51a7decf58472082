use std::collections::HashMap;

/// Case- and whitespace-insensitive lookup of sheet column names.
///
/// Sheets exported by different developers spell the same header as
/// `Unit Code`, `unit code` or ` UNIT  CODE `; all resolve to the first
/// spelling seen.
#[derive(Debug, Clone, Default)]
pub struct ColumnLookup {
    map: HashMap<String, String>,
}

impl ColumnLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(normalize_key(name))
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&normalize_key(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&normalize_key(name))
    }
}

fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_spelling_variants_to_first_seen() {
        let lookup = ColumnLookup::new(["Unit Code", "unit code", "Net BUA"]);
        assert_eq!(lookup.get(" UNIT   code "), Some("Unit Code"));
        assert_eq!(lookup.get("net bua"), Some("Net BUA"));
        assert!(!lookup.contains("Price"));
    }
}
