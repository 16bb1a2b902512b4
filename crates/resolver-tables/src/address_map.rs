use crate::error::TableError;
use crate::outcome::LookupOutcome;
use std::collections::BTreeMap;
use std::path::Path;

/// An address-pattern map, used for `relocated_maps` and
/// `transport_maps`. Backed here by a plain `key = value` text table
/// (the "inline table" backend the spec allows alongside DBM/LDAP/
/// regex drivers), loaded once at init and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct AddressMap {
    entries: BTreeMap<String, String>,
    extension_delimiters: Vec<char>,
    /// See [`crate::DomainList`]'s field of the same name: set when
    /// the table is configured but its backend cannot currently
    /// answer, distinct from the table being absent.
    transient: bool,
}

impl AddressMap {
    pub fn from_entries(
        entries: BTreeMap<String, String>,
        extension_delimiters: Vec<char>,
    ) -> Self {
        Self {
            entries,
            extension_delimiters,
            transient: false,
        }
    }

    /// A table that is configured but whose backend cannot currently
    /// answer. Every lookup reports [`LookupOutcome::Transient`].
    pub fn unavailable() -> Self {
        Self {
            entries: BTreeMap::new(),
            extension_delimiters: Vec::new(),
            transient: true,
        }
    }

    /// Load a `key = value` text table from disk. Blank lines and
    /// lines starting with `#` are ignored.
    pub fn load(path: &Path, extension_delimiters: Vec<char>) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut entries = BTreeMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| TableError::MalformedLine {
                path: path.display().to_string(),
                line: idx + 1,
                text: line.to_string(),
            })?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self {
            entries,
            extension_delimiters,
            transient: false,
        })
    }

    /// Address-extension stripping (SPEC_FULL §C.1): an exact match on
    /// `address` wins; otherwise, if a configured delimiter appears in
    /// the localpart, retry the lookup with the localpart truncated at
    /// the first delimiter.
    pub fn lookup(&self, address: &str) -> LookupOutcome<String> {
        if self.transient {
            return LookupOutcome::Transient;
        }
        if let Some(value) = self.entries.get(address) {
            return LookupOutcome::Match(value.clone());
        }
        if let Some(stripped) = self.strip_extension(address) {
            if let Some(value) = self.entries.get(&stripped) {
                return LookupOutcome::Match(value.clone());
            }
        }
        LookupOutcome::NoMatch
    }

    fn strip_extension(&self, address: &str) -> Option<String> {
        if self.extension_delimiters.is_empty() {
            return None;
        }
        let (local, domain) = address.split_once('@')?;
        let delim_pos = local.find(|c| self.extension_delimiters.contains(&c))?;
        if delim_pos == 0 {
            return None;
        }
        Some(format!("{}@{}", &local[..delim_pos], domain))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_match_wins_over_stripped() {
        let mut entries = BTreeMap::new();
        entries.insert("user+tag@example.com".to_string(), "exact".to_string());
        entries.insert("user@example.com".to_string(), "stripped".to_string());
        let map = AddressMap::from_entries(entries, vec!['+']);

        assert_eq!(
            map.lookup("user+tag@example.com"),
            LookupOutcome::Match("exact".to_string())
        );
    }

    #[test]
    fn falls_back_to_stripped_key() {
        let mut entries = BTreeMap::new();
        entries.insert("user@example.com".to_string(), "stripped".to_string());
        let map = AddressMap::from_entries(entries, vec!['+']);

        assert_eq!(
            map.lookup("user+tag@example.com"),
            LookupOutcome::Match("stripped".to_string())
        );
        assert_eq!(map.lookup("nobody@example.com"), LookupOutcome::NoMatch);
    }

    #[test]
    fn no_delimiter_configured_means_no_stripping() {
        let mut entries = BTreeMap::new();
        entries.insert("user@example.com".to_string(), "stripped".to_string());
        let map = AddressMap::from_entries(entries, vec![]);

        assert_eq!(map.lookup("user+tag@example.com"), LookupOutcome::NoMatch);
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relocated");
        std::fs::write(
            &path,
            "# comment\nmoved@myhost = new@elsewhere\n\nother@myhost=elsewhere2\n",
        )
        .unwrap();

        let map = AddressMap::load(&path, vec![]).unwrap();
        assert_eq!(
            map.lookup("moved@myhost"),
            LookupOutcome::Match("new@elsewhere".to_string())
        );
        assert_eq!(
            map.lookup("other@myhost"),
            LookupOutcome::Match("elsewhere2".to_string())
        );
    }

    #[test]
    fn unavailable_table_reports_transient_on_every_lookup() {
        let map = AddressMap::unavailable();
        assert_eq!(map.lookup("anyone@example.com"), LookupOutcome::Transient);
    }
}
