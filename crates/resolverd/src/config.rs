use resolver_core::ResolverSettings;
use resolver_tables::{AddressMap, DomainList, StringList, TableError, TableSet};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path:?}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("loading table for `{param}`")]
    Table {
        param: &'static str,
        #[source]
        source: TableError,
    },
}

/// The on-disk configuration schema. Every table-bearing field is
/// optional: an absent or empty one is a configuration choice ("this
/// table never matches"), not a misconfiguration, matching the way
/// the resolver itself treats its lookup tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub resolve_dequoted: bool,
    pub swap_bangpath: bool,
    pub percent_hack: bool,
    pub myhostname: Option<String>,
    pub local_domains: Vec<String>,
    pub relayhost: String,
    pub local_transport: String,
    pub virt_transport: String,
    pub relay_transport: String,
    pub def_transport: String,
    pub error_transport: String,
    pub relay_domains: Vec<String>,
    pub virtual_alias_domains: Vec<String>,
    pub virtual_mailbox_domains: Vec<String>,
    pub relocated_maps: Option<PathBuf>,
    pub transport_maps: Option<PathBuf>,
    pub address_extension_delimiters: String,
    pub listen: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resolve_dequoted: true,
            swap_bangpath: true,
            percent_hack: true,
            myhostname: None,
            local_domains: Vec::new(),
            relayhost: String::new(),
            local_transport: "local".to_string(),
            virt_transport: "virtual".to_string(),
            relay_transport: "relay".to_string(),
            def_transport: "smtp".to_string(),
            error_transport: "error".to_string(),
            relay_domains: Vec::new(),
            virtual_alias_domains: Vec::new(),
            virtual_mailbox_domains: Vec::new(),
            relocated_maps: None,
            transport_maps: None,
            address_extension_delimiters: "+".to_string(),
            listen: None,
        }
    }
}

impl ResolverConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn hostname(&self) -> String {
        self.myhostname.clone().unwrap_or_else(|| {
            gethostname::gethostname()
                .into_string()
                .unwrap_or_else(|_| "localhost".to_string())
        })
    }

    /// The full local-domain equivalence set: `myhostname` plus any
    /// additionally configured names.
    pub fn local_domain_names(&self) -> Vec<String> {
        let mut names = vec![self.hostname()];
        names.extend(self.local_domains.iter().cloned());
        names
    }

    pub fn settings(&self) -> ResolverSettings {
        ResolverSettings {
            resolve_dequoted: self.resolve_dequoted,
            swap_bangpath: self.swap_bangpath,
            percent_hack: self.percent_hack,
            myhostname: self.hostname(),
            local_domains: self.local_domain_names(),
            relayhost: self.relayhost.clone(),
            local_transport: self.local_transport.clone(),
            virt_transport: self.virt_transport.clone(),
            relay_transport: self.relay_transport.clone(),
            def_transport: self.def_transport.clone(),
            error_transport: self.error_transport.clone(),
        }
    }

    pub fn tables(&self) -> Result<TableSet, ConfigError> {
        let delimiters: Vec<char> = self.address_extension_delimiters.chars().collect();

        let relocated_maps = match &self.relocated_maps {
            Some(path) => Some(
                AddressMap::load(path, delimiters.clone()).map_err(|source| ConfigError::Table {
                    param: "relocated_maps",
                    source,
                })?,
            ),
            None => None,
        };
        let transport_maps = match &self.transport_maps {
            Some(path) => Some(AddressMap::load(path, delimiters).map_err(|source| {
                ConfigError::Table {
                    param: "transport_maps",
                    source,
                }
            })?),
            None => None,
        };

        Ok(TableSet {
            relay_domains: if self.relay_domains.is_empty() {
                None
            } else {
                Some(DomainList::from_patterns(&self.relay_domains))
            },
            virt_alias_doms: if self.virtual_alias_domains.is_empty() {
                None
            } else {
                Some(StringList::from_values(&self.virtual_alias_domains))
            },
            virt_mailbox_doms: if self.virtual_mailbox_domains.is_empty() {
                None
            } else {
                Some(StringList::from_values(&self.virtual_mailbox_domains))
            },
            relocated_maps,
            transport_maps,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_usable_without_a_file() {
        let config = ResolverConfig::default();
        let settings = config.settings();
        assert_eq!(settings.local_transport, "local");
        assert!(!settings.myhostname.is_empty());
    }

    #[test]
    fn parses_a_minimal_toml_document() {
        let config: ResolverConfig = toml::from_str(
            r#"
            myhostname = "mail.example.com"
            relay_domains = ["relay.example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(config.myhostname.as_deref(), Some("mail.example.com"));
        assert_eq!(config.relay_domains, vec!["relay.example.com".to_string()]);
        // Unspecified fields still pick up their defaults.
        assert_eq!(config.def_transport, "smtp");
    }
}
