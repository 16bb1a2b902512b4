use std::collections::HashSet;

/// Tells the peeling loop whether a candidate domain is one of "ours".
/// A trait rather than a plain `HashSet` lookup so a caller can plug
/// in a DNS-backed or config-reload-aware implementation later without
/// touching the engine.
pub trait LocalDomainPredicate: Send + Sync {
    fn is_local_domain(&self, domain: &str) -> bool;
}

/// The straightforward implementation: a domain is local if it
/// case-insensitively matches one of a fixed set of configured names.
#[derive(Debug, Clone, Default)]
pub struct StaticLocalDomains {
    names: HashSet<String>,
}

impl StaticLocalDomains {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|s| s.as_ref().to_ascii_lowercase()).collect(),
        }
    }
}

impl LocalDomainPredicate for StaticLocalDomains {
    fn is_local_domain(&self, domain: &str) -> bool {
        self.names.contains(&domain.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let local = StaticLocalDomains::new(["mail.example.com"]);
        assert!(local.is_local_domain("Mail.Example.COM"));
        assert!(!local.is_local_domain("example.com"));
    }
}
