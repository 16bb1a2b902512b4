use crate::outcome::LookupOutcome;
use domain_map::DomainMap;

/// A domain-pattern list with parent-style matching, used for
/// `relay_domains`: a bare `example.com` entry matches itself and any
/// subdomain, a leading-dot `.example.com` matches only subdomains.
#[derive(Debug, Clone, Default)]
pub struct DomainList {
    map: DomainMap<()>,
    /// Set when the backend behind this table is configured but
    /// currently unable to answer (a disconnected LDAP/DBM driver,
    /// say). Distinct from the table being absent: an absent table is
    /// "never matches" by configuration, this is "matches are unknown
    /// right now" and every lookup reports [`LookupOutcome::Transient`].
    transient: bool,
}

impl DomainList {
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = DomainMap::new();
        for pattern in patterns {
            map.insert_parent_style(&pattern.as_ref().to_ascii_lowercase(), ());
        }
        Self {
            map,
            transient: false,
        }
    }

    /// A table that is configured but whose backend cannot currently
    /// answer. Every lookup reports [`LookupOutcome::Transient`].
    pub fn unavailable() -> Self {
        Self {
            map: DomainMap::new(),
            transient: true,
        }
    }

    pub fn lookup(&self, domain: &str) -> LookupOutcome<()> {
        if self.transient {
            return LookupOutcome::Transient;
        }
        match self.map.get(&domain.to_ascii_lowercase()) {
            Some(()) => LookupOutcome::Match(()),
            None => LookupOutcome::NoMatch,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parent_and_strict_patterns() {
        let list = DomainList::from_patterns(["example.com", ".sub.example.org"]);
        assert_eq!(list.lookup("example.com"), LookupOutcome::Match(()));
        assert_eq!(list.lookup("mail.example.com"), LookupOutcome::Match(()));
        assert_eq!(list.lookup("sub.example.org"), LookupOutcome::NoMatch);
        assert_eq!(list.lookup("a.sub.example.org"), LookupOutcome::Match(()));
        assert_eq!(list.lookup("other.net"), LookupOutcome::NoMatch);
    }

    #[test]
    fn unavailable_table_reports_transient_on_every_lookup() {
        let list = DomainList::unavailable();
        assert_eq!(list.lookup("example.com"), LookupOutcome::Transient);
        assert_eq!(list.lookup("anything.else"), LookupOutcome::Transient);
    }
}
