use crate::outcome::LookupOutcome;
use std::collections::HashSet;

/// A plain literal-match string list, used for `virt_alias_doms` and
/// `virt_mailbox_doms`. Unlike [`crate::DomainList`] there is no
/// parent/subdomain matching here: the spec calls these out as
/// "string lists with literal matching".
#[derive(Debug, Clone, Default)]
pub struct StringList {
    values: HashSet<String>,
    /// See [`crate::DomainList`]'s field of the same name: set when
    /// the table is configured but its backend cannot currently
    /// answer, distinct from the table being absent.
    transient: bool,
}

impl StringList {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            values: values
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
            transient: false,
        }
    }

    /// A table that is configured but whose backend cannot currently
    /// answer. Every lookup reports [`LookupOutcome::Transient`].
    pub fn unavailable() -> Self {
        Self {
            values: HashSet::new(),
            transient: true,
        }
    }

    pub fn lookup(&self, s: &str) -> LookupOutcome<()> {
        if self.transient {
            return LookupOutcome::Transient;
        }
        if self.values.contains(&s.to_ascii_lowercase()) {
            LookupOutcome::Match(())
        } else {
            LookupOutcome::NoMatch
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_match_only() {
        let list = StringList::from_values(["v.example.com"]);
        assert_eq!(list.lookup("v.example.com"), LookupOutcome::Match(()));
        assert_eq!(list.lookup("mail.v.example.com"), LookupOutcome::NoMatch);
    }

    #[test]
    fn unavailable_table_reports_transient_on_every_lookup() {
        let list = StringList::unavailable();
        assert_eq!(list.lookup("v.example.com"), LookupOutcome::Transient);
    }
}
