/// The result of one call into a lookup table.
///
/// The spec models table backends (inline lists, DBM, LDAP, regex, …)
/// as publishing a transient-error signal out-of-band from a shared
/// `lookup_errno`. The more idiomatic Rust shape for that — and the
/// one the spec's own design notes call out — is to fold the signal
/// into the return value of the call that produced it, so the engine
/// never has to remember to go check a side channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<V> {
    Match(V),
    NoMatch,
    /// The backend could not answer right now (timeout, disconnected
    /// DBM file, LDAP error, …). The caller should set `FLAG_FAIL` and
    /// stop classification.
    Transient,
}

impl<V> LookupOutcome<V> {
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupOutcome::Transient)
    }

    pub fn matched(self) -> Option<V> {
        match self {
            LookupOutcome::Match(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn is_transient_only_true_for_transient() {
        assert!(LookupOutcome::<()>::Transient.is_transient());
        assert!(!LookupOutcome::Match(()).is_transient());
        assert!(!LookupOutcome::<()>::NoMatch.is_transient());
    }

    #[test]
    fn matched_unwraps_only_match() {
        assert_eq!(LookupOutcome::Match("x").matched(), Some("x"));
        assert_eq!(LookupOutcome::<&str>::NoMatch.matched(), None);
        assert_eq!(LookupOutcome::<&str>::Transient.matched(), None);
    }
}
