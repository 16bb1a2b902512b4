/// The configuration snapshot the engine resolves against. Built once
/// at startup (see `resolverd::config`) and shared read-only across
/// all connections.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Whether addresses are parsed in "dequoted" (quoting preserved,
    /// opaque) or "requoted" (quoting dissolved) mode before peeling.
    pub resolve_dequoted: bool,
    /// Rewrite a leading `site!user` bangpath into `user@site` during
    /// peeling.
    pub swap_bangpath: bool,
    /// Rewrite `user%host` into `user@host` during peeling.
    pub percent_hack: bool,
    /// This machine's canonical hostname; used as the nexthop for mail
    /// that resolves to the local channel with no saved domain, and as
    /// the default entry in `local_domains` when none are configured.
    pub myhostname: String,
    /// The full set of domains this resolver considers "mine" when
    /// peeling local-domain suffixes off an address. Defaults to just
    /// `myhostname` but can carry additional equivalent names (the
    /// `mydestination` style of configuration).
    pub local_domains: Vec<String>,
    /// When non-empty, overrides the nexthop chosen by the relay and
    /// default branches of classification (but never alias/virtual/
    /// local branches, and never after a transport_maps override).
    pub relayhost: String,
    pub local_transport: String,
    pub virt_transport: String,
    pub relay_transport: String,
    pub def_transport: String,
    pub error_transport: String,
}

impl ResolverSettings {
    /// The channel name portion of `error_transport`, used to decide
    /// whether `transport_maps` is allowed to override the current
    /// channel (it is never allowed to override the error channel).
    pub fn error_channel_name(&self) -> &str {
        split_channel_spec(&self.error_transport).0
    }
}

/// Split a `channel:nexthop` transport spec into its channel name and
/// an optional nexthop override. Bare `channel` (no colon) yields an
/// empty nexthop half.
pub fn split_channel_spec(spec: &str) -> (&str, &str) {
    match spec.split_once(':') {
        Some((channel, nexthop)) => (channel, nexthop),
        None => (spec, ""),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_channel_and_nexthop() {
        assert_eq!(split_channel_spec("smtp:[mx.example.com]"), ("smtp", "[mx.example.com]"));
        assert_eq!(split_channel_spec("smtp"), ("smtp", ""));
        assert_eq!(split_channel_spec("smtp:"), ("smtp", ""));
    }
}
