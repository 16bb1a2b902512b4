use bitflags::bitflags;

bitflags! {
    /// The classification and outcome flags attached to a resolution
    /// result. The class bits (`CLASS_*`) are mutually exclusive in
    /// practice -- exactly one is set on any non-failed result -- but
    /// are modeled as independent bits because the reply wire format
    /// carries them as a single flag word, not an enum discriminant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResolveFlags: u32 {
        const CLASS_LOCAL = 1;
        const CLASS_ALIAS = 2;
        const CLASS_VIRTUAL = 4;
        const CLASS_RELAY = 8;
        const CLASS_DEFAULT = 16;
        /// The address carried an explicit source route (`@`, or `!`
        /// / `%` when the corresponding rewrite is enabled) in the
        /// localpart left over after peeling off local-domain
        /// suffixes. Downstream policy typically uses this to refuse
        /// relaying through an open-relay-looking path.
        const ROUTED = 256;
        /// The resolved nexthop failed hostname/IP-literal validation.
        const ERROR = 512;
        /// A table lookup reported a transient backend failure;
        /// resolution could not complete and should be retried later.
        const FAIL = 1024;
    }
}
