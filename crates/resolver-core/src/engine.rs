use crate::flags::ResolveFlags;
use crate::local_domain::LocalDomainPredicate;
use crate::result::ResolveResult;
use crate::rewrite::RewriteHook;
use crate::settings::{split_channel_spec, ResolverSettings};
use crate::validate::{is_plausible_nexthop, looks_numeric};
use resolver_address::{parse, ParseMode, Special, TokenKind, TokenTree};
use resolver_tables::{LookupOutcome, TableSet};

/// The maximum number of peeling-loop iterations before giving up and
/// bailing out with `FLAG_FAIL`. Every real iteration either strips a
/// local-domain suffix (shrinking the tree) or converts a bangpath/
/// percent-hack operator into `@` form (removing one `!`/`%`), so a
/// well-behaved [`RewriteHook`] always terminates well inside this; it
/// only exists to bound a misbehaving hook that rewrites without
/// making progress.
const MAX_PEEL_ITERATIONS: usize = 64;

/// Resolves recipient addresses against a fixed set of lookup tables
/// and configuration, per the peeling/classification/override pipeline
/// (components C2/C4). Cheap to construct; holds only borrows, so a
/// new one is built per request or per connection as convenient.
pub struct ResolverEngine<'a> {
    tables: &'a TableSet,
    settings: &'a ResolverSettings,
    local_domain: &'a dyn LocalDomainPredicate,
    rewrite: &'a dyn RewriteHook,
}

struct PeelOutcome {
    tree: TokenTree,
    saved_domain: Option<TokenTree>,
    domain: Option<String>,
    /// Index of the `@` token separating the residual localpart from
    /// `domain`, when `domain` is `Some`.
    at: Option<usize>,
}

impl<'a> ResolverEngine<'a> {
    pub fn new(
        tables: &'a TableSet,
        settings: &'a ResolverSettings,
        local_domain: &'a dyn LocalDomainPredicate,
        rewrite: &'a dyn RewriteHook,
    ) -> Self {
        Self {
            tables,
            settings,
            local_domain,
            rewrite,
        }
    }

    pub fn resolve(&self, address: &str) -> ResolveResult {
        let mode = if self.settings.resolve_dequoted {
            ParseMode::Dequoted
        } else {
            ParseMode::Requoted
        };

        let tree = match parse(address, mode) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!(address, %err, "address failed to parse");
                return ResolveResult {
                    channel: self.settings.error_channel_name().to_string(),
                    nexthop: "Malformed address".to_string(),
                    nextrcpt: address.to_string(),
                    flags: ResolveFlags::ERROR | ResolveFlags::FAIL,
                };
            }
        };

        let peeled = self.peel(tree);
        let mut flags = self.detect_route(&peeled);
        let nextrcpt = self.finalize_recipient(peeled.tree, peeled.saved_domain);

        let mut blame;
        let (mut channel, mut nexthop, class) = match &peeled.domain {
            Some(domain) => {
                let (channel, nexthop, class, classify_blame, fail, domain_error) =
                    self.classify_remote(domain);
                blame = classify_blame;
                if fail {
                    flags |= ResolveFlags::FAIL;
                }
                flags |= domain_error;
                (channel, nexthop, class)
            }
            None => {
                let (channel, nexthop) = self.classify_local();
                blame = "local_transport";
                (channel, nexthop, ResolveFlags::CLASS_LOCAL)
            }
        };
        flags |= class;

        if !flags.contains(ResolveFlags::FAIL) {
            if peeled.domain.is_some()
                && (class == ResolveFlags::CLASS_RELAY || class == ResolveFlags::CLASS_DEFAULT)
                && !self.settings.relayhost.is_empty()
            {
                nexthop = self.settings.relayhost.clone();
            }

            let (split_channel, split_nexthop) = split_channel_spec(&channel);
            if !split_nexthop.is_empty() {
                nexthop = split_nexthop.to_string();
            }
            channel = split_channel.to_string();
        }

        self.warn_on_virtual_domain_conflict(&nextrcpt, class);

        if !flags.contains(ResolveFlags::FAIL) {
            if let Some(relocated) = self.tables.relocated_maps.as_ref() {
                match relocated.lookup(&nextrcpt) {
                    LookupOutcome::Match(newloc) => {
                        channel = self.settings.error_channel_name().to_string();
                        nexthop = format!("user has moved to {newloc}");
                        blame = "error_transport";
                    }
                    LookupOutcome::Transient => flags |= ResolveFlags::FAIL,
                    LookupOutcome::NoMatch => {}
                }
            }
        }

        if !flags.contains(ResolveFlags::FAIL) && channel != self.settings.error_channel_name() {
            if let Some(transport) = self.tables.transport_maps.as_ref() {
                match transport.lookup(&nextrcpt) {
                    LookupOutcome::Match(value) => {
                        let (t, n) = split_channel_spec(&value);
                        if !t.is_empty() {
                            channel = t.to_string();
                            blame = "transport_maps";
                        }
                        if !n.is_empty() {
                            nexthop = n.to_string();
                        }
                    }
                    LookupOutcome::Transient => flags |= ResolveFlags::FAIL,
                    LookupOutcome::NoMatch => {}
                }
            }
        }

        self.sanity_check(&mut channel, &mut nexthop, &mut flags, blame);

        ResolveResult {
            channel,
            nexthop,
            nextrcpt,
            flags,
        }
    }

    fn peel(&self, mut tree: TokenTree) -> PeelOutcome {
        let mut saved_domain: Option<TokenTree> = None;

        for _ in 0..MAX_PEEL_ITERATIONS {
            trim_trailing_dot(&mut tree);
            strip_trailing_at(&mut tree);

            if tree.is_empty_local() {
                tree = TokenTree::new();
                tree.push(TokenKind::Atom("postmaster".to_string()));
                self.rewrite.rewrite("canonical", &mut tree);
                continue;
            }

            if let Some(at) = tree.find_rightmost_special(Special::At) {
                let domain_str = tree.to_internal_from(at + 1);
                if self.local_domain.is_local_domain(&domain_str) {
                    let detached = tree.sub_keep_before(at);
                    saved_domain = Some(detached);
                    continue;
                }

                if self.has_convertible_operator(&tree) {
                    self.rewrite.rewrite("canonical", &mut tree);
                    continue;
                }

                return PeelOutcome {
                    tree,
                    saved_domain,
                    domain: Some(domain_str),
                    at: Some(at),
                };
            }

            if self.has_convertible_operator(&tree) {
                self.rewrite.rewrite("canonical", &mut tree);
                continue;
            }

            return PeelOutcome {
                tree,
                saved_domain,
                domain: None,
                at: None,
            };
        }

        tracing::error!("address peeling did not converge; giving up");
        PeelOutcome {
            tree,
            saved_domain,
            domain: None,
            at: None,
        }
    }

    fn has_convertible_operator(&self, tree: &TokenTree) -> bool {
        let has_bang = self.settings.swap_bangpath
            && tree.tokens().iter().any(|t| t.is_special(Special::Bang));
        let has_percent = self.settings.percent_hack
            && tree.tokens().iter().any(|t| t.is_special(Special::Percent));
        has_bang || has_percent
    }

    /// Route detection (anti-relay heuristic): once peeling has
    /// settled on a remote domain, a routing operator anywhere in the
    /// residual localpart means the sender embedded a source route.
    /// This is checked regardless of whether bangpath/percent-hack
    /// rewriting is enabled locally -- a peer could still embed `!` or
    /// `%` characters as ordinary atoms that merely look like one.
    fn detect_route(&self, peeled: &PeelOutcome) -> ResolveFlags {
        match peeled.at {
            Some(at) => {
                let localpart = &peeled.tree.tokens()[..at];
                if localpart.iter().any(|t| t.is_routing_special()) {
                    ResolveFlags::ROUTED
                } else {
                    ResolveFlags::empty()
                }
            }
            None => ResolveFlags::empty(),
        }
    }

    fn finalize_recipient(&self, mut tree: TokenTree, saved_domain: Option<TokenTree>) -> String {
        if tree.find_rightmost_special(Special::At).is_none() {
            // domain was None: nothing remote was ever found, so reattach
            // whatever local-domain suffix we most recently peeled off,
            // or fall back to this host.
            match saved_domain {
                Some(saved) => tree.append(saved),
                None => {
                    tree.push(TokenKind::Special(Special::At));
                    tree.push(TokenKind::Atom(self.settings.myhostname.clone()));
                }
            }
        }
        tree.to_internal()
    }

    /// Destination classification, remote branch (`domain` is some
    /// peeled or never-local domain). Returns `(channel, nexthop,
    /// class, blame, transient_failure, domain_error)`.
    ///
    /// `domain_error` is computed once, against the raw stripped
    /// domain, before any table lookup runs (spec §4.2.4: "Emit the
    /// stripped domain into nexthop, lowercased. If nexthop contains
    /// characters outside `[]0-9.` and is not a valid hostname, set
    /// FLAG_ERROR. Then the classification cascade..."). It is
    /// independent of which branch of the cascade ultimately fires and
    /// of any later nexthop override (relayhost, transport_maps,
    /// channel-split): those overrides never retroactively clear or
    /// recompute it.
    fn classify_remote(
        &self,
        domain: &str,
    ) -> (String, String, ResolveFlags, &'static str, bool, ResolveFlags) {
        let nexthop = domain.to_ascii_lowercase();
        let domain_error = if looks_numeric(&nexthop) || is_plausible_nexthop(&nexthop) {
            ResolveFlags::empty()
        } else {
            ResolveFlags::ERROR
        };

        let alias_outcome = self
            .tables
            .virt_alias_doms
            .as_ref()
            .map(|l| l.lookup(&nexthop))
            .unwrap_or(LookupOutcome::NoMatch);
        if alias_outcome.is_transient() {
            return (
                String::new(),
                String::new(),
                ResolveFlags::empty(),
                "virt_alias_doms",
                true,
                domain_error,
            );
        }
        if let LookupOutcome::Match(()) = alias_outcome {
            if matches!(
                self.tables.virt_mailbox_doms.as_ref().map(|l| l.lookup(&nexthop)),
                Some(LookupOutcome::Match(()))
            ) {
                tracing::warn!(
                    domain = %nexthop,
                    "domain listed in both virtual alias and virtual mailbox domains"
                );
            }
            // Mirrors a redundant transient check present immediately
            // after this branch in the implementation this was derived
            // from. `alias_outcome` cannot be `Transient` here -- we
            // already returned above if it was -- so this can never
            // fire. Preserved rather than silently dropped.
            if alias_outcome.is_transient() {
                return (
                    String::new(),
                    String::new(),
                    ResolveFlags::empty(),
                    "virt_alias_doms",
                    true,
                    domain_error,
                );
            }
            return (
                self.settings.error_transport.clone(),
                "User unknown".to_string(),
                ResolveFlags::CLASS_ALIAS,
                "error_transport",
                false,
                domain_error,
            );
        }

        let mailbox_outcome = self
            .tables
            .virt_mailbox_doms
            .as_ref()
            .map(|l| l.lookup(&nexthop))
            .unwrap_or(LookupOutcome::NoMatch);
        if mailbox_outcome.is_transient() {
            return (
                String::new(),
                String::new(),
                ResolveFlags::empty(),
                "virt_mailbox_doms",
                true,
                domain_error,
            );
        }
        if let LookupOutcome::Match(()) = mailbox_outcome {
            return (
                self.settings.virt_transport.clone(),
                nexthop,
                ResolveFlags::CLASS_VIRTUAL,
                "virt_transport",
                false,
                domain_error,
            );
        }

        let relay_outcome = self
            .tables
            .relay_domains
            .as_ref()
            .map(|l| l.lookup(&nexthop))
            .unwrap_or(LookupOutcome::NoMatch);
        if relay_outcome.is_transient() {
            return (
                String::new(),
                String::new(),
                ResolveFlags::empty(),
                "relay_domains",
                true,
                domain_error,
            );
        }
        if let LookupOutcome::Match(()) = relay_outcome {
            return (
                self.settings.relay_transport.clone(),
                nexthop,
                ResolveFlags::CLASS_RELAY,
                "relay_transport",
                false,
                domain_error,
            );
        }

        (
            self.settings.def_transport.clone(),
            nexthop,
            ResolveFlags::CLASS_DEFAULT,
            "def_transport",
            false,
            domain_error,
        )
    }

    fn classify_local(&self) -> (String, String) {
        let channel = self.settings.local_transport.clone();
        let (prefix, suffix) = split_channel_spec(&channel);
        let (channel, mut nexthop) = (prefix.to_string(), suffix.to_string());
        if nexthop.is_empty() {
            nexthop = self.settings.myhostname.clone();
        }
        (channel, nexthop)
    }

    fn warn_on_virtual_domain_conflict(&self, nextrcpt: &str, class: ResolveFlags) {
        if class != ResolveFlags::CLASS_LOCAL {
            return;
        }
        let Some((_, domain)) = nextrcpt.rsplit_once('@') else {
            return;
        };
        let in_alias = matches!(
            self.tables.virt_alias_doms.as_ref().map(|l| l.lookup(domain)),
            Some(LookupOutcome::Match(()))
        );
        let in_mailbox = matches!(
            self.tables.virt_mailbox_doms.as_ref().map(|l| l.lookup(domain)),
            Some(LookupOutcome::Match(()))
        );
        if in_alias || in_mailbox {
            tracing::warn!(
                domain,
                "locally-destined recipient's domain is also a configured virtual domain"
            );
        }
    }

    /// Empty-channel/empty-nexthop programmer-error checks only (spec
    /// §4.2.8/§7). `FLAG_ERROR` is *not* recomputed here: it is latched
    /// once, in [`Self::classify_remote`], against the raw stripped
    /// domain before the classification cascade and any override runs,
    /// and is never re-derived from the final (possibly overridden)
    /// nexthop.
    fn sanity_check(
        &self,
        channel: &mut String,
        nexthop: &mut String,
        flags: &mut ResolveFlags,
        blame: &'static str,
    ) {
        if flags.contains(ResolveFlags::FAIL) {
            return;
        }
        if channel.is_empty() {
            tracing::warn!(param = blame, "resolved to an empty channel");
            *flags |= ResolveFlags::FAIL;
            return;
        }
        if nexthop.is_empty() {
            panic!("resolver produced an empty nexthop on a successful resolution (channel={channel})");
        }
    }
}

/// Trim one trailing `.` off the domain when it is safe to do so: the
/// token before it must be `@` or a non-dot atom. Never touches a
/// trailing `..`, which is left for the hostname validator to reject
/// later rather than silently rewritten.
fn trim_trailing_dot(tree: &mut TokenTree) {
    let tokens = tree.tokens();
    let n = tokens.len();
    if n < 2 || !tokens[n - 1].is_special(Special::Dot) {
        return;
    }
    let safe = tokens[n - 2].is_special(Special::At) || matches!(tokens[n - 2].kind, TokenKind::Atom(_));
    if safe {
        tree.pop();
    }
}

fn strip_trailing_at(tree: &mut TokenTree) {
    if matches!(tree.last(), Some(t) if t.is_special(Special::At)) {
        tree.pop();
    }
}
