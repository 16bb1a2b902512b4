//! The resolution engine (components C2 and C4): peels local-domain
//! suffixes off a recipient address, classifies the destination
//! against the configured table set, and applies the transport/
//! nexthop override chain.

mod engine;
mod flags;
mod local_domain;
mod result;
mod rewrite;
mod settings;
mod validate;

pub use engine::ResolverEngine;
pub use flags::ResolveFlags;
pub use local_domain::{LocalDomainPredicate, StaticLocalDomains};
pub use result::ResolveResult;
pub use rewrite::{NoopRewrite, NormalizingRewrite, RewriteHook};
pub use settings::{split_channel_spec, ResolverSettings};
pub use validate::{is_plausible_nexthop, looks_numeric};
