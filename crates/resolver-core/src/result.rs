use crate::flags::ResolveFlags;

/// The outcome of resolving one recipient address: which delivery
/// channel to hand it to, the nexthop to pass along with it, the
/// normalized recipient address to rewrite the envelope to, and the
/// classification/outcome flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    pub channel: String,
    pub nexthop: String,
    pub nextrcpt: String,
    pub flags: ResolveFlags,
}
