use crate::address_map::AddressMap;
use crate::domain_list::DomainList;
use crate::string_list::StringList;

/// The fixed bundle of optional table handles the resolver consults.
/// Each handle is either absent (the parameter was configured empty,
/// and the table is treated as "never matches", not as an error) or
/// present and immutable for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub relay_domains: Option<DomainList>,
    pub virt_alias_doms: Option<StringList>,
    pub virt_mailbox_doms: Option<StringList>,
    pub relocated_maps: Option<AddressMap>,
    pub transport_maps: Option<AddressMap>,
}
