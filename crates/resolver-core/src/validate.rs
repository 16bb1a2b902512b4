use kumo_address::host::HostAddress;
use std::str::FromStr;

/// Whether `nexthop` looks like something an SMTP client could
/// actually connect to: a bracketed IPv4/IPv6 literal, or a
/// dot-separated hostname made up of valid DNS labels.
///
/// This is deliberately a convincing approximation, not a full DNS
/// label grammar or an RFC 952/1123 validator: its job is to catch the
/// obviously-broken nexthops (embedded routing operators, stray
/// whitespace, empty labels) that a misconfigured table entry can
/// produce, not to second-guess a syntactically valid but unusual
/// hostname.
pub fn is_plausible_nexthop(nexthop: &str) -> bool {
    if nexthop.is_empty() {
        return false;
    }
    if HostAddress::from_str(nexthop)
        .ok()
        .and_then(|h| h.ip())
        .is_some()
    {
        return true;
    }
    is_valid_hostname(nexthop)
}

fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.len() > 253 {
        return false;
    }
    hostname.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }
    let bytes = label.as_bytes();
    let alnum_or_hyphen = |b: u8| b.is_ascii_alphanumeric() || b == b'-';
    bytes.iter().all(|&b| alnum_or_hyphen(b))
        && bytes[0] != b'-'
        && bytes[bytes.len() - 1] != b'-'
}

/// Whether `nexthop` is made up only of characters that look like an
/// IP literal (digits, dots, brackets). Used alongside
/// [`is_plausible_nexthop`]: a nexthop drawn from this narrow
/// character set is given a pass even if it isn't a well-formed IPv4
/// literal, mirroring the source's permissive treatment of that case.
pub fn looks_numeric(nexthop: &str) -> bool {
    nexthop.chars().all(|c| "[]0123456789.".contains(c))
}
