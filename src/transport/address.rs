//! Target URL construction and diagnostic labels.

use std::net::Ipv6Addr;

use crate::core::{HTTP_TRANSPORT_PATH, TRANSPORT_NAME};

/// Check if `address` is an IPv6 literal.
pub fn is_ipv6(address: &str) -> bool {
    address.parse::<Ipv6Addr>().is_ok()
}

/// Build the request URL for `address`.
///
/// IPv6 literals are bracketed. Callers pass
/// [`HTTP_TRANSPORT_PORT`](crate::core::HTTP_TRANSPORT_PORT), never the
/// endpoint's configured port.
pub fn build_url(address: &str, port: u16) -> String {
    if is_ipv6(address) {
        format!("http://[{address}]:{port}{HTTP_TRANSPORT_PATH}")
    } else {
        format!("http://{address}:{port}{HTTP_TRANSPORT_PATH}")
    }
}

/// Transport label for telemetry, empty while not connected.
///
/// IPv4 is implied, so only IPv6 gets a suffix.
pub fn describe(address: &str, connected: bool) -> String {
    if !connected {
        return String::new();
    }
    if is_ipv6(address) {
        format!("{TRANSPORT_NAME}/IPv6")
    } else {
        TRANSPORT_NAME.to_string()
    }
}

/// Log tag naming the transport and address family.
pub fn tag(address: &str) -> String {
    if is_ipv6(address) {
        format!("{TRANSPORT_NAME}/IPv6")
    } else {
        format!("{TRANSPORT_NAME}/IPv4")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HTTP_TRANSPORT_PORT;

    #[test]
    fn test_build_url_ipv4() {
        assert_eq!(
            build_url("203.0.113.5", HTTP_TRANSPORT_PORT),
            "http://203.0.113.5:80/api"
        );
    }

    #[test]
    fn test_build_url_ipv6() {
        assert_eq!(
            build_url("2001:db8::1", HTTP_TRANSPORT_PORT),
            "http://[2001:db8::1]:80/api"
        );
    }

    #[test]
    fn test_build_url_hostname() {
        assert_eq!(build_url("example.org", 80), "http://example.org:80/api");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("203.0.113.5", false), "");
        assert_eq!(describe("2001:db8::1", false), "");
        assert_eq!(describe("203.0.113.5", true), "HTTP");
        assert_eq!(describe("2001:db8::1", true), "HTTP/IPv6");
    }

    #[test]
    fn test_tag() {
        assert_eq!(tag("203.0.113.5"), "HTTP/IPv4");
        assert_eq!(tag("2001:db8::1"), "HTTP/IPv6");
    }

    #[test]
    fn test_is_ipv6() {
        assert!(is_ipv6("::1"));
        assert!(!is_ipv6("[::1]"));
        assert!(!is_ipv6("127.0.0.1"));
    }
}
