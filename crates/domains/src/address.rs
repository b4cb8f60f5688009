//! # Client Address Resolution
//!
//! Ownership is keyed on the client's address, so how that address is derived
//! from a request is a trust decision. `AddressPolicy` makes it explicit.
//!
//! `X-Forwarded-For` is written by whoever sends the request. Trusting it is only
//! sound when a reverse proxy in front of the service overwrites the header;
//! otherwise any client can claim any address, including an admin's.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the client address is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressPolicy {
    /// Transport peer address only; forwarding headers are ignored.
    #[default]
    Peer,
    /// First `X-Forwarded-For` entry when present, peer address otherwise.
    ProxyHeader,
}

/// The request metadata address resolution looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOrigin<'a> {
    /// Value of the first `X-Forwarded-For` header, if any.
    pub forwarded_for: Option<&'a str>,
    /// Transport-level peer.
    pub peer: Option<IpAddr>,
}

impl AddressPolicy {
    /// Resolves the client address. Unknown peers resolve to the empty string.
    pub fn resolve(&self, origin: &RequestOrigin<'_>) -> String {
        if let AddressPolicy::ProxyHeader = self {
            let first = origin
                .forwarded_for
                .and_then(|header| header.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty());
            if let Some(ip) = first {
                return ip.to_string();
            }
        }
        origin.peer.map(|ip| ip.to_string()).unwrap_or_default()
    }

    pub fn trusts_forwarding_headers(&self) -> bool {
        matches!(self, AddressPolicy::ProxyHeader)
    }
}

impl fmt::Display for AddressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressPolicy::Peer => f.write_str("peer"),
            AddressPolicy::ProxyHeader => f.write_str("proxy-header"),
        }
    }
}

impl FromStr for AddressPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peer" => Ok(AddressPolicy::Peer),
            "proxy-header" => Ok(AddressPolicy::ProxyHeader),
            other => Err(format!(
                "unknown address policy '{other}' (expected 'peer' or 'proxy-header')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> Option<IpAddr> {
        Some("192.0.2.7".parse().unwrap())
    }

    #[test]
    fn proxy_header_takes_first_listed_value() {
        let origin = RequestOrigin {
            forwarded_for: Some(" 203.0.113.9 , 10.0.0.1"),
            peer: peer(),
        };
        assert_eq!(AddressPolicy::ProxyHeader.resolve(&origin), "203.0.113.9");
    }

    #[test]
    fn proxy_header_falls_back_to_peer() {
        let origin = RequestOrigin { forwarded_for: None, peer: peer() };
        assert_eq!(AddressPolicy::ProxyHeader.resolve(&origin), "192.0.2.7");

        let blank = RequestOrigin { forwarded_for: Some(" , 10.0.0.1"), peer: peer() };
        assert_eq!(AddressPolicy::ProxyHeader.resolve(&blank), "192.0.2.7");
    }

    #[test]
    fn peer_policy_ignores_header() {
        let origin = RequestOrigin {
            forwarded_for: Some("127.0.0.1"),
            peer: peer(),
        };
        assert_eq!(AddressPolicy::Peer.resolve(&origin), "192.0.2.7");
    }

    #[test]
    fn missing_peer_resolves_empty() {
        assert_eq!(AddressPolicy::Peer.resolve(&RequestOrigin::default()), "");
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("peer".parse::<AddressPolicy>(), Ok(AddressPolicy::Peer));
        assert_eq!(" Proxy-Header".parse::<AddressPolicy>(), Ok(AddressPolicy::ProxyHeader));
        assert!("x-real-ip".parse::<AddressPolicy>().is_err());
    }
}
