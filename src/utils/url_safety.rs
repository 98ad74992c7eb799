//! Outbound webhook URL validation.
//!
//! A minimal SSRF denylist applied when an endpoint is written and again right
//! before every delivery. It does not cover IPv6 private ranges (`fc00::/7`,
//! `fe80::/10`) and cannot see DNS rebinding: a hostname that resolves to a
//! private address at connect time passes.

use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

const BLOCKED_HOSTNAMES: &[&str] = &["localhost"];
const METADATA_HOSTNAMES: &[&str] = &["metadata.google.internal"];
const METADATA_IPV4: Ipv4Addr = Ipv4Addr::new(169, 254, 169, 254);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Only HTTPS URLs are allowed")]
    InsecureScheme(String),

    #[error("Localhost URLs are not allowed")]
    Localhost,

    #[error("Cloud metadata endpoints are not allowed")]
    CloudMetadata,

    #[error("Private IP addresses are not allowed")]
    PrivateNetwork,
}

pub fn validate_webhook_url(raw: &str) -> Result<(), UrlRejection> {
    let url = Url::parse(raw.trim()).map_err(|_| UrlRejection::InvalidUrl)?;

    if url.scheme() != "https" {
        return Err(UrlRejection::InsecureScheme(url.scheme().to_string()));
    }

    match url.host() {
        None => Err(UrlRejection::InvalidUrl),
        Some(Host::Domain(domain)) => check_domain(domain),
        Some(Host::Ipv4(addr)) => check_ipv4(addr),
        Some(Host::Ipv6(addr)) => check_ipv6(addr),
    }
}

fn check_domain(domain: &str) -> Result<(), UrlRejection> {
    let domain = domain.to_ascii_lowercase();
    if BLOCKED_HOSTNAMES.contains(&domain.as_str()) {
        return Err(UrlRejection::Localhost);
    }
    if METADATA_HOSTNAMES.contains(&domain.as_str()) {
        return Err(UrlRejection::CloudMetadata);
    }
    Ok(())
}

fn check_ipv4(addr: Ipv4Addr) -> Result<(), UrlRejection> {
    if addr == Ipv4Addr::LOCALHOST || addr == Ipv4Addr::UNSPECIFIED {
        return Err(UrlRejection::Localhost);
    }
    if addr == METADATA_IPV4 {
        return Err(UrlRejection::CloudMetadata);
    }
    // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
    if addr.is_private() {
        return Err(UrlRejection::PrivateNetwork);
    }
    Ok(())
}

fn check_ipv6(addr: Ipv6Addr) -> Result<(), UrlRejection> {
    if addr == Ipv6Addr::LOCALHOST {
        return Err(UrlRejection::Localhost);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_public_https_url() {
        assert_eq!(validate_webhook_url("https://example.com/hook"), Ok(()));
        assert_eq!(validate_webhook_url("https://hooks.example.com:8443/a?b=c"), Ok(()));
        assert_eq!(validate_webhook_url("https://8.8.8.8/hook"), Ok(()));
    }

    #[test]
    fn rejects_malformed_url() {
        assert_eq!(validate_webhook_url("not a url"), Err(UrlRejection::InvalidUrl));
        assert_eq!(validate_webhook_url("/relative/path"), Err(UrlRejection::InvalidUrl));
        assert_eq!(validate_webhook_url(""), Err(UrlRejection::InvalidUrl));
    }

    #[test]
    fn rejects_every_non_https_scheme() {
        for url in [
            "http://example.com/hook",
            "ftp://example.com/file",
            "ws://example.com/socket",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(validate_webhook_url(url), Err(UrlRejection::InsecureScheme(_))),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn scheme_check_runs_before_host_checks() {
        assert_eq!(
            validate_webhook_url("http://localhost/x"),
            Err(UrlRejection::InsecureScheme("http".into()))
        );
    }

    #[test]
    fn rejects_loopback_hosts() {
        for url in [
            "https://localhost/x",
            "https://LOCALHOST/x",
            "https://127.0.0.1/x",
            "https://0.0.0.0/x",
            "https://[::1]/x",
        ] {
            assert_eq!(validate_webhook_url(url), Err(UrlRejection::Localhost), "{url}");
        }
    }

    #[test]
    fn rejects_cloud_metadata_hosts() {
        assert_eq!(
            validate_webhook_url("https://169.254.169.254/x"),
            Err(UrlRejection::CloudMetadata)
        );
        assert_eq!(
            validate_webhook_url("https://metadata.google.internal/computeMetadata/v1"),
            Err(UrlRejection::CloudMetadata)
        );
    }

    #[test]
    fn rejects_private_ipv4_ranges() {
        for url in [
            "https://10.1.2.3/x",
            "https://172.16.0.1/x",
            "https://172.20.0.5/x",
            "https://172.31.255.255/x",
            "https://192.168.1.1/x",
        ] {
            assert_eq!(validate_webhook_url(url), Err(UrlRejection::PrivateNetwork), "{url}");
        }
    }

    #[test]
    fn range_edges_outside_private_blocks_pass() {
        assert_eq!(validate_webhook_url("https://172.15.255.255/x"), Ok(()));
        assert_eq!(validate_webhook_url("https://172.32.0.1/x"), Ok(()));
        assert_eq!(validate_webhook_url("https://11.0.0.1/x"), Ok(()));
    }

    #[test]
    fn ipv6_private_ranges_are_not_covered() {
        assert_eq!(validate_webhook_url("https://[fc00::1]/x"), Ok(()));
        assert_eq!(validate_webhook_url("https://[fe80::1]/x"), Ok(()));
    }

    #[test]
    fn reasons_are_distinct() {
        let messages = [
            UrlRejection::InvalidUrl.to_string(),
            UrlRejection::InsecureScheme("http".into()).to_string(),
            UrlRejection::Localhost.to_string(),
            UrlRejection::CloudMetadata.to_string(),
            UrlRejection::PrivateNetwork.to_string(),
        ];
        let unique: std::collections::HashSet<_> = messages.iter().collect();
        assert_eq!(unique.len(), messages.len());
    }
}
