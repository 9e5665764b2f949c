//! Built-in resolver and test-domain catalogs.
//!
//! This module holds the fixed lists of well-known public DNS services and
//! query-target domains, plus the random probe-domain generator used to
//! defeat resolver-side caching.

use crate::dns::types::{ResolverEntry, TestDomain};
use std::net::IpAddr;

/// Category label of the regenerated random-domain entry.
pub const SPECIAL_CATEGORY: &str = "Special";

/// Suffix appended to random probe labels. `example.com` is reserved for
/// exactly this kind of traffic (RFC 2606).
const RANDOM_DOMAIN_SUFFIX: &str = "example.com";

/// Length of the random label in [`random_probe_domain`].
const RANDOM_LABEL_LEN: usize = 8;

fn ip(s: &str) -> IpAddr {
    s.parse().expect("built-in catalog address must parse")
}

/// Built-in list of well-known public DNS services.
#[must_use]
pub fn builtin_resolvers() -> Vec<ResolverEntry> {
    vec![
        ResolverEntry::new("Google DNS", ip("8.8.8.8"), Some(ip("8.8.4.4"))),
        ResolverEntry::new("Cloudflare DNS", ip("1.1.1.1"), Some(ip("1.0.0.1"))),
        ResolverEntry::new("Quad9", ip("9.9.9.9"), Some(ip("149.112.112.112"))),
        ResolverEntry::new("OpenDNS", ip("208.67.222.222"), Some(ip("208.67.220.220"))),
        ResolverEntry::new("AdGuard DNS", ip("94.140.14.14"), Some(ip("94.140.15.15"))),
        ResolverEntry::new("AliDNS", ip("223.5.5.5"), Some(ip("223.6.6.6"))),
        ResolverEntry::new("DNSPod", ip("119.29.29.29"), Some(ip("182.254.116.116"))),
        ResolverEntry::new("114 DNS", ip("114.114.114.114"), Some(ip("114.114.115.115"))),
        ResolverEntry::new("Tencent DNS", ip("119.28.28.28"), Some(ip("182.254.118.118"))),
        ResolverEntry::new("Baidu DNS", ip("180.76.76.76"), None),
        ResolverEntry::new("360 DNS", ip("101.226.4.6"), Some(ip("218.30.118.6"))),
        ResolverEntry::new("CNNIC SDNS", ip("1.2.4.8"), Some(ip("210.2.4.8"))),
        ResolverEntry::new("DNS PAI", ip("101.226.4.6"), Some(ip("218.30.118.6"))),
        ResolverEntry::new("Volcengine DNS", ip("180.184.1.1"), Some(ip("180.184.2.2"))),
    ]
}

/// Built-in list of query-target domains, grouped by rough region/purpose.
///
/// The trailing `Special` entry holds a random domain and is regenerated by
/// [`refresh_special_domains`] before each batch run.
#[must_use]
pub fn builtin_domains() -> Vec<TestDomain> {
    vec![
        TestDomain::new("Baidu", "www.baidu.com", "China"),
        TestDomain::new("Taobao", "www.taobao.com", "China"),
        TestDomain::new("Tencent QQ", "www.qq.com", "China"),
        TestDomain::new("NetEase", "www.163.com", "China"),
        TestDomain::new("Bilibili", "www.bilibili.com", "China"),
        TestDomain::new("Zhihu", "www.zhihu.com", "China"),
        TestDomain::new("Google", "www.google.com", "Global"),
        TestDomain::new("YouTube", "www.youtube.com", "Global"),
        TestDomain::new("Microsoft", "www.microsoft.com", "Global"),
        TestDomain::new("Amazon", "www.amazon.com", "Global"),
        TestDomain::new("Facebook", "www.facebook.com", "Global"),
        TestDomain::new("Twitter", "twitter.com", "Global"),
        TestDomain::new("Cloudflare", "www.cloudflare.com", "CDN"),
        TestDomain::new("Akamai", "www.akamai.com", "CDN"),
        TestDomain::new("AWS", "aws.amazon.com", "CDN"),
        TestDomain::new("Azure", "azure.microsoft.com", "CDN"),
        TestDomain::new("Random domain", random_probe_domain(), SPECIAL_CATEGORY),
    ]
}

/// Generate a fresh random probe domain.
///
/// Produces an 8-character lowercase alphanumeric label under the reserved
/// suffix, e.g. `k3xq7f0a.example.com`. Collisions within a run are
/// negligible, so caches never see the same name twice.
#[must_use]
pub fn random_probe_domain() -> String {
    let label: String = (0..RANDOM_LABEL_LEN)
        .map(|_| fastrand::alphanumeric().to_ascii_lowercase())
        .collect();
    format!("{label}.{RANDOM_DOMAIN_SUFFIX}")
}

/// Regenerate the domain of every `Special`-category entry.
///
/// Called before each batch run so the resolver under test cannot serve the
/// previous run's answer from cache.
pub fn refresh_special_domains(domains: &mut [TestDomain]) {
    for entry in domains
        .iter_mut()
        .filter(|d| d.category == SPECIAL_CATEGORY)
    {
        entry.domain = random_probe_domain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_resolvers_shape() {
        let resolvers = builtin_resolvers();
        assert_eq!(resolvers.len(), 14);
        assert!(resolvers.iter().all(|r| !r.is_custom));
        assert!(resolvers.iter().any(|r| r.secondary.is_none()));
    }

    #[test]
    fn test_builtin_domains_have_one_special() {
        let domains = builtin_domains();
        let special: Vec<_> = domains
            .iter()
            .filter(|d| d.category == SPECIAL_CATEGORY)
            .collect();
        assert_eq!(special.len(), 1);
        assert!(special[0].domain.ends_with(".example.com"));
    }

    #[test]
    fn test_random_probe_domain_shape() {
        let domain = random_probe_domain();
        let label = domain.strip_suffix(".example.com").unwrap();
        assert_eq!(label.len(), 8);
        assert!(label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_random_probe_domain_unique() {
        let a = random_probe_domain();
        let b = random_probe_domain();
        assert_ne!(a, b);
    }

    #[test]
    fn test_refresh_replaces_special_only() {
        let mut domains = builtin_domains();
        let before: Vec<String> = domains.iter().map(|d| d.domain.clone()).collect();

        refresh_special_domains(&mut domains);

        for (entry, old) in domains.iter().zip(&before) {
            if entry.category == SPECIAL_CATEGORY {
                assert_ne!(&entry.domain, old);
            } else {
                assert_eq!(&entry.domain, old);
            }
        }
    }
}
