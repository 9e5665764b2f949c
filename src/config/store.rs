//! User-added list persistence.
//!
//! Custom resolvers and test domains live as JSON files in the platform
//! config directory. Loading is deliberately forgiving: a missing or broken
//! file yields an empty list, never an error, so a corrupt store can never
//! block a measurement run. Saving reports its errors.

use crate::dns::types::{ResolverEntry, TestDomain};
use crate::error::{Error, Result};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// File holding user-added resolvers.
const CUSTOM_DNS_FILE: &str = "custom_dns.json";

/// File holding user-added test domains.
const CUSTOM_DOMAINS_FILE: &str = "custom_domains.json";

/// Store for user-added resolver and test-domain lists.
#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    /// Open the store in the default config directory
    /// (`$CONFIG_DIR/dnspick`).
    #[must_use]
    pub fn open_default() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dnspick");
        Self { dir }
    }

    /// Open the store in a specific directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load user-added resolvers; empty on any failure.
    #[must_use]
    pub fn load_resolvers(&self) -> Vec<ResolverEntry> {
        let mut entries: Vec<ResolverEntry> =
            load_or_empty(&self.dir.join(CUSTOM_DNS_FILE));
        for entry in &mut entries {
            entry.is_custom = true;
        }
        entries
    }

    /// Save user-added resolvers.
    pub fn save_resolvers(&self, entries: &[ResolverEntry]) -> Result<()> {
        let custom: Vec<&ResolverEntry> = entries.iter().filter(|e| e.is_custom).collect();
        self.save(CUSTOM_DNS_FILE, &custom)
    }

    /// Load user-added test domains; empty on any failure.
    #[must_use]
    pub fn load_domains(&self) -> Vec<TestDomain> {
        let mut domains: Vec<TestDomain> =
            load_or_empty(&self.dir.join(CUSTOM_DOMAINS_FILE));
        for domain in &mut domains {
            domain.is_custom = true;
        }
        domains
    }

    /// Save user-added test domains.
    pub fn save_domains(&self, domains: &[TestDomain]) -> Result<()> {
        let custom: Vec<&TestDomain> = domains.iter().filter(|d| d.is_custom).collect();
        self.save(CUSTOM_DOMAINS_FILE, &custom)
    }

    fn save<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.dir.join(file), json)?;
        Ok(())
    }
}

fn load_or_empty<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable list {}: {e}", path.display());
            Vec::new()
        }),
        Err(_) => Vec::new(),
    }
}

/// Load a full resolver list from a JSON file.
pub fn load_resolver_file(path: impl AsRef<Path>) -> Result<Vec<ResolverEntry>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let entries: Vec<ResolverEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

/// Parse ad-hoc resolver specifications of the form `IP#Name`.
///
/// The name defaults to the address itself when omitted.
pub fn resolvers_from_args(specs: &[String]) -> Result<Vec<ResolverEntry>> {
    let mut entries = Vec::with_capacity(specs.len());
    for spec in specs {
        let mut parts = spec.splitn(2, '#');
        let ip_str = parts.next().unwrap_or_default().trim();
        let name = parts
            .next()
            .map_or_else(|| ip_str.to_string(), |n| n.trim().to_string());

        let primary: IpAddr = ip_str
            .parse()
            .map_err(|_| Error::parse(format!("Invalid IP address: {ip_str}")))?;
        entries.push(ResolverEntry::custom(name, primary, None));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::with_dir(dir.path().join("nowhere"));
        assert!(store.load_resolvers().is_empty());
        assert!(store.load_domains().is_empty());
    }

    #[test]
    fn test_broken_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CUSTOM_DNS_FILE), "not json at all").unwrap();
        let store = UserStore::with_dir(dir.path());
        assert!(store.load_resolvers().is_empty());
    }

    #[test]
    fn test_resolver_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::with_dir(dir.path());

        let entries = vec![
            ResolverEntry::custom("Mine", ip("10.0.0.1"), Some(ip("10.0.0.2"))),
            // Built-in entries are not persisted.
            ResolverEntry::new("Google DNS", ip("8.8.8.8"), None),
        ];
        store.save_resolvers(&entries).unwrap();

        let loaded = store.load_resolvers();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Mine");
        assert_eq!(loaded[0].primary, ip("10.0.0.1"));
        assert_eq!(loaded[0].secondary, Some(ip("10.0.0.2")));
        assert!(loaded[0].is_custom);
    }

    #[test]
    fn test_domain_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::with_dir(dir.path());

        let domains = vec![TestDomain::custom("My site", "example.org", "Custom")];
        store.save_domains(&domains).unwrap();

        let loaded = store.load_domains();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].domain, "example.org");
        assert!(loaded[0].is_custom);
    }

    #[test]
    fn test_resolvers_from_args() {
        let specs = vec!["8.8.8.8#Google".to_string(), "1.1.1.1".to_string()];
        let entries = resolvers_from_args(&specs).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Google");
        assert_eq!(entries[1].name, "1.1.1.1");
        assert!(entries.iter().all(|e| e.is_custom));
    }

    #[test]
    fn test_resolvers_from_args_invalid_ip() {
        let specs = vec!["not-an-ip#Test".to_string()];
        assert!(resolvers_from_args(&specs).is_err());
    }
}
