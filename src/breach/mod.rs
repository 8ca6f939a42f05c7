//! k-anonymity breach lookup
//!
//! Only the first [`PREFIX_LEN`] hex characters of the password's SHA-1
//! digest leave the process. The returned range table is matched locally
//! and cached per prefix, so the same prefix is fetched at most once per
//! TTL window even under concurrent lookups.

mod cache;
mod client;

pub use cache::{BreachCache, CacheEntry, FileCache, MemoryCache};
pub use client::{HttpRangeClient, RangeClient};

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};
use tokio::sync::Mutex;

use crate::config::BreachConfig;
use crate::error::{AnalyzerError, BreachError, ResourceError, ResourceWarning};
use crate::types::BreachStatus;

pub const PREFIX_LEN: usize = 5;
const SUFFIX_LEN: usize = 35;
const LOCK_SHARDS: usize = 64;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Uppercase hex SHA-1 of the password, kept secret.
pub fn digest(password: &SecretString) -> SecretString {
    let hash = Sha1::digest(password.expose_secret().as_bytes());
    SecretString::from(format!("{:X}", hash))
}

/// Splits an uppercase hex digest into (prefix, suffix).
pub fn split_digest(digest: &str) -> (&str, &str) {
    digest.split_at(PREFIX_LEN.min(digest.len()))
}

pub(crate) fn is_valid_prefix(prefix: &str) -> bool {
    prefix.len() == PREFIX_LEN && prefix.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses a `SUFFIX:COUNT` range table. Any bad line rejects the whole body.
pub fn parse_range_response(body: &str) -> Result<HashMap<String, u64>, BreachError> {
    let mut table = HashMap::new();
    for (n, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((suffix, count)) = line.split_once(':') else {
            return Err(BreachError::Malformed(format!("line {}: missing separator", n + 1)));
        };
        if suffix.len() != SUFFIX_LEN || !suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(BreachError::Malformed(format!("line {}: bad suffix", n + 1)));
        }
        let count: u64 = count
            .trim()
            .parse()
            .map_err(|_| BreachError::Malformed(format!("line {}: bad count", n + 1)))?;
        table.insert(suffix.to_ascii_uppercase(), count);
    }
    Ok(table)
}

/// Per-prefix mutual exclusion over a fixed set of shards.
#[derive(Debug)]
struct PrefixLocks {
    shards: Vec<Mutex<()>>,
}

impl PrefixLocks {
    fn new() -> Self {
        Self {
            shards: (0..LOCK_SHARDS).map(|_| Mutex::new(())).collect(),
        }
    }

    fn shard(&self, prefix: &str) -> &Mutex<()> {
        let key = u32::from_str_radix(prefix, 16).unwrap_or(0) as usize;
        &self.shards[key % self.shards.len()]
    }
}

pub struct BreachOracle<C = HttpRangeClient> {
    client: C,
    cache: Arc<dyn BreachCache>,
    locks: PrefixLocks,
    ttl: Duration,
}

impl BreachOracle<HttpRangeClient> {
    /// HTTP oracle with a file cache when `cache_dir` is set, in-memory otherwise.
    /// An unusable cache directory falls back to memory and is reported in
    /// `warnings`.
    pub fn from_config(
        config: &BreachConfig,
        warnings: &mut Vec<ResourceWarning>,
    ) -> Result<Self, AnalyzerError> {
        let client =
            HttpRangeClient::new(config).map_err(|e| AnalyzerError::BreachClient(e.to_string()))?;

        let cache: Arc<dyn BreachCache> = match &config.cache_dir {
            Some(dir) => match FileCache::new(dir) {
                Ok(cache) => Arc::new(cache),
                Err(source) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Breach cache directory {:?} unusable, caching in memory: {}", dir, source);
                    warnings.push(ResourceWarning {
                        resource: "breach cache directory",
                        error: ResourceError::CacheDir {
                            path: dir.clone(),
                            source,
                        },
                    });
                    Arc::new(MemoryCache::new())
                }
            },
            None => Arc::new(MemoryCache::new()),
        };

        Ok(Self::new(client, cache).with_ttl(config.cache_ttl()))
    }
}

impl<C: RangeClient> BreachOracle<C> {
    pub fn new(client: C, cache: Arc<dyn BreachCache>) -> Self {
        Self {
            client,
            cache,
            locks: PrefixLocks::new(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up the password. Failures yield [`BreachStatus::Unknown`].
    pub async fn check(&self, password: &SecretString) -> BreachStatus {
        let digest = digest(password);
        let (prefix, suffix) = split_digest(digest.expose_secret());

        match self.lookup(prefix).await {
            // padding rows carry a zero count
            Ok(table) => match table.get(suffix).copied() {
                Some(count) if count > 0 => BreachStatus::Exposed { count },
                _ => BreachStatus::NotExposed,
            },
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Breach lookup for prefix {} failed: {}", prefix, e);
                BreachStatus::unknown(e.to_string())
            }
        }
    }

    async fn lookup(&self, prefix: &str) -> Result<HashMap<String, u64>, BreachError> {
        let _guard = self.locks.shard(prefix).lock().await;

        match self.cache.get(prefix) {
            Ok(Some(entry)) if entry.is_fresh(Utc::now()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Breach cache hit for prefix {}", prefix);
                return Ok(entry.suffixes);
            }
            Ok(_) => {}
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Breach cache read for prefix {} failed, refetching: {}", prefix, _e);
            }
        }

        let body = self.client.fetch_range(prefix).await?;
        let table = parse_range_response(&body)?;

        let entry = CacheEntry::new(prefix, table, self.ttl);
        let table = entry.suffixes.clone();
        if let Err(_e) = self.cache.put(entry) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Breach cache write for prefix {} failed: {}", prefix, _e);
        }

        Ok(table)
    }
}

/// Object-safe view of an oracle, so holders need not be generic over the
/// transport.
pub trait BreachLookup: Send + Sync {
    fn lookup_status<'a>(
        &'a self,
        password: &'a SecretString,
    ) -> Pin<Box<dyn Future<Output = BreachStatus> + Send + 'a>>;
}

impl<C: RangeClient> BreachLookup for BreachOracle<C> {
    fn lookup_status<'a>(
        &'a self,
        password: &'a SecretString,
    ) -> Pin<Box<dyn Future<Output = BreachStatus> + Send + 'a>> {
        Box::pin(self.check(password))
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockClient;
    use super::*;
    use std::sync::atomic::Ordering;

    // SHA-1("password") = 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
    const PASSWORD_SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";
    const OTHER_SUFFIX: &str = "0018A45C4D1DEF81644B54AB7F969B88D65";
    // SHA-1("pw222568") = 5BAA6A98DAC0ABBDE89A64186BD58722BAC0C0E8
    const SIBLING_SUFFIX: &str = "A98DAC0ABBDE89A64186BD58722BAC0C0E8";

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn oracle(client: MockClient) -> BreachOracle<MockClient> {
        BreachOracle::new(client, Arc::new(MemoryCache::new()))
    }

    #[test]
    fn test_digest_and_split() {
        let d = digest(&secret("password"));
        let (prefix, suffix) = split_digest(d.expose_secret());
        assert_eq!(prefix, "5BAA6");
        assert_eq!(suffix, PASSWORD_SUFFIX);
    }

    #[test]
    fn test_parse_range_response() {
        let body = format!("{}:3861493\r\n{}:0\r\n", PASSWORD_SUFFIX, OTHER_SUFFIX);
        let table = parse_range_response(&body).unwrap();
        assert_eq!(table.get(PASSWORD_SUFFIX), Some(&3861493));
        assert_eq!(table.get(OTHER_SUFFIX), Some(&0));
        assert!(parse_range_response("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(matches!(
            parse_range_response("ABC:12"),
            Err(BreachError::Malformed(_))
        ));
        assert!(matches!(
            parse_range_response(&format!("{}:lots", PASSWORD_SUFFIX)),
            Err(BreachError::Malformed(_))
        ));
        assert!(matches!(
            parse_range_response("<html>oops</html>"),
            Err(BreachError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_exposed() {
        let oracle = oracle(MockClient::new(format!("{}:42", PASSWORD_SUFFIX)));
        let status = oracle.check(&secret("password")).await;
        assert_eq!(status, BreachStatus::Exposed { count: 42 });
    }

    #[tokio::test]
    async fn test_not_exposed_and_padding_row() {
        let oracle = oracle(MockClient::new(format!("{}:7", OTHER_SUFFIX)));
        assert_eq!(oracle.check(&secret("password")).await, BreachStatus::NotExposed);

        let oracle = self::oracle(MockClient::new(format!("{}:0", PASSWORD_SUFFIX)));
        assert_eq!(oracle.check(&secret("password")).await, BreachStatus::NotExposed);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let client = MockClient::new(format!("{}:42", PASSWORD_SUFFIX));
        let fetches = client.fetches.clone();
        let oracle = oracle(client);

        oracle.check(&secret("password")).await;
        oracle.check(&secret("password")).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_lookups_share_one_fetch() {
        let mut client = MockClient::new(format!("{}:42", PASSWORD_SUFFIX));
        client.delay = Duration::from_millis(200);
        let fetches = client.fetches.clone();
        let oracle = oracle(client);

        let pw = secret("password");
        let (a, b, c) = tokio::join!(oracle.check(&pw), oracle.check(&pw), oracle.check(&pw));
        assert_eq!(a, BreachStatus::Exposed { count: 42 });
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_passwords_sharing_prefix_share_one_fetch() {
        let mut client = MockClient::new(format!(
            "{}:42\r\n{}:7\r\n{}:0",
            PASSWORD_SUFFIX, SIBLING_SUFFIX, OTHER_SUFFIX
        ));
        client.delay = Duration::from_millis(200);
        let fetches = client.fetches.clone();
        let oracle = oracle(client);

        let first = secret("password");
        let second = secret("pw222568");
        let (a, b) = tokio::join!(oracle.check(&first), oracle.check(&second));
        assert_eq!(a, BreachStatus::Exposed { count: 42 });
        assert_eq!(b, BreachStatus::Exposed { count: 7 });
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        let c = oracle.check(&secret("pw222568")).await;
        assert_eq!(c, BreachStatus::Exposed { count: 7 });
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unusable_cache_dir_falls_back_to_memory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = BreachConfig {
            cache_dir: Some(file.path().to_path_buf()),
            ..BreachConfig::default()
        };

        let mut warnings = Vec::new();
        let oracle = BreachOracle::from_config(&config, &mut warnings);
        assert!(oracle.is_ok());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].resource, "breach cache directory");
        assert!(matches!(warnings[0].error, ResourceError::CacheDir { .. }));
    }

    #[tokio::test]
    async fn test_zero_ttl_refetches() {
        let client = MockClient::new(format!("{}:42", PASSWORD_SUFFIX));
        let fetches = client.fetches.clone();
        let oracle = oracle(client).with_ttl(Duration::ZERO);

        oracle.check(&secret("password")).await;
        oracle.check(&secret("password")).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let cache = Arc::new(MemoryCache::new());
        let mut stale = CacheEntry::new("5BAA6", HashMap::new(), Duration::from_secs(60));
        stale.fetched_at = Utc::now() - chrono::Duration::hours(1);
        cache.put(stale).unwrap();

        let client = MockClient::new(format!("{}:42", PASSWORD_SUFFIX));
        let fetches = client.fetches.clone();
        let oracle = BreachOracle::new(client, cache.clone());

        assert_eq!(
            oracle.check(&secret("password")).await,
            BreachStatus::Exposed { count: 42 }
        );
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(cache.get("5BAA6").unwrap().unwrap().is_fresh(Utc::now()));
    }

    #[tokio::test]
    async fn test_failure_is_unknown_and_not_cached() {
        let mut client = MockClient::new("");
        client.fail = true;
        let fetches = client.fetches.clone();
        let cache = Arc::new(MemoryCache::new());
        let oracle = BreachOracle::new(client, cache.clone());

        let status = oracle.check(&secret("password")).await;
        assert_eq!(status.exposed(), None);
        assert!(cache.is_empty());

        oracle.check(&secret("password")).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unknown() {
        let oracle = oracle(MockClient::new("not a range table"));
        let status = oracle.check(&secret("password")).await;
        assert!(matches!(status, BreachStatus::Unknown { .. }));
    }

    #[tokio::test]
    async fn test_file_cache_survives_oracle_restart() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{}:42", PASSWORD_SUFFIX);

        let first = MockClient::new(body.clone());
        let oracle = BreachOracle::new(first, Arc::new(FileCache::new(dir.path()).unwrap()));
        oracle.check(&secret("password")).await;

        let second = MockClient::new(body);
        let fetches = second.fetches.clone();
        let oracle = BreachOracle::new(second, Arc::new(FileCache::new(dir.path()).unwrap()));
        assert_eq!(
            oracle.check(&secret("password")).await,
            BreachStatus::Exposed { count: 42 }
        );
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }
}
