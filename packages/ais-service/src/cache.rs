use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use time::{Duration, OffsetDateTime};

use crate::rank::RankedItem;

const FINGERPRINT_DOMAIN: &[u8] = b"ais:rank:v1";

/// Identifies a ranking request by its query and the ordered candidate ids.
pub fn fingerprint<'a, I>(query: &str, ids: I) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	let mut hasher = blake3::Hasher::new();

	hasher.update(FINGERPRINT_DOMAIN);
	hasher.update(query.trim().as_bytes());

	for id in ids {
		hasher.update(&[0]);
		hasher.update(id.as_bytes());
	}

	hasher.finalize().to_hex().to_string()
}

/// Immutable once written; replaced wholesale on the next `put` for the same fingerprint.
#[derive(Debug)]
pub struct CacheEntry {
	pub fingerprint: String,
	pub normalized_query: String,
	pub ranked_items: Vec<RankedItem>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub enum CacheLookup {
	Hit(Arc<CacheEntry>),
	Miss,
	/// The entry outlived the TTL and has been evicted; callers recompute.
	Expired,
}

pub struct ResultCache {
	entries: LruCache<String, Arc<CacheEntry>>,
	ttl: Duration,
}
impl ResultCache {
	pub fn new(cfg: &ais_config::Cache) -> Self {
		let capacity = NonZeroUsize::new(cfg.max_entries).unwrap_or(NonZeroUsize::MIN);

		let ttl = Duration::seconds(i64::try_from(cfg.ttl_secs).unwrap_or(i64::MAX));

		Self { entries: LruCache::new(capacity), ttl }
	}

	pub fn get(&mut self, fingerprint: &str, now: OffsetDateTime) -> CacheLookup {
		let Some(entry) = self.entries.get(fingerprint) else { return CacheLookup::Miss };

		if now - entry.created_at < self.ttl {
			return CacheLookup::Hit(entry.clone());
		}

		self.entries.pop(fingerprint);

		CacheLookup::Expired
	}

	/// Last write wins.
	pub fn put(&mut self, entry: CacheEntry) {
		self.entries.put(entry.fingerprint.clone(), Arc::new(entry));
	}

	/// Drops every entry computed for `normalized_query`, returning how many were removed.
	pub fn invalidate_query(&mut self, normalized_query: &str) -> usize {
		let stale: Vec<String> = self
			.entries
			.iter()
			.filter(|(_, entry)| entry.normalized_query == normalized_query)
			.map(|(key, _)| key.clone())
			.collect();

		for key in &stale {
			self.entries.pop(key);
		}

		stale.len()
	}

	pub fn clear(&mut self) -> usize {
		let len = self.entries.len();

		self.entries.clear();

		len
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
