//! Repository directory and usage ranking.
//!
//! The directory is the list of repositories fetched from GitHub, each
//! annotated with how often it has been picked as a submission target.
//! Usage counters persist under [`REPO_USAGE_KEY`] as a map from
//! `"owner/name"` to count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::store::{KeyValueStore, REPO_USAGE_KEY, read_json, write_json};

/// Maximum number of repositories returned by [`RepositoryDirectory::filter`].
pub const TOP_N: usize = 5;

/// A repository the user can target, with its usage count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    pub usage: u32,
}

impl RepositoryRef {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Persisted usage counters keyed by `"owner/name"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageMap(BTreeMap<String, u32>);

impl UsageMap {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(read_json(store, REPO_USAGE_KEY)?.unwrap_or_default())
    }

    pub fn get(&self, owner: &str, name: &str) -> u32 {
        self.0.get(&usage_key(owner, name)).copied().unwrap_or(0)
    }

    pub fn entries(&self) -> &BTreeMap<String, u32> {
        &self.0
    }

    /// Increment the counter for `owner/name` and write the whole map back.
    ///
    /// Returns the new count.
    pub fn record_usage<S: KeyValueStore + ?Sized>(
        store: &mut S,
        owner: &str,
        name: &str,
    ) -> Result<u32, StoreError> {
        let mut map = Self::load(&*store)?;
        let count = map.0.entry(usage_key(owner, name)).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        write_json(store, REPO_USAGE_KEY, &map)?;
        tracing::debug!(owner, name, count, "recorded repository usage");
        Ok(count)
    }
}

fn usage_key(owner: &str, name: &str) -> String {
    format!("{}/{}", owner, name)
}

/// Fetched repositories joined with their usage counts, in fetch order.
#[derive(Debug, Clone, Default)]
pub struct RepositoryDirectory {
    repos: Vec<RepositoryRef>,
}

impl RepositoryDirectory {
    /// Join `(owner, name)` pairs, in the order they were fetched, against `usage`.
    pub fn new<I>(fetched: I, usage: &UsageMap) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let repos = fetched
            .into_iter()
            .map(|(owner, name)| {
                let usage = usage.get(&owner, &name);
                RepositoryRef { owner, name, usage }
            })
            .collect();
        Self { repos }
    }

    pub fn repos(&self) -> &[RepositoryRef] {
        &self.repos
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Top [`TOP_N`] repositories matching `query`, most used first.
    ///
    /// An empty query matches everything. Otherwise the repository name must
    /// contain the query as given (whitespace included), ignoring case. Ties
    /// keep fetch order.
    pub fn filter(&self, query: &str) -> Vec<&RepositoryRef> {
        let needle = query.to_lowercase();
        let mut matched: Vec<&RepositoryRef> = self
            .repos
            .iter()
            .filter(|repo| needle.is_empty() || repo.name.to_lowercase().contains(&needle))
            .collect();
        // sort_by is stable, which keeps fetch order among equal counts.
        matched.sort_by(|a, b| b.usage.cmp(&a.usage));
        matched.truncate(TOP_N);
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn fetched(names: &[(&str, &str)]) -> Vec<(String, String)> {
        names
            .iter()
            .map(|(o, n)| (o.to_string(), n.to_string()))
            .collect()
    }

    fn names(repos: &[&RepositoryRef]) -> Vec<String> {
        repos.iter().map(|r| r.full_name()).collect()
    }

    #[test]
    fn test_record_usage_three_times() {
        let mut store = MemoryStore::new();
        for _ in 0..3 {
            UsageMap::record_usage(&mut store, "a", "b").unwrap();
        }
        let usage = UsageMap::load(&store).unwrap();
        assert_eq!(usage.get("a", "b"), 3);
        assert_eq!(usage.entries().get("a/b"), Some(&3));
    }

    #[test]
    fn test_record_usage_returns_new_count() {
        let mut store = MemoryStore::new();
        assert_eq!(UsageMap::record_usage(&mut store, "o", "r").unwrap(), 1);
        assert_eq!(UsageMap::record_usage(&mut store, "o", "r").unwrap(), 2);
        assert_eq!(UsageMap::record_usage(&mut store, "o", "other").unwrap(), 1);
    }

    #[test]
    fn test_usage_map_persisted_as_json_object() {
        let mut store = MemoryStore::new();
        UsageMap::record_usage(&mut store, "o", "r").unwrap();
        let raw = store.get(REPO_USAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["o/r"], 1);
    }

    #[test]
    fn test_empty_query_ranks_by_usage() {
        let mut store = MemoryStore::new();
        for _ in 0..3 {
            UsageMap::record_usage(&mut store, "a", "b").unwrap();
        }
        UsageMap::record_usage(&mut store, "x", "two").unwrap();
        UsageMap::record_usage(&mut store, "x", "two").unwrap();
        let usage = UsageMap::load(&store).unwrap();

        let dir = RepositoryDirectory::new(
            fetched(&[("x", "one"), ("x", "two"), ("a", "b"), ("x", "three")]),
            &usage,
        );
        assert_eq!(
            names(&dir.filter("")),
            vec!["a/b", "x/two", "x/one", "x/three"]
        );
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let dir = RepositoryDirectory::new(
            fetched(&[("o", "c"), ("o", "a"), ("o", "b")]),
            &UsageMap::default(),
        );
        assert_eq!(names(&dir.filter("")), vec!["o/c", "o/a", "o/b"]);
    }

    #[test]
    fn test_filter_caps_at_top_n() {
        let repos: Vec<(String, String)> = (0..9)
            .map(|i| ("o".to_string(), format!("repo-{}", i)))
            .collect();
        let dir = RepositoryDirectory::new(repos, &UsageMap::default());
        let top = dir.filter("");
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].name, "repo-0");
        assert_eq!(top[4].name, "repo-4");
    }

    #[test]
    fn test_query_is_case_insensitive_substring_on_name() {
        let dir = RepositoryDirectory::new(
            fetched(&[
                ("Issue", "website"),
                ("o", "Issue-Tracker"),
                ("o", "docs"),
                ("o", "my-issues"),
            ]),
            &UsageMap::default(),
        );
        // Owner is not matched, only the name.
        assert_eq!(
            names(&dir.filter("ISSUE")),
            vec!["o/Issue-Tracker", "o/my-issues"]
        );
    }

    #[test]
    fn test_query_then_ranking() {
        let mut store = MemoryStore::new();
        UsageMap::record_usage(&mut store, "o", "api-client").unwrap();
        let usage = UsageMap::load(&store).unwrap();
        let dir = RepositoryDirectory::new(
            fetched(&[("o", "api-server"), ("o", "web"), ("o", "api-client")]),
            &usage,
        );
        assert_eq!(names(&dir.filter("api")), vec!["o/api-client", "o/api-server"]);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let dir = RepositoryDirectory::new(fetched(&[("o", "a"), ("o", "b")]), &UsageMap::default());
        assert_eq!(dir.filter("").len(), 2);
    }

    #[test]
    fn test_whitespace_query_is_matched_literally() {
        let dir = RepositoryDirectory::new(
            fetched(&[("o", "api"), ("o", "my api"), ("o", "web")]),
            &UsageMap::default(),
        );
        assert!(dir.filter("   ").is_empty());
        let names: Vec<&str> = dir.filter(" api").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["my api"]);
    }

    #[test]
    fn test_no_matches() {
        let dir = RepositoryDirectory::new(fetched(&[("o", "a")]), &UsageMap::default());
        assert!(dir.filter("zzz").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut store = MemoryStore::new();
        UsageMap::record_usage(&mut store, "o", "b").unwrap();
        let usage = UsageMap::load(&store).unwrap();
        let dir = RepositoryDirectory::new(
            fetched(&[("o", "a"), ("o", "b"), ("o", "c"), ("o", "ab")]),
            &usage,
        );
        for query in ["", "a", "b"] {
            assert_eq!(dir.filter(query), dir.filter(query));
        }
    }

    #[test]
    fn test_usage_join_ignores_unfetched_entries() {
        let mut store = MemoryStore::new();
        UsageMap::record_usage(&mut store, "gone", "repo").unwrap();
        let usage = UsageMap::load(&store).unwrap();
        let dir = RepositoryDirectory::new(fetched(&[("o", "a")]), &usage);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.repos()[0].usage, 0);
    }
}
