//! Local draft list.
//!
//! Drafts are issue titles waiting to be submitted, kept newest first under
//! [`DRAFTS_KEY`]. Every mutating operation writes the full list back before
//! returning, so the in-memory list and the persisted list never diverge.
//! An empty list is stored as an absent key rather than `[]`.

use crate::errors::DraftError;
use crate::store::{DRAFTS_KEY, KeyValueStore, read_json, write_json};

/// Result of a confirmed or cancelled delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Cancelled,
}

/// Draft list bound to a store.
pub struct DraftStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
    drafts: Vec<String>,
}

impl<'a, S: KeyValueStore + ?Sized> DraftStore<'a, S> {
    /// Load the persisted list. A missing key is an empty list.
    pub fn load(store: &'a mut S) -> Result<Self, DraftError> {
        let drafts: Vec<String> = read_json(&*store, DRAFTS_KEY)?.unwrap_or_default();
        Ok(Self { store, drafts })
    }

    pub fn drafts(&self) -> &[String] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Prepend a new draft, stored exactly as given. Blank titles are
    /// rejected without touching the store.
    pub fn save(&mut self, title: &str) -> Result<(), DraftError> {
        if title.trim().is_empty() {
            return Err(DraftError::Validation);
        }
        let mut next = Vec::with_capacity(self.drafts.len() + 1);
        next.push(title.to_string());
        next.extend(self.drafts.iter().cloned());
        self.persist(next)?;
        tracing::debug!(title, count = self.drafts.len(), "saved draft");
        Ok(())
    }

    /// Remove the draft at `index` once `confirm` approves it.
    ///
    /// Removal is positional, so identical titles at different positions
    /// are deleted independently.
    pub fn delete<F>(&mut self, index: usize, confirm: F) -> Result<DeleteOutcome, DraftError>
    where
        F: FnOnce(&str) -> bool,
    {
        let len = self.drafts.len();
        let title = self
            .drafts
            .get(index)
            .cloned()
            .ok_or(DraftError::IndexOutOfRange { index, len })?;

        if !confirm(&title) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let mut next = self.drafts.clone();
        next.remove(index);
        self.persist(next)?;
        tracing::debug!(index, title = %title, "deleted draft");
        Ok(DeleteOutcome::Deleted(title))
    }

    /// Replace the whole list, e.g. with the residual set after a submission.
    pub fn replace(&mut self, drafts: Vec<String>) -> Result<(), DraftError> {
        self.persist(drafts)
    }

    fn persist(&mut self, drafts: Vec<String>) -> Result<(), DraftError> {
        if drafts.is_empty() {
            self.store.remove(DRAFTS_KEY)?;
        } else {
            write_json(&mut *self.store, DRAFTS_KEY, &drafts)?;
        }
        self.drafts = drafts;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn persisted(store: &MemoryStore) -> Option<Vec<String>> {
        read_json(store, DRAFTS_KEY).unwrap()
    }

    #[test]
    fn test_load_empty_store() {
        let mut store = MemoryStore::new();
        let drafts = DraftStore::load(&mut store).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_save_prepends_and_persists() {
        let mut store = MemoryStore::new();
        {
            let mut drafts = DraftStore::load(&mut store).unwrap();
            drafts.save("First").unwrap();
            drafts.save("Second").unwrap();
            assert_eq!(drafts.drafts(), &["Second", "First"]);
        }
        assert_eq!(
            persisted(&store),
            Some(vec!["Second".to_string(), "First".to_string()])
        );
    }

    #[test]
    fn test_save_then_read_returns_title_first() {
        for title in ["a", "Fix bug", "  padded  ", "日本語のタイトル"] {
            let mut store = MemoryStore::new();
            {
                let mut drafts = DraftStore::load(&mut store).unwrap();
                drafts.save("existing").unwrap();
                drafts.save(title).unwrap();
            }
            let stored = persisted(&store).unwrap();
            assert_eq!(stored[0], title);
        }
    }

    #[test]
    fn test_save_rejects_blank_titles() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("kept").unwrap();

        for blank in ["", "   ", "\t\n"] {
            match drafts.save(blank) {
                Err(DraftError::Validation) => {}
                other => panic!("Expected Validation, got {:?}", other),
            }
        }
        assert_eq!(drafts.drafts(), &["kept"]);
        drop(drafts);
        assert_eq!(persisted(&store), Some(vec!["kept".to_string()]));
    }

    #[test]
    fn test_save_blank_on_empty_store_writes_nothing() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        assert!(drafts.save("").is_err());
        drop(drafts);
        assert!(!store.contains_key(DRAFTS_KEY));
    }

    #[test]
    fn test_delete_confirmed() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("a").unwrap();
        drafts.save("b").unwrap();

        let outcome = drafts.delete(0, |_| true).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted("b".to_string()));
        assert_eq!(drafts.drafts(), &["a"]);
        drop(drafts);
        assert_eq!(persisted(&store), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_delete_cancelled_leaves_store_unchanged() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("a").unwrap();

        let mut asked = None;
        let outcome = drafts
            .delete(0, |title| {
                asked = Some(title.to_string());
                false
            })
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(asked.as_deref(), Some("a"));
        drop(drafts);
        assert_eq!(persisted(&store), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_delete_duplicates_positionally() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("dup").unwrap();
        drafts.save("middle").unwrap();
        drafts.save("dup").unwrap();

        drafts.delete(2, |_| true).unwrap();
        assert_eq!(drafts.drafts(), &["dup", "middle"]);
        drafts.delete(0, |_| true).unwrap();
        assert_eq!(drafts.drafts(), &["middle"]);
    }

    #[test]
    fn test_delete_last_removes_key() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("only").unwrap();
        drafts.delete(0, |_| true).unwrap();
        drop(drafts);
        assert!(!store.contains_key(DRAFTS_KEY));
    }

    #[test]
    fn test_delete_out_of_range_does_not_prompt() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("a").unwrap();
        let result = drafts.delete(5, |_| panic!("should not ask"));
        match result {
            Err(DraftError::IndexOutOfRange { index: 5, len: 1 }) => {}
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_replace_with_empty_removes_key() {
        let mut store = MemoryStore::new();
        let mut drafts = DraftStore::load(&mut store).unwrap();
        drafts.save("a").unwrap();
        drafts.replace(Vec::new()).unwrap();
        assert!(drafts.is_empty());
        drop(drafts);
        assert!(!store.contains_key(DRAFTS_KEY));
    }
}
