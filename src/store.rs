//! In-memory credential store ordered by password strength.

use chrono::NaiveDateTime;
use std::cmp::Reverse;

use crate::credentials::CredentialRecord;

/// Records kept in strength-descending order.
///
/// Records of equal strength have no defined relative order. Several records
/// may share a title and account; lookups and mutations by that pair act on the
/// first one encountered in traversal order.
#[derive(Debug, Default, Clone)]
pub struct Store {
    records: Vec<CredentialRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Builds a store from records in any order.
    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        let mut store = Self { records };
        store.rebuild_ordered();
        store
    }

    /// Inserts `record` ahead of the first weaker record.
    pub fn insert(&mut self, record: CredentialRecord) {
        let pos = self
            .records
            .iter()
            .position(|r| r.strength() < record.strength())
            .unwrap_or(self.records.len());
        self.records.insert(pos, record);
    }

    /// Removes the first record matching `title` and `account`.
    pub fn remove_matching(&mut self, title: &str, account: &str) -> bool {
        match self.position(title, account) {
            Some(idx) => {
                self.records.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn find_first(&self, title: &str, account: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.matches(title, account))
    }

    pub fn find_all_matching(&self, title: &str, account: &str) -> Vec<&CredentialRecord> {
        self.records
            .iter()
            .filter(|r| r.matches(title, account))
            .collect()
    }

    /// Re-sorts the records by strength, strongest first.
    pub fn rebuild_ordered(&mut self) -> &[CredentialRecord] {
        self.records.sort_by_key(|r| Reverse(r.strength()));
        &self.records
    }

    /// Rotates the password of the first matching record and re-slots it by its
    /// new strength.
    pub fn update_in_place(
        &mut self,
        title: &str,
        account: &str,
        new_plaintext: &str,
        updated_at: NaiveDateTime,
    ) -> bool {
        let Some(idx) = self.position(title, account) else {
            return false;
        };
        let mut record = self.records.remove(idx);
        record.rotate(new_plaintext, updated_at);
        self.insert(record);
        true
    }

    /// Records whose title or account contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&CredentialRecord> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.title().to_lowercase().contains(&query)
                    || r.account().to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CredentialRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn position(&self, title: &str, account: &str) -> Option<usize> {
        self.records.iter().position(|r| r.matches(title, account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::now;

    fn record(title: &str, account: &str, plaintext: &str) -> CredentialRecord {
        CredentialRecord::new(title, account, plaintext, b'K', now())
    }

    fn strengths(store: &Store) -> Vec<u8> {
        store.iter().map(|r| r.strength()).collect()
    }

    fn is_descending(store: &Store) -> bool {
        strengths(store).windows(2).all(|w| w[0] >= w[1])
    }

    #[test]
    fn test_insert_keeps_strength_order() {
        let mut store = Store::new();
        store.insert(record("a", "u", "abc"));
        store.insert(record("b", "u", "Ab1!abcdefgh"));
        store.insert(record("c", "u", "abcdefgh"));
        store.insert(record("d", "u", "Ab1!abcd"));

        assert_eq!(store.len(), 4);
        assert_eq!(strengths(&store), vec![6, 5, 2, 1]);
    }

    #[test]
    fn test_from_records_orders() {
        let store = Store::from_records(vec![
            record("weak", "u", "a"),
            record("strong", "u", "Ab1!abcdefgh"),
            record("mid", "u", "abcdefgh"),
        ]);
        assert!(is_descending(&store));
        assert_eq!(store.iter().next().unwrap().title(), "strong");
    }

    #[test]
    fn test_remove_matching_only_first_duplicate() {
        let mut store = Store::new();
        store.insert(record("Mail", "me", "first-pass"));
        store.insert(record("Mail", "me", "second-pass"));
        store.insert(record("Other", "me", "x"));

        assert!(store.remove_matching("Mail", "me"));
        assert_eq!(store.find_all_matching("Mail", "me").len(), 1);
        assert!(store.remove_matching("Mail", "me"));
        assert!(!store.remove_matching("Mail", "me"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_in_place_touches_first_match_and_reorders() {
        let mut store = Store::new();
        store.insert(record("Mail", "me", "weakpass"));
        store.insert(record("Mail", "me", "weakpass"));
        store.insert(record("Bank", "me", "abcdefgh1"));

        let when = now();
        assert!(store.update_in_place("Mail", "me", "Ab1!abcdefgh", when));

        let first = store.iter().next().unwrap();
        assert_eq!(first.title(), "Mail");
        assert_eq!(first.strength(), 6);
        assert_eq!(first.reveal(b'K').unwrap(), "Ab1!abcdefgh");
        let untouched: Vec<_> = store
            .find_all_matching("Mail", "me")
            .into_iter()
            .filter(|r| r.reveal(b'K').map(|p| p == "weakpass").unwrap_or(false))
            .collect();
        assert_eq!(untouched.len(), 1);
        assert!(is_descending(&store));
    }

    #[test]
    fn test_update_in_place_missing() {
        let mut store = Store::new();
        assert!(!store.update_in_place("nope", "none", "x", now()));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut store = Store::new();
        store.insert(record("GitHub", "dev@example.com", "p1"));
        store.insert(record("Mail", "ME@GMAIL.com", "p2"));
        store.insert(record("Bank", "owner", "p3"));

        assert_eq!(store.search("git").len(), 1);
        assert_eq!(store.search("gmail").len(), 1);
        assert_eq!(store.search("EXAMPLE").len(), 1);
        assert_eq!(store.search("a").len(), 2);
        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_rebuild_ordered_after_from_unsorted() {
        let mut store = Store::from_records(vec![record("x", "u", "a")]);
        store.insert(record("y", "u", "Ab1!abcd"));
        let ordered = store.rebuild_ordered();
        assert_eq!(ordered[0].title(), "y");
    }
}
