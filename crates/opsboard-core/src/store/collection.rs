//! Id-keyed entity cache shared by every store.
//!
//! Insertion order is irrelevant; rendering sorts by `position` or a
//! timestamp. All merge operations are content-addressed by id and safe
//! under duplicate delivery.

use std::collections::HashMap;

use crate::freshness::{FetchDecision, FetchState, FreshnessWindow};
use crate::models::{Entity, Positioned};

#[derive(Debug)]
pub struct Collection<T: Entity, F: PartialEq = ()> {
    items: HashMap<String, T>,
    /// True only while the *initial* population fetch is in flight.
    pub is_loading: bool,
    fetch: FetchState<F>,
}

impl<T: Entity, F: PartialEq> Default for Collection<T, F> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            is_loading: false,
            fetch: FetchState::new(),
        }
    }
}

impl<T: Entity, F: PartialEq> Collection<T, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// `*_CREATED` merge: insert if absent, no-op on duplicate delivery.
    /// Returns whether the item was inserted.
    pub fn insert_if_absent(&mut self, item: T) -> bool {
        if self.items.contains_key(item.id()) {
            return false;
        }
        self.items.insert(item.id().to_string(), item);
        true
    }

    /// `*_UPDATED` merge: replace by id, insert if absent (an update may
    /// arrive before its create across reconnects). Returns the replaced
    /// item, if any.
    pub fn upsert(&mut self, item: T) -> Option<T> {
        self.items.insert(item.id().to_string(), item)
    }

    /// `*_DELETED` merge: remove by id; absence is not an error.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.items.remove(id)
    }

    /// Merge a server-confirmed entity over the optimistic local one.
    ///
    /// When the server assigned a different id (optimistic create with a
    /// client-generated id), the local entry is re-keyed rather than
    /// duplicated.
    pub fn confirm(&mut self, local_id: &str, server: T) {
        if server.id() != local_id {
            self.items.remove(local_id);
        }
        self.items.insert(server.id().to_string(), server);
    }

    /// Replace the whole contents from a completed fetch and record the
    /// request shape for future staleness decisions.
    pub fn populate(&mut self, items: Vec<T>, filters: F) {
        self.items = items
            .into_iter()
            .map(|item| (item.id().to_string(), item))
            .collect();
        self.is_loading = false;
        self.fetch.mark_fetched(filters);
    }

    pub fn decide(&self, window: FreshnessWindow, filters: &F, force: bool) -> FetchDecision {
        self.fetch.decide(window, filters, force)
    }

    /// Flag the loading indicator for a blocking fetch. Only the first
    /// population shows a spinner; later refetches swap data in place.
    pub fn begin_load(&mut self) {
        if !self.fetch.has_fetched() {
            self.is_loading = true;
        }
    }

    pub fn abort_load(&mut self) {
        self.is_loading = false;
    }

    pub fn has_fetched(&self) -> bool {
        self.fetch.has_fetched()
    }

    /// Empty the collection and forget fetch history. Used on logout.
    pub fn clear(&mut self) {
        self.items.clear();
        self.is_loading = false;
        self.fetch.clear();
    }
}

impl<T: Positioned, F: PartialEq> Collection<T, F> {
    /// Items matching `filter`, ordered by position with id as tie-break so
    /// the order is total even while colliding keys await a renumber.
    pub fn sorted_by_position(&self, filter: impl Fn(&T) -> bool) -> Vec<&T> {
        let mut items: Vec<&T> = self.items.values().filter(|t| filter(t)).collect();
        items.sort_by(|a, b| {
            a.position()
                .partial_cmp(&b.position())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id().cmp(b.id()))
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Card;
    use chrono::Utc;

    fn card(id: &str, list: &str, pos: f64) -> Card {
        Card {
            id: id.to_string(),
            list_id: list.to_string(),
            title: format!("card {id}"),
            description: String::new(),
            position: pos,
            assignee_id: None,
            due_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_create_is_idempotent() {
        let mut col: Collection<Card> = Collection::new();
        assert!(col.insert_if_absent(card("c1", "l1", 1.0)));
        assert!(!col.insert_if_absent(card("c1", "l1", 9.0)));
        assert_eq!(col.len(), 1);
        assert_eq!(col.get("c1").unwrap().position, 1.0);
    }

    #[test]
    fn delete_of_absent_id_is_noop() {
        let mut col: Collection<Card> = Collection::new();
        col.insert_if_absent(card("c1", "l1", 1.0));
        assert!(col.remove("ghost").is_none());
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn upsert_inserts_when_absent() {
        let mut col: Collection<Card> = Collection::new();
        assert!(col.upsert(card("c1", "l1", 1.0)).is_none());
        let prior = col.upsert(card("c1", "l1", 2.0)).unwrap();
        assert_eq!(prior.position, 1.0);
        assert_eq!(col.get("c1").unwrap().position, 2.0);
    }

    #[test]
    fn confirm_rekeys_server_assigned_id() {
        let mut col: Collection<Card> = Collection::new();
        col.insert_if_absent(card("tmp-1", "l1", 1.0));
        col.confirm("tmp-1", card("srv-9", "l1", 1.0));
        assert_eq!(col.len(), 1);
        assert!(col.get("tmp-1").is_none());
        assert!(col.get("srv-9").is_some());
    }

    #[test]
    fn populate_replaces_contents_and_marks_fetched() {
        let mut col: Collection<Card> = Collection::new();
        col.insert_if_absent(card("old", "l1", 1.0));
        col.begin_load();
        col.populate(vec![card("a", "l1", 1.0), card("b", "l1", 2.0)], ());
        assert_eq!(col.len(), 2);
        assert!(!col.is_loading);
        assert!(col.has_fetched());
        assert!(col.get("old").is_none());
    }

    #[test]
    fn spinner_only_on_initial_population() {
        let mut col: Collection<Card> = Collection::new();
        col.begin_load();
        assert!(col.is_loading);
        col.populate(vec![], ());
        col.begin_load();
        assert!(!col.is_loading);
    }

    #[test]
    fn sorted_by_position_breaks_ties_by_id() {
        let mut col: Collection<Card> = Collection::new();
        col.insert_if_absent(card("b", "l1", 2.0));
        col.insert_if_absent(card("a", "l1", 2.0));
        col.insert_if_absent(card("c", "l1", 1.0));
        let ids: Vec<&str> = col
            .sorted_by_position(|c| c.list_id == "l1")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
