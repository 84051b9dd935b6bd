//! Boards, lists and cards.
//!
//! Cards and lists are held in flat id-keyed collections; a card's owning
//! list is a field on the card, not a containing array. That makes a
//! cross-list move a single field rewrite (there is no intermediate state
//! where a card is in zero or two lists) and lets rendering re-derive each
//! column's order from `position` at any time.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::models::{Board, BoardList, Card};
use crate::position::{self, Placement};
use crate::store::{ActiveSelection, Collection};

/// Result of locally placing a moved item: the key it was assigned and any
/// sibling keys rewritten by a renumber pass. Both go out with the move
/// request so the server converges on the same ordering.
#[derive(Debug, Clone)]
pub struct Placed {
    pub position: f64,
    pub renumbered: Vec<(String, f64)>,
}

#[derive(Debug, Default)]
pub struct BoardStore {
    pub boards: Collection<Board>,
    pub lists: Collection<BoardList>,
    pub cards: Collection<Card>,
    /// Boards whose lists and cards have been populated; child events for
    /// other boards are dropped until the board is opened.
    loaded_boards: HashSet<String>,
    pub selection: ActiveSelection,
}

impl BoardStore {
    pub fn new(last_used_board: Option<String>) -> Self {
        Self {
            selection: ActiveSelection::new(last_used_board),
            ..Self::default()
        }
    }

    // ===== Views =====

    pub fn boards_in_order(&self) -> Vec<&Board> {
        self.boards.sorted_by_position(|b| !b.archived)
    }

    pub fn lists_of(&self, board_id: &str) -> Vec<&BoardList> {
        self.lists.sorted_by_position(|l| l.board_id == board_id)
    }

    pub fn cards_of(&self, list_id: &str) -> Vec<&Card> {
        self.cards.sorted_by_position(|c| c.list_id == list_id)
    }

    pub fn is_board_loaded(&self, board_id: &str) -> bool {
        self.loaded_boards.contains(board_id)
    }

    /// Whether a card event's owning list is currently loaded.
    pub fn is_list_loaded(&self, list_id: &str) -> bool {
        self.lists.contains(list_id)
    }

    // ===== Population =====

    /// Mark a board's children as loaded without populating (a freshly
    /// created board has none yet).
    pub fn mark_board_loaded(&mut self, board_id: &str) {
        self.loaded_boards.insert(board_id.to_string());
    }

    /// Carry the loaded flag over when the server re-keys a board created
    /// optimistically under a client id.
    pub fn rekey_loaded(&mut self, old_id: &str, new_id: &str) {
        if self.loaded_boards.remove(old_id) {
            self.loaded_boards.insert(new_id.to_string());
        }
    }

    /// Install the lists and cards of an opened board.
    pub fn populate_board(&mut self, board_id: &str, lists: Vec<BoardList>, cards: Vec<Card>) {
        // Drop the board's previous children first so lists deleted on the
        // server disappear locally too.
        let stale_lists: Vec<String> = self
            .lists
            .iter()
            .filter(|l| l.board_id == board_id)
            .map(|l| l.id.clone())
            .collect();
        for list_id in &stale_lists {
            let stale_cards: Vec<String> = self
                .cards
                .iter()
                .filter(|c| c.list_id == *list_id)
                .map(|c| c.id.clone())
                .collect();
            for card_id in stale_cards {
                self.cards.remove(&card_id);
            }
            self.lists.remove(list_id);
        }

        for list in lists {
            self.lists.upsert(list);
        }
        for card in cards {
            self.cards.upsert(card);
        }
        self.loaded_boards.insert(board_id.to_string());
    }

    // ===== Moves =====

    /// Place `card_id` into `to_list`. `index` is the drop slot within the
    /// destination column; `None` means append (the cross-list default).
    /// Mutates the card, and on a renumber its new siblings, in place.
    pub fn place_card(
        &mut self,
        card_id: &str,
        to_list: &str,
        index: Option<usize>,
    ) -> Result<Placed, CoreError> {
        if !self.lists.contains(to_list) {
            return Err(CoreError::UnknownList(to_list.to_string()));
        }
        if !self.cards.contains(card_id) {
            return Err(CoreError::UnknownCard(card_id.to_string()));
        }

        let siblings: Vec<(String, f64)> = self
            .cards
            .sorted_by_position(|c| c.list_id == to_list && c.id != card_id)
            .iter()
            .map(|c| (c.id.clone(), c.position))
            .collect();
        let positions: Vec<f64> = siblings.iter().map(|(_, p)| *p).collect();

        let placement = match index {
            Some(i) => position::position_for_index(&positions, i),
            None => Placement::At(position::append_position(&positions)),
        };

        let placed = match placement {
            Placement::At(pos) => Placed {
                position: pos,
                renumbered: Vec::new(),
            },
            Placement::Renumber => {
                let slot = index.unwrap_or(siblings.len()).min(siblings.len());
                let placed = renumber_run(&siblings, card_id, slot);
                for (id, pos) in &placed.renumbered {
                    if let Some(card) = self.cards.get_mut(id) {
                        card.position = *pos;
                    }
                }
                placed
            }
        };

        let card = self
            .cards
            .get_mut(card_id)
            .ok_or_else(|| CoreError::UnknownCard(card_id.to_string()))?;
        card.list_id = to_list.to_string();
        card.position = placed.position;
        Ok(placed)
    }

    /// Reorder a list within its board.
    pub fn place_list(&mut self, list_id: &str, index: usize) -> Result<Placed, CoreError> {
        let board_id = self
            .lists
            .get(list_id)
            .map(|l| l.board_id.clone())
            .ok_or_else(|| CoreError::UnknownList(list_id.to_string()))?;

        let siblings: Vec<(String, f64)> = self
            .lists
            .sorted_by_position(|l| l.board_id == board_id && l.id != list_id)
            .iter()
            .map(|l| (l.id.clone(), l.position))
            .collect();
        let positions: Vec<f64> = siblings.iter().map(|(_, p)| *p).collect();

        let placed = match position::position_for_index(&positions, index) {
            Placement::At(pos) => Placed {
                position: pos,
                renumbered: Vec::new(),
            },
            Placement::Renumber => {
                let slot = index.min(siblings.len());
                let placed = renumber_run(&siblings, list_id, slot);
                for (id, pos) in &placed.renumbered {
                    if let Some(list) = self.lists.get_mut(id) {
                        list.position = *pos;
                    }
                }
                placed
            }
        };

        let list = self
            .lists
            .get_mut(list_id)
            .ok_or_else(|| CoreError::UnknownList(list_id.to_string()))?;
        list.position = placed.position;
        Ok(placed)
    }

    // ===== Selection =====

    /// Re-validate the active board after any change to the boards
    /// collection. Returns the id that ended up active.
    pub fn reconcile_selection(&mut self) -> Option<String> {
        let first = self
            .boards
            .sorted_by_position(|b| !b.archived)
            .first()
            .map(|b| b.id.clone());
        let boards = &self.boards;
        self.selection
            .reconcile(|id| boards.contains(id), first.as_deref())
            .map(|id| id.to_string())
    }

    /// Remove a board together with its loaded children.
    pub fn remove_board(&mut self, board_id: &str) {
        let lists: Vec<String> = self
            .lists
            .iter()
            .filter(|l| l.board_id == board_id)
            .map(|l| l.id.clone())
            .collect();
        for list_id in lists {
            self.remove_list(&list_id);
        }
        self.boards.remove(board_id);
        self.loaded_boards.remove(board_id);
        self.reconcile_selection();
    }

    /// Remove a list together with its cards.
    pub fn remove_list(&mut self, list_id: &str) {
        let cards: Vec<String> = self
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .map(|c| c.id.clone())
            .collect();
        for card_id in cards {
            self.cards.remove(&card_id);
        }
        self.lists.remove(list_id);
    }

    pub fn clear(&mut self) {
        self.boards.clear();
        self.lists.clear();
        self.cards.clear();
        self.loaded_boards.clear();
        self.selection.clear();
    }
}

/// Assign `1..=N` across a sibling run with the moved item inserted at
/// `slot`. Returns the moved item's new key plus every sibling rewrite; the
/// caller applies the rewrites to its collection.
fn renumber_run(siblings: &[(String, f64)], moved_id: &str, slot: usize) -> Placed {
    let mut ordered: Vec<&str> = siblings.iter().map(|(id, _)| id.as_str()).collect();
    ordered.insert(slot, moved_id);

    let mut renumbered = Vec::new();
    let mut moved_position = position::HEAD_POSITION;
    for (pos, id) in position::renumber(ordered.len()).zip(ordered.iter()) {
        if *id == moved_id {
            moved_position = pos;
        } else {
            renumbered.push((id.to_string(), pos));
        }
    }
    tracing::debug!(
        "position gap exhausted; renumbered {} siblings",
        renumbered.len()
    );

    Placed {
        position: moved_position,
        renumbered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimistic::Rollback;
    use chrono::Utc;

    fn board(id: &str, pos: f64) -> Board {
        Board {
            id: id.to_string(),
            title: format!("board {id}"),
            position: pos,
            archived: false,
            created_at: Utc::now(),
        }
    }

    fn list(id: &str, board: &str, pos: f64) -> BoardList {
        BoardList {
            id: id.to_string(),
            board_id: board.to_string(),
            title: format!("list {id}"),
            position: pos,
        }
    }

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

    fn store_with_two_lists() -> BoardStore {
        let mut store = BoardStore::default();
        store.boards.insert_if_absent(board("b1", 1.0));
        store.populate_board(
            "b1",
            vec![list("l1", "b1", 1.0), list("l2", "b1", 2.0)],
            vec![
                card("c1", "l1", 1.0),
                card("c2", "l1", 2.0),
                card("c3", "l1", 3.0),
            ],
        );
        store
    }

    #[test]
    fn move_to_head_takes_position_below_first() {
        let mut store = store_with_two_lists();
        let placed = store.place_card("c3", "l1", Some(0)).unwrap();
        assert_eq!(placed.position, 0.0);
        assert!(placed.renumbered.is_empty());

        let order: Vec<&str> = store.cards_of("l1").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["c3", "c1", "c2"]);
    }

    #[test]
    fn cross_list_move_to_empty_list_gets_head_position() {
        let mut store = store_with_two_lists();
        let placed = store.place_card("c2", "l2", None).unwrap();
        assert_eq!(placed.position, position::HEAD_POSITION);
        assert_eq!(store.cards.get("c2").unwrap().list_id, "l2");
    }

    #[test]
    fn cross_list_move_appends_past_max() {
        let mut store = store_with_two_lists();
        store.cards.insert_if_absent(card("c9", "l2", 7.0));
        let placed = store.place_card("c1", "l2", None).unwrap();
        assert_eq!(placed.position, 8.0);
    }

    #[test]
    fn card_is_always_in_exactly_one_list() {
        let mut store = store_with_two_lists();
        let prior = store.cards.get("c2").cloned();

        store.place_card("c2", "l2", Some(0)).unwrap();
        let in_l1 = store.cards_of("l1").iter().any(|c| c.id == "c2");
        let in_l2 = store.cards_of("l2").iter().any(|c| c.id == "c2");
        assert!(!in_l1 && in_l2);

        // Simulated request failure: item-scoped revert restores the card
        // to its source list, again in exactly one place.
        Rollback::of("c2", prior).apply(&mut store.cards);
        let in_l1 = store.cards_of("l1").iter().any(|c| c.id == "c2");
        let in_l2 = store.cards_of("l2").iter().any(|c| c.id == "c2");
        assert!(in_l1 && !in_l2);
        assert_eq!(store.cards.get("c2").unwrap().position, 2.0);
    }

    #[test]
    fn revert_restores_exact_prior_positions() {
        let mut store = BoardStore::default();
        store.populate_board(
            "b1",
            vec![list("l1", "b1", 1.0)],
            vec![card("a", "l1", 1.0), card("b", "l1", 2.0)],
        );

        let prior = store.cards.get("b").cloned();
        store.place_card("b", "l1", Some(0)).unwrap();
        assert_eq!(store.cards.get("b").unwrap().position, 0.0);

        Rollback::of("b", prior).apply(&mut store.cards);
        assert_eq!(store.cards.get("a").unwrap().position, 1.0);
        assert_eq!(store.cards.get("b").unwrap().position, 2.0);
        let order: Vec<&str> = store.cards_of("l1").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn exhausted_gap_renumbers_whole_column() {
        let mut store = BoardStore::default();
        store.populate_board(
            "b1",
            vec![list("l1", "b1", 1.0)],
            vec![
                card("a", "l1", 1.0),
                card("b", "l1", 1.0 + f64::EPSILON),
                card("c", "l1", 5.0),
            ],
        );

        // The gap between a and b cannot hold a midpoint.
        let placed = store.place_card("c", "l1", Some(1)).unwrap();
        assert!(!placed.renumbered.is_empty());

        let column = store.cards_of("l1");
        let order: Vec<&str> = column.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        let positions: Vec<f64> = column.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn move_to_unknown_list_is_rejected() {
        let mut store = store_with_two_lists();
        assert!(matches!(
            store.place_card("c1", "nope", None),
            Err(CoreError::UnknownList(_))
        ));
        // Nothing moved.
        assert_eq!(store.cards.get("c1").unwrap().list_id, "l1");
    }

    #[test]
    fn list_reorder_uses_midpoints_too() {
        let mut store = store_with_two_lists();
        store.lists.insert_if_absent(list("l3", "b1", 3.0));
        let placed = store.place_list("l3", 1).unwrap();
        assert_eq!(placed.position, 1.5);
        let order: Vec<&str> = store.lists_of("b1").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(order, vec!["l1", "l3", "l2"]);
    }

    #[test]
    fn deleting_active_board_falls_back_in_order() {
        let mut store = BoardStore::default();
        store.boards.insert_if_absent(board("b1", 1.0));
        store.boards.insert_if_absent(board("b2", 2.0));
        store.selection.select("b2");

        store.remove_board("b2");
        // b2 gone, last-used was b2; first by position wins.
        assert_eq!(store.selection.active_id(), Some("b1"));
    }

    #[test]
    fn archived_boards_are_hidden_from_ordering() {
        let mut store = BoardStore::default();
        store.boards.insert_if_absent(board("b1", 2.0));
        store.boards.insert_if_absent(board("b2", 1.0));
        store.boards.get_mut("b2").unwrap().archived = true;

        let ids: Vec<&str> = store
            .boards_in_order()
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b1"]);
    }

    #[test]
    fn populate_board_drops_children_removed_on_server() {
        let mut store = store_with_two_lists();
        store.populate_board(
            "b1",
            vec![list("l1", "b1", 1.0)],
            vec![card("c1", "l1", 1.0)],
        );
        assert!(!store.lists.contains("l2"));
        assert!(!store.cards.contains("c2"));
        assert!(store.cards.contains("c1"));
    }
}
