//! Board and list operations.

use chrono::Utc;
use uuid::Uuid;

use crate::api::{
    CreateBoardRequest, CreateListRequest, MoveListRequest, PositionUpdate, RenameListRequest,
    UpdateBoardRequest,
};
use crate::error::CoreError;
use crate::models::{Board, BoardList};
use crate::optimistic::{EntityKey, Rollback};
use crate::position;
use crate::store::Stores;

use super::CoreRuntime;

impl CoreRuntime {
    /// Make `board_id` the active board and persist it as the sticky
    /// last-used board.
    pub fn select_board(&self, board_id: &str) -> Result<(), CoreError> {
        let mut stores = self.stores.borrow_mut();
        self.select_board_in(&mut stores, board_id)
    }

    pub(super) fn select_board_in(
        &self,
        stores: &mut Stores,
        board_id: &str,
    ) -> Result<(), CoreError> {
        if !stores.boards.boards.contains(board_id) {
            return Err(CoreError::UnknownBoard(board_id.to_string()));
        }
        stores.boards.selection.select(board_id);
        let prefs = crate::models::BoardPrefs {
            last_board_id: Some(board_id.to_string()),
        };
        if let Err(e) = self.prefs.save(&prefs) {
            tracing::warn!("could not persist board prefs: {}", e);
        }
        Ok(())
    }

    /// Create a board at the end of the sidebar ordering. Returns its id.
    pub async fn create_board(&self, title: impl Into<String>) -> Result<String, CoreError> {
        self.require_session()?;
        let title = title.into();
        let board_id = format!("board-{}", Uuid::new_v4());

        let (token, pos) = {
            let mut stores = self.stores.borrow_mut();
            let positions: Vec<f64> = stores.boards.boards.iter().map(|b| b.position).collect();
            let pos = position::append_position(&positions);
            stores.boards.boards.insert_if_absent(Board {
                id: board_id.clone(),
                title: title.clone(),
                position: pos,
                archived: false,
                created_at: Utc::now(),
            });
            stores.boards.mark_board_loaded(&board_id);
            let token = stores.journal.begin(EntityKey::Board(board_id.clone()));
            (token, pos)
        };

        let req = CreateBoardRequest {
            id: board_id.clone(),
            title,
            position: pos,
        };
        let result = self.api.create_board(&req).await;
        let final_id = match &result {
            Ok(board) => board.id.clone(),
            Err(_) => board_id.clone(),
        };
        self.settle(
            EntityKey::Board(board_id.clone()),
            token,
            Rollback::of(&board_id, None),
            result,
            &board_id,
            "Could not create board",
            |stores| &mut stores.boards.boards,
        )?;

        if final_id != board_id {
            self.stores
                .borrow_mut()
                .boards
                .rekey_loaded(&board_id, &final_id);
        }
        Ok(final_id)
    }

    pub async fn archive_board(&self, board_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.boards.boards.get(board_id).cloned();
            let Some(board) = stores.boards.boards.get_mut(board_id) else {
                return Err(CoreError::UnknownBoard(board_id.to_string()));
            };
            board.archived = true;
            let token = stores.journal.begin(EntityKey::Board(board_id.to_string()));
            (token, Rollback::of(board_id, prior))
        };

        let req = UpdateBoardRequest {
            archived: Some(true),
            ..UpdateBoardRequest::default()
        };
        let result = self.api.update_board(board_id, &req).await;
        self.settle(
            EntityKey::Board(board_id.to_string()),
            token,
            rollback,
            result,
            board_id,
            "Could not archive board",
            |stores| &mut stores.boards.boards,
        )
    }

    pub async fn rename_board(
        &self,
        board_id: &str,
        title: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let title = title.into();
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.boards.boards.get(board_id).cloned();
            let Some(board) = stores.boards.boards.get_mut(board_id) else {
                return Err(CoreError::UnknownBoard(board_id.to_string()));
            };
            board.title = title.clone();
            let token = stores.journal.begin(EntityKey::Board(board_id.to_string()));
            (token, Rollback::of(board_id, prior))
        };

        let req = UpdateBoardRequest {
            title: Some(title),
            ..UpdateBoardRequest::default()
        };
        let result = self.api.update_board(board_id, &req).await;
        self.settle(
            EntityKey::Board(board_id.to_string()),
            token,
            rollback,
            result,
            board_id,
            "Could not rename board",
            |stores| &mut stores.boards.boards,
        )
    }

    /// Delete a board and its loaded children. The revert restores the
    /// whole affected slice (board, lists and cards), not just the board
    /// row.
    pub async fn delete_board(&self, board_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, prior_board, prior_lists, prior_cards, was_loaded) = {
            let mut stores = self.stores.borrow_mut();
            let Some(board) = stores.boards.boards.get(board_id).cloned() else {
                return Err(CoreError::UnknownBoard(board_id.to_string()));
            };
            let lists: Vec<BoardList> = stores
                .boards
                .lists_of(board_id)
                .into_iter()
                .cloned()
                .collect();
            let cards: Vec<crate::models::Card> = lists
                .iter()
                .flat_map(|l| stores.boards.cards_of(&l.id))
                .cloned()
                .collect();
            let was_loaded = stores.boards.is_board_loaded(board_id);
            stores.boards.remove_board(board_id);
            let token = stores.journal.begin(EntityKey::Board(board_id.to_string()));
            (token, board, lists, cards, was_loaded)
        };

        let result = self.api.delete_board(board_id).await;
        let key = EntityKey::Board(board_id.to_string());
        let mut stores = self.stores.borrow_mut();
        if !stores.accepts(&token) {
            return Ok(());
        }
        let current = stores.journal.is_current(&key, &token);
        match result {
            Ok(()) => {
                stores.journal.finish(&key, &token);
                Ok(())
            }
            Err(e) => {
                if current {
                    stores.boards.boards.upsert(prior_board);
                    for list in prior_lists {
                        stores.boards.lists.upsert(list);
                    }
                    for card in prior_cards {
                        stores.boards.cards.upsert(card);
                    }
                    if was_loaded {
                        stores.boards.mark_board_loaded(board_id);
                    }
                    stores.boards.reconcile_selection();
                }
                stores.journal.finish(&key, &token);
                self.notices.error(format!("Could not delete board: {e}"));
                Err(e.into())
            }
        }
    }

    /// Create a list at the end of a board. Returns its id.
    pub async fn create_list(
        &self,
        board_id: &str,
        title: impl Into<String>,
    ) -> Result<String, CoreError> {
        self.require_session()?;
        let title = title.into();
        let list_id = format!("list-{}", Uuid::new_v4());

        let (token, pos) = {
            let mut stores = self.stores.borrow_mut();
            if !stores.boards.boards.contains(board_id) {
                return Err(CoreError::UnknownBoard(board_id.to_string()));
            }
            let positions: Vec<f64> = stores
                .boards
                .lists_of(board_id)
                .iter()
                .map(|l| l.position)
                .collect();
            let pos = position::append_position(&positions);
            stores.boards.lists.insert_if_absent(BoardList {
                id: list_id.clone(),
                board_id: board_id.to_string(),
                title: title.clone(),
                position: pos,
            });
            let token = stores.journal.begin(EntityKey::List(list_id.clone()));
            (token, pos)
        };

        let req = CreateListRequest {
            board_id: board_id.to_string(),
            title,
            position: pos,
        };
        let result = self.api.create_list(&req).await;
        let final_id = match &result {
            Ok(list) => list.id.clone(),
            Err(_) => list_id.clone(),
        };
        self.settle(
            EntityKey::List(list_id.clone()),
            token,
            Rollback::of(&list_id, None),
            result,
            &list_id,
            "Could not create list",
            |stores| &mut stores.boards.lists,
        )?;
        Ok(final_id)
    }

    pub async fn rename_list(
        &self,
        list_id: &str,
        title: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let title = title.into();
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.boards.lists.get(list_id).cloned();
            let Some(list) = stores.boards.lists.get_mut(list_id) else {
                return Err(CoreError::UnknownList(list_id.to_string()));
            };
            list.title = title.clone();
            let token = stores.journal.begin(EntityKey::List(list_id.to_string()));
            (token, Rollback::of(list_id, prior))
        };

        let result = self
            .api
            .rename_list(list_id, &RenameListRequest { title })
            .await;
        self.settle(
            EntityKey::List(list_id.to_string()),
            token,
            rollback,
            result,
            list_id,
            "Could not rename list",
            |stores| &mut stores.boards.lists,
        )
    }

    /// Reorder a list within its board.
    pub async fn move_list(&self, list_id: &str, index: usize) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback, placed) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.boards.lists.get(list_id).cloned();
            let placed = stores.boards.place_list(list_id, index)?;
            let token = stores.journal.begin(EntityKey::List(list_id.to_string()));
            (token, Rollback::of(list_id, prior), placed)
        };

        let req = MoveListRequest {
            position: placed.position,
            renumbered: placed
                .renumbered
                .into_iter()
                .map(PositionUpdate::from)
                .collect(),
        };
        let result = self.api.move_list(list_id, &req).await;
        self.settle(
            EntityKey::List(list_id.to_string()),
            token,
            rollback,
            result,
            list_id,
            "Could not move list",
            |stores| &mut stores.boards.lists,
        )
    }

    /// Delete a list and its cards; the revert restores both.
    pub async fn delete_list(&self, list_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, prior_list, prior_cards) = {
            let mut stores = self.stores.borrow_mut();
            let Some(list) = stores.boards.lists.get(list_id).cloned() else {
                return Err(CoreError::UnknownList(list_id.to_string()));
            };
            let cards: Vec<crate::models::Card> = stores
                .boards
                .cards_of(list_id)
                .into_iter()
                .cloned()
                .collect();
            stores.boards.remove_list(list_id);
            let token = stores.journal.begin(EntityKey::List(list_id.to_string()));
            (token, list, cards)
        };

        let result = self.api.delete_list(list_id).await;
        let key = EntityKey::List(list_id.to_string());
        let mut stores = self.stores.borrow_mut();
        if !stores.accepts(&token) {
            return Ok(());
        }
        let current = stores.journal.is_current(&key, &token);
        match result {
            Ok(()) => {
                stores.journal.finish(&key, &token);
                Ok(())
            }
            Err(e) => {
                if current {
                    stores.boards.lists.upsert(prior_list);
                    for card in prior_cards {
                        stores.boards.cards.upsert(card);
                    }
                }
                stores.journal.finish(&key, &token);
                self.notices.error(format!("Could not delete list: {e}"));
                Err(e.into())
            }
        }
    }
}
