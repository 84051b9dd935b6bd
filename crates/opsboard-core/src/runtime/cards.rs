//! Card operations. All optimistic: the store mutates before the request
//! goes out, and the settle helpers reconcile or revert when it resolves.

use chrono::Utc;
use uuid::Uuid;

use crate::api::{CreateCardRequest, MoveCardRequest, PositionUpdate, UpdateCardRequest};
use crate::error::CoreError;
use crate::models::Card;
use crate::optimistic::{EntityKey, Rollback};
use crate::position;

use super::CoreRuntime;

impl CoreRuntime {
    /// Create a card at the end of `list_id`. Returns the card's id:
    /// the client-generated one, or the server's if it re-keyed.
    pub async fn create_card(
        &self,
        list_id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<String, CoreError> {
        self.require_session()?;
        let title = title.into();
        let description = description.into();
        let card_id = format!("card-{}", Uuid::new_v4());

        let (token, pos) = {
            let mut stores = self.stores.borrow_mut();
            if !stores.boards.lists.contains(list_id) {
                return Err(CoreError::UnknownList(list_id.to_string()));
            }
            let positions: Vec<f64> = stores
                .boards
                .cards_of(list_id)
                .iter()
                .map(|c| c.position)
                .collect();
            let pos = position::append_position(&positions);
            let now = Utc::now();
            stores.boards.cards.insert_if_absent(Card {
                id: card_id.clone(),
                list_id: list_id.to_string(),
                title: title.clone(),
                description: description.clone(),
                position: pos,
                assignee_id: None,
                due_at: None,
                created_at: now,
                updated_at: now,
            });
            let token = stores.journal.begin(EntityKey::Card(card_id.clone()));
            (token, pos)
        };

        let req = CreateCardRequest {
            id: card_id.clone(),
            list_id: list_id.to_string(),
            title,
            description,
            position: pos,
        };
        let result = self.api.create_card(&req).await;
        let final_id = match &result {
            Ok(card) => card.id.clone(),
            Err(_) => card_id.clone(),
        };
        self.settle(
            EntityKey::Card(card_id.clone()),
            token,
            Rollback::of(&card_id, None),
            result,
            &card_id,
            "Could not create card",
            |stores| &mut stores.boards.cards,
        )?;
        Ok(final_id)
    }

    pub async fn update_card(
        &self,
        card_id: &str,
        patch: UpdateCardRequest,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.boards.cards.get(card_id).cloned();
            let Some(card) = stores.boards.cards.get_mut(card_id) else {
                return Err(CoreError::UnknownCard(card_id.to_string()));
            };
            if let Some(title) = &patch.title {
                card.title = title.clone();
            }
            if let Some(description) = &patch.description {
                card.description = description.clone();
            }
            if let Some(assignee) = &patch.assignee_id {
                card.assignee_id = assignee.clone();
            }
            if let Some(due) = &patch.due_at {
                card.due_at = *due;
            }
            card.updated_at = Utc::now();
            let token = stores.journal.begin(EntityKey::Card(card_id.to_string()));
            (token, Rollback::of(card_id, prior))
        };

        let result = self.api.update_card(card_id, &patch).await;
        self.settle(
            EntityKey::Card(card_id.to_string()),
            token,
            rollback,
            result,
            card_id,
            "Could not update card",
            |stores| &mut stores.boards.cards,
        )
    }

    /// Move a card to `to_list`; `index` is the drop slot, `None` appends.
    pub async fn move_card(
        &self,
        card_id: &str,
        to_list: &str,
        index: Option<usize>,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback, placed) = {
            let mut stores = self.stores.borrow_mut();
            let prior = stores.boards.cards.get(card_id).cloned();
            let placed = stores.boards.place_card(card_id, to_list, index)?;
            let token = stores.journal.begin(EntityKey::Card(card_id.to_string()));
            (token, Rollback::of(card_id, prior), placed)
        };

        let req = MoveCardRequest {
            list_id: to_list.to_string(),
            position: placed.position,
            renumbered: placed
                .renumbered
                .into_iter()
                .map(PositionUpdate::from)
                .collect(),
        };
        let result = self.api.move_card(card_id, &req).await;
        self.settle(
            EntityKey::Card(card_id.to_string()),
            token,
            rollback,
            result,
            card_id,
            "Could not move card",
            |stores| &mut stores.boards.cards,
        )
    }

    pub async fn delete_card(&self, card_id: &str) -> Result<(), CoreError> {
        self.require_session()?;
        let (token, rollback) = {
            let mut stores = self.stores.borrow_mut();
            let Some(prior) = stores.boards.cards.remove(card_id) else {
                return Err(CoreError::UnknownCard(card_id.to_string()));
            };
            let token = stores.journal.begin(EntityKey::Card(card_id.to_string()));
            (token, Rollback::Restore(prior))
        };

        let result = self.api.delete_card(card_id).await;
        self.settle_removal(
            EntityKey::Card(card_id.to_string()),
            token,
            rollback,
            result,
            "Could not delete card",
            |stores| &mut stores.boards.cards,
        )
    }
}
