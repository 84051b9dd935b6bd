//! Fetch entry points, gated by the freshness policy.
//!
//! Each follows the same shape: decide against the store's fetch state,
//! return immediately on a fresh cache, otherwise hit the API and, only if
//! the session epoch is unchanged, swap the result in. A background
//! refresh is the same fetch without a loading indicator and with failures
//! demoted to debug logs.

use crate::api::{ContractFilters, TransactionFilters};
use crate::error::CoreError;
use crate::freshness::FetchDecision;

use super::CoreRuntime;

impl CoreRuntime {
    pub async fn fetch_boards(&self, force: bool) -> Result<(), CoreError> {
        self.require_session()?;
        let (decision, epoch) = {
            let mut stores = self.stores.borrow_mut();
            let decision = stores
                .boards
                .boards
                .decide(self.config.freshness.boards, &(), force);
            if decision == FetchDecision::Refetch {
                stores.boards.boards.begin_load();
            }
            (decision, stores.journal.epoch())
        };
        if decision == FetchDecision::UseCached {
            return Ok(());
        }
        let silent = decision == FetchDecision::RefreshInBackground;

        let result = self.api.list_boards().await;
        let mut stores = self.stores.borrow_mut();
        if stores.journal.epoch() != epoch {
            return Ok(());
        }
        match result {
            Ok(boards) => {
                stores.boards.boards.populate(boards, ());
                stores.boards.reconcile_selection();
                Ok(())
            }
            Err(e) => {
                stores.boards.boards.abort_load();
                if silent {
                    tracing::debug!("silent board refresh failed: {}", e);
                    Ok(())
                } else {
                    self.notices.error(format!("Could not load boards: {e}"));
                    Err(e.into())
                }
            }
        }
    }

    /// Load a board's lists and cards and make it the active board.
    /// Children already loaded are served from cache unless forced.
    pub async fn open_board(&self, board_id: &str, force: bool) -> Result<(), CoreError> {
        self.require_session()?;
        let epoch = {
            let mut stores = self.stores.borrow_mut();
            if stores.boards.is_board_loaded(board_id) && !force {
                self.select_board_in(&mut stores, board_id)?;
                return Ok(());
            }
            stores.journal.epoch()
        };

        let result = self.api.get_board(board_id).await;
        let mut stores = self.stores.borrow_mut();
        if stores.journal.epoch() != epoch {
            return Ok(());
        }
        match result {
            Ok(detail) => {
                stores.boards.boards.upsert(detail.board);
                stores.boards.populate_board(board_id, detail.lists, detail.cards);
                self.select_board_in(&mut stores, board_id)?;
                Ok(())
            }
            Err(e) => {
                self.notices.error(format!("Could not open board: {e}"));
                Err(e.into())
            }
        }
    }

    pub async fn fetch_contracts(
        &self,
        filters: ContractFilters,
        force: bool,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let (decision, epoch) = {
            let mut stores = self.stores.borrow_mut();
            let decision =
                stores
                    .contracts
                    .contracts
                    .decide(self.config.freshness.records, &filters, force);
            if decision == FetchDecision::Refetch {
                stores.contracts.contracts.begin_load();
            }
            (decision, stores.journal.epoch())
        };
        if decision == FetchDecision::UseCached {
            return Ok(());
        }
        let silent = decision == FetchDecision::RefreshInBackground;

        let result = self.api.list_contracts(&filters).await;
        let mut stores = self.stores.borrow_mut();
        if stores.journal.epoch() != epoch {
            return Ok(());
        }
        match result {
            Ok(contracts) => {
                stores.contracts.contracts.populate(contracts, filters);
                Ok(())
            }
            Err(e) => {
                stores.contracts.contracts.abort_load();
                if silent {
                    tracing::debug!("silent contract refresh failed: {}", e);
                    Ok(())
                } else {
                    self.notices
                        .error(format!("Could not load contracts: {e}"));
                    Err(e.into())
                }
            }
        }
    }

    pub async fn fetch_transactions(
        &self,
        filters: TransactionFilters,
        force: bool,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let (decision, epoch) = {
            let mut stores = self.stores.borrow_mut();
            let decision = stores.transactions.transactions.decide(
                self.config.freshness.records,
                &filters,
                force,
            );
            if decision == FetchDecision::Refetch {
                stores.transactions.transactions.begin_load();
            }
            (decision, stores.journal.epoch())
        };
        if decision == FetchDecision::UseCached {
            return Ok(());
        }
        let silent = decision == FetchDecision::RefreshInBackground;

        let result = self.api.list_transactions(&filters).await;
        let mut stores = self.stores.borrow_mut();
        if stores.journal.epoch() != epoch {
            return Ok(());
        }
        match result {
            Ok(transactions) => {
                stores
                    .transactions
                    .transactions
                    .populate(transactions, filters);
                Ok(())
            }
            Err(e) => {
                stores.transactions.transactions.abort_load();
                if silent {
                    tracing::debug!("silent transaction refresh failed: {}", e);
                    Ok(())
                } else {
                    self.notices
                        .error(format!("Could not load transactions: {e}"));
                    Err(e.into())
                }
            }
        }
    }

    /// Members and permissions travel together; both populate or neither.
    pub async fn fetch_team(&self, force: bool) -> Result<(), CoreError> {
        self.require_session()?;
        let (decision, epoch) = {
            let mut stores = self.stores.borrow_mut();
            let decision = stores
                .team
                .members
                .decide(self.config.freshness.team, &(), force);
            if decision == FetchDecision::Refetch {
                stores.team.members.begin_load();
            }
            (decision, stores.journal.epoch())
        };
        if decision == FetchDecision::UseCached {
            return Ok(());
        }
        let silent = decision == FetchDecision::RefreshInBackground;

        let result = futures::try_join!(self.api.list_members(), self.api.list_permissions());
        let mut stores = self.stores.borrow_mut();
        if stores.journal.epoch() != epoch {
            return Ok(());
        }
        match result {
            Ok((members, permissions)) => {
                stores.team.members.populate(members, ());
                stores.team.permissions.populate(permissions, ());
                Ok(())
            }
            Err(e) => {
                stores.team.members.abort_load();
                if silent {
                    tracing::debug!("silent team refresh failed: {}", e);
                    Ok(())
                } else {
                    self.notices.error(format!("Could not load team: {e}"));
                    Err(e.into())
                }
            }
        }
    }

    pub async fn fetch_invites(&self, force: bool) -> Result<(), CoreError> {
        self.require_session()?;
        let (decision, epoch) = {
            let mut stores = self.stores.borrow_mut();
            let decision = stores
                .team
                .invites
                .decide(self.config.freshness.team, &(), force);
            if decision == FetchDecision::Refetch {
                stores.team.invites.begin_load();
            }
            (decision, stores.journal.epoch())
        };
        if decision == FetchDecision::UseCached {
            return Ok(());
        }
        let silent = decision == FetchDecision::RefreshInBackground;

        let result = self.api.list_invites().await;
        let mut stores = self.stores.borrow_mut();
        if stores.journal.epoch() != epoch {
            return Ok(());
        }
        match result {
            Ok(invites) => {
                stores.team.invites.populate(invites, ());
                Ok(())
            }
            Err(e) => {
                stores.team.invites.abort_load();
                if silent {
                    tracing::debug!("silent invite refresh failed: {}", e);
                    Ok(())
                } else {
                    self.notices.error(format!("Could not load invites: {e}"));
                    Err(e.into())
                }
            }
        }
    }
}
