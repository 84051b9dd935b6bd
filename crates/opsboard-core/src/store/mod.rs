pub mod board_store;
pub mod collection;
pub mod contract_store;
pub mod selection;
pub mod team_store;
pub mod transaction_store;

pub use board_store::{BoardStore, Placed};
pub use collection::Collection;
pub use contract_store::ContractStore;
pub use selection::ActiveSelection;
pub use team_store::TeamStore;
pub use transaction_store::TransactionStore;

use crate::models::Profile;
use crate::optimistic::{MutationJournal, OpToken};

/// Every client-side cache, plus the mutation journal that guards them.
/// One instance per process, owned by the runtime and mutated only from the
/// main task.
#[derive(Debug, Default)]
pub struct Stores {
    pub boards: BoardStore,
    pub contracts: ContractStore,
    pub transactions: TransactionStore,
    pub team: TeamStore,
    pub profile: Option<Profile>,
    pub journal: MutationJournal,
    /// Set when the user channel announces the session was revoked
    /// elsewhere; the embedding app decides what to do with it.
    pub session_revoked: bool,
}

impl Stores {
    pub fn new(last_used_board: Option<String>) -> Self {
        Self {
            boards: BoardStore::new(last_used_board),
            ..Self::default()
        }
    }

    /// Whether a result produced under `token` may still be applied.
    pub fn accepts(&self, token: &OpToken) -> bool {
        self.journal.epoch_live(token)
    }

    /// Stop-the-world teardown on logout or user switch.
    ///
    /// The epoch bump comes first: once it lands, every in-flight fetch and
    /// mutation result is dead on arrival and cannot repopulate a store
    /// with the previous tenant's data. Then each store is emptied in turn,
    /// synchronously, before any new session may fetch.
    pub fn clear_all(&mut self) {
        self.journal.bump_epoch();
        self.boards.clear();
        self.contracts.clear();
        self.transactions.clear();
        self.team.clear();
        self.profile = None;
        self.session_revoked = false;
        tracing::info!("stores cleared for session teardown");
    }
}
