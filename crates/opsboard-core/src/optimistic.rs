//! Bookkeeping for optimistic mutations.
//!
//! Every user action mutates its store synchronously, then fires the
//! request. The journal here decides what may happen when that request
//! resolves:
//!
//! - a **generation** per entity ensures a failing request only reverts the
//!   entity if no later mutation has rewritten it in the meantime;
//! - an **epoch** per session ensures results that straddle a logout (or
//!   user switch) are discarded before they touch any store.
//!
//! Reverts are item-scoped: the captured [`Rollback`] restores the one
//! entity (including its prior parent and position) or removes it if the
//! mutation created it. Whole-collection snapshot restores are deliberately
//! not offered; they clobber unrelated concurrent mutations.

use std::collections::HashMap;

use crate::models::Entity;
use crate::store::Collection;

/// Identity of an entity across all stores, for generation tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Board(String),
    List(String),
    Card(String),
    Contract(String),
    Transaction(String),
    Invite(String),
    Member(String),
    Permission(String),
}

/// Liveness token carried across a request's await point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpToken {
    pub epoch: u64,
    pub op: u64,
}

#[derive(Debug, Default)]
pub struct MutationJournal {
    epoch: u64,
    next_op: u64,
    generations: HashMap<EntityKey, u64>,
}

impl MutationJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate every in-flight operation. Called on logout/login; any
    /// pending generation entries die with the session.
    pub fn bump_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.generations.clear();
        self.epoch
    }

    /// Start an operation against `key`. The returned token is the newest
    /// generation for that entity until another `begin` supersedes it.
    pub fn begin(&mut self, key: EntityKey) -> OpToken {
        self.next_op += 1;
        let token = OpToken {
            epoch: self.epoch,
            op: self.next_op,
        };
        self.generations.insert(key, token.op);
        token
    }

    /// Whether the session that issued `token` is still the current one.
    pub fn epoch_live(&self, token: &OpToken) -> bool {
        token.epoch == self.epoch
    }

    /// Whether `token` still owns `key`: same session and no later mutation
    /// has touched the entity. Both revert-on-failure and confirm-on-success
    /// must check this before writing.
    pub fn is_current(&self, key: &EntityKey, token: &OpToken) -> bool {
        self.epoch_live(token) && self.generations.get(key) == Some(&token.op)
    }

    /// Drop the generation entry once the operation has fully resolved, but
    /// only if it still belongs to `token`.
    pub fn finish(&mut self, key: &EntityKey, token: &OpToken) {
        if self.generations.get(key) == Some(&token.op) {
            self.generations.remove(key);
        }
    }
}

/// Item-scoped undo captured before an optimistic mutation is applied.
#[derive(Debug, Clone)]
pub enum Rollback<T: Entity> {
    /// The entity existed; restoring it reinstates its prior parent and
    /// position in one write (covers both halves of a cross-list move).
    Restore(T),
    /// The mutation created the entity; revert removes it.
    Remove(String),
}

impl<T: Entity> Rollback<T> {
    /// Build the rollback from the pre-mutation state of the entity.
    pub fn of(id: &str, prior: Option<T>) -> Self {
        match prior {
            Some(entity) => Rollback::Restore(entity),
            None => Rollback::Remove(id.to_string()),
        }
    }

    pub fn apply<F: PartialEq>(self, collection: &mut Collection<T, F>) {
        match self {
            Rollback::Restore(entity) => {
                collection.upsert(entity);
            }
            Rollback::Remove(id) => {
                collection.remove(&id);
            }
        }
    }
}
