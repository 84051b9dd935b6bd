//! Active-aggregate pointer with a sticky fallback.

/// Tracks "the currently viewed board" (or any other aggregate). The
/// invariant is that `active_id`, when set, names an item present in the
/// owning store; [`ActiveSelection::reconcile`] re-establishes it after any
/// removal using the fallback chain keep → last-used → first-available →
/// none.
#[derive(Debug, Clone, Default)]
pub struct ActiveSelection {
    active_id: Option<String>,
    last_used_id: Option<String>,
}

impl ActiveSelection {
    pub fn new(last_used_id: Option<String>) -> Self {
        Self {
            active_id: None,
            last_used_id,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn last_used_id(&self) -> Option<&str> {
        self.last_used_id.as_deref()
    }

    /// Make `id` active and remember it as the sticky fallback.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.last_used_id = Some(id.clone());
        self.active_id = Some(id);
    }

    pub fn clear(&mut self) {
        self.active_id = None;
    }

    /// Re-validate the selection against the store.
    ///
    /// `exists` answers whether an id is currently present; `first` is the
    /// store's first item in render order. Returns the id that ended up
    /// active, if any.
    pub fn reconcile(
        &mut self,
        exists: impl Fn(&str) -> bool,
        first: Option<&str>,
    ) -> Option<&str> {
        if let Some(active) = &self.active_id {
            if exists(active) {
                return self.active_id.as_deref();
            }
        }

        if let Some(last) = &self.last_used_id {
            if exists(last) {
                self.active_id = Some(last.clone());
                return self.active_id.as_deref();
            }
        }

        match first {
            Some(id) => self.select(id),
            None => self.active_id = None,
        }
        self.active_id.as_deref()
    }
}
