//! Session lifecycle.

use crate::constants::{ORG_TOPIC_PREFIX, USER_TOPIC_PREFIX};
use crate::realtime::ChannelKind;

use super::CoreRuntime;

#[derive(Debug, Clone)]
pub struct Session {
    pub org_id: String,
    pub user_id: String,
    pub auth_token: String,
}

impl CoreRuntime {
    /// Start a session. Any previous tenant's data is torn down first,
    /// synchronously, before the new session's channels are joined or any
    /// fetch may run, so a user switch can never bleed data across
    /// tenants.
    pub fn login(&self, session: Session) {
        self.stores.borrow_mut().clear_all();

        self.api.set_auth_token(Some(session.auth_token.clone()));
        if let Some(handle) = &self.realtime {
            handle.unsubscribe_all();
            handle.subscribe(
                ChannelKind::Organization,
                format!("{}{}", ORG_TOPIC_PREFIX, session.org_id),
            );
            handle.subscribe(
                ChannelKind::User,
                format!("{}{}", USER_TOPIC_PREFIX, session.user_id),
            );
        }

        tracing::info!("session started for org {}", session.org_id);
        *self.session.borrow_mut() = Some(session);
    }

    /// End the session: clear every store, drop credentials, leave the
    /// realtime channels. The epoch bump inside `clear_all` invalidates
    /// every in-flight request.
    pub fn logout(&self) {
        self.stores.borrow_mut().clear_all();
        self.api.set_auth_token(None);
        if let Some(handle) = &self.realtime {
            handle.unsubscribe_all();
        }
        *self.session.borrow_mut() = None;
        tracing::info!("session ended");
    }

    pub fn has_session(&self) -> bool {
        self.session.borrow().is_some()
    }
}
