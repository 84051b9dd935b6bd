//! Process-level wiring and high-level operations.
//!
//! `CoreRuntime` owns the stores, the API client and the realtime handle,
//! and exposes the operations the UI calls. Everything runs on the main
//! task; "concurrency" is interleaved awaits, so stores live behind
//! `Rc<RefCell<..>>` and no borrow is ever held across an await point.

mod boards;
mod cards;
mod fetch;
mod records;
mod session;
mod team;

pub use session::Session;

use std::cell::RefCell;
use std::rc::Rc;
use std::thread::JoinHandle;

use crate::api::{ApiClient, ApiError};
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::models::{Entity, PrefsStorage};
use crate::notices::NoticeSender;
use crate::optimistic::{EntityKey, OpToken, Rollback};
use crate::realtime::{
    dispatch_frame, ChannelTransport, RealtimeHandle, RealtimeWorker, SharedRealtimeStats,
};
use crate::store::{Collection, Stores};

pub struct CoreRuntime {
    config: CoreConfig,
    api: ApiClient,
    stores: Rc<RefCell<Stores>>,
    notices: NoticeSender,
    prefs: PrefsStorage,
    realtime: Option<RealtimeHandle>,
    realtime_stats: SharedRealtimeStats,
    worker_handle: Option<JoinHandle<()>>,
    session: RefCell<Option<Session>>,
}

impl CoreRuntime {
    pub fn new(config: CoreConfig, notices: NoticeSender) -> Self {
        let prefs = PrefsStorage::new(&config.data_dir);
        let last_board = prefs.load().last_board_id;
        let api = ApiClient::new(config.api_base_url.clone());

        Self {
            config,
            api,
            stores: Rc::new(RefCell::new(Stores::new(last_board))),
            notices,
            prefs,
            realtime: None,
            realtime_stats: SharedRealtimeStats::new(),
            worker_handle: None,
            session: RefCell::new(None),
        }
    }

    /// Start the realtime worker over the given transport. Channels are
    /// joined on the next `login`.
    pub fn connect_realtime<T: ChannelTransport + Send + 'static>(&mut self, transport: T) {
        let (handle, join) = RealtimeWorker::spawn(
            transport,
            self.config.watchdog_interval,
            self.realtime_stats.clone(),
        );
        self.realtime = Some(handle);
        self.worker_handle = Some(join);
    }

    pub fn stores(&self) -> Rc<RefCell<Stores>> {
        self.stores.clone()
    }

    pub fn notices(&self) -> &NoticeSender {
        &self.notices
    }

    pub fn realtime_stats(&self) -> SharedRealtimeStats {
        self.realtime_stats.clone()
    }

    /// Drain pending realtime frames and merge them into the stores.
    /// Called from the UI loop; each frame is one synchronous mutation.
    pub fn process_realtime(&self) {
        let Some(handle) = &self.realtime else {
            return;
        };
        let frames = handle.drain_frames();
        if frames.is_empty() {
            return;
        }
        let mut stores = self.stores.borrow_mut();
        for (kind, frame) in frames {
            dispatch_frame(
                &mut stores,
                &self.notices,
                &self.realtime_stats,
                kind,
                &frame,
            );
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = &self.realtime {
            handle.shutdown();
        }
        if let Some(join) = self.worker_handle.take() {
            let _ = join.join();
        }
        self.realtime = None;
    }

    fn require_session(&self) -> Result<(), CoreError> {
        if self.session.borrow().is_some() {
            Ok(())
        } else {
            Err(CoreError::NoSession)
        }
    }

    /// Resolve an optimistic mutation whose request answers with the
    /// authoritative entity: merge it by id on success, apply the
    /// item-scoped rollback on failure. In both cases only if no later
    /// mutation took ownership of the entity, and never across an epoch.
    fn settle<T: Entity, F: PartialEq>(
        &self,
        key: EntityKey,
        token: OpToken,
        rollback: Rollback<T>,
        result: Result<T, ApiError>,
        local_id: &str,
        failure_msg: &str,
        collection: fn(&mut Stores) -> &mut Collection<T, F>,
    ) -> Result<(), CoreError> {
        let mut stores = self.stores.borrow_mut();
        if !stores.accepts(&token) {
            return Ok(());
        }
        let current = stores.journal.is_current(&key, &token);
        match result {
            Ok(server) => {
                if current {
                    collection(&mut stores).confirm(local_id, server);
                }
                stores.journal.finish(&key, &token);
                Ok(())
            }
            Err(e) => {
                if current {
                    rollback.apply(collection(&mut stores));
                }
                stores.journal.finish(&key, &token);
                self.notices.error(format!("{failure_msg}: {e}"));
                Err(e.into())
            }
        }
    }

    /// Resolve an optimistic removal: the entity is already gone locally;
    /// failure restores it.
    fn settle_removal<T: Entity, F: PartialEq>(
        &self,
        key: EntityKey,
        token: OpToken,
        rollback: Rollback<T>,
        result: Result<(), ApiError>,
        failure_msg: &str,
        collection: fn(&mut Stores) -> &mut Collection<T, F>,
    ) -> Result<(), CoreError> {
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
                    rollback.apply(collection(&mut stores));
                }
                stores.journal.finish(&key, &token);
                self.notices.error(format!("{failure_msg}: {e}"));
                Err(e.into())
            }
        }
    }
}

impl Drop for CoreRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
