pub mod channel;
pub mod dispatcher;
pub mod event;
pub mod stats;

pub use channel::{
    ChannelState, ChannelTransport, InboundMessage, RealtimeCommand, RealtimeHandle,
    RealtimeWorker,
};
pub use dispatcher::{apply_org_event, apply_user_event, dispatch_frame};
pub use event::{CardRef, ChannelKind, EntityRef, ListRef, OrgEvent, RoleChange, UserEvent};
pub use stats::{RealtimeStats, SharedRealtimeStats};
