//! Mailbox synchronization
//!
//! [`MailSyncManager`] keeps a [`ViewState`] consistent with the backend
//! under three concurrently running loops (folder refresh, debounced
//! search, thread follow) and resets derived state on folder switches.

mod generation;
mod manager;
mod refresh;
mod search;
mod state;
mod thread;
mod timing;

pub use generation::Generation;
pub use manager::MailSyncManager;
pub use search::filter_by_counterparty;
pub use state::ViewState;
pub use timing::{
    DEFAULT_REFRESH_INTERVAL, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_THREAD_INTERVAL, SyncTiming,
};
