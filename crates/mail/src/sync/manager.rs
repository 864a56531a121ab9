//! Mail synchronization manager
//!
//! Owns the view state and runs three independent loops against it:
//! - refresh: polls the active folder on a fixed cadence
//! - search: debounced re-query and filter on search text changes
//! - thread: incremental polling of the open conversation
//!
//! All view-state writes go through one `watch` channel, so mutations are
//! serialized and subscribers are woken only when something changed. Every
//! loop result carries the generation it was started under and is dropped
//! if that generation is no longer current.

use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::generation::Generation;
use super::state::ViewState;
use super::timing::SyncTiming;
use super::{refresh, search, thread};
use crate::backend::{MailBackend, OutgoingMail};
use crate::dispatch::FolderDispatch;
use crate::error::MailResult;
use crate::models::{Account, Folder, Mail, MailId, Tab};

/// Handles of the most recent activation of each loop
#[derive(Default)]
pub(super) struct LoopTasks {
    pub refresh: Option<JoinHandle<()>>,
    pub search: Option<JoinHandle<()>>,
    pub thread: Option<JoinHandle<()>>,
}

impl LoopTasks {
    fn abort_all(&mut self) {
        for handle in [self.refresh.take(), self.search.take(), self.thread.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

/// State shared between the manager handle and its loops
pub(super) struct Shared {
    pub backend: Arc<dyn MailBackend>,
    pub dispatch: FolderDispatch,
    pub account: Account,
    pub timing: SyncTiming,
    pub state: watch::Sender<ViewState>,
    pub ready: AtomicBool,
    pub refresh_gen: Generation,
    pub search_gen: Generation,
    pub thread_gen: Generation,
    tasks: Mutex<LoopTasks>,
}

impl Shared {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Mutate the view state and always notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.state.send_modify(f);
    }

    /// Mutate the view state; subscribers are notified only if `f` returns true
    pub fn update_if(&self, f: impl FnOnce(&mut ViewState) -> bool) -> bool {
        self.state.send_if_modified(f)
    }

    pub fn tasks(&self) -> MutexGuard<'_, LoopTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a mailbox view in sync with the remote encrypted mail store
pub struct MailSyncManager {
    shared: Arc<Shared>,
}

impl MailSyncManager {
    /// Create a manager for `account`. Nothing runs until [`start`](Self::start).
    pub fn new(backend: Arc<dyn MailBackend>, account: Account, timing: SyncTiming) -> Self {
        Self::with_initial_tab(backend, account, timing, Tab::Inbox)
    }

    pub fn with_initial_tab(
        backend: Arc<dyn MailBackend>,
        account: Account,
        timing: SyncTiming,
        initial_tab: Tab,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::new(initial_tab));
        let shared = Shared {
            dispatch: FolderDispatch::new(backend.clone()),
            backend,
            account,
            timing,
            state,
            ready: AtomicBool::new(false),
            refresh_gen: Generation::new(),
            search_gen: Generation::new(),
            thread_gen: Generation::new(),
            tasks: Mutex::new(LoopTasks::default()),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Mark the backend as initialized and start polling the active folder,
    /// plus any search or open thread set up before.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        if self.shared.ready.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(
            "Mail sync started for {} on {}",
            self.shared.account.short(),
            self.shared.state.borrow().active_tab
        );
        refresh::activate(&self.shared);

        let text = self.shared.state.borrow().search_text.clone();
        if !text.is_empty() {
            search::schedule(&self.shared, text);
        }
        thread::resume(&self.shared);
    }

    /// Stop every loop. Results still in flight are discarded.
    pub fn shutdown(&self) {
        if !self.shared.ready.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut tasks = self.shared.tasks();
        self.shared.update(|s| {
            self.shared.refresh_gen.advance();
            self.shared.search_gen.advance();
            self.shared.thread_gen.advance();
            s.refreshing = false;
            s.search_pending = false;
        });
        tasks.abort_all();
        info!("Mail sync stopped");
    }

    pub fn is_ready(&self) -> bool {
        self.shared.is_ready()
    }

    pub fn account(&self) -> &Account {
        &self.shared.account
    }

    pub fn timing(&self) -> SyncTiming {
        self.shared.timing
    }

    // ========================================================================
    // View state access
    // ========================================================================

    /// Snapshot of the current view state
    pub fn state(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Receiver woken on every effective view-state change
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Switch folders: clear selection, thread state and search results, then
    /// re-activate the refresh loop (and a non-empty search) for the new
    /// folder. No-op if `tab` is already active.
    pub fn set_active_tab(&self, tab: Tab) {
        let switched = self.shared.update_if(|s| {
            if s.active_tab == tab {
                return false;
            }
            s.active_tab = tab;
            s.reset_for_folder_switch();
            self.shared.thread_gen.advance();
            self.shared.refresh_gen.advance();
            // Search results belong to the folder they were fetched from
            self.shared.search_gen.advance();
            s.filtered_mails.clear();
            s.search_pending = false;
            s.searching = s.searching && !s.search_text.is_empty();
            true
        });
        if !switched {
            return;
        }

        info!("Switched to {}", tab);
        if self.shared.is_ready() {
            refresh::activate(&self.shared);
            let text = self.shared.state.borrow().search_text.clone();
            if !text.is_empty() {
                search::schedule(&self.shared, text);
            }
        }
    }

    /// Update the search text, debouncing the query
    pub fn set_search_text(&self, text: impl Into<String>) {
        search::on_text_changed(&self.shared, text.into());
    }

    /// Open a mail (following its thread if it has one) or close the open one
    pub fn set_active_mail(&self, mail: Option<Mail>) {
        thread::follow(&self.shared, mail);
    }

    /// Re-activate the refresh loop for the current folder now
    pub fn refresh_now(&self) {
        if self.shared.is_ready() {
            refresh::activate(&self.shared);
        }
    }

    /// Flip one mail's membership in the selection
    pub fn toggle_selection(&self, id: MailId) {
        self.shared.update(|s| {
            if !s.selected_ids.remove(&id) {
                s.selected_ids.insert(id);
            }
            s.selecting = !s.selected_ids.is_empty();
        });
    }

    pub fn set_selected_ids(&self, ids: impl IntoIterator<Item = MailId>) {
        let ids: BTreeSet<MailId> = ids.into_iter().collect();
        self.shared.update_if(|s| {
            if s.selected_ids == ids {
                return false;
            }
            s.selecting = !ids.is_empty();
            s.selected_ids = ids;
            true
        });
    }

    pub fn clear_selection(&self) {
        self.set_selected_ids(std::iter::empty());
    }

    pub fn set_composing(&self, composing: bool) {
        self.set_flag(|s| &mut s.composing, composing);
    }

    pub fn set_replying(&self, replying: bool) {
        self.set_flag(|s| &mut s.replying, replying);
    }

    pub fn set_forwarding(&self, forwarding: bool) {
        self.set_flag(|s| &mut s.forwarding, forwarding);
    }

    pub fn set_bulk_action(&self, target: Option<Folder>) {
        self.shared.update_if(|s| {
            if s.bulk_action == target {
                return false;
            }
            s.bulk_action = target;
            true
        });
    }

    fn set_flag(&self, field: impl FnOnce(&mut ViewState) -> &mut bool, value: bool) {
        self.shared.update_if(|s| {
            let flag = field(s);
            if *flag == value {
                return false;
            }
            *flag = value;
            true
        });
    }

    // ========================================================================
    // Backend pass-through
    // ========================================================================

    /// One-shot fetch of a folder through the dispatch table
    pub async fn refresh_by_tab(&self, tab: Tab) -> MailResult<Vec<Mail>> {
        self.shared.dispatch.fetch(tab).await
    }

    /// One-shot fetch by raw tab index; unknown indexes yield nothing
    pub async fn refresh_by_index(&self, index: u32) -> MailResult<Vec<Mail>> {
        self.shared.dispatch.fetch_index(index).await
    }

    pub async fn send_mail(&self, mail: OutgoingMail) -> MailResult<MailId> {
        let id = self.shared.backend.send_mail(mail).await?;
        info!("Sent mail {}", id);
        self.set_composing(false);
        Ok(id)
    }

    pub async fn reply(&self, parent: MailId, mail: OutgoingMail) -> MailResult<MailId> {
        let id = self.shared.backend.reply(parent, mail).await?;
        info!("Replied to {} with {}", parent, id);
        self.set_replying(false);
        Ok(id)
    }

    pub async fn forward(&self, original: MailId, mail: OutgoingMail) -> MailResult<MailId> {
        let id = self.shared.backend.forward(original, mail).await?;
        info!("Forwarded {} as {}", original, id);
        self.set_forwarding(false);
        Ok(id)
    }

    pub async fn move_mails(&self, ids: &[MailId], target: Folder) -> MailResult<()> {
        self.shared.backend.move_mails(ids, target).await?;
        info!("Moved {} mails to {}", ids.len(), target);
        Ok(())
    }

    /// Move the current selection to `target`.
    ///
    /// On success the selection is cleared and the folder is re-fetched.
    /// Returns the number of mails moved.
    pub async fn move_selected(&self, target: Folder) -> MailResult<usize> {
        let ids: Vec<MailId> = self.shared.state.borrow().selected_ids.iter().copied().collect();
        if ids.is_empty() {
            debug!("Nothing selected to move");
            return Ok(0);
        }

        self.move_mails(&ids, target).await?;
        self.shared.update(|s| {
            s.selected_ids.clear();
            s.selecting = false;
            s.bulk_action = None;
        });
        self.refresh_now();
        Ok(ids.len())
    }
}

impl Drop for MailSyncManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
