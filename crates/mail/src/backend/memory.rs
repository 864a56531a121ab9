//! In-memory backend implementation
//!
//! Holds one account's mailbox behind a lock. Used by the driver binary and
//! as the reference backend in tests.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use super::{MailBackend, OutgoingMail};
use crate::error::{MailError, MailResult};
use crate::models::{Account, Folder, Mail, MailId, ThreadId};

struct Mailbox {
    mails: HashMap<MailId, Mail>,
    next_id: u64,
    next_thread: u64,
}

impl Mailbox {
    fn allocate_id(&mut self) -> MailId {
        let id = MailId(self.next_id);
        self.next_id += 1;
        id
    }

    fn allocate_thread(&mut self) -> ThreadId {
        let thread = ThreadId::new(format!("thread-{}", self.next_thread));
        self.next_thread += 1;
        thread
    }

    /// Mails of a folder, oldest first
    fn folder(&self, folder: Folder) -> Vec<Mail> {
        let mut mails: Vec<Mail> = self
            .mails
            .values()
            .filter(|m| m.folder == folder)
            .cloned()
            .collect();
        mails.sort_by_key(|m| (m.sent_at, m.id));
        mails
    }

    fn thread(&self, thread_id: &ThreadId) -> Vec<Mail> {
        let mut mails: Vec<Mail> = self
            .mails
            .values()
            .filter(|m| m.thread() == Some(thread_id))
            .cloned()
            .collect();
        mails.sort_by_key(|m| (m.sent_at, m.id));
        mails
    }

    /// Thread of an existing mail, assigning one if it had none
    fn thread_of(&mut self, id: MailId) -> MailResult<ThreadId> {
        let existing = self
            .mails
            .get(&id)
            .ok_or_else(|| MailError::not_found(format!("mail {}", id)))?
            .thread()
            .cloned();
        match existing {
            Some(thread) => Ok(thread),
            None => {
                let thread = self.allocate_thread();
                if let Some(mail) = self.mails.get_mut(&id) {
                    mail.thread_id = Some(thread.clone());
                }
                Ok(thread)
            }
        }
    }
}

/// In-memory implementation of MailBackend
pub struct InMemoryBackend {
    account: Account,
    mailbox: RwLock<Mailbox>,
    /// Number of upcoming fetches that fail as unavailable
    failures: AtomicUsize,
}

impl InMemoryBackend {
    /// Create an empty mailbox owned by `account`
    pub fn new(account: Account) -> Self {
        Self {
            account,
            mailbox: RwLock::new(Mailbox {
                mails: HashMap::new(),
                next_id: 1,
                next_thread: 1,
            }),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Store a mail as-is, replacing any mail with the same id
    pub fn insert(&self, mail: Mail) {
        let mut mailbox = self.write();
        mailbox.next_id = mailbox.next_id.max(mail.id.0 + 1);
        mailbox.mails.insert(mail.id, mail);
    }

    /// Deliver an incoming mail from `from` into the inbox
    pub fn deliver(&self, from: impl Into<String>, thread_id: Option<ThreadId>) -> MailId {
        let mut mailbox = self.write();
        let id = mailbox.allocate_id();
        let thread = match thread_id {
            Some(thread) => thread,
            None => mailbox.allocate_thread(),
        };
        let mail = Mail::builder(id)
            .from(from)
            .to(self.account.address.clone())
            .thread_id(thread)
            .folder(Folder::Inbox)
            .sent_at(Utc::now())
            .build();
        mailbox.mails.insert(id, mail);
        id
    }

    /// Drop a mail entirely
    pub fn remove(&self, id: MailId) -> Option<Mail> {
        self.write().mails.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.read().mails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make the next `count` fetches fail with [`MailError::Unavailable`]
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    fn check_available(&self) -> MailResult<()> {
        let took = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match took {
            Ok(_) => Err(MailError::unavailable("injected failure")),
            Err(_) => Ok(()),
        }
    }

    fn fetch_folder(&self, folder: Folder) -> MailResult<Vec<Mail>> {
        self.check_available()?;
        let mails = self.read().folder(folder);
        debug!("{} returned {} mails", folder, mails.len());
        Ok(mails)
    }

    fn store_outgoing(&self, to: String, thread: ThreadId, mail: OutgoingMail) -> MailId {
        let mut mailbox = self.write();
        let id = mailbox.allocate_id();
        let sent = Mail::builder(id)
            .from(self.account.address.clone())
            .to(to)
            .thread_id(thread)
            .folder(Folder::Sent)
            .sent_at(Utc::now())
            .body(mail.body)
            .build();
        mailbox.mails.insert(id, sent);
        id
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Mailbox> {
        self.mailbox.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Mailbox> {
        self.mailbox.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MailBackend for InMemoryBackend {
    async fn get_inbox(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Inbox)
    }

    async fn get_sent(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Sent)
    }

    async fn get_read(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Read)
    }

    async fn get_spam(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Spam)
    }

    async fn get_starred(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Starred)
    }

    async fn get_archive(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Archive)
    }

    async fn get_trash(&self) -> MailResult<Vec<Mail>> {
        self.fetch_folder(Folder::Trash)
    }

    async fn get_thread(
        &self,
        thread_id: &ThreadId,
        known: &[Mail],
        is_first_call: bool,
    ) -> MailResult<Vec<Mail>> {
        self.check_available()?;
        let current = self.read().thread(thread_id);
        if current.is_empty() || is_first_call || known.is_empty() {
            return Ok(current);
        }

        // Incremental: keep the caller's snapshot and append what it lacks
        let known_ids: HashSet<MailId> = known.iter().map(|m| m.id).collect();
        let mut merged = known.to_vec();
        merged.extend(current.into_iter().filter(|m| !known_ids.contains(&m.id)));
        Ok(merged)
    }

    async fn send_mail(&self, mail: OutgoingMail) -> MailResult<MailId> {
        if mail.to.trim().is_empty() {
            return Err(MailError::invalid_input("recipient is empty"));
        }
        let thread = self.write().allocate_thread();
        let to = mail.to.clone();
        Ok(self.store_outgoing(to, thread, mail))
    }

    async fn reply(&self, parent: MailId, mail: OutgoingMail) -> MailResult<MailId> {
        let (thread, to) = {
            let mut mailbox = self.write();
            let thread = mailbox.thread_of(parent)?;
            let parent_mail = &mailbox.mails[&parent];
            let to = if mail.to.trim().is_empty() {
                self.account.counterparty(parent_mail).to_string()
            } else {
                mail.to.clone()
            };
            (thread, to)
        };
        Ok(self.store_outgoing(to, thread, mail))
    }

    async fn forward(&self, original: MailId, mut mail: OutgoingMail) -> MailResult<MailId> {
        if mail.to.trim().is_empty() {
            return Err(MailError::invalid_input("recipient is empty"));
        }
        let thread = {
            let mut mailbox = self.write();
            let thread = mailbox.thread_of(original)?;
            if mail.body.is_empty() {
                mail.body = mailbox.mails[&original].body.clone();
            }
            thread
        };
        let to = mail.to.clone();
        Ok(self.store_outgoing(to, thread, mail))
    }

    async fn move_mails(&self, ids: &[MailId], target: Folder) -> MailResult<()> {
        let mut mailbox = self.write();
        if let Some(missing) = ids.iter().find(|id| !mailbox.mails.contains_key(id)) {
            return Err(MailError::not_found(format!("mail {}", missing)));
        }
        for id in ids {
            if let Some(mail) = mailbox.mails.get_mut(id) {
                mail.folder = target;
            }
        }
        debug!("Moved {} mails to {}", ids.len(), target);
        Ok(())
    }
}
