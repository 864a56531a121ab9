//! Thread follow loop
//!
//! Polls the open conversation incrementally: each call hands the backend
//! the last known snapshot so it can return only what is new. The loop ends
//! when the active mail changes, the manager shuts down, or the backend
//! reports the thread gone (empty result).

use log::{debug, warn};
use std::sync::Arc;

use super::manager::Shared;
use crate::models::{Mail, ThreadId};

/// Make `mail` the active mail and follow its thread, replacing any
/// previous follower
pub(super) fn follow(shared: &Arc<Shared>, mail: Option<Mail>) {
    let mut tasks = shared.tasks();
    let mut generation = 0;
    let thread_id = mail.as_ref().and_then(|m| m.thread().cloned());
    shared.update(|s| {
        generation = shared.thread_gen.advance();
        s.active_mail = mail;
        s.thread_mails.clear();
        s.thread_error = None;
    });

    // Dropping the old handle detaches it; it exits at its next check
    tasks.thread = None;
    if !shared.is_ready() {
        return;
    }
    if let Some(thread_id) = thread_id {
        debug!("Following thread {} (#{})", thread_id, generation);
        tasks.thread = Some(tokio::spawn(run(shared.clone(), thread_id, generation)));
    }
}

/// Start following the active mail's thread, if it has one. Used when the
/// manager becomes ready after a mail was already opened.
pub(super) fn resume(shared: &Arc<Shared>) {
    let mail = shared.state.borrow().active_mail.clone();
    if mail.as_ref().and_then(|m| m.thread()).is_some() {
        follow(shared, mail);
    }
}

async fn run(shared: Arc<Shared>, thread_id: ThreadId, generation: u64) {
    let mut first_call = true;

    while shared.thread_gen.is_current(generation) {
        let known = shared.state.borrow().thread_mails.clone();
        match shared.backend.get_thread(&thread_id, &known, first_call).await {
            Ok(mails) if mails.is_empty() => {
                debug!("Thread {} is gone, stopping", thread_id);
                break;
            }
            Ok(mails) => {
                let mut current = true;
                shared.update_if(|s| {
                    if !shared.thread_gen.is_current(generation) {
                        current = false;
                        return false;
                    }
                    let replaced = s.replace_thread(mails);
                    s.thread_error.take().is_some() || replaced
                });
                if !current {
                    break;
                }
                first_call = false;
            }
            Err(e) => {
                warn!("Failed to poll thread {}, retrying next tick: {}", thread_id, e);
                shared.update_if(|s| {
                    if !shared.thread_gen.is_current(generation) {
                        return false;
                    }
                    s.thread_error = Some(e);
                    true
                });
            }
        }

        tokio::time::sleep(shared.timing.thread_interval).await;
    }
    debug!("Stopped following thread {} (#{})", thread_id, generation);
}
