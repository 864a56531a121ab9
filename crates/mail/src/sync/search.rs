//! Debounced search over the active folder
//!
//! Each text change starts a new generation; only the last change inside a
//! quiet period survives to query the backend.

use log::{debug, warn};
use std::sync::Arc;

use super::manager::Shared;
use crate::models::{Account, Mail};

/// Record new search text and, once ready, schedule a debounced query
pub(super) fn on_text_changed(shared: &Arc<Shared>, text: String) {
    let changed = shared.update_if(|s| {
        if s.search_text == text {
            return false;
        }
        s.search_text = text.clone();
        true
    });
    if changed && shared.is_ready() {
        schedule(shared, text);
    }
}

/// Supersede any pending search and start the quiet-period timer
pub(super) fn schedule(shared: &Arc<Shared>, text: String) {
    let mut tasks = shared.tasks();
    let mut generation = 0;
    shared.update(|s| {
        generation = shared.search_gen.advance();
        s.search_pending = true;
        s.searching = true;
    });
    tasks.search = Some(tokio::spawn(run(shared.clone(), text, generation)));
}

async fn run(shared: Arc<Shared>, text: String, generation: u64) {
    tokio::time::sleep(shared.timing.search_debounce).await;
    if !shared.search_gen.is_current(generation) {
        return;
    }

    if text.is_empty() {
        shared.update_if(|s| {
            if !shared.search_gen.is_current(generation) {
                return false;
            }
            s.filtered_mails.clear();
            s.searching = false;
            s.search_pending = false;
            s.search_error = None;
            true
        });
        return;
    }

    // Query the folder fresh rather than filtering what is on screen
    let tab = shared.state.borrow().active_tab;
    debug!("Searching {} for {:?}", tab, text);
    let result = shared.dispatch.fetch(tab).await;

    let mut failure = None;
    let applied = shared.update_if(|s| {
        if !shared.search_gen.is_current(generation) {
            return false;
        }
        s.search_pending = false;
        match result {
            Ok(mails) => {
                s.filtered_mails = filter_by_counterparty(&shared.account, mails, &text);
                s.searching = true;
                s.search_error = None;
            }
            Err(e) => {
                failure = Some(e.clone());
                s.search_error = Some(e);
            }
        }
        true
    });

    match failure {
        Some(e) => warn!("Search for {:?} failed: {}", text, e),
        None if !applied => debug!("Dropped stale search result for {:?}", text),
        None => {}
    }
}

/// Keep mails whose counterparty address contains `query`, ignoring case.
///
/// The counterparty is the recipient for mail `account` sent and the
/// sender otherwise.
pub fn filter_by_counterparty(account: &Account, mails: Vec<Mail>, query: &str) -> Vec<Mail> {
    let needle = query.to_lowercase();
    mails
        .into_iter()
        .filter(|mail| account.counterparty(mail).to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(id: u64, from: &str, to: &str) -> Mail {
        Mail::builder(id).from(from).to(to).build()
    }

    #[test]
    fn test_filter_uses_counterparty() {
        let account = Account::new("0xMe");
        let mails = vec![
            mail(1, "0xAliceAAA", "0xme"),
            mail(2, "0xME", "0xBobBBB"),
            mail(3, "0xCarol", "0xMe"),
        ];

        let hits = filter_by_counterparty(&account, mails.clone(), "bob");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.0, 2);

        // Our own address is never the counterparty
        let hits = filter_by_counterparty(&account, mails.clone(), "0xme");
        assert!(hits.is_empty());

        let hits = filter_by_counterparty(&account, mails, "ALICE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.0, 1);
    }
}
