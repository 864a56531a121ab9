//! Text rendering of the view state

use log::debug;
use mail::{Account, ENCRYPTED_PLACEHOLDER, ListContent, ViewState, list_content};
use tokio::sync::watch;

/// Lines describing the mail list and the open conversation
pub fn render(state: &ViewState, account: &Account) -> Vec<String> {
    let mut lines = Vec::new();

    let mut header = format!("[{}] {}", state.active_tab, account.short());
    if state.loading() {
        header.push_str(" (loading)");
    }
    if state.searching {
        header.push_str(&format!(" search={:?}", state.search_text));
    }
    if !state.selected_ids.is_empty() {
        header.push_str(&format!(" selected={}", state.selected_ids.len()));
    }
    lines.push(header);

    if let Some(e) = &state.refresh_error {
        lines.push(format!("  ! refresh failed: {}", e));
    }
    if let Some(e) = &state.search_error {
        lines.push(format!("  ! search failed: {}", e));
    }

    match list_content(state, account) {
        ListContent::NoSearchResults => lines.push("  No search results".to_string()),
        ListContent::Empty => lines.push("  No mail".to_string()),
        ListContent::Rows(rows) => {
            for row in rows {
                let mut flags = String::new();
                flags.push(if row.checked { 'x' } else { ' ' });
                flags.push(if row.starred { '*' } else { ' ' });
                flags.push(if row.dimmed { '.' } else { ' ' });
                let spam = if row.spam_badge { " [spam]" } else { "" };
                lines.push(format!(
                    "  {} #{} {} {}{} {}",
                    flags, row.id, row.time, row.counterpart, spam, row.preview
                ));
            }
        }
    }

    if let Some(active) = &state.active_mail {
        lines.push(format!("  > open #{} ({} in thread)", active.id, state.thread_mails.len()));
        for mail in &state.thread_mails {
            lines.push(format!(
                "    #{} {} {}",
                mail.id,
                account.counterparty(mail),
                ENCRYPTED_PLACEHOLDER
            ));
        }
        if let Some(e) = &state.thread_error {
            lines.push(format!("    ! thread poll failed: {}", e));
        }
    }
    lines
}

/// Print the view whenever its rendering changes; returns when the manager
/// is dropped
pub async fn watch_view(mut rx: watch::Receiver<ViewState>, account: Account) {
    let mut last: Vec<String> = Vec::new();
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        let lines = render(&state, &account);
        if lines == last {
            debug!("View changed without visible effect");
            continue;
        }
        println!("{}", lines.join("\n"));
        last = lines;
    }
}
