//! Mail list query functions for UI consumption

use serde::{Deserialize, Serialize};

use crate::models::{Account, Folder, Mail, MailId, Tab};
use crate::sync::ViewState;

/// Placeholder shown instead of the ciphertext
pub const ENCRYPTED_PLACEHOLDER: &str = "Encrypted message – decrypt to view";

/// Display format for row timestamps
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Everything a list row needs to render one mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRow {
    pub id: MailId,
    /// Upper-cased counterparty address
    pub counterpart: String,
    /// Whether the row's checkbox is ticked
    pub checked: bool,
    /// Already read; rendered muted
    pub dimmed: bool,
    pub starred: bool,
    /// Spam marker, only shown while browsing the inbox
    pub spam_badge: bool,
    pub preview: String,
    pub time: String,
}

impl MailRow {
    pub fn new(mail: &Mail, account: &Account, checked: bool, active_tab: Tab) -> Self {
        Self {
            id: mail.id,
            counterpart: account.counterparty(mail).to_uppercase(),
            checked,
            dimmed: mail.folder == Folder::Read,
            starred: mail.folder == Folder::Starred,
            spam_badge: active_tab == Tab::Inbox && mail.folder == Folder::Spam,
            preview: ENCRYPTED_PLACEHOLDER.to_string(),
            time: mail.sent_at.format(TIME_FORMAT).to_string(),
        }
    }
}

/// What the mail list area should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListContent {
    /// A search is active and matched nothing
    NoSearchResults,
    /// The folder has no mail; takes precedence over search matches
    Empty,
    Rows(Vec<MailRow>),
}

/// Build the list content for the current view state
pub fn list_content(state: &ViewState, account: &Account) -> ListContent {
    if state.searching && state.filtered_mails.is_empty() {
        return ListContent::NoSearchResults;
    }
    if state.mails.is_empty() {
        return ListContent::Empty;
    }
    let rows = state
        .visible_mails()
        .iter()
        .map(|mail| MailRow::new(mail, account, state.is_selected(mail.id), state.active_tab))
        .collect();
    ListContent::Rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn mail(id: u64, from: &str, to: &str, folder: Folder) -> Mail {
        Mail::builder(id)
            .from(from)
            .to(to)
            .folder(folder)
            .sent_at(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 0).unwrap())
            .build()
    }

    #[test]
    fn test_row_flags() {
        let account = Account::new("0xMe");
        let spam = mail(1, "0xSpammer", "0xMe", Folder::Spam);

        let row = MailRow::new(&spam, &account, true, Tab::Inbox);
        assert_eq!(row.counterpart, "0XSPAMMER");
        assert!(row.spam_badge);
        assert!(row.checked);
        assert_eq!(row.time, "2025-03-14 09:26");
        assert_eq!(row.preview, ENCRYPTED_PLACEHOLDER);

        let row = MailRow::new(&spam, &account, false, Tab::Spam);
        assert!(!row.spam_badge);

        let read = mail(2, "0xMe", "0xBob", Folder::Read);
        let row = MailRow::new(&read, &account, false, Tab::Read);
        assert!(row.dimmed);
        assert!(!row.starred);
        assert_eq!(row.counterpart, "0XBOB");
    }

    #[test]
    fn test_list_content_states() {
        let account = Account::new("0xMe");
        let mut state = ViewState::default();
        assert_eq!(list_content(&state, &account), ListContent::Empty);

        state.mails = vec![
            mail(1, "0xAlice", "0xMe", Folder::Inbox),
            mail(2, "0xBob", "0xMe", Folder::Inbox),
        ];
        state.selected_ids.insert(MailId(2));
        match list_content(&state, &account) {
            ListContent::Rows(rows) => {
                assert_eq!(rows.len(), 2);
                assert!(!rows[0].checked);
                assert!(rows[1].checked);
            }
            other => panic!("unexpected {:?}", other),
        }

        state.searching = true;
        assert_eq!(list_content(&state, &account), ListContent::NoSearchResults);

        state.filtered_mails = vec![state.mails[1].clone()];
        match list_content(&state, &account) {
            ListContent::Rows(rows) => assert_eq!(rows[0].id, MailId(2)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_folder_wins_over_search_matches() {
        let account = Account::new("0xMe");
        let mut state = ViewState::default();
        state.searching = true;
        state.filtered_mails = vec![mail(1, "0xAlice", "0xMe", Folder::Inbox)];
        assert_eq!(list_content(&state, &account), ListContent::Empty);

        state.filtered_mails.clear();
        assert_eq!(list_content(&state, &account), ListContent::NoSearchResults);
    }
}
