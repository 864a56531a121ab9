//! Integration tests for the mail crate
//!
//! These tests drive the sync manager against the in-memory backend, from
//! the first fetch through to render-ready rows.

use mail::{
    Account, EncryptedBody, Folder, InMemoryBackend, ListContent, MailBackend, MailError, MailId,
    MailSyncManager, OutgoingMail, SyncTiming, Tab, ThreadId, list_content,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

const ME: &str = "0xMe";

fn seeded_backend() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::new(Account::new(ME)));
    backend.deliver("0xAlice", None);
    backend.deliver("0xBob", None);
    backend
}

fn manager(backend: &Arc<InMemoryBackend>) -> MailSyncManager {
    MailSyncManager::new(backend.clone(), Account::new(ME), SyncTiming::default())
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn rows(content: ListContent) -> Vec<mail::MailRow> {
    match content {
        ListContent::Rows(rows) => rows,
        other => panic!("expected rows, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_selection_cleared_when_switching_to_sent() {
    let backend = seeded_backend();
    let sent_id = assert_ok!(
        backend
            .send_mail(OutgoingMail::new("0xCarol", EncryptedBody::new(b"hi".to_vec())))
            .await
    );
    let manager = manager(&backend);
    manager.start();
    settle().await;

    let state = manager.state();
    assert_eq!(state.mail_ids(), vec![MailId(1), MailId(2)]);

    manager.toggle_selection(MailId(2));
    assert!(manager.state().is_selected(MailId(2)));
    assert!(manager.state().selecting);

    manager.set_active_tab(Tab::Sent);
    assert!(manager.state().selected_ids.is_empty());

    settle().await;
    let state = manager.state();
    assert_eq!(state.active_tab, Tab::Sent);
    assert_eq!(state.mail_ids(), vec![sent_id]);

    let rows = rows(list_content(&state, manager.account()));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].counterpart, "0XCAROL");
    assert!(!rows[0].checked);
}

#[tokio::test(start_paused = true)]
async fn test_new_mail_appears_on_next_tick() {
    let backend = seeded_backend();
    let manager = manager(&backend);
    manager.start();
    settle().await;
    assert_eq!(manager.state().mails.len(), 2);

    backend.deliver("0xDave", None);
    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(manager.state().mails.len(), 2);

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    let state = manager.state();
    assert_eq!(state.mails.len(), 3);
    assert_eq!(state.mails_version, 2);
}

#[tokio::test(start_paused = true)]
async fn test_move_selected_to_archive() {
    let backend = seeded_backend();
    let manager = manager(&backend);
    manager.start();
    settle().await;

    manager.set_selected_ids([MailId(1)]);
    manager.set_bulk_action(Some(Folder::Archive));
    let moved = assert_ok!(manager.move_selected(Folder::Archive).await);
    assert_eq!(moved, 1);

    let state = manager.state();
    assert!(state.selected_ids.is_empty());
    assert!(!state.selecting);
    assert!(state.bulk_action.is_none());

    settle().await;
    assert_eq!(manager.state().mail_ids(), vec![MailId(2)]);

    let archive = assert_ok!(manager.refresh_by_tab(Tab::Archive).await);
    assert_eq!(archive.len(), 1);
    assert_eq!(archive[0].id, MailId(1));
}

#[tokio::test(start_paused = true)]
async fn test_move_nothing_selected_is_noop() {
    let backend = seeded_backend();
    let manager = manager(&backend);
    manager.start();
    settle().await;

    assert_eq!(assert_ok!(manager.move_selected(Folder::Trash).await), 0);
    assert_eq!(backend.len(), 2);
    assert!(assert_ok!(manager.refresh_by_tab(Tab::Trash).await).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_move_unknown_mail_fails() {
    let backend = seeded_backend();
    let manager = manager(&backend);

    manager.set_selected_ids([MailId(1), MailId(99)]);
    let err = manager.move_selected(Folder::Spam).await.unwrap_err();
    assert!(matches!(err, MailError::NotFound { .. }));
    assert_eq!(manager.state().selected_ids.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reply_clears_mode_and_extends_thread() {
    let backend = seeded_backend();
    let manager = manager(&backend);
    manager.start();
    settle().await;

    let parent = manager.state().mails[0].clone();
    manager.set_active_mail(Some(parent.clone()));
    settle().await;
    assert_eq!(manager.state().thread_mails.len(), 1);

    manager.set_replying(true);
    let reply_id = assert_ok!(
        manager
            .reply(parent.id, OutgoingMail::new("", EncryptedBody::new(b"re".to_vec())))
            .await
    );
    assert!(!manager.state().replying);

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    let thread_ids: Vec<MailId> = manager.state().thread_mails.iter().map(|m| m.id).collect();
    assert_eq!(thread_ids, vec![parent.id, reply_id]);

    let sent = assert_ok!(manager.refresh_by_tab(Tab::Sent).await);
    assert_eq!(sent[0].to, "0xAlice");
}

#[tokio::test(start_paused = true)]
async fn test_send_and_forward_reset_editor_modes() {
    let backend = seeded_backend();
    let manager = manager(&backend);

    manager.set_composing(true);
    let err = manager
        .send_mail(OutgoingMail::new(" ", EncryptedBody::new(b"x".to_vec())))
        .await
        .unwrap_err();
    assert!(matches!(err, MailError::InvalidInput { .. }));
    assert!(manager.state().composing);

    assert_ok!(
        manager
            .send_mail(OutgoingMail::new("0xBob", EncryptedBody::new(b"x".to_vec())))
            .await
    );
    assert!(!manager.state().composing);

    manager.set_forwarding(true);
    assert_ok!(
        manager
            .forward(MailId(1), OutgoingMail::new("0xEve", EncryptedBody::default()))
            .await
    );
    assert!(!manager.state().forwarding);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_by_index_tolerates_unknown_index() {
    let backend = seeded_backend();
    let manager = manager(&backend);

    let inbox = assert_ok!(manager.refresh_by_index(Tab::Inbox.index()).await);
    assert_eq!(inbox.len(), 2);

    let nothing = assert_ok!(manager.refresh_by_index(42).await);
    assert!(nothing.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_search_in_inbox_renders_rows() {
    let backend = seeded_backend();
    let manager = manager(&backend);
    manager.start();
    settle().await;

    manager.set_search_text("bob");
    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = manager.state();
    let rows = rows(list_content(&state, manager.account()));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].counterpart, "0XBOB");

    manager.set_search_text("nobody");
    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = manager.state();
    assert_eq!(
        list_content(&state, manager.account()),
        ListContent::NoSearchResults
    );
}

#[tokio::test(start_paused = true)]
async fn test_outage_recovers() {
    let backend = seeded_backend();
    backend.fail_next(1);
    let manager = manager(&backend);
    manager.start();
    settle().await;
    assert!(manager.state().refresh_error.is_some());
    assert_eq!(
        list_content(&manager.state(), manager.account()),
        ListContent::Empty
    );

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    let state = manager.state();
    assert!(state.refresh_error.is_none());
    assert_eq!(state.mails.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deleted_thread_stops_following() {
    let backend = seeded_backend();
    let thread = ThreadId::new("solo");
    let id = backend.deliver("0xZed", Some(thread.clone()));
    let manager = manager(&backend);
    manager.start();
    settle().await;

    let opened = manager
        .state()
        .mails
        .into_iter()
        .find(|m| m.id == id)
        .unwrap();
    manager.set_active_mail(Some(opened));
    settle().await;
    assert_eq!(manager.state().thread_mails.len(), 1);

    backend.remove(id);
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    // Last known snapshot is kept once the loop stops
    assert_eq!(manager.state().thread_mails.len(), 1);
}
