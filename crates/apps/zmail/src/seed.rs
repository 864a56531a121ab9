//! Demo mailbox contents

use chrono::{Duration, Utc};
use mail::{EncryptedBody, Folder, InMemoryBackend, Mail, ThreadId};

/// Address used when no account is configured
pub const DEMO_ACCOUNT: &str = "0x9f3cA1b2C4d5E6f708192A3b4C5d6E7F8091a2B3";

const CORRESPONDENTS: [&str; 4] = [
    "0x51aE7b93c0D4e1F2a3B4c5D6e7F8091A2b3C4d5E",
    "0xB0b5c9d8E7f6A5b4C3d2E1f0A9b8C7d6E5f4A3b2",
    "0xC4r01eD00d5e2F1a0B9c8D7e6F5a4B3c2D1e0F9a",
    "0xDeadBeefCafe0000111122223333444455556666",
];

/// Fill `backend` with a small mailbox spread over every folder
pub fn populate(backend: &InMemoryBackend) {
    let me = backend.account().address.clone();
    let now = Utc::now();
    let folders = [
        Folder::Inbox,
        Folder::Inbox,
        Folder::Starred,
        Folder::Read,
        Folder::Spam,
        Folder::Archive,
        Folder::Trash,
    ];

    for (i, folder) in folders.into_iter().enumerate() {
        let peer = CORRESPONDENTS[i % CORRESPONDENTS.len()];
        let id = i as u64 + 1;
        let mail = Mail::builder(id)
            .from(peer)
            .to(me.clone())
            .thread_id(ThreadId::new(format!("demo-{}", i % 3)))
            .folder(folder)
            .sent_at(now - Duration::minutes(90 - 10 * i as i64))
            .body(EncryptedBody::new(format!("ciphertext #{}", id).into_bytes()))
            .build();
        backend.insert(mail);
    }

    let sent = Mail::builder(folders.len() as u64 + 1)
        .from(me)
        .to(CORRESPONDENTS[0])
        .thread_id(ThreadId::new("demo-0"))
        .folder(Folder::Sent)
        .sent_at(now - Duration::minutes(5))
        .body(EncryptedBody::new(b"ciphertext reply".to_vec()))
        .build();
    backend.insert(sent);
}
