//! Periodic refresh loop for the active folder

use log::{debug, warn};
use std::sync::Arc;

use super::manager::Shared;
use crate::error::MailResult;
use crate::models::{Mail, Tab};

/// Start a new activation for the active folder, superseding any running one
pub(super) fn activate(shared: &Arc<Shared>) {
    let mut tasks = shared.tasks();
    let mut generation = 0;
    let mut tab = Tab::Inbox;
    shared.update(|s| {
        generation = shared.refresh_gen.advance();
        tab = s.active_tab;
        s.refreshing = true;
    });

    debug!("Refresh loop #{} started for {}", generation, tab);
    tasks.refresh = Some(tokio::spawn(run(shared.clone(), tab, generation)));
}

async fn run(shared: Arc<Shared>, tab: Tab, generation: u64) {
    let result = shared.dispatch.fetch(tab).await;
    if !apply(&shared, tab, generation, result, true) {
        return;
    }

    loop {
        tokio::time::sleep(shared.timing.refresh_interval).await;
        if !shared.refresh_gen.is_current(generation) {
            break;
        }

        let result = shared.dispatch.fetch(tab).await;
        if !apply(&shared, tab, generation, result, false) {
            break;
        }
    }
    debug!("Refresh loop #{} for {} ended", generation, tab);
}

/// Apply one fetch result. Returns false once the activation is stale.
fn apply(
    shared: &Shared,
    tab: Tab,
    generation: u64,
    result: MailResult<Vec<Mail>>,
    initial: bool,
) -> bool {
    let mut current = true;
    match result {
        Ok(mails) => {
            let count = mails.len();
            let mut replaced = false;
            shared.update_if(|s| {
                if !shared.refresh_gen.is_current(generation) {
                    current = false;
                    return false;
                }
                replaced = s.replace_mails(mails);
                let mut changed = replaced;
                if initial && s.refreshing {
                    s.refreshing = false;
                    changed = true;
                }
                if s.refresh_error.take().is_some() {
                    changed = true;
                }
                changed
            });
            if current && !replaced {
                debug!("{} unchanged ({} mails)", tab, count);
            }
        }
        Err(e) => {
            shared.update_if(|s| {
                if !shared.refresh_gen.is_current(generation) {
                    current = false;
                    return false;
                }
                if initial {
                    s.refreshing = false;
                }
                s.refresh_error = Some(e.clone());
                true
            });
            if current {
                warn!("Failed to refresh {}, retrying next tick: {}", tab, e);
            }
        }
    }
    if !current {
        debug!("Dropped stale {} result from refresh loop #{}", tab, generation);
    }
    current
}
