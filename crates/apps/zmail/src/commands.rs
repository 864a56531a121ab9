//! Line commands accepted on stdin

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use mail::{
    EncryptedBody, Folder, InMemoryBackend, Mail, MailId, MailSyncManager, OutgoingMail, Tab,
    list_content,
};

pub const HELP: &str = "\
commands:
  tab <name|index>          switch folder
  search [text]             filter by counterparty; empty text clears
  open <id> | close         open a mail and follow its thread
  select <id> | clear       toggle a mail in the selection
  move <folder>             move the selection
  send <to> <text>          compose a new mail
  reply <id> [text]         reply to a mail
  forward <id> <to>         forward a mail
  deliver <from>            simulate an incoming mail
  refresh                   poll the active folder now
  dump                      print the list as JSON
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(Tab),
    Search(String),
    Open(MailId),
    Close,
    Select(MailId),
    ClearSelection,
    Move(Folder),
    Send { to: String, text: String },
    Reply { parent: MailId, text: String },
    Forward { original: MailId, to: String },
    Deliver { from: String },
    Refresh,
    Dump,
    Help,
    Quit,
}

/// Parse one input line
pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "tab" => Command::Tab(Tab::parse(rest).ok_or_else(|| anyhow!("unknown tab {:?}", rest))?),
        "search" => Command::Search(rest.to_string()),
        "open" => Command::Open(parse_id(rest)?),
        "close" => Command::Close,
        "select" => Command::Select(parse_id(rest)?),
        "clear" => Command::ClearSelection,
        "move" => Command::Move(
            Folder::parse(rest).ok_or_else(|| anyhow!("unknown folder {:?}", rest))?,
        ),
        "send" => {
            let (to, text) = split_arg(rest);
            if to.is_empty() {
                bail!("usage: send <to> <text>");
            }
            Command::Send {
                to: to.to_string(),
                text: text.to_string(),
            }
        }
        "reply" => {
            let (id, text) = split_arg(rest);
            Command::Reply {
                parent: parse_id(id)?,
                text: text.to_string(),
            }
        }
        "forward" => {
            let (id, to) = split_arg(rest);
            Command::Forward {
                original: parse_id(id)?,
                to: to.to_string(),
            }
        }
        "deliver" => {
            if rest.is_empty() {
                bail!("usage: deliver <from>");
            }
            Command::Deliver {
                from: rest.to_string(),
            }
        }
        "refresh" => Command::Refresh,
        "dump" => Command::Dump,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command {:?}, try `help`", other),
    };
    Ok(command)
}

fn split_arg(rest: &str) -> (&str, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (rest, ""),
    }
}

fn parse_id(s: &str) -> Result<MailId> {
    let id: u64 = s
        .trim()
        .parse()
        .with_context(|| format!("expected a mail id, got {:?}", s))?;
    Ok(MailId(id))
}

/// Find a mail among everything the manager currently knows about
fn find_mail(manager: &MailSyncManager, id: MailId) -> Result<Mail> {
    let state = manager.state();
    state
        .mails
        .iter()
        .chain(state.filtered_mails.iter())
        .chain(state.thread_mails.iter())
        .find(|m| m.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("mail {} is not in the current view", id))
}

/// Demo driver does no encryption; the text bytes stand in for ciphertext
fn body(text: &str) -> EncryptedBody {
    EncryptedBody::new(text.as_bytes().to_vec())
}

pub async fn execute(
    manager: &MailSyncManager,
    backend: &InMemoryBackend,
    command: Command,
) -> Result<()> {
    match command {
        Command::Tab(tab) => manager.set_active_tab(tab),
        Command::Search(text) => manager.set_search_text(text),
        Command::Open(id) => manager.set_active_mail(Some(find_mail(manager, id)?)),
        Command::Close => manager.set_active_mail(None),
        Command::Select(id) => manager.toggle_selection(id),
        Command::ClearSelection => manager.clear_selection(),
        Command::Move(target) => {
            manager.set_bulk_action(Some(target));
            let moved = manager.move_selected(target).await?;
            if moved == 0 {
                manager.set_bulk_action(None);
            }
            println!("moved {} mails to {}", moved, target.label());
        }
        Command::Send { to, text } => {
            manager.set_composing(true);
            let id = manager.send_mail(OutgoingMail::new(to, body(&text))).await?;
            println!("sent {}", id);
        }
        Command::Reply { parent, text } => {
            manager.set_replying(true);
            let id = manager.reply(parent, OutgoingMail::new("", body(&text))).await?;
            println!("replied with {}", id);
        }
        Command::Forward { original, to } => {
            manager.set_forwarding(true);
            let id = manager
                .forward(original, OutgoingMail::new(to, EncryptedBody::default()))
                .await?;
            println!("forwarded as {}", id);
        }
        Command::Deliver { from } => {
            let id = backend.deliver(from, None);
            info!("Delivered {} to the inbox", id);
        }
        Command::Refresh => manager.refresh_now(),
        Command::Dump => {
            let content = list_content(&manager.state(), manager.account());
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!(parse("tab sent").unwrap(), Command::Tab(Tab::Sent));
        assert_eq!(parse("TAB 6").unwrap(), Command::Tab(Tab::Trash));
        assert_eq!(parse("open 12").unwrap(), Command::Open(MailId(12)));
        assert_eq!(parse("search").unwrap(), Command::Search(String::new()));
        assert_eq!(
            parse("search  0xab ").unwrap(),
            Command::Search("0xab".to_string())
        );
        assert!(parse("tab nowhere").is_err());
        assert!(parse("open x").is_err());
    }

    #[test]
    fn test_parse_mutations() {
        assert_eq!(
            parse("send 0xBob hello there").unwrap(),
            Command::Send {
                to: "0xBob".to_string(),
                text: "hello there".to_string(),
            }
        );
        assert_eq!(
            parse("reply 3").unwrap(),
            Command::Reply {
                parent: MailId(3),
                text: String::new(),
            }
        );
        assert_eq!(parse("move archive").unwrap(), Command::Move(Folder::Archive));
        assert!(parse("send").is_err());
        assert!(parse("deliver").is_err());
        assert!(parse("frobnicate").is_err());
    }

    #[test]
    fn test_quit_aliases() {
        for line in ["quit", "exit", "q"] {
            assert_eq!(parse(line).unwrap(), Command::Quit);
        }
    }
}
