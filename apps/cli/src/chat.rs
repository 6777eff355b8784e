//! Interactive class chat on the terminal.

use anyhow::Context;
use campus_auth::Credential;
use campus_chats::{ChatEvent, ChatMessage, OutgoingMessage, RoomId};
use campus_runtime::ClientServices;
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

pub async fn run(
    services: &ClientServices,
    credential: Credential,
    class_id: i64,
) -> anyhow::Result<()> {
    let me = credential.user.id;
    let session = services.chat_session();

    let _connected =
        session.on_connect(|| println!("-- connected, type a message and press enter"));
    let _messages = session.on_message(move |message| println!("{}", render(message, me)));
    let _errors = session.on_error(|fault| eprintln!("-- {fault}"));
    let mut events = session.subscribe();

    println!("-- joining class {class_id}");
    session.connect(RoomId(class_id), &credential.token);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = campus_runtime::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Ok(ChatEvent::Fault(fault)) if fault.is_transport() => break,
                Ok(ChatEvent::Disconnected { .. }) => {
                    println!("-- disconnected");
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "chat event stream lagged"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match OutgoingMessage::new(&line) {
                    Ok(message) => {
                        if !session.send(message.as_str()) {
                            eprintln!("-- not connected, message not sent");
                        }
                    }
                    Err(error) => eprintln!("-- {error}"),
                }
            }
        }
    }

    session.disconnect();
    info!(class_id, "left chat");
    Ok(())
}

/// `[HH:MM:SS] name: text`, with the local user's own messages marked
fn render(message: &ChatMessage, me: i64) -> String {
    let time = message
        .created_at_utc()
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| message.created_at.clone());
    let name = if message.is_from(me) {
        format!("{} (you)", message.user.full_name)
    } else {
        message.user.full_name.clone()
    };
    format!("[{time}] {name}: {}", message.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_chats::{MessageAuthor, MessageId};

    fn message(user_id: i64, created_at: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(1),
            user: MessageAuthor {
                id: user_id,
                full_name: "Ada Obi".into(),
            },
            content: "bonjour".into(),
            created_at: created_at.into(),
        }
    }

    #[test]
    fn test_own_messages_are_marked() {
        let line = render(&message(7, "not a timestamp"), 7);
        assert_eq!(line, "[not a timestamp] Ada Obi (you): bonjour");
    }

    #[test]
    fn test_others_are_not_marked() {
        let line = render(&message(8, "2026-03-01T09:30:00Z"), 7);
        assert!(line.ends_with("] Ada Obi: bonjour"));
        // HH:MM:SS in local time
        assert_eq!(line.find(']'), Some(9));
    }
}
