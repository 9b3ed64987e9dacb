//! Integration tests for the conversation state machine
//!
//! Every test drives a real SQLite ledger in a temporary directory.

use postledger_dialog::{text, ButtonToken, Command, Conversation, Event, Keyboard, Outbound};
use postledger_domain::{LedgerStore, Mode, Status, UserId};
use postledger_store::{export, SqliteLedger};
use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::TempDir;

const LINK: &str = "https://t.me/news/123";

/// Helper to create a conversation over an empty data directory
fn create_conversation() -> (TempDir, Arc<Conversation>) {
    let dir = tempfile::tempdir().unwrap();
    let ledger = SqliteLedger::new(dir.path()).unwrap();
    (dir, Arc::new(Conversation::new(Arc::new(ledger))))
}

fn message(user: u64, text: &str) -> Event {
    Event::TextOrCaptionMessage {
        user: UserId(user),
        text: text.to_string(),
    }
}

fn press(user: u64, token: ButtonToken) -> Event {
    Event::ButtonPress {
        user: UserId(user),
        token: token.to_string(),
    }
}

fn command(user: u64, command: Command) -> Event {
    Event::Command {
        user: UserId(user),
        command,
    }
}

#[tokio::test]
async fn test_new_link_happy_path() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    let reply = conversation.handle(message(1, LINK)).await;
    assert!(matches!(reply, Outbound::SendText { .. }));
    assert_eq!(reply.body(), Some(text::post_received(LINK).as_str()));
    assert_eq!(reply.buttons(), Some(&Keyboard::status_choices()));

    let session = conversation.session(user).await;
    assert_eq!(session.mode, Mode::AwaitingStatusNew);
    assert_eq!(session.active_link.as_deref(), Some(LINK));

    let reply = conversation
        .handle(press(1, ButtonToken::Status(Status::WithinHour)))
        .await;
    assert!(matches!(reply, Outbound::SendText { .. }), "Confirmations are new messages");
    assert_eq!(
        reply.body(),
        Some(text::post_added(1, LINK, Status::WithinHour).as_str())
    );
    assert_eq!(reply.buttons(), Some(&Keyboard::after_add()));
    assert!(conversation.session(user).await.is_idle());

    let stats = conversation.ledger().aggregate(user).unwrap();
    assert_eq!(stats.total_count, 1);
    assert_eq!(stats.count_for(Status::WithinHour), 1);
    assert_eq!(stats.status_histogram.len(), 1);
    assert_eq!(stats.total_citation_count, 0);
    assert_eq!(conversation.ledger().find(user, LINK).unwrap().unwrap().number, 1);
}

#[tokio::test]
async fn test_duplicate_link_opens_edit_flow() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation
        .handle(press(1, ButtonToken::Status(Status::WithinHour)))
        .await;

    let reply = conversation
        .handle(message(1, &format!("Look at this {} again", LINK)))
        .await;

    let body = reply.body().unwrap();
    assert!(body.contains("Post #1"));
    assert!(body.contains(Status::WithinHour.label()));
    assert!(body.contains("No citations yet"));
    assert_eq!(reply.buttons(), Some(&Keyboard::edit_choices()));

    let session = conversation.session(user).await;
    assert_eq!(session.mode, Mode::Idle);
    assert_eq!(session.active_link.as_deref(), Some(LINK));
    assert_eq!(conversation.ledger().list_all(user).unwrap().len(), 1);
}

#[tokio::test]
async fn test_change_status_of_known_link() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;
    conversation.handle(message(1, LINK)).await;

    let reply = conversation.handle(press(1, ButtonToken::EditStatus)).await;
    assert!(matches!(reply, Outbound::EditLastMessage { .. }), "Prompts edit the button message");
    assert_eq!(reply.body(), Some(text::PICK_NEW_STATUS));
    assert_eq!(conversation.session(user).await.mode, Mode::AwaitingStatusEdit);

    let reply = conversation
        .handle(press(1, ButtonToken::Status(Status::AfterThreeHours)))
        .await;
    assert_eq!(
        reply.body(),
        Some(text::status_updated(Status::AfterThreeHours).as_str())
    );
    assert!(conversation.session(user).await.is_idle());

    let record = conversation.ledger().find(user, LINK).unwrap().unwrap();
    assert_eq!(record.status, Status::AfterThreeHours);
    assert_eq!(record.number, 1);
}

#[tokio::test]
async fn test_citation_accumulation() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;

    for channel in ["ChannelA", "ChannelB"] {
        conversation.handle(message(1, LINK)).await;
        let prompt = conversation.handle(press(1, ButtonToken::AddCitation)).await;
        assert_eq!(prompt.body(), Some(text::ASK_CITATION));
        assert_eq!(conversation.session(user).await.mode, Mode::AwaitingCitationText);

        let reply = conversation.handle(message(1, channel)).await;
        assert_eq!(reply.body(), Some(text::citation_added(channel).as_str()));
        assert!(conversation.session(user).await.is_idle());
    }

    let record = conversation.ledger().find(user, LINK).unwrap().unwrap();
    assert_eq!(record.citations, vec!["ChannelA", "ChannelB"]);
}

#[tokio::test]
async fn test_blank_citation_rejected() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;
    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::AddCitation)).await;

    let reply = conversation.handle(message(1, "   ")).await;
    assert_eq!(reply.body(), Some(text::EMPTY_CITATION));

    let session = conversation.session(user).await;
    assert_eq!(session.mode, Mode::AwaitingCitationText);
    assert_eq!(session.active_link.as_deref(), Some(LINK));
    assert!(conversation.ledger().find(user, LINK).unwrap().unwrap().citations.is_empty());

    // The retry is accepted
    conversation.handle(message(1, "ChannelA")).await;
    let record = conversation.ledger().find(user, LINK).unwrap().unwrap();
    assert_eq!(record.citations, vec!["ChannelA"]);
}

#[tokio::test]
async fn test_citation_text_containing_link_is_a_citation() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;
    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::AddCitation)).await;

    conversation.handle(message(1, "https://t.me/quoting_channel")).await;

    let records = conversation.ledger().list_all(user).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].citations, vec!["https://t.me/quoting_channel"]);
}

#[tokio::test]
async fn test_stale_button_without_link() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    let reply = conversation.handle(press(1, ButtonToken::EditStatus)).await;
    assert_eq!(reply, Outbound::EditLastMessage {
        user,
        text: text::LINK_NOT_FOUND.to_string(),
        buttons: None,
    });
    assert!(conversation.session(user).await.is_idle());

    let reply = conversation
        .handle(press(1, ButtonToken::Status(Status::First)))
        .await;
    assert_eq!(reply.body(), Some(text::LINK_NOT_FOUND));
    assert!(!conversation.ledger().has_ledger(user));
}

#[tokio::test]
async fn test_status_button_after_summary_is_stale() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;
    conversation.handle(message(1, LINK)).await;

    // An old status keyboard pressed while the edit buttons are showing
    let reply = conversation
        .handle(press(1, ButtonToken::Status(Status::WithinHour)))
        .await;

    assert_eq!(reply.body(), Some(text::LINK_NOT_FOUND));
    assert!(conversation.session(user).await.is_idle());
    let record = conversation.ledger().find(user, LINK).unwrap().unwrap();
    assert_eq!(record.status, Status::First);
}

#[tokio::test]
async fn test_new_link_replaces_pending_one() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, "https://t.me/news/1")).await;
    conversation.handle(message(1, "https://t.me/news/2")).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;

    let records = conversation.ledger().list_all(user).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].link, "https://t.me/news/2");
}

#[tokio::test]
async fn test_message_without_link() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    let reply = conversation.handle(message(1, "no link here")).await;

    assert_eq!(reply.body(), Some(text::NO_LINK_FOUND));
    let session = conversation.session(user).await;
    assert_eq!(session.mode, Mode::AwaitingStatusNew, "No-link messages leave the session alone");

    let reply = conversation.handle(message(1, "")).await;
    assert_eq!(reply.body(), Some(text::NO_LINK_FOUND));
}

#[tokio::test]
async fn test_commands() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(5);

    let reply = conversation.handle(command(5, Command::Stats)).await;
    assert_eq!(reply.body(), Some(text::STATS_EMPTY));
    let reply = conversation.handle(command(5, Command::Export)).await;
    assert_eq!(reply, Outbound::SendText {
        user,
        text: text::LEDGER_EMPTY.to_string(),
        buttons: None,
    });

    let reply = conversation
        .handle(command(5, Command::Start { first_name: "Ann".to_string() }))
        .await;
    assert_eq!(reply.body(), Some(text::greeting("Ann").as_str()));
    assert!(conversation.ledger().has_ledger(user));

    conversation.handle(message(5, LINK)).await;
    conversation.handle(press(5, ButtonToken::Status(Status::WithinHour))).await;

    let reply = conversation.handle(command(5, Command::Stats)).await;
    assert!(reply.body().unwrap().contains("Total posts: 1"));

    match conversation.handle(command(5, Command::Export)).await {
        Outbound::SendFile { user: to, bytes, filename } => {
            assert_eq!(to, user);
            assert!(filename.starts_with("my_posts_") && filename.ends_with(".csv"));
            let records = export::parse_table(&bytes).unwrap();
            assert_eq!(records, conversation.ledger().list_all(user).unwrap());
        }
        other => panic!("Expected a file, got {:?}", other),
    }
}

#[tokio::test]
async fn test_export_button_keeps_session() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;
    conversation.handle(message(1, LINK)).await;

    let reply = conversation.handle(press(1, ButtonToken::ExportDb)).await;
    assert!(matches!(reply, Outbound::SendFile { .. }));
    assert_eq!(conversation.session(user).await.active_link.as_deref(), Some(LINK));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_events_for_one_user_never_interleave() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let conversation = Arc::clone(&conversation);
            tokio::spawn(async move {
                conversation
                    .handle(message(1, &format!("https://t.me/chan/{}", i)))
                    .await;
                conversation
                    .handle(press(1, ButtonToken::Status(Status::First)))
                    .await
            })
        })
        .collect();

    let mut added = 0;
    for task in tasks {
        let reply = task.await.unwrap();
        if reply.body().is_some_and(|b| b.contains("added to your ledger")) {
            added += 1;
        }
    }

    let records = conversation.ledger().list_all(user).unwrap();
    assert!(added >= 1);
    assert_eq!(records.len(), added);

    let numbers: Vec<u32> = records.iter().map(|r| r.number).collect();
    let expected: Vec<u32> = (1..=added as u32).collect();
    assert_eq!(numbers, expected);

    let links: BTreeSet<_> = records.iter().map(|r| r.link.clone()).collect();
    assert_eq!(links.len(), records.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_users_are_isolated() {
    let (_dir, conversation) = create_conversation();

    let tasks: Vec<_> = [1u64, 2]
        .into_iter()
        .map(|user| {
            let conversation = Arc::clone(&conversation);
            tokio::spawn(async move {
                conversation.handle(message(user, LINK)).await;
                conversation
                    .handle(press(user, ButtonToken::Status(Status::WithinHour)))
                    .await
            })
        })
        .collect();

    for task in tasks {
        let reply = task.await.unwrap();
        assert_eq!(
            reply.body(),
            Some(text::post_added(1, LINK, Status::WithinHour).as_str())
        );
    }

    for user in [UserId(1), UserId(2)] {
        let records = conversation.ledger().list_all(user).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, 1);
    }
}

#[tokio::test]
async fn test_vanished_record_resets_session() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;
    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::AddCitation)).await;
    assert_eq!(conversation.session(user).await.mode, Mode::AwaitingCitationText);

    std::fs::remove_file(conversation.ledger().ledger_path(user)).unwrap();

    let reply = conversation.handle(message(1, "ChannelA")).await;
    assert_eq!(reply.body(), Some(text::GENERIC_FAILURE));

    let session = conversation.session(user).await;
    assert!(session.is_idle());
    assert_eq!(session.active_link, None);
}

#[tokio::test]
async fn test_storage_failure_resets_session() {
    let (_dir, conversation) = create_conversation();
    let user = UserId(1);

    conversation.handle(message(1, LINK)).await;
    conversation.handle(press(1, ButtonToken::Status(Status::First))).await;

    std::fs::write(conversation.ledger().ledger_path(user), vec![0xAB_u8; 4096]).unwrap();

    let reply = conversation.handle(message(1, "https://t.me/news/456")).await;
    assert_eq!(reply.body(), Some(text::GENERIC_FAILURE));

    let session = conversation.session(user).await;
    assert!(session.is_idle());
    assert_eq!(session.active_link, None);
}
