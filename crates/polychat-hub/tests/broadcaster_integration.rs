//! Integration tests for the Broadcaster Actor.
//!
//! These tests verify the hub works correctly as a complete system,
//! testing the spawn_broadcaster() function and BroadcasterHandle interface.
//!
//! Tests CAN use `.unwrap()` and `.expect()`.

use std::sync::Arc;
use std::time::Duration;

use polychat_core::{MemorySink, Notification, NotificationKind, NullSink, Participant};
use polychat_hub::{
    spawn_broadcaster, HubConfig, HubError, HubEvent, PublishOutcome, SendMessage,
};
use tokio::time::timeout;

// ============================================================================
// Test Helpers
// ============================================================================

/// Helper to create a British participant with a captured sink.
fn british(name: &str) -> (Arc<Participant>, MemorySink) {
    let sink = MemorySink::new();
    (Participant::british(name, sink.clone()), sink)
}

/// Helper to count log entries for a given kind code.
fn count_kind(log: &[String], kind: NotificationKind) -> usize {
    let suffix = format!("Type: {}", kind.code());
    log.iter().filter(|line| line.ends_with(&suffix)).count()
}

// ============================================================================
// Reference Scenario
// ============================================================================

#[tokio::test]
async fn test_join_message_join_scenario() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, ana_sink) = british("Ana");
    let ben = Participant::mexican("Ben", MemorySink::new());

    hub.register(ana.clone()).await.expect("ana registers");
    hub.send_message(&ana, "hi").await.expect("ana sends");
    hub.register(ben.clone()).await.expect("ben registers");

    assert_eq!(
        ana.history(),
        vec![
            "You have joined the chat.",
            "You said: hi",
            "Ben has joined the chat.",
        ]
    );
    assert_eq!(ana_sink.lines(), ana.history());

    // Ben was not a member for Ana's events, so he only sees his own arrival
    assert_eq!(ben.history(), vec!["Tú le caiste al chat."]);

    let log = hub.get_log().await.unwrap();
    assert_eq!(log.len(), 3);
    assert!(log[0].ends_with("Origin: Ana  Message: Ana joined  Type: 1"));
    assert!(log[1].ends_with("Origin: Ana  Message: hi  Type: 0"));
    assert!(log[2].ends_with("Origin: Ben  Message: Ben joined  Type: 1"));
}

#[tokio::test]
async fn test_full_conversation() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let juan = Participant::mexican("Juan", MemorySink::new());
    let raul = Participant::spanish("Raul", MemorySink::new());
    let john = Participant::british("John", MemorySink::new());

    for p in [&juan, &raul, &john] {
        hub.register(p.clone()).await.unwrap();
    }
    hub.send_message(&juan, "Hola, raza.").await.unwrap();
    hub.send_message(&raul, "Hola, tíos.").await.unwrap();
    hub.send_message(&john, "Heyy, guys.").await.unwrap();
    for p in [&juan, &raul, &john] {
        assert!(hub.unregister(p).await.unwrap());
    }

    assert_eq!(
        juan.history(),
        vec![
            "Tú le caiste al chat.",
            "Raul le cayó al chat.",
            "John le cayó al chat.",
            "Tú dijiste: Hola, raza.",
            "Raul dijo: Hola, tíos.",
            "John dijo: Heyy, guys.",
            "Juan te pelaste del chat, mijo.",
        ]
    );
    assert_eq!(
        raul.history(),
        vec![
            "Vos vos habéis unido al chat.",
            "John ha arrivado al chat.",
            "Juan ha dicho: Hola, raza.",
            "Vos habéis dicho: Hola, tíos.",
            "John ha dicho: Heyy, guys.",
            "Juan ha abandonado el chat.",
            "Raul habéis abandonado el chat, tio.",
        ]
    );
    assert_eq!(
        john.history(),
        vec![
            "You have joined the chat.",
            "Juan said: Hola, raza.",
            "Raul said: Hola, tíos.",
            "You said: Heyy, guys.",
            "Juan has left the chat.",
            "Raul has left the chat.",
            "John you have left the chat.",
        ]
    );

    let log = hub.get_log().await.unwrap();
    assert_eq!(log.len(), 9);
    assert_eq!(count_kind(&log, NotificationKind::UserJoined), 3);
    assert_eq!(count_kind(&log, NotificationKind::NewMessage), 3);
    assert_eq!(count_kind(&log, NotificationKind::UserLeft), 3);
}

// ============================================================================
// Membership Tests
// ============================================================================

#[tokio::test]
async fn test_is_registered_tracks_latest_state() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");

    assert!(!hub.is_registered(&ana).await.unwrap());
    hub.register(ana.clone()).await.unwrap();
    assert!(hub.is_registered(&ana).await.unwrap());
    hub.unregister(&ana).await.unwrap();
    assert!(!hub.is_registered(&ana).await.unwrap());
    hub.register(ana.clone()).await.unwrap();
    assert!(hub.is_registered(&ana).await.unwrap());
}

#[tokio::test]
async fn test_membership_is_by_object_not_name() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (first, _) = british("Ana");
    let (second, _) = british("Ana");

    hub.register(first.clone()).await.unwrap();
    assert!(!hub.is_registered(&second).await.unwrap());

    hub.register(second.clone()).await.expect("same name, different participant");
    assert_eq!(hub.members().await.len(), 2);

    // The first Ana sees the second in third person
    assert_eq!(first.history().last().unwrap(), "Ana has joined the chat.");
    assert_eq!(second.history(), vec!["You have joined the chat."]);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");

    hub.register(ana.clone()).await.unwrap();
    let result = hub.register(ana.clone()).await;

    assert!(
        matches!(result, Err(HubError::AlreadyRegistered { .. })),
        "expected AlreadyRegistered error, got: {result:?}"
    );
    assert_eq!(ana.history().len(), 1);
    assert_eq!(hub.get_log().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_capacity_from_config() {
    let config = HubConfig::from_toml_str("max_members = 2").unwrap();
    let hub = spawn_broadcaster(&config);

    hub.register(british("A").0).await.unwrap();
    hub.register(british("B").0).await.unwrap();
    let result = hub.register(british("C").0).await;

    assert!(matches!(result, Err(HubError::HubFull { max: 2 })));
    assert_eq!(hub.members().await.len(), 2);
}

#[tokio::test]
async fn test_default_config_has_no_member_limit() {
    let hub = spawn_broadcaster(&HubConfig::default());
    for i in 0..100 {
        hub.register(Participant::british(format!("u{i}"), NullSink))
            .await
            .unwrap();
    }

    let (late, _) = british("u100");
    hub.register(late.clone()).await.unwrap();

    assert_eq!(late.history(), vec!["You have joined the chat."]);
    assert_eq!(hub.get_log().await.unwrap().len(), 101);
    assert_eq!(hub.members().await.len(), 101);
}

#[tokio::test]
async fn test_members_in_registration_order() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (a, _) = british("A");
    let b = Participant::spanish("B", MemorySink::new());
    let c = Participant::mexican("C", MemorySink::new());

    for p in [&a, &b, &c] {
        hub.register(p.clone()).await.unwrap();
    }
    hub.unregister(&b).await.unwrap();

    let members = hub.members().await;
    let names: Vec<_> = members.iter().map(|m| m.identity.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert_eq!(members[1].locale, "es-MX");
}

// ============================================================================
// Fan-out Tests
// ============================================================================

#[tokio::test]
async fn test_message_grows_every_history_by_one() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let participants: Vec<_> = (0..5).map(|i| british(&format!("user-{i}")).0).collect();
    for p in &participants {
        hub.register(p.clone()).await.unwrap();
    }

    let before: Vec<_> = participants.iter().map(|p| p.history().len()).collect();
    let outcome = hub
        .send_message(&participants[2], "ping")
        .await
        .unwrap();
    assert_eq!(outcome, PublishOutcome::Delivered { recipients: 5 });

    let mut second_person = 0;
    for (p, len) in participants.iter().zip(before) {
        let history = p.history();
        assert_eq!(history.len(), len + 1);
        if history.last().unwrap() == "You said: ping" {
            second_person += 1;
        } else {
            assert_eq!(history.last().unwrap(), "user-2 said: ping");
        }
    }
    assert_eq!(second_person, 1);
}

#[tokio::test]
async fn test_unregister_delivers_to_self_exactly_once() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");
    let (ben, _) = british("Ben");
    hub.register(ana.clone()).await.unwrap();
    hub.register(ben.clone()).await.unwrap();

    assert!(hub.unregister(&ana).await.unwrap());

    let departures = ana
        .history()
        .iter()
        .filter(|l| l.contains("left the chat"))
        .count();
    assert_eq!(departures, 1);
    assert_eq!(ana.history().last().unwrap(), "Ana you have left the chat.");
    assert_eq!(ben.history().last().unwrap(), "Ana has left the chat.");

    // Departed participant no longer receives anything
    hub.send_message(&ben, "still here?").await.unwrap();
    assert_eq!(ana.history().last().unwrap(), "Ana you have left the chat.");
}

#[tokio::test]
async fn test_unregister_non_member_is_noop() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ghost, _) = british("Ghost");

    assert!(!hub.unregister(&ghost).await.unwrap());
    assert!(hub.get_log().await.unwrap().is_empty());
    assert!(ghost.history().is_empty());
}

#[tokio::test]
async fn test_reregistration_keeps_history() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");

    hub.register(ana.clone()).await.unwrap();
    hub.unregister(&ana).await.unwrap();
    hub.register(ana.clone()).await.unwrap();

    assert_eq!(
        ana.history(),
        vec![
            "You have joined the chat.",
            "Ana you have left the chat.",
            "You have joined the chat.",
        ]
    );
}

// ============================================================================
// Rejection Tests
// ============================================================================

#[tokio::test]
async fn test_send_while_offline_fails() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");

    let result = hub.send_message(&ana, "hello?").await;

    assert!(matches!(result, Err(HubError::OfflineSender { .. })));
    assert!(hub.get_log().await.unwrap().is_empty());
    assert!(ana.history().is_empty());
}

#[tokio::test]
async fn test_publish_from_unregistered_logs_rejection() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");
    let (ghost, _) = british("Ghost");
    hub.register(ana.clone()).await.unwrap();
    let ana_before = ana.history();
    let log_before = hub.get_log().await.unwrap();

    let outcome = hub
        .publish(Notification::message(ghost.clone(), "boo"))
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Rejected);
    assert_eq!(ana.history(), ana_before);
    assert!(ghost.history().is_empty());

    let log = hub.get_log().await.unwrap();
    assert_eq!(log.len(), log_before.len() + 1);
    assert_eq!(log[..log_before.len()], log_before[..]);
    assert_eq!(
        log.last().unwrap(),
        "Unregistered user Ghost tried to broadcast a message."
    );
}

#[tokio::test]
async fn test_system_notifications_from_non_member_are_delivered() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let (ana, _) = british("Ana");
    let (ghost, _) = british("Ghost");
    hub.register(ana.clone()).await.unwrap();

    // Only chat messages are guarded by membership
    let outcome = hub.publish(Notification::left(ghost)).await.unwrap();

    assert_eq!(outcome, PublishOutcome::Delivered { recipients: 1 });
    assert_eq!(ana.history().last().unwrap(), "Ghost has left the chat.");
}

// ============================================================================
// Participant Extension Tests
// ============================================================================

#[tokio::test]
async fn test_participant_send_message_extension() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let juan = Participant::mexican("Juan", MemorySink::new());
    hub.register(juan.clone()).await.unwrap();

    juan.send_message(&hub, "¿Qué onda?").await.unwrap();

    assert_eq!(juan.history().last().unwrap(), "Tú dijiste: ¿Qué onda?");
}

#[tokio::test]
async fn test_custom_locale_from_config() {
    let config = HubConfig::from_toml_str(
        r#"
        [[locales]]
        name = "en-US"
        joined_second = "joined the chat."
        joined_third = "joined the chat."
        left_second = "left the chat."
        left_third = "left the chat."
        say_second = "said"
        say_third = "said"
        pronoun = "You"
        "#,
    )
    .unwrap();
    let hub = spawn_broadcaster(&config);
    let sam = Participant::new("Sam", config.locale("en-US").unwrap(), MemorySink::new());

    hub.register(sam.clone()).await.unwrap();
    hub.unregister(&sam).await.unwrap();

    assert_eq!(sam.history(), vec!["You joined the chat.", "Sam left the chat."]);
}

// ============================================================================
// Event Subscription Tests
// ============================================================================

#[tokio::test]
async fn test_event_subscription() {
    let hub = spawn_broadcaster(&HubConfig::default());
    let mut events = hub.subscribe();
    let (ana, _) = british("Ana");

    hub.register(ana.clone()).await.unwrap();
    hub.send_message(&ana, "hi").await.unwrap();
    hub.unregister(&ana).await.unwrap();
    let _ = hub.publish(Notification::message(ana.clone(), "late")).await;

    let mut received = Vec::new();
    for _ in 0..6 {
        let event = timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("event should arrive")
            .expect("channel open");
        received.push(event);
    }

    assert_eq!(
        received[0],
        HubEvent::Joined {
            participant: ana.id(),
            identity: "Ana".to_string()
        }
    );
    assert!(matches!(received[1], HubEvent::Logged { recipients: 1, .. }));
    assert!(matches!(received[2], HubEvent::Logged { recipients: 1, .. }));
    assert_eq!(
        received[3],
        HubEvent::Left {
            participant: ana.id(),
            identity: "Ana".to_string()
        }
    );
    assert!(matches!(received[4], HubEvent::Logged { recipients: 0, .. }));
    assert!(matches!(received[5], HubEvent::Rejected { .. }));
}
