use super::fakes::{Call, harness, text, callback};
use fetchbot::membership::{MemberRole, MembershipStore};
use fetchbot::pipeline::{BotCommand, CallbackAction, Outcome};

#[tokio::test]
async fn start_replies_with_keyboard() {
    let h = harness().build();

    let outcome = h.pipeline.handle_event(text(5, "/start")).await;

    assert_eq!(outcome, Outcome::Command(BotCommand::Start));
    assert!(matches!(
        h.transport.calls().as_slice(),
        [Call::SendText {
            chat_id: 5,
            with_keyboard: true,
            ..
        }]
    ));
    assert_eq!(h.lookup.calls(), 0);
}

#[tokio::test]
async fn help_lists_providers_and_limit() {
    let h = harness().build();

    h.pipeline.handle_event(text(5, "/help")).await;

    let reply = h.transport.sent_texts().pop().unwrap();
    for provider in ["YouTube", "Instagram", "TikTok", "Vimeo"] {
        assert!(reply.contains(provider), "{reply}");
    }
    assert!(reply.contains("49 MiB"), "{reply}");
}

#[tokio::test]
async fn stats_is_admin_only() {
    let h = harness().cached(&[1]).admin(1).build();
    h.pipeline.handle_event(text(1, "https://youtu.be/a")).await;
    h.pipeline.handle_event(text(1, "https://example.com")).await;

    h.pipeline.handle_event(text(2, "/stats")).await;
    let denied = h.transport.sent_texts().pop().unwrap();
    assert!(denied.contains("administrator"), "{denied}");

    h.pipeline.handle_event(text(1, "/stats@fetch_bot")).await;
    let report = h.transport.sent_texts().pop().unwrap();
    assert!(report.contains("Requests: 1"), "{report}");
    assert!(report.contains("Delivered: 1"), "{report}");
    assert!(report.contains("Rejected: 1"), "{report}");
}

#[tokio::test]
async fn verify_button_caches_member_and_confirms() {
    let h = harness().lookup(Ok(MemberRole::Member)).build();

    let outcome = h.pipeline.handle_event(callback(8, "verify_membership")).await;

    assert_eq!(outcome, Outcome::Callback(CallbackAction::VerifyMembership));
    assert!(h.store.contains(8));
    let calls = h.transport.calls();
    assert_eq!(
        calls.first(),
        Some(&Call::AnswerCallback {
            callback_id: "cb-8".into()
        })
    );
    assert!(h.transport.sent_texts().pop().unwrap().contains("verified"));
}

#[tokio::test]
async fn verify_button_for_non_member_offers_retry() {
    let h = harness().lookup(Ok(MemberRole::Left)).build();

    h.pipeline.handle_event(callback(8, "verify_membership")).await;

    assert!(!h.store.contains(8));
    assert!(matches!(
        h.transport.calls().last(),
        Some(Call::SendText {
            with_keyboard: true,
            ..
        })
    ));
}

#[tokio::test]
async fn unknown_callback_is_acknowledged_and_reported() {
    let h = harness().build();

    let outcome = h.pipeline.handle_event(callback(3, "self_destruct")).await;

    assert_eq!(
        outcome,
        Outcome::Callback(CallbackAction::Unknown("self_destruct".into()))
    );
    let calls = h.transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::AnswerCallback { .. }));
    assert!(h.transport.sent_texts()[0].contains("self_destruct"));
}

#[tokio::test]
async fn help_button_matches_help_command() {
    let h = harness().build();

    h.pipeline.handle_event(callback(3, "help")).await;
    h.pipeline.handle_event(text(3, "/help")).await;

    let texts = h.transport.sent_texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], texts[1]);
}
