use super::fakes::{Call, MIB, Script, harness, text};
use fetchbot::error::{ExtractionFailure, PipelineError};
use fetchbot::membership::MembershipStore;
use fetchbot::pipeline::{Outcome, RequestOutcome};
use fetchbot::status::Stage;

fn request(outcome: Outcome) -> RequestOutcome {
    match outcome {
        Outcome::Request(request) => request,
        other => panic!("expected a request outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn cached_user_small_file_is_delivered_with_title_caption() {
    let h = harness()
        .cached(&[42])
        .scripts(vec![Script::file("Demo", 10 * MIB)])
        .build();

    let outcome = request(h.pipeline.handle_event(text(42, "https://youtu.be/abc123")).await);

    assert_eq!(outcome.stage, Stage::Delivered);
    assert!(outcome.error.is_none());
    let sends = h.transport.file_sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("Demo"));
    assert!(sends[0].0.ends_with("Demo.mp4"));
    assert_eq!(h.lookup.calls(), 0, "cached users skip the live lookup");
    assert!(h.transport.final_status_text().is_none(), "status message removed");
}

#[tokio::test]
async fn unrecognized_domain_is_rejected_without_lookup_or_dispatch() {
    let h = harness().build();

    let outcome = h
        .pipeline
        .handle_event(text(42, "https://example.com/video"))
        .await;

    assert_eq!(outcome, Outcome::Rejected(PipelineError::UnsupportedLink));
    assert_eq!(h.lookup.calls(), 0);
    assert_eq!(h.extractor.calls(), 0);
    let replies = h.transport.sent_texts();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("YouTube"));
}

#[tokio::test]
async fn lookup_failure_rejects_as_unauthorized_and_leaves_cache_untouched() {
    let h = harness()
        .lookup(Err("Telegram getChatMember failed (502)".into()))
        .build();

    let outcome = h
        .pipeline
        .handle_event(text(42, "https://youtu.be/abc123"))
        .await;

    let Outcome::Rejected(error) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert!(matches!(error, PipelineError::MembershipLookup(_)));
    assert!(!h.store.contains(42));
    assert_eq!(h.extractor.calls(), 0);

    let reply = h.transport.sent_texts().pop().unwrap();
    assert!(reply.contains(super::fakes::CHANNEL));
    assert!(matches!(
        h.transport.calls().last(),
        Some(Call::SendText {
            with_keyboard: true,
            ..
        })
    ));

    // Re-checked next time, and admitted once the lookup recovers.
    h.lookup.set(Ok(fetchbot::membership::MemberRole::Member));
    let outcome = request(h.pipeline.handle_event(text(42, "https://youtu.be/abc123")).await);
    assert_eq!(outcome.stage, Stage::Delivered);
    assert_eq!(h.lookup.calls(), 2);
    assert!(h.store.contains(42));
}

#[tokio::test]
async fn large_file_is_retained_and_path_reported() {
    let h = harness()
        .cached(&[42])
        .scripts(vec![Script::file("Big_Movie", 60 * MIB)])
        .build();

    let outcome = request(h.pipeline.handle_event(text(42, "https://vimeo.com/1")).await);

    assert_eq!(outcome.stage, Stage::Retained);
    assert!(h.transport.file_sends().is_empty());
    let status = h.transport.final_status_text().unwrap();
    let expected = h.dir.path().join("downloads").join("Big_Movie.mp4");
    assert!(expected.exists());
    assert!(status.contains(&expected.display().to_string()), "{status}");
    assert!(status.contains("60.00 MiB"), "{status}");
    assert!(status.contains("limit is 49 MiB"), "{status}");
}

#[tokio::test]
async fn private_content_fails_with_private_or_invalid_message() {
    let h = harness()
        .cached(&[42])
        .scripts(vec![Script::Fail(ExtractionFailure::PrivateContent)])
        .build();

    let outcome = request(
        h.pipeline
            .handle_event(text(42, "https://instagram.com/p/xyz"))
            .await,
    );

    assert_eq!(outcome.stage, Stage::Failed);
    assert_eq!(
        outcome.error,
        Some(PipelineError::Extraction(ExtractionFailure::PrivateContent))
    );
    assert!(h.transport.file_sends().is_empty());
    let status = h.transport.final_status_text().unwrap();
    assert!(status.contains("private or invalid"), "{status}");
}

#[tokio::test]
async fn upload_failure_fails_request_and_keeps_file() {
    let h = harness().cached(&[42]).build();
    h.transport.fail_uploads();

    let outcome = request(h.pipeline.handle_event(text(42, "https://youtu.be/abc123")).await);

    assert_eq!(outcome.stage, Stage::Failed);
    let Some(PipelineError::Upload { path, .. }) = outcome.error else {
        panic!("expected upload error, got {:?}", outcome.error);
    };
    assert!(path.exists(), "file must stay on disk after a failed upload");
    let status = h.transport.final_status_text().unwrap();
    assert!(status.contains(&path.display().to_string()));
    assert!(status.contains("413"));
}

#[tokio::test]
async fn status_message_failure_drops_request_without_download() {
    let h = harness().cached(&[42]).build();
    h.transport.fail_sends();

    let outcome = h
        .pipeline
        .handle_event(text(42, "https://youtu.be/abc123"))
        .await;

    assert_eq!(outcome, Outcome::Undeliverable);
    assert_eq!(h.extractor.calls(), 0);
    assert_eq!(h.stats.snapshot().failed, 1);
}
