use super::fakes::{Call, MIB, Script, harness, text};
use fetchbot::delivery::INLINE_LIMIT_BYTES;
use fetchbot::error::{ExtractionFailure, PipelineError};
use fetchbot::membership::{MemberRole, MembershipStore};
use fetchbot::pipeline::{Outcome, RequestOutcome};
use fetchbot::status::Stage;
use std::time::Duration;

const LINK: &str = "https://youtu.be/abc123";

fn request(outcome: Outcome) -> RequestOutcome {
    match outcome {
        Outcome::Request(request) => request,
        other => panic!("expected a request outcome, got {other:?}"),
    }
}

fn assert_forward_only(history: &[Stage]) {
    assert_eq!(history.first(), Some(&Stage::Pending));
    for pair in history.windows(2) {
        assert!(
            pair[0].can_advance_to(pair[1]),
            "illegal transition {} -> {} in {history:?}",
            pair[0],
            pair[1]
        );
    }
    let terminals = history.iter().filter(|s| s.is_terminal()).count();
    assert_eq!(terminals, 1, "exactly one terminal stage in {history:?}");
    assert!(history.last().is_some_and(|s| s.is_terminal()));
}

#[tokio::test]
async fn texts_without_provider_marker_never_reach_gate_or_dispatcher() {
    let inputs = [
        "https://example.com/video",
        "hello there",
        "",
        "   ",
        "ftp://files.example.org/youtube",
        "https://notyoutube.example/watch",
        "look at vimeo dot com",
    ];
    let h = harness().build();

    for input in inputs {
        let outcome = h.pipeline.handle_event(text(42, input)).await;
        assert_eq!(
            outcome,
            Outcome::Rejected(PipelineError::UnsupportedLink),
            "input {input:?}"
        );
    }
    assert_eq!(h.lookup.calls(), 0);
    assert_eq!(h.extractor.calls(), 0);
    assert_eq!(h.stats.snapshot().rejected, inputs.len() as u64);
}

#[tokio::test]
async fn uncached_user_gets_exactly_one_lookup_per_request_until_cached() {
    let h = harness().lookup(Ok(MemberRole::Left)).build();

    for expected_calls in 1..=3 {
        let outcome = h.pipeline.handle_event(text(7, LINK)).await;
        assert!(matches!(
            outcome,
            Outcome::Rejected(PipelineError::Unauthorized { user_id: 7 })
        ));
        assert_eq!(h.lookup.calls(), expected_calls);
        assert!(!h.store.contains(7));
    }

    h.lookup.set(Ok(MemberRole::Member));
    request(h.pipeline.handle_event(text(7, LINK)).await);
    assert_eq!(h.lookup.calls(), 4);
    assert!(h.store.contains(7));

    // Cached permanently: no more lookups, even if the channel now says otherwise.
    h.lookup.set(Ok(MemberRole::Banned));
    request(h.pipeline.handle_event(text(7, LINK)).await);
    request(h.pipeline.handle_event(text(7, LINK)).await);
    assert_eq!(h.lookup.calls(), 4);
}

#[tokio::test]
async fn every_authorized_role_is_cached_and_every_other_role_is_not() {
    for (role, admitted) in [
        (MemberRole::Owner, true),
        (MemberRole::Administrator, true),
        (MemberRole::Member, true),
        (MemberRole::Restricted, false),
        (MemberRole::Left, false),
        (MemberRole::Banned, false),
    ] {
        let h = harness().lookup(Ok(role)).build();
        let outcome = h.pipeline.handle_event(text(9, LINK)).await;
        assert_eq!(matches!(outcome, Outcome::Request(_)), admitted, "{role}");
        assert_eq!(h.store.contains(9), admitted, "{role}");
        assert_eq!(h.lookup.calls(), 1);
    }
}

#[tokio::test]
async fn sizes_below_limit_are_delivered_once() {
    for size in [0, 1, MIB, 48 * MIB, INLINE_LIMIT_BYTES - 1] {
        let h = harness()
            .cached(&[1])
            .scripts(vec![Script::file("clip", size)])
            .build();

        let outcome = request(h.pipeline.handle_event(text(1, LINK)).await);
        assert_eq!(outcome.stage, Stage::Delivered, "size {size}");
        assert_eq!(h.transport.file_sends().len(), 1, "size {size}");
        assert_forward_only(&outcome.history);
    }
}

#[tokio::test]
async fn sizes_at_or_above_limit_are_retained_without_upload() {
    for size in [INLINE_LIMIT_BYTES, INLINE_LIMIT_BYTES + 1, 50 * MIB, 500 * MIB] {
        let h = harness()
            .cached(&[1])
            .scripts(vec![Script::file("clip", size)])
            .build();

        let outcome = request(h.pipeline.handle_event(text(1, LINK)).await);
        assert_eq!(outcome.stage, Stage::Retained, "size {size}");
        assert!(h.transport.file_sends().is_empty(), "size {size}");
        let status = h.transport.final_status_text().unwrap();
        assert!(status.contains("clip.mp4"), "size {size}: {status}");
        assert_forward_only(&outcome.history);
    }
}

#[tokio::test]
async fn stage_history_only_moves_forward_for_every_ending() {
    let endings = vec![
        Script::file("small", MIB),
        Script::file("large", 60 * MIB),
        Script::Fail(ExtractionFailure::PrivateContent),
        Script::Fail(ExtractionFailure::Network("reset".into())),
        Script::Fail(ExtractionFailure::MissingOutput("/gone".into())),
        Script::file("last", MIB),
    ];
    let count = endings.len();
    let h = harness().cached(&[1]).scripts(endings).build();

    for _ in 0..count {
        let outcome = request(h.pipeline.handle_event(text(1, LINK)).await);
        assert_forward_only(&outcome.history);
    }

    let snapshot = h.stats.snapshot();
    assert_eq!(snapshot.requests, count as u64);
    assert_eq!(
        snapshot.delivered + snapshot.retained + snapshot.failed,
        count as u64
    );
}

#[tokio::test]
async fn no_status_update_follows_a_terminal_stage() {
    let h = harness()
        .cached(&[1])
        .scripts(vec![Script::Fail(ExtractionFailure::InvalidLink)])
        .build();

    request(h.pipeline.handle_event(text(1, LINK)).await);

    let calls = h.transport.calls();
    let failed_edit = calls
        .iter()
        .position(|call| matches!(call, Call::Edit { text, .. } if text.contains("failed")))
        .unwrap();
    assert_eq!(failed_edit, calls.len() - 1);
}

#[tokio::test]
async fn slow_download_does_not_block_other_events() {
    let h = harness()
        .cached(&[1])
        .delay(Duration::from_millis(300))
        .build();

    let (link, help) = tokio::join!(
        h.pipeline.handle_event(text(1, LINK)),
        h.pipeline.handle_event(text(2, "/help")),
    );
    assert_eq!(request(link).stage, Stage::Delivered);
    assert!(matches!(help, Outcome::Command(_)));

    let calls = h.transport.calls();
    let help_reply = calls
        .iter()
        .position(|call| matches!(call, Call::SendText { chat_id: 2, .. }))
        .unwrap();
    let upload = calls
        .iter()
        .position(|call| matches!(call, Call::SendFile { .. }))
        .unwrap();
    assert!(help_reply < upload, "help answered while the download ran");
}

#[tokio::test]
async fn worker_pool_bounds_concurrent_downloads() {
    let h = harness()
        .cached(&[1, 2, 3])
        .workers(1)
        .delay(Duration::from_millis(50))
        .build();

    let (a, b, c) = tokio::join!(
        h.pipeline.handle_event(text(1, LINK)),
        h.pipeline.handle_event(text(2, LINK)),
        h.pipeline.handle_event(text(3, LINK)),
    );
    for outcome in [a, b, c] {
        assert_eq!(request(outcome).stage, Stage::Delivered);
    }
    assert_eq!(h.extractor.calls(), 3);
    assert_eq!(h.extractor.max_in_flight(), 1);
}

#[tokio::test]
async fn two_workers_run_two_extractions_at_once() {
    let h = harness()
        .cached(&[1, 2, 3, 4])
        .workers(2)
        .delay(Duration::from_millis(100))
        .build();

    let _ = tokio::join!(
        h.pipeline.handle_event(text(1, LINK)),
        h.pipeline.handle_event(text(2, LINK)),
        h.pipeline.handle_event(text(3, LINK)),
        h.pipeline.handle_event(text(4, LINK)),
    );
    assert_eq!(h.extractor.calls(), 4);
    assert_eq!(h.extractor.max_in_flight(), 2);
}

#[tokio::test]
async fn queued_request_stays_pending_until_a_worker_frees_up() {
    let h = harness()
        .cached(&[1, 2])
        .workers(1)
        .delay(Duration::from_millis(300))
        .build();

    let observe = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        (h.transport.status_text_for(1), h.transport.status_text_for(2))
    };
    let (first, second, (running, queued)) = tokio::join!(
        h.pipeline.handle_event(text(1, LINK)),
        h.pipeline.handle_event(text(2, LINK)),
        observe,
    );

    let running = running.unwrap();
    let queued = queued.unwrap();
    assert!(running.contains("Downloading"), "{running}");
    assert!(queued.contains("waiting for a download slot"), "{queued}");

    let first = request(first);
    let second = request(second);
    assert_eq!(first.stage, Stage::Delivered);
    assert_eq!(second.stage, Stage::Delivered);
    assert_forward_only(&second.history);
    assert!(second.history.contains(&Stage::Downloading));
}
