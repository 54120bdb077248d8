//! Property-based tests for the conversation controller
//!
//! These check the accumulation and lifecycle invariants over arbitrary
//! chunk sequences.

use super::testing::{MockReply, MockSource, RecordingTimer};
use super::*;
use crate::config::ResponseMode;
use crate::llm::{Chunk, ResponseSource, StreamError};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

fn controller_with(reply: MockReply) -> ConversationController<RecordingTimer> {
    let source: Arc<dyn ResponseSource> = Arc::new(MockSource::new().with_reply(reply));
    ConversationController::new(source, ResponseMode::Live, RecordingTimer::default())
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_chunk() -> impl Strategy<Value = Chunk> {
    prop_oneof![
        4 => "[a-zA-Z0-9 .,!?#*`\n-]{1,12}".prop_map(Chunk::text),
        1 => Just(Chunk::text("")),
        1 => Just(Chunk::empty()),
    ]
}

fn arb_message_text() -> impl Strategy<Value = String> {
    "[a-z]{0,3}[ \t]{0,3}[a-z]{0,3}"
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_content_is_concatenated_prefix(chunks in prop::collection::vec(arb_chunk(), 0..30)) {
        let rt = runtime();
        let mut controller = controller_with(MockReply::Items(chunks.iter().cloned().map(Ok).collect()));
        controller.submit("hello");

        let mut expected = String::new();
        rt.block_on(async {
            for chunk in &chunks {
                let step = controller.pump().await;
                if let Some(text) = chunk.content.as_deref().filter(|t| !t.is_empty()) {
                    expected.push_str(text);
                    prop_assert!(matches!(step, Some(StreamProgress::Appended)));
                } else {
                    prop_assert!(matches!(step, Some(StreamProgress::Skipped)));
                }
                let shown = &controller.transcript().last().unwrap().content;
                if expected.is_empty() {
                    prop_assert_eq!(shown, PLACEHOLDER_TEXT);
                } else {
                    prop_assert_eq!(shown, &expected);
                }
            }
            let done = controller.pump().await;
            prop_assert!(matches!(done, Some(StreamProgress::Completed { .. })), "expected completion");
            Ok(())
        })?;

        prop_assert!(!controller.is_busy());
        prop_assert!(!controller.timer().running);
        prop_assert_eq!(controller.transcript().len(), 2);
    }

    #[test]
    fn prop_error_anywhere_shows_error_text(
        chunks in prop::collection::vec(arb_chunk(), 0..20),
        fail_at in any::<prop::sample::Index>(),
    ) {
        let rt = runtime();
        let mut items: Vec<_> = chunks.into_iter().map(Ok).collect();
        let at = fail_at.index(items.len() + 1);
        items.insert(at, Err(StreamError::network("reset")));
        let mut controller = controller_with(MockReply::Items(items));
        controller.submit("hello");

        rt.block_on(async { while controller.pump().await.is_some() {} });

        prop_assert_eq!(&controller.transcript().last().unwrap().content, STREAM_ERROR_TEXT);
        prop_assert!(!controller.is_busy());
        prop_assert_eq!(&controller.timer().calls, &vec!["start", "stop"]);
    }

    #[test]
    fn prop_blank_input_never_changes_state(text in "[ \t\n]{0,8}") {
        let mut controller = controller_with(MockReply::texts(&["x"]));
        prop_assert!(matches!(controller.submit(&text), Submission::Ignored));
        prop_assert!(controller.transcript().is_empty());
        prop_assert!(!controller.is_busy());
        prop_assert!(controller.timer().calls.is_empty());
    }

    #[test]
    fn prop_accepted_submission_appends_two_messages(text in arb_message_text()) {
        let mut controller = controller_with(MockReply::texts(&["ok"]));
        let outcome = controller.submit(&text);
        if text.trim().is_empty() {
            prop_assert!(matches!(outcome, Submission::Ignored));
            prop_assert_eq!(controller.transcript().len(), 0);
        } else {
            prop_assert!(matches!(outcome, Submission::Streaming));
            prop_assert_eq!(
                controller.transcript().messages(),
                &[Message::user(text.as_str()), Message::assistant(PLACEHOLDER_TEXT)]
            );
        }
    }
}
