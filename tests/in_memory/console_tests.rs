//! Console transport over in-memory buffers.

use crate::test_helpers::{config, test_bed};
use groundcrew::console::{USAGE_REPLY, serve};
use tokio_util::sync::CancellationToken;

#[tokio::test(flavor = "multi_thread")]
async fn replies_to_each_message_in_order() {
    let bed = test_bed(&config(&[])).await;
    let input: &[u8] = b"900 /help\n\nnot a message\n1 /jobs 2026-10-12\n";
    let mut output = Vec::new();

    let handled = serve(bed.app.dispatcher(), input, &mut output, &CancellationToken::new())
        .await
        .expect("console runs");

    assert_eq!(handled, 2);
    let text = String::from_utf8(output).expect("replies are utf-8");
    let replies: Vec<&str> = text.split("\n\n").filter(|reply| !reply.is_empty()).collect();
    assert_eq!(replies.len(), 3, "{text}");
    assert!(replies.first().is_some_and(|reply| reply.starts_with("Commands:")), "{text}");
    assert_eq!(replies.get(1).copied(), Some(USAGE_REPLY));
    assert!(
        replies
            .get(2)
            .is_some_and(|reply| reply.starts_with("Your jobs for 2026-10-12")),
        "{text}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stops_reading_once_cancelled() {
    let bed = test_bed(&config(&[])).await;
    let input: &[u8] = b"900 /help\n";
    let mut output = Vec::new();
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let handled = serve(bed.app.dispatcher(), input, &mut output, &shutdown)
        .await
        .expect("console runs");

    assert_eq!(handled, 0);
    assert!(output.is_empty());
}
