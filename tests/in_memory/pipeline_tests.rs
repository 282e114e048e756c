//! Concurrent resolution of message batches.

use chrono::Utc;
use cqtext::cqcode::{
    domain::{IncomingMessage, MessageId, SenderInfo, UserId},
    services::{MessagePipeline, TagResolver},
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

use super::helpers::{PHOTO_URL, resolver};

fn batch() -> Vec<IncomingMessage> {
    (1..=20)
        .map(|id| {
            let content = if matches!(id, 5 | 10 | 15 | 20) {
                format!("#{id} [CQ:image,url={PHOTO_URL},sub_type=0]")
            } else {
                format!("#{id} [CQ:at,qq=42]")
            };
            IncomingMessage::new(SenderInfo::new(UserId::new(id), "user"), content)
                .with_message_id(MessageId::new(id))
        })
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_is_resolved_and_stamped(resolver: TagResolver) {
    let started = Utc::now();
    let (mut pipeline, mut receiver) = MessagePipeline::new(resolver, Arc::new(DefaultClock));
    let messages = batch();
    let expected = messages.len();

    let collector = tokio::spawn(async move {
        let mut resolved = Vec::new();
        while let Some(message) = receiver.recv().await {
            resolved.push(message);
        }
        resolved
    });
    for message in messages {
        pipeline.submit(message);
    }
    let delivered = pipeline.drain().await.expect("every message is delivered");
    let mut resolved = collector.await.expect("collector finishes");

    assert_eq!(delivered, expected);
    resolved.sort_by_key(|message| message.message_id.into_inner());
    let texts: Vec<String> = resolved.iter().map(|message| message.plain_text()).collect();
    assert_eq!(texts.first().map(String::as_str), Some("#1 @alice"));
    assert_eq!(
        texts.get(4).map(String::as_str),
        Some("#5 [image: a cat on a keyboard]")
    );
    assert!(resolved.iter().all(|message| message.resolved_at >= started));
}
