//! End-to-end resolution of transport-shaped messages.

use cqtext::cqcode::{
    adapters::memory::{InMemoryIdentityDirectory, StaticContentResolver},
    domain::{CqTag, IncomingMessage, UserId, escape},
    services::TagResolver,
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

use super::helpers::{BOT_ID, PHOTO_URL, content, identity, resolver, resolver_over};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_message_with_reply_resolves_from_json(resolver: TagResolver) {
    let message: IncomingMessage = serde_json::from_value(json!({
        "message_id": 501,
        "group_id": 9000,
        "sender": {"user_id": 43, "nickname": "bob", "card": "Bobby"},
        "content": [
            {"type": "reply", "data": {"id": "500"}},
            {"type": "at", "data": {"qq": BOT_ID}},
            {"type": "text", "data": {"text": " what is this? "}},
            {"type": "image", "data": {"url": PHOTO_URL, "sub_type": 0}}
        ],
        "reply": {
            "sender": {"user_id": BOT_ID, "nickname": "Mai"},
            "message_id": 500,
            "content": "look&#44; a picture"
        }
    }))
    .expect("transport message should deserialise");

    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(
        resolved.plain_text(),
        format!("[reply to Mai: look, a picture]@{BOT_ID} what is this? [image: a cat on a keyboard]")
    );
    assert_eq!(resolved.sender.display_name(), "Bobby");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolved_message_serialises_for_consumers(resolver: TagResolver) {
    let message = IncomingMessage::new(
        serde_json::from_value(json!({"user_id": 42, "nickname": "alice"}))
            .expect("valid sender"),
        "hi [CQ:at,qq=43]",
    );

    let resolved = resolver.resolve_message(&message, &DefaultClock).await;
    let value = serde_json::to_value(&resolved).expect("resolved message serialises");

    assert_eq!(value.get("segments"), Some(&json!(["hi ", "@bob"])));
    assert!(value.get("resolved_at").is_some_and(serde_json::Value::is_string));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_updates_are_seen_by_existing_resolver(content: StaticContentResolver) {
    let directory = InMemoryIdentityDirectory::new();
    let resolver = resolver_over(content, directory.clone());
    let tag = CqTag::parse("[CQ:at,qq=77]");

    assert_eq!(resolver.resolve(&tag, 0).await, "@77");
    directory.insert(UserId::new(77), "carol");
    assert_eq!(resolver.resolve(&tag, 0).await, "@carol");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forward_entries_resolve_mentions_and_images(resolver: TagResolver) {
    let bundle = json!([
        {
            "sender": {"nickname": "alice"},
            "raw_message": format!("[CQ:image,url={},sub_type=0]", escape(PHOTO_URL)),
            "user_id": 42
        },
        {
            "sender": {"card": "B"},
            "raw_message": "",
            "message": [
                {"type": "at", "data": {"qq": "42"}},
                {"type": "text", "data": {"text": " agreed"}}
            ]
        },
        {
            "sender": {"nickname": "carol"},
            "raw_message": "[CQ:reply,id=1]me too"
        }
    ]);
    let raw = format!("[CQ:forward,content={}]", escape(&bundle.to_string()));

    let text = resolver.resolve(&CqTag::parse(&raw), 0).await;

    assert_eq!(
        text,
        "[forward message:\nalice: [image: a cat on a keyboard]\nB: @alice agreed\ncarol: [reply to someone]me too]"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_quoting_a_forward_does_not_expand_it(
    content: StaticContentResolver,
    identity: InMemoryIdentityDirectory,
) {
    let resolver = resolver_over(content, identity);
    let bundle = json!([{"sender": {"nickname": "x"}, "raw_message": "secret"}]);
    let message: IncomingMessage = serde_json::from_value(json!({
        "sender": {"user_id": 1, "nickname": "poster"},
        "content": "[CQ:reply,id=5]?",
        "reply": {
            "sender": {"user_id": 42, "nickname": "alice"},
            "message_id": 5,
            "content": format!("[CQ:forward,content={}]", escape(&bundle.to_string()))
        }
    }))
    .expect("transport message should deserialise");

    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(resolved.plain_text(), "[reply to alice: [forward message]]?");
}
