//! Per-kind resolution tests for the tag resolver.

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

use crate::cqcode::adapters::memory::{InMemoryIdentityDirectory, StaticContentResolver};
use crate::cqcode::config::{ResolverConfig, SelfIdentity};
use crate::cqcode::domain::{
    CqTag, GroupId, IncomingMessage, MessageContent, MessageId, PromptProfile, ReplyContext,
    SenderInfo, TagRecord, UserId, escape,
};
use crate::cqcode::services::{KindHandler, ResolveScope, TagResolver};

const SELF_ID: i64 = 10_001;
const PHOTO_URL: &str = "http://x/y.png";
const STICKER_URL: &str = "http://x/s.gif";

#[fixture]
fn content() -> StaticContentResolver {
    StaticContentResolver::new()
        .with_description(PHOTO_URL, "a red circle")
        .with_description(STICKER_URL, "smug")
}

#[fixture]
fn resolver(content: StaticContentResolver) -> TagResolver {
    resolver_with_limit(content, 1)
}

fn resolver_with_limit(content: StaticContentResolver, limit: usize) -> TagResolver {
    let identity = InMemoryIdentityDirectory::new().with_name(UserId::new(42), "alice");
    let config = ResolverConfig::for_identity(SelfIdentity::new(UserId::new(SELF_ID), "Mai"))
        .with_forward_depth_limit(limit);
    TagResolver::new(Arc::new(content), Arc::new(identity), config)
}

fn forward_tag(entries: &serde_json::Value) -> String {
    format!("[CQ:forward,content={}]", escape(&entries.to_string()))
}

fn sender() -> SenderInfo {
    SenderInfo::new(UserId::new(7), "poster")
}

#[rstest]
#[case("hello", "hello")]
#[case("[CQ:face,id=5]", "[emoji]")]
#[case("[CQ:poke,qq=1]", "[poke]")]
#[case("[CQ:]", "[]")]
#[case("[CQ:at,qq=42]", "@alice")]
#[case("[CQ:mention,qq=42]", "@alice")]
#[case("[CQ:at,qq=7]", "@7")]
#[case("[CQ:at,qq=all]", "@everyone")]
#[case("[CQ:at]", "@someone")]
#[case("[CQ:at,qq=abc]", "@someone")]
#[case("[CQ:reply,id=12]", "[reply to someone]")]
#[case("[CQ:forward,id=12]", "[forward message]")]
#[case("[CQ:forward,content=&#91;&#93;]", "[forward message:\n]")]
#[case("[CQ:forward,content=nonsense]", "[forward message]")]
#[tokio::test(flavor = "multi_thread")]
async fn resolves_tag_by_kind(resolver: TagResolver, #[case] raw: &str, #[case] expected: &str) {
    assert_eq!(resolver.resolve(&CqTag::parse(raw), 0).await, expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn photo_is_described_with_photo_profile(content: StaticContentResolver) {
    let resolver = resolver_with_limit(content.clone(), 1);
    let tag = CqTag::parse("[CQ:image,url=http://x/y.png,sub_type=0]");

    assert_eq!(resolver.resolve(&tag, 0).await, "[image: a red circle]");
    assert_eq!(
        content.requests(),
        [(PHOTO_URL.to_owned(), PromptProfile::Photo)]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_zero_sub_type_is_a_sticker(content: StaticContentResolver) {
    let resolver = resolver_with_limit(content.clone(), 1);
    let tag = CqTag::parse("[CQ:image,url=http://x/s.gif,sub_type=1]");

    assert_eq!(resolver.resolve(&tag, 0).await, "[sticker: smug]");
    assert_eq!(
        content.requests(),
        [(STICKER_URL.to_owned(), PromptProfile::Sticker)]
    );
}

#[rstest]
#[case("[CQ:image,sub_type=0]", "[image]")]
#[case("[CQ:image,url=,sub_type=0]", "[image]")]
#[case("[CQ:image]", "[sticker]")]
#[tokio::test(flavor = "multi_thread")]
async fn image_without_url_skips_lookup(
    content: StaticContentResolver,
    #[case] raw: &str,
    #[case] expected: &str,
) {
    let resolver = resolver_with_limit(content.clone(), 1);

    assert_eq!(resolver.resolve(&CqTag::parse(raw), 0).await, expected);
    assert!(content.requests().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_lookup_only_affects_its_own_tag(resolver: TagResolver) {
    let message = IncomingMessage::new(
        sender(),
        "a[CQ:image,url=http://unknown/,sub_type=0]b[CQ:face,id=1]",
    );
    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(resolved.segments, ["a", "[image]", "b", "[emoji]"]);
    assert_eq!(resolved.plain_text(), "a[image]b[emoji]");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_resolves_referenced_message(resolver: TagResolver) {
    let referenced = ReplyContext::new(
        SenderInfo::new(UserId::new(42), "alice").with_card("Alice"),
        MessageId::new(9),
        "hi [CQ:face,id=1]",
    );
    let message = IncomingMessage::new(sender(), "[CQ:reply,id=9]ok").with_reply(referenced);
    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(resolved.plain_text(), "[reply to Alice: hi [emoji]]ok");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_to_self_uses_self_name(resolver: TagResolver) {
    let referenced = ReplyContext::new(
        SenderInfo::new(UserId::new(SELF_ID), "bot-account"),
        MessageId::new(9),
        "I said so",
    );
    let tag = CqTag::reply_to(MessageId::new(9)).with_context(referenced);

    assert_eq!(resolver.resolve(&tag, 0).await, "[reply to Mai: I said so]");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_to_unknown_sender_is_anonymous(resolver: TagResolver) {
    let referenced = ReplyContext::new(SenderInfo::default(), MessageId::new(9), "lost");
    let tag = CqTag::reply_to(MessageId::new(9)).with_context(referenced);

    assert_eq!(resolver.resolve(&tag, 0).await, "[reply to someone]");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_context_only_attaches_to_reply_tags(resolver: TagResolver) {
    let referenced = ReplyContext::new(
        SenderInfo::new(UserId::new(42), "alice"),
        MessageId::new(9),
        "x",
    );
    let message = IncomingMessage::new(sender(), "[CQ:face,id=1]").with_reply(referenced);
    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(resolved.plain_text(), "[emoji]");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forward_lists_each_entry(resolver: TagResolver) {
    let raw = forward_tag(&json!([
        {"sender": {"nickname": "bob"}, "raw_message": "hi"},
        {"sender": {"card": "Carol", "nickname": "c"}, "raw_message": "[CQ:face,id=1] there"},
        {
            "sender": {},
            "raw_message": "",
            "message": [{"type": "text", "data": {"text": "from records"}}]
        },
        {"sender": {"nickname": "dave"}, "raw_message": ""}
    ]));

    assert_eq!(
        resolver.resolve(&CqTag::parse(&raw), 0).await,
        "[forward message:\nbob: hi\nCarol: [emoji] there\nunknown user: from records\ndave: [empty message]]"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forward_entry_holding_a_forward_is_not_expanded(resolver: TagResolver) {
    let raw = forward_tag(&json!([
        {
            "sender": {"nickname": "bob"},
            "raw_message": "see this",
            "message": [{"type": "forward", "data": {"id": "inner"}}]
        }
    ]));

    assert_eq!(
        resolver.resolve(&CqTag::parse(&raw), 0).await,
        "[forward message:\nbob: [forward message]]"
    );
}

#[rstest]
#[case(1)]
#[case(2)]
#[tokio::test(flavor = "multi_thread")]
async fn self_nested_forward_terminates(content: StaticContentResolver, #[case] limit: usize) {
    let inner = forward_tag(&json!([{"sender": {"nickname": "bob"}, "raw_message": "deep"}]));
    let outer = forward_tag(&json!([{"sender": {"nickname": "alice"}, "raw_message": inner}]));
    let resolver = resolver_with_limit(content, limit);

    assert_eq!(
        resolver.resolve(&CqTag::parse(&outer), 0).await,
        "[forward message:\nalice: [forward message]]"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn raw_entry_mentioning_a_forward_is_replaced_whole(resolver: TagResolver) {
    let inner = forward_tag(&json!([{"sender": {"nickname": "bob"}, "raw_message": "deep"}]));
    let outer = forward_tag(&json!([
        {"sender": {"nickname": "alice"}, "raw_message": format!("look {inner}")},
        {"sender": {"nickname": "carol"}, "raw_message": "nice"}
    ]));

    assert_eq!(
        resolver.resolve(&CqTag::parse(&outer), 0).await,
        "[forward message:\nalice: [forward message]\ncarol: nice]"
    );
}

#[rstest]
#[case(1, "[reply to alice: [forward message]]")]
#[case(2, "[reply to alice: [forward message:\nbob: deep]]")]
#[tokio::test(flavor = "multi_thread")]
async fn depth_limit_bounds_forwards_reached_through_replies(
    content: StaticContentResolver,
    #[case] limit: usize,
    #[case] expected: &str,
) {
    let quoted = forward_tag(&json!([{"sender": {"nickname": "bob"}, "raw_message": "deep"}]));
    let referenced = ReplyContext::new(
        SenderInfo::new(UserId::new(42), "alice"),
        MessageId::new(9),
        quoted,
    );
    let message = IncomingMessage::new(sender(), "[CQ:reply,id=9]").with_reply(referenced);
    let resolver = resolver_with_limit(content, limit);

    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(resolved.plain_text(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forward_at_limit_is_a_placeholder(resolver: TagResolver) {
    let raw = forward_tag(&json!([{"sender": {"nickname": "bob"}, "raw_message": "hi"}]));
    assert_eq!(resolver.resolve(&CqTag::parse(&raw), 1).await, "[forward message]");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn structured_records_resolve_like_raw_text(resolver: TagResolver) {
    let records: Vec<TagRecord> = serde_json::from_value(json!([
        {"type": "text", "data": {"text": "hi "}},
        {"type": "at", "data": {"qq": 42}},
        {"type": "face", "data": {"id": "1"}}
    ]))
    .expect("valid records");
    let message = IncomingMessage::new(sender(), MessageContent::from(records))
        .with_message_id(MessageId::new(3))
        .with_group(GroupId::new(100));
    let resolved = resolver.resolve_message(&message, &DefaultClock).await;

    assert_eq!(resolved.plain_text(), "hi @alice[emoji]");
    assert_eq!(resolved.message_id, MessageId::new(3));
    assert_eq!(resolved.group_id, Some(GroupId::new(100)));
    assert_eq!(resolved.sender, sender());
}

struct PokeHandler;

#[async_trait]
impl KindHandler for PokeHandler {
    async fn resolve(&self, tag: &CqTag, scope: &ResolveScope<'_>) -> String {
        format!(
            "[poke {} at depth {}]",
            tag.parameter("qq").unwrap_or("?"),
            scope.depth()
        )
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_handler_extends_dispatch(resolver: TagResolver) {
    let extended = resolver.clone().with_handler("poke", PokeHandler);
    let tag = CqTag::parse("[CQ:poke,qq=5]");

    assert!(!resolver.handles("poke"));
    assert!(extended.handles("poke"));
    assert_eq!(resolver.resolve(&tag, 0).await, "[poke]");
    assert_eq!(extended.resolve(&tag, 2).await, "[poke 5 at depth 2]");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bare_resolver_only_passes_text_through() {
    let resolver = TagResolver::bare(ResolverConfig::default());
    let segments = resolver
        .resolve_content(&MessageContent::from("x[CQ:face,id=1]"), None, 0)
        .await;

    assert_eq!(segments, ["x", "[face]"]);
}
