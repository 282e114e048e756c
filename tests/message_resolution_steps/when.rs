//! When steps for message resolution BDD scenarios.

use super::world::{ResolutionWorld, run_async};
use cqtext::cqcode::domain::{IncomingMessage, SenderInfo, UserId, escape};
use mockable::DefaultClock;
use rstest_bdd_macros::when;
use serde_json::json;

fn sender() -> SenderInfo {
    SenderInfo::new(UserId::new(1), "poster")
}

fn resolve(world: &mut ResolutionWorld, message: IncomingMessage) {
    let resolver = world.resolver();
    world.resolved = Some(run_async(resolver.resolve_message(&message, &DefaultClock)));
}

#[when(r#"the raw message "{raw}" is resolved"#)]
fn raw_message_is_resolved(world: &mut ResolutionWorld, raw: String) {
    let message = world
        .reply
        .clone()
        .into_iter()
        .fold(IncomingMessage::new(sender(), raw), IncomingMessage::with_reply);
    resolve(world, message);
}

#[when(r#"a forward bundle from "{outer}" that forwards a bundle from "{inner}" is resolved"#)]
fn nested_forward_is_resolved(world: &mut ResolutionWorld, outer: String, inner: String) {
    let inner_bundle = json!([{"sender": {"nickname": inner}, "raw_message": "deep"}]);
    let inner_tag = format!("[CQ:forward,content={}]", escape(&inner_bundle.to_string()));
    let outer_bundle = json!([{"sender": {"nickname": outer}, "raw_message": inner_tag}]);
    let outer_tag = format!("[CQ:forward,content={}]", escape(&outer_bundle.to_string()));
    resolve(world, IncomingMessage::new(sender(), outer_tag));
}
