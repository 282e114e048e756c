//! Given steps for message resolution BDD scenarios.

use super::world::ResolutionWorld;
use cqtext::cqcode::{
    config::SelfIdentity,
    domain::{MessageId, ReplyContext, SenderInfo, UserId},
};
use rstest_bdd_macros::given;

#[given(r#"a resolver for the bot "{name}" with id {user_id:i64}"#)]
fn resolver_for_bot(world: &mut ResolutionWorld, name: String, user_id: i64) {
    world.self_identity = SelfIdentity::new(UserId::new(user_id), name);
}

#[given(r#"the image "{url}" is described as "{description}""#)]
fn image_is_described(world: &mut ResolutionWorld, url: String, description: String) {
    world.content = world.content.clone().with_description(url, description);
}

#[given(r#"user {user_id:i64} is called "{name}""#)]
fn user_is_called(world: &mut ResolutionWorld, user_id: i64, name: String) {
    world.identity.insert(UserId::new(user_id), name);
}

#[given(r#"the message replies to user {user_id:i64} who said "{text}""#)]
fn message_replies_to(world: &mut ResolutionWorld, user_id: i64, text: String) {
    world.reply = Some(ReplyContext::new(
        SenderInfo::new(UserId::new(user_id), "account"),
        MessageId::new(7),
        text,
    ));
}
