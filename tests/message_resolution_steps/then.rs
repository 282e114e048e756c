//! Then steps for message resolution BDD scenarios.

use super::world::ResolutionWorld;
use rstest_bdd_macros::then;

#[then(r#"the plain text is "{expected}""#)]
fn plain_text_is(world: &ResolutionWorld, expected: String) -> Result<(), eyre::Report> {
    let text = world.plain_text()?;
    let wanted = expected.replace("\\n", "\n");
    if text != wanted {
        return Err(eyre::eyre!("expected plain text {wanted:?}, found {text:?}"));
    }
    Ok(())
}

#[then(r#"the plain text contains "{fragment}""#)]
fn plain_text_contains(world: &ResolutionWorld, fragment: String) -> Result<(), eyre::Report> {
    let text = world.plain_text()?;
    if !text.contains(&fragment) {
        return Err(eyre::eyre!("expected {fragment:?} in {text:?}"));
    }
    Ok(())
}

#[then(r#"the plain text does not contain "{fragment}""#)]
fn plain_text_lacks(world: &ResolutionWorld, fragment: String) -> Result<(), eyre::Report> {
    let text = world.plain_text()?;
    if text.contains(&fragment) {
        return Err(eyre::eyre!("did not expect {fragment:?} in {text:?}"));
    }
    Ok(())
}

#[then("the plain text has {count:u64} lines")]
fn plain_text_has_lines(world: &ResolutionWorld, count: u64) -> Result<(), eyre::Report> {
    let text = world.plain_text()?;
    let lines = u64::try_from(text.lines().count())?;
    if lines != count {
        return Err(eyre::eyre!("expected {count} lines, found {lines} in {text:?}"));
    }
    Ok(())
}
