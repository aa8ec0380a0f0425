//! Plain-text world summary.


use crate::game::{Faction, World};

/// Render a multi-line snapshot of the world.
///
/// ```text
/// Turn: 0/200 | Current: Red
/// Red base @ (1, 1) HP=30 | Bank=30
/// Blue base @ (10, 10) HP=30 | Bank=30
/// Resources: 8 nodes, 480 remaining
/// Units: Red worker#1 @ (2, 1), Blue worker#2 @ (9, 10)
/// ```
#[must_use]
pub fn render_summary(world: &World) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Turn: {}/{} | Current: {}\n",
        world.turn,
        world.config().max_turns,
        world.current_faction()
    ));
    for faction in Faction::ALL {
        let base = world.base(faction);
        out.push_str(&format!(
            "{faction} base @ {} HP={} | Bank={}\n",
            base.position,
            base.hp,
            world.bank.get(faction)
        ));
    }

    let remaining: u64 = world.resources.iter().map(|r| u64::from(r.remaining)).sum();
    out.push_str(&format!(
        "Resources: {} nodes, {remaining} remaining\n",
        world.resources.len()
    ));

    let units: Vec<String> = world
        .units
        .iter()
        .map(|u| format!("{} {}#{} @ {}", u.faction, u.unit_type, u.id, u.position))
        .collect();
    out.push_str(&format!("Units: {}", units.join(", ")));

    out
}
