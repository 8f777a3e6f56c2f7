//! Room and inventory description formatting.
//!
//! Pure formatting over the world graph: darkness, concealed entities,
//! worn/equipped suffixes, and exit listings with override labels. The
//! presentation layer owns layout and translation; these helpers only decide
//! what is visible and in what order.

use super::attrs::entity as entity_attr;
use super::errors::WorldError;
use super::state::WorldState;
use super::types::Direction;

/// Shown instead of a room description when the room is dark and no light
/// source is in scope.
pub const DARKNESS: &str = "It is pitch dark here.";

/// Describe the player's current room: name, description (or darkness),
/// visible entities, and open exits.
pub fn describe_room(world: &WorldState) -> Result<Vec<String>, WorldError> {
    let room = world.current_room()?;
    let mut lines = vec![room.name.clone()];
    if !world.room_is_lit(&room.id)? {
        lines.push(DARKNESS.to_string());
        return Ok(lines);
    }
    lines.push(room.description.clone());
    for id in &room.entities {
        let entity = world.entity(id)?;
        if entity.attrs.has(entity_attr::CONCEALED) {
            continue;
        }
        lines.push(format!("You see {} here.", entity.list_name));
    }
    let mut exits = Vec::new();
    for dir in Direction::ALL {
        let slot = &room.exits[dir.slot()];
        let Some(to) = &slot.to else {
            continue;
        };
        let label = match &slot.label {
            Some(label) => label.clone(),
            None => world.room(to)?.exit_name.clone(),
        };
        exits.push(format!("{} ({})", label, dir.label()));
    }
    if !exits.is_empty() {
        lines.push(format!("Exits: {}", exits.join(", ")));
    }
    Ok(lines)
}

/// List the player's inventory with worn/equipped suffixes.
pub fn format_inventory(world: &WorldState) -> Result<Vec<String>, WorldError> {
    if world.player.inventory.is_empty() {
        return Ok(vec!["You are carrying nothing.".to_string()]);
    }
    let mut lines = Vec::new();
    for id in &world.player.inventory {
        let entity = world.entity(id)?;
        let mut line = entity.list_name.clone();
        if world.player.is_worn(id) {
            line.push_str(" (worn)");
        }
        if world.player.is_equipped(id) {
            line.push_str(" (equipped)");
        }
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::attrs::{entity as entity_attr, room as room_attr};
    use crate::world::types::{Entity, EntityLocation, Room};

    fn world_with_cloak() -> WorldState {
        let mut world = WorldState::new("foyer");
        world.add_room(
            Room::new("foyer", "Foyer of the Opera House", "foyer", "A grand foyer.")
                .with_exit(Direction::South, "bar"),
        );
        world.add_room(Room::new("bar", "Foyer Bar", "bar", "A rough bar."));
        world.add_entity(
            Entity::new(
                "cloak",
                "velvet cloak",
                "A cloak of deepest black.",
                EntityLocation::Inventory,
            )
            .with_attr(entity_attr::WEARABLE),
        );
        world
    }

    #[test]
    fn describe_lists_exits_by_short_name() {
        let world = world_with_cloak();
        let lines = describe_room(&world).expect("describe");
        assert_eq!(lines[0], "Foyer of the Opera House");
        assert!(lines.iter().any(|l| l == "Exits: bar (south)"));
    }

    #[test]
    fn dark_room_hides_everything() {
        let mut world = world_with_cloak();
        world.room_mut("foyer").expect("room").attrs.set(room_attr::DARK);
        let lines = describe_room(&world).expect("describe");
        assert_eq!(lines, vec!["Foyer of the Opera House".to_string(), DARKNESS.to_string()]);
    }

    #[test]
    fn concealed_entities_are_not_listed() {
        let mut world = world_with_cloak();
        world.add_entity(
            Entity::new(
                "message",
                "scrawled message",
                "Scrawled in the sawdust.",
                EntityLocation::Room("foyer".into()),
            )
            .with_attr(entity_attr::CONCEALED),
        );
        let lines = describe_room(&world).expect("describe");
        assert!(!lines.iter().any(|l| l.contains("scrawled message")));
    }

    #[test]
    fn inventory_carries_worn_suffix() {
        let mut world = world_with_cloak();
        world.player.worn.push("cloak".to_string());
        let lines = format_inventory(&world).expect("inventory");
        assert_eq!(lines, vec!["velvet cloak (worn)".to_string()]);
    }
}
