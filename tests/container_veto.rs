//! Integration tests for container lock transitions and the two-stage
//! container listener protocol: a "before" veto leaves the container contents
//! and the item's location untouched; the "after" call is informational.

use std::sync::{Arc, Mutex};

use fabula::config::EngineConfig;
use fabula::world::attrs::entity as entity_attr;
use fabula::world::{
    ContainerListener, ContainerState, Engine, Entity, EntityKind, EntityLocation, Room,
    WorldState,
};

type CallLog = Arc<Mutex<Vec<String>>>;

struct Picky {
    calls: CallLog,
    veto_adds: bool,
}

impl ContainerListener for Picky {
    fn before_change(&mut self, _world: &WorldState, container: &str, item: &str, adding: bool) -> bool {
        self.calls
            .lock()
            .expect("log lock")
            .push(format!("before {container} {item} adding={adding}"));
        adding && self.veto_adds
    }

    fn after_change(&mut self, _world: &WorldState, container: &str, item: &str, adding: bool) {
        self.calls
            .lock()
            .expect("log lock")
            .push(format!("after {container} {item} adding={adding}"));
    }
}

fn vault_engine(key: Option<&str>) -> Engine {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut world = WorldState::new("vault");
    world.add_room(Room::new("vault", "The Vault", "vault", "Steel walls."));
    let mut strongbox = Entity::new(
        "strongbox",
        "strongbox",
        "A dented strongbox.",
        EntityLocation::Room("vault".into()),
    );
    strongbox.kind = EntityKind::Container(ContainerState {
        contents: Vec::new(),
        key: key.map(str::to_string),
        locked: false,
    });
    world.add_entity(strongbox);
    world.add_entity(
        Entity::new(
            "ledger",
            "worn ledger",
            "Columns of old figures.",
            EntityLocation::Inventory,
        )
        .with_attr(entity_attr::TAKEABLE),
    );
    world.add_entity(
        Entity::new(
            "small_key",
            "small key",
            "A small steel key.",
            EntityLocation::Inventory,
        )
        .with_attr(entity_attr::KEY),
    );
    Engine::new(world, EngineConfig::default())
}

#[test]
fn veto_before_add_leaves_everything_unchanged() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut engine = vault_engine(Some("small_key"));
    engine.add_container_listener(Box::new(Picky {
        calls: calls.clone(),
        veto_adds: true,
    }));

    let moved = engine.put_in_container("ledger", "strongbox").expect("put");
    assert!(!moved);
    assert!(engine.world.player.carries("ledger"));
    assert!(engine
        .world
        .entity("strongbox")
        .expect("box")
        .container()
        .expect("state")
        .contents
        .is_empty());
    // Only the before call fired; no after notification for a vetoed change.
    assert_eq!(
        *calls.lock().expect("log lock"),
        vec!["before strongbox ledger adding=true"]
    );
    engine.world.check_invariants();
}

#[test]
fn accepted_change_fires_before_and_after() {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut engine = vault_engine(Some("small_key"));
    engine.add_container_listener(Box::new(Picky {
        calls: calls.clone(),
        veto_adds: false,
    }));

    assert!(engine.put_in_container("ledger", "strongbox").expect("put"));
    assert_eq!(
        engine.world.entity("ledger").expect("ledger").location,
        EntityLocation::Container("strongbox".into())
    );
    assert_eq!(
        *calls.lock().expect("log lock"),
        vec![
            "before strongbox ledger adding=true",
            "after strongbox ledger adding=true",
        ]
    );

    assert!(engine.take_from_container("ledger", "strongbox").expect("take"));
    assert!(engine.world.player.carries("ledger"));
    engine.world.check_invariants();
}

#[test]
fn locked_container_refuses_content_changes() {
    let mut engine = vault_engine(Some("small_key"));
    assert!(engine.set_container_locked("strongbox", true).expect("lock"));
    engine.drain_output();

    assert!(!engine.put_in_container("ledger", "strongbox").expect("put"));
    assert_eq!(engine.drain_output(), vec!["The strongbox is locked."]);
    assert!(engine.world.player.carries("ledger"));
}

#[test]
fn locking_requires_the_key_in_inventory() {
    let mut engine = vault_engine(Some("small_key"));
    engine
        .move_entity("small_key", EntityLocation::Room("vault".into()))
        .expect("drop key");

    assert!(!engine.set_container_locked("strongbox", true).expect("lock"));
    assert_eq!(engine.drain_output(), vec!["You don't have the key."]);
    assert!(!engine
        .world
        .entity("strongbox")
        .expect("box")
        .container()
        .expect("state")
        .locked);
}

#[test]
fn keyless_container_can_never_be_locked() {
    let mut engine = vault_engine(None);
    assert!(!engine.set_container_locked("strongbox", true).expect("lock"));
    assert_eq!(engine.drain_output(), vec!["The strongbox has no lock."]);
}

#[test]
fn take_action_cannot_lift_items_out_of_a_locked_container() {
    let mut world = WorldState::new("vault");
    world.add_room(Room::new("vault", "The Vault", "vault", "Steel walls."));
    let mut strongbox = Entity::new(
        "strongbox",
        "strongbox",
        "A dented strongbox.",
        EntityLocation::Room("vault".into()),
    );
    // Configured locked from the start, with no key at all.
    strongbox.kind = EntityKind::Container(ContainerState {
        contents: Vec::new(),
        key: None,
        locked: true,
    });
    world.add_entity(strongbox);
    world.add_entity(
        Entity::new(
            "ledger",
            "worn ledger",
            "Columns of old figures.",
            EntityLocation::Container("strongbox".into()),
        )
        .with_attr(entity_attr::TAKEABLE),
    );
    let mut engine = Engine::new(world, EngineConfig::default());

    let outcome = engine.dispatch_action("Take", Some("ledger")).expect("dispatch");
    assert!(outcome.handled);
    assert!(!engine.world.player.carries("ledger"));
    assert_eq!(
        engine.world.entity("ledger").expect("ledger").location,
        EntityLocation::Container("strongbox".into())
    );
    assert_eq!(engine.drain_output(), vec!["The strongbox is locked."]);
    engine.world.check_invariants();
}

#[test]
fn taking_an_item_that_is_not_inside_is_refused() {
    let mut engine = vault_engine(Some("small_key"));
    assert!(!engine.take_from_container("ledger", "strongbox").expect("take"));
    assert_eq!(
        engine.drain_output(),
        vec!["The worn ledger isn't in the strongbox."]
    );
}
