//! Press-driven smithing worldtest
//!
//! Drives stations through full press strokes inside a `SmithingWorld` and
//! checks the craft/notify protocol end to end:
//! - presses anchored one or two blocks above are both detected
//! - one stroke commits one craft in rising-edge mode
//! - level mode keeps attempting while the head is down
//! - remote views mirror the authoritative state from sync packets

use autosmith_core::{GameMode, ItemKey, ItemStack};
use autosmith_world::{
    BlockPos, LevelEvent, MechanicalPress, RemoteStationView, SmithingRecipe, SmithingRecipeBook,
    SmithingWorld, TriggerMode, UseOutcome,
};

const STATION: BlockPos = BlockPos::new(0, 64, 0);

fn key(path: &str) -> ItemKey {
    ItemKey::parse(path).unwrap()
}

fn fill(world: &mut SmithingWorld, pos: BlockPos, items: [&str; 3]) {
    for item in items {
        let mut hand = Some(ItemStack::new(key(item), 1));
        let outcome = world.use_block(pos, &mut hand, GameMode::Survival);
        assert!(matches!(outcome, Some(UseOutcome::Placed { .. })));
    }
}

/// Template `t` upgrades itself forever, so repeated attempts are observable.
fn self_feeding_book() -> SmithingRecipeBook {
    let mut book = SmithingRecipeBook::new();
    book.add_recipe(SmithingRecipe {
        id: "reforge".into(),
        template: key("t"),
        base: key("b"),
        addition: key("a"),
        result: key("t"),
    });
    book
}

#[test]
fn press_two_above_drives_a_craft() {
    let mut world = SmithingWorld::new(SmithingRecipeBook::with_defaults(), TriggerMode::RisingEdge);
    world.add_station(STATION);
    fill(
        &mut world,
        STATION,
        ["netherite_upgrade_smithing_template", "diamond_boots", "netherite_ingot"],
    );
    world.add_press(STATION.above(2), MechanicalPress::new(256.0));
    world.press_mut(STATION.above(2)).unwrap().start();

    world.run(10);

    let slots = world.station(STATION).unwrap().slots();
    assert_eq!(slots.kind(0), Some(&key("netherite_boots")));
    assert_eq!(slots.occupied(), 1);
    assert_eq!(
        world.drain_events(),
        vec![LevelEvent::SmithingComplete {
            pos: STATION,
            result: key("netherite_boots"),
        }]
    );
}

#[test]
fn nearer_press_wins() {
    let mut world = SmithingWorld::new(SmithingRecipeBook::with_defaults(), TriggerMode::Level);
    world.add_station(STATION);
    fill(
        &mut world,
        STATION,
        ["netherite_upgrade_smithing_template", "diamond_hoe", "netherite_ingot"],
    );
    // Idle press one above shadows the running press two above.
    world.add_press(STATION.above(1), MechanicalPress::new(256.0));
    world.add_press(STATION.above(2), MechanicalPress::repeating(256.0));

    world.run(30);
    assert!(world.station(STATION).unwrap().slots().is_full());
    assert!(world.drain_events().is_empty());

    world.remove_press(STATION.above(1));
    world.run(30);
    assert_eq!(
        world.station(STATION).unwrap().slots().kind(0),
        Some(&key("netherite_hoe"))
    );
}

#[test]
fn rising_edge_commits_once_per_stroke() {
    let mut world = SmithingWorld::new(self_feeding_book(), TriggerMode::RisingEdge);
    world.add_station(STATION);
    world.add_press(STATION.above(1), MechanicalPress::new(64.0));
    fill(&mut world, STATION, ["t", "b", "a"]);
    world.press_mut(STATION.above(1)).unwrap().start();

    // Refill base and addition every tick while the press is mid-stroke.
    let mut crafts = 0;
    for _ in 0..60 {
        world.tick();
        crafts += world.drain_events().len();
        let slots = world.station(STATION).unwrap().slots();
        if slots.is_empty(1) {
            fill_remaining(&mut world);
        }
    }
    assert_eq!(crafts, 1);
}

#[test]
fn level_mode_recrafts_while_head_is_down() {
    let mut world = SmithingWorld::new(self_feeding_book(), TriggerMode::Level);
    world.add_station(STATION);
    world.add_press(STATION.above(1), MechanicalPress::new(64.0));
    fill(&mut world, STATION, ["t", "b", "a"]);
    world.press_mut(STATION.above(1)).unwrap().start();

    let mut crafts = 0;
    for _ in 0..60 {
        world.tick();
        crafts += world.drain_events().len();
        if world.station(STATION).unwrap().slots().is_empty(1) {
            fill_remaining(&mut world);
        }
    }
    assert!(crafts > 1, "level trigger should re-attempt, got {crafts}");
}

fn fill_remaining(world: &mut SmithingWorld) {
    for item in ["b", "a"] {
        world.use_block(STATION, &mut Some(ItemStack::new(key(item), 1)), GameMode::Survival);
    }
}

#[test]
fn remote_view_mirrors_server() {
    let mut server = SmithingWorld::new(SmithingRecipeBook::with_defaults(), TriggerMode::RisingEdge);
    let mut view = RemoteStationView::new();
    server.add_station(STATION);
    server.add_press(STATION.above(1), MechanicalPress::repeating(512.0));

    fill(
        &mut server,
        STATION,
        ["netherite_upgrade_smithing_template", "diamond_pickaxe", "netherite_ingot"],
    );
    for _ in 0..20 {
        server.tick();
        for packet in server.drain_sync() {
            let bytes = packet.encode().unwrap();
            view.apply_bytes(&bytes).unwrap();
        }
    }

    assert_eq!(
        view.get(STATION).unwrap(),
        server.station(STATION).unwrap().slots()
    );
    let shown = view.display(STATION, server.current_tick(), 0.0);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].item, key("netherite_pickaxe"));
}
