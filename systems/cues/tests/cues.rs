use std::time::Duration;

use snake_arcade_core::{Cell, Command, Cue, Direction, Event, FoodKind, RoundConfig};
use snake_arcade_system_cues::{Config, Cues};
use snake_arcade_world::{self as world, scaffolding, World};

const TICK: Duration = Duration::from_millis(100);

fn round(lives: u32) -> World {
    let config = RoundConfig {
        starting_lives: lives,
        duration_limit: None,
        initial_direction: Some(Direction::Right),
        ..RoundConfig::default()
    };
    World::new(config).expect("valid round")
}

fn drive(world: &mut World, cues: &mut Cues, commands: &[Command]) -> Vec<Cue> {
    let mut out = Vec::new();
    for command in commands {
        let mut events = Vec::new();
        world::apply(world, *command, &mut events);
        cues.handle(&events, &mut out);
    }
    out
}

#[test]
fn eating_and_crashing_produce_cues_in_event_order() {
    let mut world = round(2);
    let mut cues = Cues::default();
    scaffolding::place_food(&mut world, Cell::new(21, 17), FoodKind::Special);
    let _ = scaffolding::place_hazard(&mut world, Cell::new(22, 17));

    let out = drive(
        &mut world,
        &mut cues,
        &[
            Command::Steer {
                direction: Direction::Right,
            },
            Command::Tick { dt: TICK },
            Command::Tick { dt: TICK },
        ],
    );

    assert_eq!(
        out,
        vec![Cue::Moved, Cue::AteSpecial, Cue::Moved, Cue::LostLife]
    );
}

#[test]
fn final_crash_plays_the_death_cue() {
    let mut world = round(1);
    let mut cues = Cues::new(Config::new(Duration::from_millis(100)));
    scaffolding::place_food(&mut world, Cell::new(5, 5), FoodKind::Normal);

    let mut commands = vec![Command::Steer {
        direction: Direction::Right,
    }];
    commands.extend(std::iter::repeat(Command::Tick { dt: TICK }).take(25));
    let out = drive(&mut world, &mut cues, &commands);

    // (20,17) reaches x = 39 after 19 moves; the 20th step leaves the board.
    assert_eq!(out.iter().filter(|cue| **cue == Cue::Moved).count(), 19);
    assert_eq!(out.last(), Some(&Cue::Died));
    assert!(!out.contains(&Cue::LostLife));
}

#[test]
fn fast_ticks_thin_out_movement_cues() {
    let mut world = round(2);
    let mut cues = Cues::default();
    scaffolding::place_food(&mut world, Cell::new(5, 5), FoodKind::Normal);

    let mut commands = vec![Command::Steer {
        direction: Direction::Right,
    }];
    commands.extend(
        std::iter::repeat(Command::Tick {
            dt: Duration::from_millis(50),
        })
        .take(10),
    );
    let out = drive(&mut world, &mut cues, &commands);

    assert_eq!(out, vec![Cue::Moved; 5]);
}

#[test]
fn cue_assets_match_sound_names() {
    let names: Vec<_> = [
        Cue::Moved,
        Cue::AteNormal,
        Cue::AteSpecial,
        Cue::LostLife,
        Cue::Died,
    ]
    .into_iter()
    .map(Cue::asset_name)
    .collect();

    assert_eq!(names, ["move", "eat", "special_eat", "lose_life", "death"]);

    let mut cues = Cues::default();
    let mut out = Vec::new();
    cues.handle(&[Event::SnakeDied], &mut out);
    assert_eq!(out, [Cue::Died]);
}
