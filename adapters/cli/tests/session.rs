use angkor_escape_cli::{Autopilot, GameConfig, Session};
use angkor_escape_core::{CellCoord, Event, HazardKind, MazeCell, MazeLayout, Phase};
use angkor_escape_world::query;

fn config() -> GameConfig {
    GameConfig::from_toml_str(
        r#"
            [session]
            seed = 17
            fps = 50
        "#,
    )
    .expect("test config parses")
}

fn corridor(hazard: Option<(u32, MazeCell)>) -> MazeLayout {
    let mut cells = vec![MazeCell::Wall; 7 * 3];
    for column in 0..7 {
        cells[7 + column] = MazeCell::Open;
    }
    if let Some((column, cell)) = hazard {
        cells[7 + column as usize] = cell;
    }
    MazeLayout::new(
        7,
        3,
        64.0,
        cells,
        CellCoord::new(0, 1),
        CellCoord::new(1, 1),
        CellCoord::new(6, 1),
    )
}

fn run_until<F>(session: &mut Session, max_ticks: usize, mut done: F) -> Vec<Event>
where
    F: FnMut(&Session) -> bool,
{
    let mut autopilot = Autopilot::new(session.frame_duration());
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        let input = autopilot.decide(session.world());
        let frame = session.step(input);
        events.extend(frame.events);
        if done(session) {
            break;
        }
    }
    events
}

#[test]
fn same_seed_replays_identical_frames() {
    let config = config();
    let mut first = Session::new(&config);
    let mut second = Session::new(&config);
    let mut first_pilot = Autopilot::new(first.frame_duration());
    let mut second_pilot = Autopilot::new(second.frame_duration());

    for _ in 0..1_500 {
        let first_frame = first.step(first_pilot.decide(first.world()));
        let second_frame = second.step(second_pilot.decide(second.world()));
        assert_eq!(first_frame, second_frame);
    }
}

#[test]
fn different_seeds_generate_different_mazes() {
    let first = Session::new(&config());
    let mut other = config();
    other.session.seed = 18;
    let second = Session::new(&other);

    assert_ne!(query::maze(first.world()), query::maze(second.world()));
}

#[test]
fn escaping_the_maze_opens_the_arena() {
    let mut session = Session::with_layout(&config(), corridor(None));

    let events = run_until(&mut session, 500, |session| {
        session.phase() == Phase::Arena
    });

    assert_eq!(session.phase(), Phase::Arena);
    let escaped = events
        .iter()
        .position(|event| {
            *event
                == Event::PhaseChanged {
                    phase: Phase::Escaped,
                }
        })
        .expect("player escaped");
    let entered = events
        .iter()
        .position(|event| *event == Event::ArenaEntered)
        .expect("arena entered");
    assert!(escaped < entered);
    assert!(!session.audio().footsteps_playing());
}

#[test]
fn autopilot_waits_out_active_fire() {
    let mut session = Session::with_layout(&config(), corridor(Some((3, MazeCell::Fire))));

    let events = run_until(&mut session, 1_000, |session| {
        session.phase() == Phase::Arena
    });

    assert_eq!(session.phase(), Phase::Arena);
    assert!(events.contains(&Event::HazardToggled {
        cell: CellCoord::new(3, 1),
        kind: HazardKind::Fire,
        active: false,
    }));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::PlayerDamaged { .. })),
        "autopilot walked into an active hazard"
    );
    assert_eq!(session.hp_bar().current(), 100);
}

#[test]
fn autopilot_defeats_a_passive_boss() {
    let mut config = config();
    config.arena.volley_interval_ms = 3_600_000;
    let mut session = Session::with_layout(&config, corridor(None));

    let events = run_until(&mut session, 30_000, Session::is_finished);

    assert_eq!(session.phase(), Phase::Victory);
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::BossDamaged { .. }))
        .count();
    assert_eq!(hits, 10);
    assert!(events.contains(&Event::SpearCollected));
    assert!(session.audio().cues_played() >= 10);
}

#[test]
fn hp_bar_tracks_player_health() {
    let mut session = Session::new(&config());
    let mut autopilot = Autopilot::new(session.frame_duration());

    for _ in 0..3_000 {
        let frame = session.step(autopilot.decide(session.world()));
        assert_eq!(session.hp_bar().current(), frame.player.health.get());
        if session.is_finished() {
            break;
        }
    }
}

#[test]
fn restart_loads_a_fresh_maze_at_full_health() {
    let mut session = Session::new(&config());
    let before = query::maze(session.world()).cloned();
    let _ = run_until(&mut session, 200, |_| false);
    let clock = query::clock(session.world());

    session.restart();

    assert_eq!(session.phase(), Phase::Maze);
    assert_ne!(query::maze(session.world()).cloned(), before);
    assert_eq!(query::player(session.world()).health.get(), 100);
    assert_eq!(session.hp_bar().current(), 100);
    assert_eq!(query::clock(session.world()), clock);
}
