//! Headless host loop. Stands in for the presentation layer: each frame it
//! forwards move requests to the core, lets the engine think for the sides it
//! controls and reports what happened through events and the log.

use bevy::{
    app::AppExit,
    log::LogPlugin,
    prelude::*,
    tasks::{AsyncComputeTaskPool, Task},
};
use chess_core::{Color as ChessColor, Game, GameEvent, GameStatus, Move, MoveError, Square};
use chess_engine::{ChessAI, DEFAULT_SEARCH_DEPTH};

const DEFAULT_MAX_PLIES: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Engine,
    // Moves arrive as `MoveRequest` events
    External,
}

pub struct ChessHostPlugin {
    pub search_depth: u8,
    pub max_plies: u32,
    pub white: Controller,
    pub black: Controller,
}

impl Default for ChessHostPlugin {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            max_plies: DEFAULT_MAX_PLIES,
            white: Controller::Engine,
            black: Controller::Engine,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct HostConfig {
    pub search_depth: u8,
    pub max_plies: u32,
    pub white: Controller,
    pub black: Controller,
}

impl HostConfig {
    fn controller(&self, color: ChessColor) -> Controller {
        match color {
            ChessColor::White => self.white,
            ChessColor::Black => self.black,
        }
    }
}

#[derive(Resource)]
pub struct MatchState {
    pub game: Game,
    pub plies: u32,
    ai: ChessAI,
    ai_task: Option<Task<Option<Move>>>,
}

impl MatchState {
    pub fn new(search_depth: u8) -> Self {
        Self {
            game: Game::new(),
            plies: 0,
            ai: ChessAI::new(search_depth),
            ai_task: None,
        }
    }
}

/// A move submitted by an external controller.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
}

#[derive(Event, Debug, Clone)]
pub struct MoveApplied {
    pub color: ChessColor,
    pub mv: Move,
    pub events: Vec<GameEvent>,
    pub status: GameStatus,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct MoveRejected {
    pub request: MoveRequest,
    pub reason: MoveError,
}

impl Plugin for ChessHostPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((MinimalPlugins, LogPlugin::default()));
        add_match(
            app,
            HostConfig {
                search_depth: self.search_depth,
                max_plies: self.max_plies,
                white: self.white,
                black: self.black,
            },
        );
    }
}

/// Registers the match resources, events and systems without any runner or
/// logging plugins.
pub fn add_match(app: &mut App, config: HostConfig) {
    app.insert_resource(config)
        .insert_resource(MatchState::new(config.search_depth))
        .add_event::<MoveRequest>()
        .add_event::<MoveApplied>()
        .add_event::<MoveRejected>()
        .add_systems(
            Update,
            (handle_move_requests, update_ai, report_moves, end_match).chain(),
        );
}

fn apply(
    state: &mut MatchState,
    request: MoveRequest,
    applied: &mut EventWriter<MoveApplied>,
    rejected: &mut EventWriter<MoveRejected>,
) {
    let color = state.game.side_to_move();
    match state.game.submit_move(request.from, request.to) {
        Ok(outcome) => {
            state.plies += 1;
            applied.send(MoveApplied {
                color,
                mv: outcome.mv,
                events: outcome.events,
                status: outcome.status,
            });
        }
        Err(reason) => rejected.send(MoveRejected { request, reason }),
    }
}

fn handle_move_requests(
    config: Res<HostConfig>,
    mut state: ResMut<MatchState>,
    mut requests: EventReader<MoveRequest>,
    mut applied: EventWriter<MoveApplied>,
    mut rejected: EventWriter<MoveRejected>,
) {
    for request in requests.read() {
        if config.controller(state.game.side_to_move()) != Controller::External {
            rejected.send(MoveRejected {
                request: *request,
                reason: MoveError::NotYourTurn,
            });
            continue;
        }
        apply(&mut state, *request, &mut applied, &mut rejected);
    }
}

fn update_ai(
    config: Res<HostConfig>,
    mut state: ResMut<MatchState>,
    mut applied: EventWriter<MoveApplied>,
    mut rejected: EventWriter<MoveRejected>,
) {
    if state.game.status().is_over() || state.plies >= config.max_plies {
        return;
    }
    if config.controller(state.game.side_to_move()) != Controller::Engine {
        return;
    }

    if state.ai_task.is_none() {
        let game = state.game.clone();
        let ai = state.ai.clone();
        let thread_pool = AsyncComputeTaskPool::get();
        let task = thread_pool.spawn(async move { ai.choose_move(&game) });
        state.ai_task = Some(task);
    }

    if let Some(mut task) = state.ai_task.take() {
        match futures_lite::future::block_on(futures_lite::future::poll_once(&mut task)) {
            Some(Some(chess_move)) => {
                let request = MoveRequest {
                    from: chess_move.from,
                    to: chess_move.to,
                };
                apply(&mut state, request, &mut applied, &mut rejected);
            }
            Some(None) => {}
            None => state.ai_task = Some(task),
        }
    }
}

fn report_moves(mut applied: EventReader<MoveApplied>, mut rejected: EventReader<MoveRejected>) {
    for moved in applied.read() {
        info!("{:?} plays {}", moved.color, moved.mv);
        for event in &moved.events {
            match event {
                GameEvent::PieceCaptured { captured } => info!(
                    "captured {:?} {:?} on {}",
                    captured.color, captured.piece_type, captured.position
                ),
                GameEvent::CastlePerformed { color, side, .. } => {
                    info!("{:?} castles ({:?})", color, side)
                }
                GameEvent::EnPassantCaptured { captured, landing } => info!(
                    "en passant: pawn on {} taken, landing on {}",
                    captured.position, landing
                ),
                GameEvent::PawnPromoted { color, square } => {
                    info!("{:?} pawn promoted on {}", color, square)
                }
            }
        }
    }
    for refusal in rejected.read() {
        warn!(
            "move {}{} rejected: {}",
            refusal.request.from, refusal.request.to, refusal.reason
        );
    }
}

fn end_match(config: Res<HostConfig>, state: Res<MatchState>, mut exit: EventWriter<AppExit>) {
    let status = state.game.status();
    let finished = match status {
        GameStatus::Checkmate { winner } => {
            info!("checkmate, {:?} wins after {} plies", winner, state.plies);
            true
        }
        GameStatus::Stalemate => {
            info!("stalemate after {} plies", state.plies);
            true
        }
        GameStatus::Ongoing if state.plies >= config.max_plies => {
            info!("stopping at the {} ply limit", config.max_plies);
            true
        }
        GameStatus::Ongoing => false,
    };

    if finished {
        info!("final position:\n{}", state.game.snapshot());
        exit.send(AppExit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::event::Events;
    use chess_core::Snapshot;
    use std::time::Duration;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn test_app(white: Controller, black: Controller, max_plies: u32) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        add_match(
            &mut app,
            HostConfig {
                search_depth: 1,
                max_plies,
                white,
                black,
            },
        );
        app
    }

    fn start_from(app: &mut App, rows: &str, side_to_move: ChessColor, search_depth: u8) {
        let board = rows.parse::<Snapshot>().unwrap().to_board();
        let mut state = MatchState::new(search_depth);
        state.game = Game::from_board(board, side_to_move);
        app.insert_resource(state);
    }

    fn exit_requested(app: &App) -> bool {
        let events = app.world.resource::<Events<AppExit>>();
        events.get_reader().read(events).next().is_some()
    }

    // Steps the app until it asks to exit, waiting on engine tasks in between.
    fn run_until_exit(app: &mut App) -> bool {
        for _ in 0..2000 {
            app.update();
            if exit_requested(app) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn applied_moves(app: &App) -> Vec<Move> {
        let events = app.world.resource::<Events<MoveApplied>>();
        events.get_reader().read(events).map(|applied| applied.mv).collect()
    }

    #[test]
    fn external_requests_are_applied_in_turn() {
        let mut app = test_app(Controller::External, Controller::External, 10);
        app.world.send_event(MoveRequest { from: sq("e2"), to: sq("e4") });
        app.update();

        let state = app.world.resource::<MatchState>();
        assert_eq!(state.plies, 1);
        assert_eq!(state.game.side_to_move(), ChessColor::Black);
        assert_eq!(applied_moves(&app), vec![Move::new(sq("e2"), sq("e4"))]);
    }

    #[test]
    fn illegal_request_is_reported() {
        let mut app = test_app(Controller::External, Controller::External, 10);
        app.world.send_event(MoveRequest { from: sq("e2"), to: sq("e5") });
        app.update();

        let events = app.world.resource::<Events<MoveRejected>>();
        let reasons: Vec<MoveError> = events.get_reader().read(events).map(|r| r.reason).collect();
        assert_eq!(reasons, vec![MoveError::IllegalMove { from: sq("e2"), to: sq("e5") }]);
        assert_eq!(app.world.resource::<MatchState>().plies, 0);
    }

    #[test]
    fn engine_replies_to_external_move() {
        let mut app = test_app(Controller::External, Controller::Engine, 10);
        app.world.send_event(MoveRequest { from: sq("d2"), to: sq("d4") });

        for _ in 0..2000 {
            app.update();
            if app.world.resource::<MatchState>().plies >= 2 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        let state = app.world.resource::<MatchState>();
        assert_eq!(state.plies, 2);
        assert_eq!(state.game.side_to_move(), ChessColor::White);
    }

    #[test]
    fn request_for_engine_side_is_refused() {
        let mut app = test_app(Controller::Engine, Controller::External, 10);
        app.world.send_event(MoveRequest { from: sq("e2"), to: sq("e4") });
        app.update();

        let events = app.world.resource::<Events<MoveRejected>>();
        assert_eq!(events.get_reader().read(events).count(), 1);
    }

    #[test]
    fn engine_mate_ends_the_match() {
        let mut app = test_app(Controller::Engine, Controller::External, 10);
        start_from(
            &mut app,
            "......k.\n.....ppp\n........\n........\n........\n........\n........\nR.....K.",
            ChessColor::White,
            2,
        );

        assert!(run_until_exit(&mut app));
        let state = app.world.resource::<MatchState>();
        assert_eq!(state.plies, 1);
        assert_eq!(state.game.status(), GameStatus::Checkmate { winner: ChessColor::White });

        for _ in 0..5 {
            app.update();
        }
        let state = app.world.resource::<MatchState>();
        assert_eq!(state.plies, 1);
        assert!(state.ai_task.is_none());
        assert!(exit_requested(&app));
    }

    #[test]
    fn stalemate_position_exits_without_moving() {
        let mut app = test_app(Controller::Engine, Controller::Engine, 10);
        start_from(
            &mut app,
            "k.......\n........\n.Q......\n........\n........\n........\n........\n.......K",
            ChessColor::Black,
            1,
        );
        app.update();

        assert!(exit_requested(&app));
        let state = app.world.resource::<MatchState>();
        assert_eq!(state.game.status(), GameStatus::Stalemate);
        assert_eq!(state.plies, 0);
        assert!(state.ai_task.is_none());
    }

    #[test]
    fn engine_match_stops_at_ply_limit() {
        let mut app = test_app(Controller::Engine, Controller::Engine, 2);

        assert!(run_until_exit(&mut app));
        let state = app.world.resource::<MatchState>();
        assert_eq!(state.plies, 2);
        assert_eq!(state.game.status(), GameStatus::Ongoing);
        assert_eq!(state.game.side_to_move(), ChessColor::White);
    }
}
