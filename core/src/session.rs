use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fire-and-forget audio cues emitted while the session advances.
/// Collaborators must never block on these; they carry no game meaning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Click,
    Spawn,
    Move,
    Clear,
    GameOver,
}

pub trait SoundPlayer {
    fn play(&self, cue: SoundCue);
}

/// Silent null collaborator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoSound;

impl SoundPlayer for NoSound {
    fn play(&self, _cue: SoundCue) {}
}

/// Best-effort high-score persistence. Implementations swallow their own
/// failures; the session treats the high score as session-local either way.
pub trait ScoreStore {
    fn load(&self) -> Option<u32>;
    fn save(&self, high_score: u32);
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoStore;

impl ScoreStore for NoStore {
    fn load(&self) -> Option<u32> {
        None
    }

    fn save(&self, _high_score: u32) {}
}

/// A validated move handed to the animation collaborator, waiting for
/// `finish_move`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingMove {
    pub from: Coord2,
    pub to: Coord2,
    pub color: BallColor,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No game started yet.
    #[default]
    Idle,
    /// Awaiting a selection.
    Ready,
    /// A ball is selected and awaiting a destination.
    Selected(Coord2),
    /// Animated transit in progress; input is locked.
    Moving(PendingMove),
    /// Clear-check/spawn pipeline pending; input is locked.
    Resolving,
    /// Terminal until `start` is called again.
    GameOver,
}

impl SessionPhase {
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Moving(_) | Self::Resolving)
    }

    pub const fn is_over(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// Animation request returned when a move begins: the rendering collaborator
/// slides `color` from `from` along `path` and reports completion through
/// `finish_move`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveStart {
    pub from: Coord2,
    pub to: Coord2,
    pub color: BallColor,
    pub path: Vec<Coord2>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Input arrived while locked, over, idle, or on a meaningless cell.
    Ignored,
    /// A ball was selected, or the selection was re-targeted.
    Selected(Coord2),
    /// No ball-free route to the requested destination; selection kept.
    NoPath,
    /// The move was validated and is now animating.
    MoveStarted(MoveStart),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Ignored,
    /// The moved ball completed at least one run; the spawn step is skipped.
    Cleared { points: u32 },
    /// Nothing cleared; the pending spawn plan executes next.
    SpawnPending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    Ignored,
    /// Spawns landed (possibly clearing runs of their own).
    Settled { spawned: Vec<Coord2>, points: u32 },
    /// The board filled up with no clear in this cycle.
    GameOver {
        spawned: Vec<Coord2>,
        final_score: u32,
        high_score: u32,
    },
}

/// Reference-free copy of everything a single-step undo restores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    board: Board,
    score: u32,
    plan: SpawnPlan,
}

/// The game-state machine. Owns the board exclusively and sequences
/// selection → path validation → move → clear-check → spawn → clear-check →
/// game-over check. All rendering stays outside: collaborators pull board
/// state and drive the Moving/Resolving handshake.
#[derive(Debug)]
pub struct GameSession<S = NoStore, A = NoSound> {
    config: GameConfig,
    board: Board,
    phase: SessionPhase,
    score: u32,
    high_score: u32,
    plan: SpawnPlan,
    snapshot: Option<Snapshot>,
    rng: SmallRng,
    store: S,
    sounds: A,
}

impl GameSession {
    /// Session with null collaborators; the high score stays session-local.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_collaborators(config, seed, NoStore, NoSound)
    }
}

impl<S: ScoreStore, A: SoundPlayer> GameSession<S, A> {
    pub fn with_collaborators(config: GameConfig, seed: u64, store: S, sounds: A) -> Self {
        let high_score = store.load().unwrap_or(0);
        Self {
            board: Board::new(config.size),
            phase: SessionPhase::Idle,
            score: 0,
            high_score,
            plan: SpawnPlan::default(),
            snapshot: None,
            rng: SmallRng::seed_from_u64(seed),
            config,
            store,
            sounds,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn selected(&self) -> Option<Coord2> {
        match self.phase {
            SessionPhase::Selected(coords) => Some(coords),
            _ => None,
        }
    }

    /// Colors previewed for the next spawn.
    pub fn preview_colors(&self) -> &[BallColor] {
        &self.plan.colors
    }

    /// Pre-assigned target cells of the next spawn.
    pub fn hints(&self) -> &[SpawnHint] {
        &self.plan.hints
    }

    pub fn can_undo(&self) -> bool {
        self.snapshot.is_some() && !self.phase.is_locked()
    }

    /// Starts (or restarts) a game: clears board and score, scatters the
    /// opening batch, plans the first preview.
    pub fn start(&mut self) {
        self.board.reset();
        self.score = 0;
        self.snapshot = None;

        let opening = scatter(
            &mut self.board,
            &BallColor::PALETTE,
            self.config.initial_spawn,
            &mut self.rng,
        );
        if !opening.is_empty() {
            self.sounds.play(SoundCue::Spawn);
        }

        self.plan = plan_next(
            &self.board,
            &BallColor::PALETTE,
            self.config.preview,
            &mut self.rng,
        );
        self.phase = SessionPhase::Ready;
        log::debug!("session started with {} opening balls", opening.len());
    }

    /// Single player-input entry point: selects balls, re-targets selections,
    /// and launches moves. Input while locked or after game over is ignored.
    pub fn click(&mut self, coords: Coord2) -> ClickOutcome {
        if self.phase.is_locked()
            || matches!(self.phase, SessionPhase::Idle | SessionPhase::GameOver)
        {
            return ClickOutcome::Ignored;
        }
        let Ok(cell) = self.board.get(coords) else {
            return ClickOutcome::Ignored;
        };

        match (cell, self.phase) {
            (Some(_), _) => {
                self.phase = SessionPhase::Selected(coords);
                ClickOutcome::Selected(coords)
            }
            (None, SessionPhase::Selected(from)) => self.try_move(from, coords),
            (None, _) => ClickOutcome::Ignored,
        }
    }

    fn try_move(&mut self, from: Coord2, to: Coord2) -> ClickOutcome {
        let Some(path) = find_path(&self.board, from, to) else {
            log::debug!("no path from {:?} to {:?}", from, to);
            return ClickOutcome::NoPath;
        };
        let Ok(Some(color)) = self.board.get(from) else {
            return ClickOutcome::Ignored;
        };

        self.snapshot = Some(Snapshot {
            board: self.board.clone(),
            score: self.score,
            plan: self.plan.clone(),
        });
        self.phase = SessionPhase::Moving(PendingMove { from, to, color });
        self.sounds.play(SoundCue::Move);
        ClickOutcome::MoveStarted(MoveStart {
            from,
            to,
            color,
            path,
        })
    }

    /// Applies the pending move once the animation collaborator reports
    /// completion. A clear returns straight to `Ready`, skipping this turn's
    /// spawn; otherwise the session stays locked until `resolve_spawn`.
    pub fn finish_move(&mut self) -> MoveOutcome {
        let SessionPhase::Moving(pending) = self.phase else {
            return MoveOutcome::Ignored;
        };

        self.board[pending.from] = None;
        self.board[pending.to] = Some(pending.color);

        let hit = matched_runs(&self.board, pending.to, self.config.min_run);
        if hit.is_empty() {
            self.phase = SessionPhase::Resolving;
            MoveOutcome::SpawnPending
        } else {
            let points = self.apply_clear(&hit);
            self.phase = SessionPhase::Ready;
            MoveOutcome::Cleared { points }
        }
    }

    /// Executes the pending spawn plan: materializes the hints, clears and
    /// scores any runs the new balls complete, replans the preview, and ends
    /// the game when the board fills without a clear.
    pub fn resolve_spawn(&mut self) -> SpawnOutcome {
        if !matches!(self.phase, SessionPhase::Resolving) {
            return SpawnOutcome::Ignored;
        }

        if self.plan.hints.is_empty() {
            self.plan = plan_next(
                &self.board,
                &BallColor::PALETTE,
                self.config.preview,
                &mut self.rng,
            );
        }

        let spawned = materialize(&mut self.board, &self.plan, &mut self.rng);
        if !spawned.is_empty() {
            self.sounds.play(SoundCue::Spawn);
        }

        let mut points = 0;
        for &coords in &spawned {
            // a previous clear in this batch may already have emptied the cell
            let hit = matched_runs(&self.board, coords, self.config.min_run);
            if !hit.is_empty() {
                points += self.apply_clear(&hit);
            }
        }

        self.plan = plan_next(
            &self.board,
            &BallColor::PALETTE,
            self.config.preview,
            &mut self.rng,
        );

        let spawned = spawned.into_vec();
        if self.board.is_full() && points == 0 {
            self.phase = SessionPhase::GameOver;
            self.sounds.play(SoundCue::GameOver);
            log::debug!("game over, final score {}", self.score);
            SpawnOutcome::GameOver {
                spawned,
                final_score: self.score,
                high_score: self.high_score,
            }
        } else {
            self.phase = SessionPhase::Ready;
            SpawnOutcome::Settled { spawned, points }
        }
    }

    /// Restores the pre-move snapshot. Single-use: a second undo without a
    /// new move is a no-op. Rejected while a move or spawn sequence is in
    /// flight.
    pub fn undo(&mut self) -> bool {
        if self.phase.is_locked() {
            return false;
        }
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };

        self.board = snapshot.board;
        self.score = snapshot.score;
        self.plan = snapshot.plan;
        self.phase = SessionPhase::Ready;
        self.sounds.play(SoundCue::Click);
        true
    }

    fn apply_clear(&mut self, hit: &RunHit) -> u32 {
        let points = hit.points(self.config.min_run);
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save(self.high_score);
        }
        for &coords in hit.cells() {
            self.board[coords] = None;
        }
        self.sounds.play(SoundCue::Clear);
        points
    }
}
