//! The single live game session.
//!
//! A [`Session`] owns the [`Game`], the optional scoring session and at most
//! one in-flight AI computation. The computation runs on a worker thread
//! over a [`SearchRoot`] copy and reports back over a channel; until its move
//! has been applied every game-mutating call is rejected with
//! [`SessionError::Busy`].

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{Color, Point};
use crate::config::AiConfig;
use crate::constants::DEFAULT_KOMI;
use crate::game::{Game, GameState, MoveOutcome, Resignation};
use crate::policy::strategy_for;
use crate::rules::{IllegalMove, Move};
use crate::scoring::{ScoreReport, ScoringSession, Toggle};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("engine is thinking")]
    Busy,
    #[error("scoring in progress")]
    Scoring,
    #[error("not scoring")]
    NotScoring,
    #[error("no engine move requested")]
    NotThinking,
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),
    #[error("engine worker stopped without a move")]
    Worker,
}

/// A move chosen by the engine and applied to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMove {
    pub color: Color,
    pub mv: Move,
    pub captured: usize,
}

struct Pending {
    color: Color,
    rx: Receiver<Move>,
    handle: JoinHandle<()>,
}

pub struct Session {
    game: Game,
    komi: f32,
    rng: fastrand::Rng,
    pending: Option<Pending>,
    scoring: Option<ScoringSession>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Game::default(), DEFAULT_KOMI, None)
    }
}

impl Session {
    /// Wrap a game. With a seed, every engine decision is reproducible.
    pub fn new(game: Game, komi: f32, seed: Option<u64>) -> Self {
        Self {
            game,
            komi,
            rng: seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed),
            pending: None,
            scoring: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f32) {
        self.komi = komi;
    }

    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scoring(&self) -> Option<&ScoringSession> {
        self.scoring.as_ref()
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        if self.scoring.is_some() {
            return Err(SessionError::Scoring);
        }
        Ok(())
    }

    /// Discard the current game (and any scoring) and start a fresh one.
    pub fn new_game(&mut self, size: usize, first: Color) -> Result<&GameState, SessionError> {
        self.ensure_idle()?;
        self.scoring = None;
        self.game = Game::new(size, first);
        Ok(self.game.state())
    }

    pub fn attempt_move(&mut self, p: Point) -> Result<MoveOutcome, SessionError> {
        self.ensure_playing()?;
        Ok(self.game.attempt_move(p)?)
    }

    pub fn pass(&mut self) -> Result<&GameState, SessionError> {
        self.ensure_playing()?;
        Ok(self.game.pass())
    }

    /// Take back the last move. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<&GameState>, SessionError> {
        self.ensure_playing()?;
        Ok(self.game.undo())
    }

    pub fn resign(&mut self, color: Color) -> Result<Resignation, SessionError> {
        self.ensure_idle()?;
        Ok(self.game.resign(color))
    }

    /// Start computing a move for the side to move on a worker thread.
    pub fn request_ai_move(&mut self, config: &AiConfig) -> Result<(), SessionError> {
        self.ensure_playing()?;

        let root = self.game.search_root();
        let strategy = strategy_for(config);
        let seed = self.rng.u64(..);
        let color = root.to_play;
        let (tx, rx) = bounded(1);

        info!(color = %color, strategy = strategy.name(), "engine thinking");
        let handle = thread::spawn(move || {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mv = strategy.choose_move(&root, &mut rng);
            // The receiver only goes away with the session itself.
            let _ = tx.send(mv);
        });

        self.pending = Some(Pending { color, rx, handle });
        Ok(())
    }

    /// Apply the engine's move if it is ready. `Ok(None)` while still
    /// thinking or when nothing was requested.
    pub fn poll_ai(&mut self) -> Result<Option<EngineMove>, SessionError> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        match pending.rx.try_recv() {
            Ok(mv) => self.finish(pending, mv).map(Some),
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                Ok(None)
            }
            Err(TryRecvError::Disconnected) => {
                log_worker_exit(pending.handle);
                Err(SessionError::Worker)
            }
        }
    }

    /// Block until the engine's move is ready and apply it.
    pub fn wait_ai(&mut self) -> Result<EngineMove, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NotThinking)?;
        match pending.rx.recv() {
            Ok(mv) => self.finish(pending, mv),
            Err(_) => {
                log_worker_exit(pending.handle);
                Err(SessionError::Worker)
            }
        }
    }

    fn finish(&mut self, pending: Pending, mv: Move) -> Result<EngineMove, SessionError> {
        if pending.handle.join().is_err() {
            warn!("engine worker panicked after sending its move");
        }
        debug_assert_eq!(pending.color, self.game.to_play());

        let captured = self.game.play(mv)?.map_or(0, |o| o.captured);
        Ok(EngineMove {
            color: pending.color,
            mv,
            captured,
        })
    }

    /// Freeze the current board for dead-stone marking.
    pub fn enter_scoring(&mut self) -> Result<&ScoringSession, SessionError> {
        self.ensure_idle()?;
        if !self.game.is_end_of_play() {
            info!("scoring before both players passed");
        }
        Ok(&*self.scoring.insert(ScoringSession::new(self.game.board())))
    }

    pub fn toggle_dead(&mut self, p: Point) -> Result<Toggle, SessionError> {
        let scoring = self.scoring.as_mut().ok_or(SessionError::NotScoring)?;
        Ok(scoring.toggle_dead(p))
    }

    pub fn toggle_dead_group(&mut self, p: Point) -> Result<Toggle, SessionError> {
        let scoring = self.scoring.as_mut().ok_or(SessionError::NotScoring)?;
        Ok(scoring.toggle_dead_group(p))
    }

    pub fn compute_score(&self) -> Result<ScoreReport, SessionError> {
        let scoring = self.scoring.as_ref().ok_or(SessionError::NotScoring)?;
        Ok(scoring.compute_score(self.komi))
    }

    /// Leave scoring; dead marks are discarded and play may resume.
    pub fn exit_scoring(&mut self) -> Result<(), SessionError> {
        self.scoring.take().ok_or(SessionError::NotScoring)?;
        info!("scoring closed");
        Ok(())
    }
}

fn log_worker_exit(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("engine worker panicked before sending a move");
    } else {
        warn!("engine worker exited without sending a move");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Level;

    fn seeded() -> Session {
        Session::new(Game::new(9, Color::Black), 7.5, Some(1))
    }

    #[test]
    fn test_mutations_rejected_while_thinking() {
        let mut session = seeded();
        session
            .request_ai_move(&AiConfig::new(Level::Random, 10, 5))
            .unwrap();
        assert!(session.is_thinking());
        assert!(matches!(session.attempt_move((0, 0)), Err(SessionError::Busy)));
        assert!(matches!(session.pass(), Err(SessionError::Busy)));
        assert!(matches!(session.undo(), Err(SessionError::Busy)));
        assert!(matches!(session.resign(Color::Black), Err(SessionError::Busy)));
        assert!(matches!(session.new_game(9, Color::Black), Err(SessionError::Busy)));
        assert!(matches!(session.enter_scoring(), Err(SessionError::Busy)));
        assert!(matches!(
            session.request_ai_move(&AiConfig::default()),
            Err(SessionError::Busy)
        ));

        let played = session.wait_ai().unwrap();
        assert_eq!(played.color, Color::Black);
        assert!(!session.is_thinking());
        assert_eq!(session.state().to_play, Color::White);
        assert_eq!(session.game().history().len(), 2);
    }

    #[test]
    fn test_worker_panic_reported() {
        let mut session = seeded();
        let (tx, rx) = bounded::<Move>(1);
        let handle = thread::spawn(move || {
            drop(tx);
            panic!("strategy failed");
        });
        session.pending = Some(Pending {
            color: Color::Black,
            rx,
            handle,
        });
        assert!(matches!(session.wait_ai(), Err(SessionError::Worker)));
        assert!(!session.is_thinking());
        // The game is untouched and accepts moves again.
        assert_eq!(session.game().history().len(), 1);
        session.attempt_move((4, 4)).unwrap();
    }

    #[test]
    fn test_wait_without_request() {
        let mut session = seeded();
        assert!(matches!(session.wait_ai(), Err(SessionError::NotThinking)));
        assert!(session.poll_ai().unwrap().is_none());
    }

    #[test]
    fn test_poll_eventually_applies() {
        let mut session = seeded();
        session
            .request_ai_move(&AiConfig::new(Level::Heuristic, 10, 5))
            .unwrap();
        let played = loop {
            if let Some(m) = session.poll_ai().unwrap() {
                break m;
            }
            thread::yield_now();
        };
        assert_eq!(played.mv, Move::Place((4, 4)));
        assert_eq!(session.state().board.get((4, 4)), Some(Color::Black));
    }

    #[test]
    fn test_scoring_pauses_play() {
        let mut session = seeded();
        session.attempt_move((2, 2)).unwrap();
        session.enter_scoring().unwrap();
        assert!(matches!(session.attempt_move((3, 3)), Err(SessionError::Scoring)));
        assert_eq!(session.toggle_dead((2, 2)).unwrap(), Toggle::Marked);
        let report = session.compute_score().unwrap();
        assert_eq!(report.black.total, 0.0);
        assert_eq!(report.white.total, 7.5);
        // The live board keeps the stone.
        assert_eq!(session.state().board.get((2, 2)), Some(Color::Black));

        session.exit_scoring().unwrap();
        assert!(matches!(session.compute_score(), Err(SessionError::NotScoring)));
        session.attempt_move((3, 3)).unwrap();
    }

    #[test]
    fn test_illegal_move_reason() {
        let mut session = seeded();
        session.attempt_move((0, 0)).unwrap();
        assert!(matches!(
            session.attempt_move((0, 0)),
            Err(SessionError::Illegal(IllegalMove::Occupied))
        ));
    }
}
