//! Shared match state: the board, whose turn it is and the outcome, guarded
//! by one lock so that a move is never observed half applied.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info};

use crate::{
    board::Board,
    common::{Cell, MoveResult, Outcome, Player},
    config::{BOARD_SIZE, WIN_LINES},
};

/// Classify a board. The first complete line in [`WIN_LINES`] order decides
/// the winner; a full board without one is a draw.
pub fn compute_outcome(board: &Board) -> Outcome {
    for line in WIN_LINES {
        let [a, b, c] = line.map(|(r, col)| board.get(r, col).unwrap_or(Cell::Empty));
        if let Cell::Taken(p) = a {
            if a == b && b == c {
                return Outcome::Winner(p);
            }
        }
    }
    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::Undecided
    }
}

#[derive(Debug)]
struct GameState {
    board: Board,
    turn: Player,
    outcome: Outcome,
    /// Bumped on every transition into a decided outcome. Lets a waiter
    /// tell that it was released even if a reset has already undone the
    /// decision by the time it reacquires the lock.
    decisions: u64,
    last_decided: Outcome,
}

impl GameState {
    fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Player::A,
            outcome: Outcome::Undecided,
            decisions: 0,
            last_decided: Outcome::Undecided,
        }
    }

    fn released_outcome(&self) -> Outcome {
        if self.outcome.is_decided() {
            self.outcome
        } else {
            self.last_decided
        }
    }

    fn check_invariants(&self) {
        let (a, b) = self.board.mark_counts();
        assert!(
            a == b || a == b + 1,
            "mark counts diverged: A={} B={}",
            a,
            b
        );
        let expected_turn = if a == b { Player::A } else { Player::B };
        assert!(
            self.outcome.is_decided() || self.turn == expected_turn,
            "turn {:?} inconsistent with board ({} vs {})",
            self.turn,
            a,
            b
        );
        assert_eq!(
            self.outcome,
            compute_outcome(&self.board),
            "cached outcome out of sync with board"
        );
    }
}

/// A single tic-tac-toe match shared by any number of callers.
///
/// Every method takes `&self`; wrap the engine in an `Arc` to share it
/// between threads or tasks.
#[derive(Debug)]
pub struct GameEngine {
    state: Mutex<GameState>,
    decided: Condvar,
    /// Carries the decision counter to async waiters.
    #[cfg(feature = "net")]
    decisions_tx: tokio::sync::watch::Sender<u64>,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Create an engine with an empty board and player A to move.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GameState::new()),
            decided: Condvar::new(),
            #[cfg(feature = "net")]
            decisions_tx: tokio::sync::watch::channel(0).0,
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        // A poisoned lock means an invariant check already failed.
        self.state.lock().expect("game state lock poisoned")
    }

    /// Attempt a move for `player` at (row, column).
    ///
    /// Checks run in a fixed order and the first failure is returned with no
    /// state change: bounds, finished game, turn, then occupancy.
    pub fn submit_move(&self, row: usize, column: usize, player: Player) -> MoveResult {
        if row >= BOARD_SIZE || column >= BOARD_SIZE {
            return MoveResult::OutOfBounds;
        }
        let mut state = self.lock();
        if state.outcome.is_decided() {
            return MoveResult::GameFinished;
        }
        if player != state.turn {
            return MoveResult::WrongTurn;
        }
        match state.board.get(row, column) {
            Ok(Cell::Empty) => {}
            Ok(Cell::Taken(_)) => return MoveResult::SquareTaken,
            Err(_) => return MoveResult::OutOfBounds,
        }
        if state.board.set(row, column, Cell::Taken(player)).is_err() {
            return MoveResult::OutOfBounds;
        }
        state.turn = player.other();
        state.outcome = compute_outcome(&state.board);
        debug!("player {} played ({}, {})", player, row, column);
        state.check_invariants();

        if state.outcome.is_decided() {
            state.decisions += 1;
            state.last_decided = state.outcome;
            info!("match decided: {:?}", state.outcome);
            // Waiters are notified while the lock is held, so the outcome is
            // visible to them before this move reports success.
            self.decided.notify_all();
            #[cfg(feature = "net")]
            self.decisions_tx.send_replace(state.decisions);
        }
        MoveResult::Success
    }

    /// Rendered board. Never blocks on anything but the state lock.
    pub fn current_board(&self) -> String {
        self.lock().board.render()
    }

    /// Structured copy of the board.
    pub fn board(&self) -> Board {
        self.lock().board
    }

    /// Participant allowed to move next.
    pub fn current_turn(&self) -> Player {
        self.lock().turn
    }

    /// Current outcome; `Undecided` simply means no winner yet.
    pub fn check_winner(&self) -> Outcome {
        self.lock().outcome
    }

    /// Block until the match is decided and return the outcome.
    ///
    /// Returns immediately if it already is. The lock is released while
    /// sleeping, and a spurious wake-up just goes back to sleep.
    pub fn wait_for_outcome(&self) -> Outcome {
        let state = self.lock();
        let entered = state.decisions;
        let state = self
            .decided
            .wait_while(state, |s| !s.outcome.is_decided() && s.decisions == entered)
            .expect("game state lock poisoned");
        state.released_outcome()
    }

    /// Async form of [`wait_for_outcome`](Self::wait_for_outcome). Parks the
    /// task rather than a thread, and dropping the future abandons the wait.
    #[cfg(feature = "net")]
    pub async fn wait_for_outcome_async(&self) -> Outcome {
        // Subscribe before reading the state so a decision made in between
        // still marks the receiver as changed.
        let mut rx = self.decisions_tx.subscribe();
        let entered = self.lock().decisions;
        loop {
            {
                let state = self.lock();
                if state.outcome.is_decided() || state.decisions != entered {
                    return state.released_outcome();
                }
            }
            if rx.changed().await.is_err() {
                // The sender lives as long as the engine, which `&self` keeps alive.
                return self.lock().released_outcome();
            }
        }
    }

    /// Like [`wait_for_outcome`](Self::wait_for_outcome) but gives up after
    /// `timeout`, returning `None` if the match is still undecided.
    pub fn wait_for_outcome_timeout(&self, timeout: Duration) -> Option<Outcome> {
        let state = self.lock();
        let entered = state.decisions;
        let (state, _) = self
            .decided
            .wait_timeout_while(state, timeout, |s| {
                !s.outcome.is_decided() && s.decisions == entered
            })
            .expect("game state lock poisoned");
        if state.outcome.is_decided() || state.decisions != entered {
            Some(state.released_outcome())
        } else {
            None
        }
    }

    /// Start a fresh match. Callers already waiting keep waiting for the
    /// next decision.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.board.clear();
        state.turn = Player::A;
        state.outcome = Outcome::Undecided;
        info!("board reset");
    }
}
