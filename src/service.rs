//! Service adapter: maps the five boundary operations onto a shared
//! [`GameEngine`].

use std::sync::Arc;

use log::{debug, warn};

use crate::{
    common::{MoveResult, Outcome, Player},
    game::GameEngine,
    protocol::{RpcError, TttApi, INVALID_POSITION},
};

/// Local implementation of [`TttApi`] backed by an in-process engine.
#[derive(Debug, Clone)]
pub struct TttService {
    engine: Arc<GameEngine>,
}

impl TttService {
    pub fn new(engine: Arc<GameEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<GameEngine> {
        &self.engine
    }
}

impl Default for TttService {
    fn default() -> Self {
        Self::new(Arc::new(GameEngine::new()))
    }
}

#[async_trait::async_trait]
impl TttApi for TttService {
    async fn current_board(&self) -> Result<String, RpcError> {
        Ok(self.engine.current_board())
    }

    async fn play(&self, row: i32, column: i32, player: i32) -> Result<MoveResult, RpcError> {
        let player = Player::from_code(player).ok_or(RpcError::InvalidPlayer(player))?;
        // Negative coordinates can never be on the board; bounds are the
        // first check the engine makes, so answering here is equivalent.
        let result = match (usize::try_from(row), usize::try_from(column)) {
            (Ok(r), Ok(c)) => self.engine.submit_move(r, c, player),
            _ => MoveResult::OutOfBounds,
        };
        debug!("play ({}, {}) by {} -> {:?}", row, column, player, result);
        if result == MoveResult::OutOfBounds {
            warn!("rejected move outside the board: ({}, {})", row, column);
            return Err(RpcError::InvalidArgument(INVALID_POSITION.to_string()));
        }
        Ok(result)
    }

    async fn check_winner(&self) -> Result<Outcome, RpcError> {
        Ok(self.engine.check_winner())
    }

    async fn wait_for_winner(&self) -> Result<Outcome, RpcError> {
        Ok(self.engine.wait_for_outcome_async().await)
    }

    async fn reset(&self) -> Result<(), RpcError> {
        self.engine.reset();
        Ok(())
    }
}
