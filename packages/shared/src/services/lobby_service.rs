use std::sync::Arc;
use tracing::debug;

use crate::models::game::{Game, GameStatus};
use crate::repositories::game_repository::{GameIndex, GameRepository};
use crate::services::errors::game_service_errors::GameServiceError;

/// Read-only listings over the participant indexes.
#[derive(Clone)]
pub struct LobbyService {
    repository: Arc<dyn GameRepository + Send + Sync>,
    page_size: usize,
}

impl LobbyService {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>, page_size: usize) -> Self {
        LobbyService {
            repository,
            page_size,
        }
    }

    /// Pending invites addressed to `user`, most recent first.
    pub async fn list_invites(&self, user: &str) -> Result<Vec<Game>, GameServiceError> {
        let user = user.trim();
        if user.is_empty() {
            return Ok(Vec::new());
        }

        let invites = self
            .repository
            .query_games(GameIndex::Opponent, user, GameStatus::Pending, self.page_size)
            .await?;
        debug!("{} pending invite(s) for {}", invites.len(), user);
        Ok(invites)
    }

    /// Games in `status` where `user` is host or opponent. Both indexes are
    /// queried, merged by recency and capped at the page size.
    pub async fn list_games_with_status(
        &self,
        user: &str,
        status: GameStatus,
    ) -> Result<Vec<Game>, GameServiceError> {
        let user = user.trim();
        if user.is_empty() {
            return Ok(Vec::new());
        }

        let (hosted, invited) = tokio::try_join!(
            self.repository
                .query_games(GameIndex::Host, user, status, self.page_size),
            self.repository
                .query_games(GameIndex::Opponent, user, status, self.page_size),
        )?;

        let mut games: Vec<Game> = hosted.into_iter().chain(invited).collect();
        games.sort_by(|a, b| {
            b.status_at
                .cmp(&a.status_at)
                .then_with(|| b.game_id.cmp(&a.game_id))
        });
        games.truncate(self.page_size);

        debug!("{} {} game(s) for {}", games.len(), status, user);
        Ok(games)
    }
}
