//! Caller-side sequences: issue navigation, wait for it, check the result.

use crate::error::PresentError;
use crate::game::Game;
use crate::models::score::ScoreRecord;
use crate::navigation::confirm::FrameDriver;
use crate::navigation::router::PresentationRequest;
use crate::navigation::view::{View, ViewInstance, ViewKind, ViewToken};

/// Presents scores one after another and keeps the last confirmed
/// destination.
///
/// Each wait is anchored on the highest token issued before the request, so
/// only a view pushed on behalf of that request counts as an arrival.
#[derive(Debug, Default)]
pub struct PresentationFlow {
    last: Option<ViewToken>,
}

impl PresentationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the last confirmed destination.
    pub fn last(&self) -> Option<ViewToken> {
        self.last
    }

    /// Presents `request` and waits for its destination view.
    ///
    /// After arrival the view must display the requested score and the
    /// active ruleset must be the score's.
    pub async fn present_and_confirm(
        &mut self,
        game: &mut Game,
        request: &PresentationRequest,
    ) -> Result<ViewInstance, PresentError> {
        let baseline = issued_baseline(game);
        let expected = game.present_score(request).await?;

        let arrived = game
            .confirmer()
            .await_arrival(game, request.mode.destination(), baseline)
            .await?;
        verify(game, &expected, &arrived)?;

        self.last = Some(arrived.token);
        Ok(arrived)
    }

    /// Starts a replay from the current loader and waits for gameplay.
    pub async fn start_replay_and_confirm(
        &mut self,
        game: &mut Game,
    ) -> Result<ViewInstance, PresentError> {
        let expected = match game.current_view().map(|v| &v.view) {
            Some(View::ReplayLoader { score, .. }) => score.clone(),
            _ => {
                return Err(PresentError::NotCurrent {
                    expected: ViewKind::ReplayLoader,
                });
            }
        };
        let baseline = issued_baseline(game);
        game.start_replay();

        let arrived = game
            .confirmer()
            .await_arrival(game, ViewKind::Gameplay, baseline)
            .await?;
        verify(game, &expected, &arrived)?;

        self.last = Some(arrived.token);
        Ok(arrived)
    }
}

fn issued_baseline(game: &Game) -> Option<ViewToken> {
    game.context().stack.last_issued()
}

fn verify(
    game: &Game,
    expected: &ScoreRecord,
    arrived: &ViewInstance,
) -> Result<(), PresentError> {
    let shown = arrived.view.score().ok_or(PresentError::DisplayedScoreMismatch)?;
    if !shown.is_same_score(expected) && shown.id != expected.id {
        log::warn!(
            "FLOW: {} {} shows score {} instead of {}",
            arrived.kind(),
            arrived.token,
            shown.id,
            expected.id
        );
        return Err(PresentError::DisplayedScoreMismatch);
    }

    let active = game.context().ruleset();
    if active != expected.ruleset {
        return Err(PresentError::RulesetMismatch {
            expected: expected.ruleset,
            active,
        });
    }
    Ok(())
}

/// Opens a song select and waits until its carousel is populated.
pub async fn enter_song_select(game: &mut Game) -> Result<ViewInstance, PresentError> {
    let baseline = issued_baseline(game);
    game.enter_song_select();

    let confirmer = game.confirmer();
    let arrived = confirmer
        .await_arrival(game, ViewKind::SongSelect, baseline)
        .await?;
    confirmer
        .wait_until(game, "song select items to be presented", |g| {
            matches!(
                g.current_view().map(|v| &v.view),
                Some(View::SongSelect(state)) if state.items_presented
            )
        })
        .await?;
    Ok(arrived)
}

/// Returns to the main menu and waits until it is current.
pub async fn return_to_menu(game: &mut Game) -> Result<(), PresentError> {
    game.return_to_menu();
    game.confirmer()
        .wait_until(game, "main menu to be current", |g| {
            g.current_view().is_some_and(|v| v.kind() == ViewKind::MainMenu)
                && g.scheduler().is_idle()
        })
        .await
}
