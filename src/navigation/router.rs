//! Decides where a presented score goes and queues the steps to get there.

use crate::database::{Database, ReplayStore};
use crate::error::PresentError;
use crate::identity::ScoreResolver;
use crate::logic::audio::PlaybackControl;
use crate::models::ruleset::Representation;
use crate::models::replay::ReplayData;
use crate::models::score::{ScoreLookup, ScoreRecord};
use crate::models::settings::Settings;
use crate::navigation::context::NavigationContext;
use crate::navigation::scheduler::{FrameScheduler, NavigationStep};
use crate::navigation::view::{View, ViewKind};
use crate::system::bus::{NavigationBus, NavigationEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// Show the results screen.
    Summary,
    /// Watch the stored replay.
    Replay,
}

impl PresentMode {
    /// Kind of the view pushed for this mode.
    pub fn destination(self) -> ViewKind {
        match self {
            PresentMode::Summary => ViewKind::Summary,
            PresentMode::Replay => ViewKind::ReplayLoader,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationRequest {
    pub score: ScoreLookup,
    pub mode: PresentMode,
}

impl PresentationRequest {
    pub fn summary(score: ScoreLookup) -> Self {
        Self {
            score,
            mode: PresentMode::Summary,
        }
    }

    pub fn replay(score: ScoreLookup) -> Self {
        Self {
            score,
            mode: PresentMode::Replay,
        }
    }
}

/// Collaborators the router reads and adjusts.
pub struct RouterEnv<'a, P: PlaybackControl> {
    pub db: &'a Database,
    pub replays: &'a ReplayStore,
    pub settings: &'a mut Settings,
    pub scheduler: &'a mut FrameScheduler,
    pub playback: &'a mut P,
    pub bus: &'a NavigationBus,
}

pub struct PresentationRouter;

impl PresentationRouter {
    /// Resolves the requested score, applies the context changes it needs
    /// and queues navigation toward its destination view.
    ///
    /// Returns as soon as the steps are queued. Arrival is observed
    /// separately by ticking frames.
    pub async fn present<P: PlaybackControl>(
        ctx: &mut NavigationContext,
        env: RouterEnv<'_, P>,
        request: &PresentationRequest,
    ) -> Result<ScoreRecord, PresentError> {
        let score = ScoreResolver::new(env.db).resolve(&request.score).await?;

        let not_presentable = || PresentError::BeatmapNotPresentable {
            beatmap_id: score.beatmap_id,
            ruleset: score.ruleset,
        };
        let beatmap = env
            .db
            .beatmap(score.beatmap_id)
            .await?
            .ok_or_else(not_presentable)?;
        let representation = beatmap
            .representation_in(score.ruleset)
            .ok_or_else(not_presentable)?;

        // Everything fallible happens before the context is touched.
        let filter_excludes_target = if ctx.filter().is_active() {
            let set = env.db.beatmapset(beatmap.set_id).await?;
            !set.is_some_and(|set| ctx.filter().matches(&set, &beatmap))
        } else {
            false
        };

        let destination = match request.mode {
            PresentMode::Summary => View::Summary {
                score: score.clone(),
            },
            PresentMode::Replay => {
                let replay = match env.replays.load_for(&score)? {
                    Some(replay) => replay,
                    None => {
                        log::warn!("ROUTER: Score {} has no stored replay", score.id);
                        ReplayData::empty()
                    }
                };
                View::ReplayLoader {
                    score: score.clone(),
                    replay,
                }
            }
        };

        if representation == Representation::Converted && !env.settings.show_converted_beatmaps {
            log::info!(
                "ROUTER: Enabling converted beatmaps to show {} on beatmap {}",
                score.ruleset,
                beatmap.id
            );
            env.settings.show_converted_beatmaps = true;
            ctx.invalidate();
            env.bus.publish(NavigationEvent::ConvertedBeatmapsEnabled);
        }

        if let Some(from) = ctx.set_ruleset(score.ruleset) {
            log::info!("ROUTER: Switching ruleset {} -> {}", from, score.ruleset);
            env.bus.publish(NavigationEvent::RulesetChanged {
                from,
                to: score.ruleset,
            });
        }
        ctx.select_beatmap(Some(beatmap.id));

        if filter_excludes_target {
            env.scheduler.schedule(NavigationStep::ClearFilter);
        }

        if env.playback.pause_if_playing() {
            log::debug!("ROUTER: Paused playback before navigating");
        }

        env.scheduler.schedule(NavigationStep::UnwindToHost);
        env.scheduler.schedule(NavigationStep::Push(destination));

        log::info!(
            "ROUTER: Presenting score {} as {} on beatmap {} ({})",
            score.id,
            request.mode.destination(),
            beatmap.id,
            score.ruleset
        );
        Ok(score)
    }
}
