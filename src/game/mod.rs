//! Coordinator owning navigation state and its collaborators.
//!
//! `Game` is the only thing that ticks frames. Flows borrow it mutably for
//! their whole duration, so there is exactly one writer at any time.

pub mod flow;
pub mod library;

pub use flow::PresentationFlow;
pub use library::Library;

use crate::database::{BeatmapSetImport, Database, ReplayStore, ScoreImport};
use crate::error::PresentError;
use crate::logic::audio::{MusicController, PlaybackControl};
use crate::models::beatmap::BeatmapSetRecord;
use crate::models::ruleset::Ruleset;
use crate::models::score::ScoreRecord;
use crate::models::search::SearchFilter;
use crate::models::settings::Settings;
use crate::navigation::confirm::{ArrivalConfirmer, FrameDriver};
use crate::navigation::context::NavigationContext;
use crate::navigation::router::{PresentationRequest, PresentationRouter, RouterEnv};
use crate::navigation::scheduler::{FrameEnv, FrameScheduler, NavigationStep};
use crate::navigation::view::{SongSelectState, View, ViewInstance};
use crate::system::bus::{NavigationBus, NavigationEvent};

pub struct Game {
    ctx: NavigationContext,
    scheduler: FrameScheduler,
    db: Database,
    replays: ReplayStore,
    settings: Settings,
    library: Library,
    music: MusicController,
    bus: NavigationBus,
}

impl Game {
    /// Opens the configured database and starts on the main menu.
    pub async fn new(settings: Settings) -> Result<Self, PresentError> {
        log::info!("GAME: Opening database at {:?}", settings.database_path);
        let db = Database::new(&settings.database_path).await?;
        Self::with_database(settings, db).await
    }

    pub async fn with_database(settings: Settings, db: Database) -> Result<Self, PresentError> {
        let library = Library::load(&db).await?;
        let replays = ReplayStore::new(settings.replay_dir.clone());
        let bus = NavigationBus::new();
        let music = MusicController::new(&bus);

        Ok(Self {
            ctx: NavigationContext::new(settings.default_ruleset),
            scheduler: FrameScheduler::new(),
            db,
            replays,
            settings,
            library,
            music,
            bus,
        })
    }

    pub fn context(&self) -> &NavigationContext {
        &self.ctx
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn replays(&self) -> &ReplayStore {
        &self.replays
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn bus(&self) -> &NavigationBus {
        &self.bus
    }

    pub fn music(&self) -> &MusicController {
        &self.music
    }

    pub fn music_mut(&mut self) -> &mut MusicController {
        &mut self.music
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Confirmer configured from the current settings.
    pub fn confirmer(&self) -> ArrivalConfirmer {
        ArrivalConfirmer::new(
            self.settings.arrival_timeout(),
            self.settings.frame_interval(),
        )
    }

    pub async fn import_beatmap_set(
        &mut self,
        import: BeatmapSetImport,
    ) -> Option<BeatmapSetRecord> {
        let set = self.db.import_beatmap_set(import).await?;
        self.refresh_library().await;
        Some(set)
    }

    pub async fn import_score(&mut self, import: ScoreImport) -> Option<ScoreRecord> {
        self.db.import_score(&self.replays, import).await
    }

    async fn refresh_library(&mut self) {
        match Library::load(&self.db).await {
            Ok(library) => {
                self.library = library;
                self.ctx.invalidate();
            }
            Err(e) => log::error!("GAME: Failed to refresh library: {}", e),
        }
    }

    /// Queues a new song select on top of the current view.
    pub fn enter_song_select(&mut self) {
        self.scheduler
            .schedule(NavigationStep::Push(View::SongSelect(SongSelectState::default())));
    }

    /// Sets the song select search text.
    pub fn search(&mut self, query: &str) {
        log::debug!("GAME: Search '{}'", query);
        self.ctx.set_filter(SearchFilter::new(query));
    }

    pub fn set_ruleset(&mut self, ruleset: Ruleset) {
        if let Some(from) = self.ctx.set_ruleset(ruleset) {
            self.bus
                .publish(NavigationEvent::RulesetChanged { from, to: ruleset });
        }
    }

    pub fn set_show_converted(&mut self, show: bool) {
        if self.settings.show_converted_beatmaps != show {
            self.settings.show_converted_beatmaps = show;
            self.ctx.invalidate();
        }
    }

    /// Routes `request` and queues its navigation. Frames must be ticked
    /// (usually by a confirmer) for it to take effect.
    pub async fn present_score(
        &mut self,
        request: &PresentationRequest,
    ) -> Result<ScoreRecord, PresentError> {
        let env = RouterEnv {
            db: &self.db,
            replays: &self.replays,
            settings: &mut self.settings,
            scheduler: &mut self.scheduler,
            playback: &mut self.music,
            bus: &self.bus,
        };
        PresentationRouter::present(&mut self.ctx, env, request).await
    }

    /// Asks a current replay loader to start gameplay.
    pub fn start_replay(&mut self) {
        self.scheduler.schedule(NavigationStep::StartReplay);
    }

    /// Pauses playback and unwinds to the main menu.
    pub fn return_to_menu(&mut self) {
        if self.music.pause_if_playing() {
            log::debug!("GAME: Paused playback before returning to menu");
        }
        self.scheduler.schedule(NavigationStep::UnwindToRoot);
    }

    /// Queues a single exit of the current view.
    pub fn exit_current(&mut self) {
        self.scheduler.schedule(NavigationStep::Exit);
    }
}

impl FrameDriver for Game {
    fn tick(&mut self) -> Result<(), PresentError> {
        let env = FrameEnv {
            library: &self.library,
            settings: &self.settings,
            bus: &self.bus,
        };
        self.scheduler.run_frame(&mut self.ctx, &env)
    }

    fn current_view(&self) -> Option<&ViewInstance> {
        self.ctx.current()
    }
}
