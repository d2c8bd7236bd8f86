use rvsrg_present::database::{BeatmapImport, BeatmapSetImport, Database, ReplayStore, ScoreImport};
use rvsrg_present::game::flow;
use rvsrg_present::logic::PlaybackControl;
use rvsrg_present::models::{
    BeatmapSetRecord, ReplayData, Ruleset, ScoreLookup, ScoreRecord, Settings,
};
use rvsrg_present::navigation::View;
use rvsrg_present::navigation::ViewKind;
use rvsrg_present::system::bus::NavigationEvent;
use rvsrg_present::{FrameDriver, Game, PresentError, PresentationFlow, PresentationRequest};
use tempfile::TempDir;

struct Harness {
    game: Game,
    set: BeatmapSetRecord,
    _dir: TempDir,
}

impl Harness {
    async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    async fn with_settings(configure: impl FnOnce(&mut Settings)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings {
            replay_dir: dir.path().join("replays"),
            frame_rate: 1000,
            arrival_timeout_ms: 2_000,
            ..Settings::default()
        };
        configure(&mut settings);

        let db = Database::in_memory().await.unwrap();
        let mut game = Game::with_database(settings, db).await.unwrap();
        let set = game
            .import_beatmap_set(BeatmapSetImport {
                online_id: Some(241526),
                hash: None,
                artist: "SomeArtist".to_string(),
                title: "import".to_string(),
                author: "SomeAuthor".to_string(),
                beatmaps: vec![
                    BeatmapImport {
                        online_id: Some(1),
                        difficulty_name: "Easy".to_string(),
                        ruleset: Ruleset::Osu,
                    },
                    BeatmapImport {
                        online_id: Some(2),
                        difficulty_name: "4K".to_string(),
                        ruleset: Ruleset::Mania,
                    },
                ],
            })
            .await
            .unwrap();

        Self {
            game,
            set,
            _dir: dir,
        }
    }

    fn beatmap_id(&self, ruleset: Ruleset) -> i64 {
        self.set
            .beatmaps
            .iter()
            .find(|b| b.ruleset == ruleset)
            .map(|b| b.id)
            .unwrap()
    }

    async fn import(&mut self, import: ScoreImport) -> ScoreRecord {
        self.game.import_score(import).await.unwrap()
    }

    async fn native_score(&mut self, ruleset: Ruleset) -> ScoreRecord {
        let beatmap_id = self.beatmap_id(ruleset);
        self.import(ScoreImport::new(beatmap_id, ruleset)).await
    }

    fn kinds(&self) -> Vec<ViewKind> {
        self.game.context().stack.kinds()
    }

    fn shown_score(&self) -> Option<ScoreRecord> {
        self.game
            .current_view()
            .and_then(|v| v.view.score().cloned())
    }
}

#[tokio::test]
async fn present_from_main_menu_same_ruleset() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Osu).await;

    let arrived = PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap();

    assert_eq!(arrived.kind(), ViewKind::Summary);
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu, ViewKind::Summary]);
    assert_eq!(h.shown_score().map(|s| s.id), Some(score.id));
    assert_eq!(h.game.context().ruleset(), Ruleset::Osu);
}

#[tokio::test]
async fn present_from_main_menu_different_ruleset() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Mania).await;

    PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap();

    assert_eq!(h.game.context().ruleset(), Ruleset::Mania);
    assert!(h.game.bus().drain().contains(&NavigationEvent::RulesetChanged {
        from: Ruleset::Osu,
        to: Ruleset::Mania,
    }));
}

#[tokio::test]
async fn present_from_song_select() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Osu).await;
    flow::enter_song_select(&mut h.game).await.unwrap();

    PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap();

    assert_eq!(
        h.kinds(),
        vec![ViewKind::MainMenu, ViewKind::SongSelect, ViewKind::Summary]
    );
}

#[tokio::test]
async fn present_from_song_select_with_filter_matching_nothing() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Osu).await;
    h.game.search("fdsajkl;fgewq");
    flow::enter_song_select(&mut h.game).await.unwrap();
    assert!(matches!(
        h.game.current_view().map(|v| &v.view),
        Some(View::SongSelect(state)) if state.visible_beatmaps.is_empty()
    ));

    PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap();

    assert!(!h.game.context().filter().is_active());
    assert!(h.game.bus().drain().contains(&NavigationEvent::FilterCleared {
        query: "fdsajkl;fgewq".to_string(),
    }));
}

#[tokio::test]
async fn present_converted_score_with_converts_hidden() {
    let mut h = Harness::with_settings(|s| s.show_converted_beatmaps = false).await;
    let osu_beatmap = h.beatmap_id(Ruleset::Osu);
    let score = h.import(ScoreImport::new(osu_beatmap, Ruleset::Catch)).await;
    flow::enter_song_select(&mut h.game).await.unwrap();

    PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap();

    assert!(h.game.settings().show_converted_beatmaps);
    assert_eq!(h.game.context().ruleset(), Ruleset::Catch);
    assert_eq!(h.game.context().selected_beatmap(), Some(osu_beatmap));
    assert!(
        h.game
            .bus()
            .drain()
            .contains(&NavigationEvent::ConvertedBeatmapsEnabled)
    );
}

#[tokio::test]
async fn native_beatmap_of_other_ruleset_is_not_presentable() {
    let mut h = Harness::new().await;
    let mania_beatmap = h.beatmap_id(Ruleset::Mania);
    let score = h.import(ScoreImport::new(mania_beatmap, Ruleset::Osu)).await;

    let err = PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap_err();

    match err {
        PresentError::BeatmapNotPresentable { beatmap_id, ruleset } => {
            assert_eq!(beatmap_id, mania_beatmap);
            assert_eq!(ruleset, Ruleset::Osu);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu]);
}

#[tokio::test]
async fn same_online_id_with_different_hashes() {
    let mut h = Harness::new().await;
    let beatmap_id = h.beatmap_id(Ruleset::Osu);
    let imported = |hash: &str| {
        ScoreImport::new(beatmap_id, Ruleset::Osu)
            .with_hash(hash)
            .with_online_id(1)
    };
    let first = h.import(imported("a")).await;
    let second = h.import(imported("b")).await;

    let mut presenter = PresentationFlow::new();
    for (lookup, expected) in [
        (ScoreLookup::by_hash("a"), first.id),
        (ScoreLookup::by_hash("b"), second.id),
        (ScoreLookup::by_online_id(1), second.id),
    ] {
        presenter
            .present_and_confirm(&mut h.game, &PresentationRequest::summary(lookup))
            .await
            .unwrap();
        assert_eq!(h.shown_score().map(|s| s.id), Some(expected));
    }
    assert_eq!(h.shown_score().map(|s| s.id), Some(second.id));
}

#[tokio::test]
async fn refetch_ignores_empty_hash() {
    let mut h = Harness::new().await;
    let beatmap_id = h.beatmap_id(Ruleset::Osu);
    h.import(
        ScoreImport::new(beatmap_id, Ruleset::Osu)
            .with_hash("")
            .with_online_id(-1),
    )
    .await;
    let target = h
        .import(
            ScoreImport::new(beatmap_id, Ruleset::Osu)
                .with_hash("deadbeef")
                .with_online_id(3),
        )
        .await;

    let lookup = ScoreLookup {
        hash: String::new(),
        online_id: Some(3),
        ruleset: Some(Ruleset::Osu),
    };
    PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(lookup))
        .await
        .unwrap();

    let shown = h.shown_score().unwrap();
    assert_eq!(shown.id, target.id);
    assert_eq!(shown.hash, "deadbeef");
}

#[tokio::test]
async fn repeated_presentation_creates_new_instances() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Osu).await;
    let request = PresentationRequest::summary(score.to_lookup());
    let mut presenter = PresentationFlow::new();

    let first = presenter.present_and_confirm(&mut h.game, &request).await.unwrap();
    let second = presenter.present_and_confirm(&mut h.game, &request).await.unwrap();

    assert!(second.token > first.token);
    assert_eq!(presenter.last(), Some(second.token));
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu, ViewKind::Summary]);
}

#[tokio::test]
async fn replay_mode_goes_through_loader_into_gameplay() {
    let mut h = Harness::new().await;
    let beatmap_id = h.beatmap_id(Ruleset::Mania);
    let mut replay = ReplayData::new(1.5);
    replay.add_press(1_000, 2);
    replay.add_release(90_000, 2);
    let score = h
        .import(ScoreImport::new(beatmap_id, Ruleset::Mania).with_replay(replay.clone()))
        .await;
    assert!(score.has_replay);

    let mut presenter = PresentationFlow::new();
    let loader = presenter
        .present_and_confirm(&mut h.game, &PresentationRequest::replay(score.to_lookup()))
        .await
        .unwrap();
    assert!(matches!(&loader.view, View::ReplayLoader { replay: r, .. } if *r == replay));

    let gameplay = presenter.start_replay_and_confirm(&mut h.game).await.unwrap();
    assert!(matches!(&gameplay.view, View::Gameplay { replay: r, .. } if *r == replay));
    assert_eq!(
        h.kinds(),
        vec![ViewKind::MainMenu, ViewKind::ReplayLoader, ViewKind::Gameplay]
    );
}

#[tokio::test]
async fn replay_mode_without_stored_replay_uses_empty_replay() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Osu).await;

    let loader = PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::replay(score.to_lookup()))
        .await
        .unwrap();
    assert!(matches!(&loader.view, View::ReplayLoader { replay, .. } if replay.is_empty()));
}

#[tokio::test]
async fn unresolvable_lookups_fail_fast() {
    let mut h = Harness::new().await;
    let mut presenter = PresentationFlow::new();

    let err = presenter
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(ScoreLookup::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, PresentError::AmbiguousIdentity));

    let missing = PresentationRequest::summary(ScoreLookup::by_hash("missing"));
    let err = presenter
        .present_and_confirm(&mut h.game, &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, PresentError::UnknownScore));
    assert!(h.game.scheduler().is_idle());
}

#[tokio::test]
async fn arrival_times_out_when_nothing_navigates() {
    let mut h = Harness::with_settings(|s| s.arrival_timeout_ms = 50).await;

    let err = h
        .game
        .confirmer()
        .await_arrival(&mut h.game, ViewKind::Gameplay, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PresentError::ArrivalTimeout {
            expected: ViewKind::Gameplay,
            ..
        }
    ));
}

#[tokio::test]
async fn exiting_root_is_ignored() {
    let mut h = Harness::new().await;
    h.game.exit_current();
    h.game.tick().unwrap();

    assert_eq!(h.kinds(), vec![ViewKind::MainMenu]);
    assert!(h.game.bus().drain().contains(&NavigationEvent::RootExitIgnored));
}

#[tokio::test]
async fn presenting_and_returning_pause_playback() {
    let mut h = Harness::new().await;
    let score = h.native_score(Ruleset::Osu).await;

    h.game.music_mut().play();
    PresentationFlow::new()
        .present_and_confirm(&mut h.game, &PresentationRequest::summary(score.to_lookup()))
        .await
        .unwrap();
    assert!(!h.game.music().is_playing());

    h.game.music_mut().play();
    flow::return_to_menu(&mut h.game).await.unwrap();
    assert!(!h.game.music().is_playing());
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu]);
}

async fn replay_score(h: &mut Harness, hash: &str) -> ScoreRecord {
    let beatmap_id = h.beatmap_id(Ruleset::Mania);
    let mut replay = ReplayData::new(1.0);
    replay.add_press(500, 0);
    replay.add_release(1_500, 0);
    h.import(
        ScoreImport::new(beatmap_id, Ruleset::Mania)
            .with_hash(hash)
            .with_replay(replay),
    )
    .await
}

#[tokio::test]
async fn replaying_same_score_from_gameplay_waits_for_new_loader() {
    let mut h = Harness::new().await;
    let score = replay_score(&mut h, "replayed").await;
    let request = PresentationRequest::replay(score.to_lookup());
    let mut presenter = PresentationFlow::new();

    let loader = presenter.present_and_confirm(&mut h.game, &request).await.unwrap();
    let gameplay = presenter.start_replay_and_confirm(&mut h.game).await.unwrap();
    let again = presenter.present_and_confirm(&mut h.game, &request).await.unwrap();

    assert_eq!(again.kind(), ViewKind::ReplayLoader);
    assert!(again.token > loader.token);
    assert!(again.token > gameplay.token);
    assert!(h.game.scheduler().is_idle());
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu, ViewKind::ReplayLoader]);
    assert_eq!(h.game.current_view().map(|v| v.token), Some(again.token));
}

#[tokio::test]
async fn replaying_other_score_from_gameplay_shows_that_score() {
    let mut h = Harness::new().await;
    let first = replay_score(&mut h, "first").await;
    let second = replay_score(&mut h, "second").await;
    let mut presenter = PresentationFlow::new();

    presenter
        .present_and_confirm(&mut h.game, &PresentationRequest::replay(first.to_lookup()))
        .await
        .unwrap();
    let gameplay = presenter.start_replay_and_confirm(&mut h.game).await.unwrap();
    let loader = presenter
        .present_and_confirm(&mut h.game, &PresentationRequest::replay(second.to_lookup()))
        .await
        .unwrap();

    assert!(loader.token > gameplay.token);
    assert_eq!(loader.view.score().map(|s| s.id), Some(second.id));
    assert!(h.game.scheduler().is_idle());
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu, ViewKind::ReplayLoader]);
}

#[tokio::test]
async fn failed_replay_load_leaves_context_untouched() {
    let mut h = Harness::with_settings(|s| s.show_converted_beatmaps = false).await;
    let osu_beatmap = h.beatmap_id(Ruleset::Osu);
    let mut replay = ReplayData::new(1.0);
    replay.add_press(0, 1);
    let score = h
        .import(ScoreImport::new(osu_beatmap, Ruleset::Catch).with_replay(replay))
        .await;
    let key = ReplayStore::key_for(&score.hash, score.id);
    std::fs::remove_file(h.game.replays().replay_path(&key)).unwrap();
    h.game.search("nothing");
    h.game.bus().drain();
    let ruleset = h.game.context().ruleset();
    let revision = h.game.context().revision();

    let err = h
        .game
        .present_score(&PresentationRequest::replay(score.to_lookup()))
        .await
        .unwrap_err();

    assert!(matches!(err, PresentError::Replay(_)));
    assert_eq!(h.game.context().ruleset(), ruleset);
    assert_eq!(h.game.context().revision(), revision);
    assert_eq!(h.game.context().selected_beatmap(), None);
    assert!(h.game.context().filter().is_active());
    assert!(!h.game.settings().show_converted_beatmaps);
    assert!(h.game.scheduler().is_idle());
    assert!(h.game.bus().drain().is_empty());
    assert_eq!(h.kinds(), vec![ViewKind::MainMenu]);
}
