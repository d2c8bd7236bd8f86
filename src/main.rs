//! Demo entry point: imports a small library and presents its scores.

use rvsrg_present::database::{BeatmapImport, BeatmapSetImport, ScoreImport};
use rvsrg_present::game::flow;
use rvsrg_present::models::{ReplayData, Ruleset, ScoreLookup, Settings};
use rvsrg_present::{FrameDriver, Game, PresentError, PresentationFlow, PresentationRequest};

fn main() {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    log::info!("MAIN: Booting score presenter...");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("MAIN: Failed to start runtime: {}", e);
            return;
        }
    };

    if let Err(e) = runtime.block_on(run(Settings::load())) {
        log::error!("MAIN: {}", e);
    }
}

async fn run(settings: Settings) -> Result<(), PresentError> {
    let mut game = Game::new(settings).await?;

    let Some(set) = game
        .import_beatmap_set(BeatmapSetImport {
            online_id: None,
            hash: None,
            artist: "Demo Artist".to_string(),
            title: "Demo Song".to_string(),
            author: "Demo Mapper".to_string(),
            beatmaps: vec![
                BeatmapImport {
                    online_id: None,
                    difficulty_name: "Normal".to_string(),
                    ruleset: Ruleset::Osu,
                },
                BeatmapImport {
                    online_id: None,
                    difficulty_name: "4K Hard".to_string(),
                    ruleset: Ruleset::Mania,
                },
            ],
        })
        .await
    else {
        log::warn!("MAIN: Demo set was not imported, nothing to present");
        return Ok(());
    };

    let mut replay = ReplayData::new(1.0);
    replay.add_press(500_000, 0);
    replay.add_release(620_000, 0);

    let mut lookups = Vec::new();
    for beatmap in &set.beatmaps {
        let import = ScoreImport::new(beatmap.id, beatmap.ruleset).with_replay(replay.clone());
        if let Some(score) = game.import_score(import).await {
            lookups.push(score.to_lookup());
        }
    }
    // Leaderboard-style lookup that only knows the online id.
    if let Some(beatmap) = set.beatmaps.first()
        && let Some(score) = game
            .import_score(ScoreImport::new(beatmap.id, Ruleset::Catch).with_online_id(42))
            .await
    {
        log::info!("MAIN: Imported converted score {}", score.id);
        lookups.push(ScoreLookup::by_online_id(42));
    }

    flow::enter_song_select(&mut game).await?;

    let mut presenter = PresentationFlow::new();
    for lookup in lookups {
        let summary = presenter
            .present_and_confirm(&mut game, &PresentationRequest::summary(lookup.clone()))
            .await?;
        log::info!("MAIN: Summary shown as {} ({})", summary.token, game.context().ruleset());

        let loader = presenter
            .present_and_confirm(&mut game, &PresentationRequest::replay(lookup))
            .await?;
        log::info!("MAIN: Replay loader ready as {}", loader.token);

        let gameplay = presenter.start_replay_and_confirm(&mut game).await?;
        log::info!("MAIN: Watching replay in {}", gameplay.token);
    }

    flow::return_to_menu(&mut game).await?;
    log::info!(
        "MAIN: Back on {:?} after {} frames",
        game.current_view().map(|v| v.kind()),
        game.scheduler().frame()
    );

    for event in game.bus().drain() {
        log::debug!("MAIN: {:?}", event);
    }
    Ok(())
}
