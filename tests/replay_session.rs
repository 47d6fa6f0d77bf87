use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use turning_point::config::Config;
use turning_point::pose::ReplaySource;
use turning_point::render::{DrawCommand, RecordingSurface, Renderer, Scene};
use turning_point::scheduler::{SamplingScheduler, SessionEvent};

const RECORDING: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/poses.jsonl");

#[tokio::test(start_paused = true)]
async fn test_demo_recording_plays_to_game_over() {
    let config = Config::default();
    let source = ReplaySource::open(RECORDING, true).unwrap();
    assert_eq!(source.len(), 41);

    let (tx, mut rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let scheduler = SamplingScheduler::from_config(&config, Arc::new(source), tx).unwrap();
    let session = tokio::spawn(scheduler.run(cancel.clone()));
    let mut renderer = Renderer::new(Scene::from_config(&config), RecordingSurface::default());

    let mut diagnostics = 0;
    loop {
        let event = rx.recv().await.unwrap();
        renderer.handle(&event).unwrap();
        match event {
            SessionEvent::Diagnostic { .. } => diagnostics += 1,
            SessionEvent::Tick(report) if report.game.is_terminal() => break,
            SessionEvent::Tick(_) => {}
        }
    }
    cancel.cancel();
    drop(rx);
    let summary = session.await.unwrap();

    // the recording has one frame with missing joints; 100 tokens span 2-3 loops
    assert!(diagnostics >= 2, "diagnostics: {}", diagnostics);
    assert_eq!(summary.game.len(), 100);
    assert_eq!(summary.stats.applied, 100);

    let last = renderer.surface().frames.last().unwrap();
    let squares = last
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillRect { rect, .. } if rect.width == 108.0))
        .count();
    assert_eq!(squares, 100);
    assert!(last
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "Game Over")));
}

#[tokio::test(start_paused = true)]
async fn test_non_looping_recording_ends_session() {
    let config = Config::default();
    let source = ReplaySource::open(RECORDING, false).unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let scheduler = SamplingScheduler::from_config(&config, Arc::new(source), tx).unwrap();
    let session = tokio::spawn(scheduler.run(cancel.clone()));

    // cancel は使わない。記録が尽きるとスケジューラが終了し、チャンネルが閉じる。
    let mut ticks = 0;
    let mut diagnostics = 0;
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Tick(_) => ticks += 1,
            SessionEvent::Diagnostic { .. } => diagnostics += 1,
        }
    }
    let summary = session.await.unwrap();

    assert_eq!(ticks, 40);
    assert_eq!(diagnostics, 1);
    assert_eq!(summary.stats.applied, 40);
    assert_eq!(summary.stats.failed, 1);
    assert_eq!(summary.game.len(), 40);
    assert!(!summary.game.is_terminal());
    assert!(!cancel.is_cancelled());
}
