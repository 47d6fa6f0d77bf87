use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use turning_point::config::Config;
use turning_point::game::PushOutcome;
use turning_point::pose::{Keypoint, KeypointIndex, PoseEstimate, PoseSource};
use turning_point::render::{RecordingSurface, Renderer, Scene};
use turning_point::scheduler::{SamplingScheduler, SessionEvent};
use turning_point::scoring::Category;

/// "Left Knee" (right hip / knee / ankle) at exactly 90°, everything else collapsed.
fn knee_pose() -> Vec<Keypoint> {
    KeypointIndex::ALL
        .iter()
        .map(|part| {
            let (x, y) = match part {
                KeypointIndex::RightHip => (100.0, 0.0),
                KeypointIndex::RightKnee => (100.0, 100.0),
                KeypointIndex::RightAnkle => (200.0, 100.0),
                _ => (0.0, 0.0),
            };
            Keypoint::new(*part, x, y, 0.95)
        })
        .collect()
}

struct ScriptedSource {
    script: Mutex<VecDeque<Vec<Keypoint>>>,
    fallback: Vec<Keypoint>,
    ready: AtomicBool,
    latency: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(fallback: Vec<Keypoint>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            ready: AtomicBool::new(true),
            latency: Duration::ZERO,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn then(self, keypoints: Vec<Keypoint>) -> Self {
        self.script.lock().unwrap().push_back(keypoints);
        self
    }
}

#[async_trait]
impl PoseSource for ScriptedSource {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn estimate(&self) -> Result<PoseEstimate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        let keypoints = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Ok(PoseEstimate { score: 0.9, keypoints })
    }
}

fn start(
    source: Arc<ScriptedSource>,
) -> (
    mpsc::Receiver<SessionEvent>,
    CancellationToken,
    tokio::task::JoinHandle<turning_point::scheduler::SessionSummary>,
) {
    let (tx, rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let scheduler = SamplingScheduler::from_config(&Config::default(), source, tx).unwrap();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));
    (rx, cancel, handle)
}

#[tokio::test(start_paused = true)]
async fn test_hundred_red_ticks_end_the_game() {
    let source = Arc::new(ScriptedSource::new(knee_pose()));
    let (mut rx, cancel, handle) = start(source);

    let mut completed_at = None;
    for n in 1..=100 {
        match rx.recv().await.unwrap() {
            SessionEvent::Tick(report) => {
                assert_eq!(report.snapshot.main_turning_point, "Left Knee");
                assert_eq!(report.snapshot.main_category, Category::Red);
                assert_eq!(report.game.len(), n);
                if let PushOutcome::Completed { index } = report.outcome {
                    completed_at = Some(index);
                }
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
    assert_eq!(completed_at, Some(99));

    // 101st scored tick leaves the game frozen
    match rx.recv().await.unwrap() {
        SessionEvent::Tick(report) => {
            assert_eq!(report.outcome, PushOutcome::Ignored);
            assert_eq!(report.game.len(), 100);
            assert!(report.game.is_terminal());
        }
        other => panic!("unexpected event {:?}", other),
    }

    cancel.cancel();
    drop(rx);
    let summary = handle.await.unwrap();
    assert!(summary.game.is_terminal());
    assert!(summary.game.tokens().iter().all(|c| *c == Category::Red));
    assert_eq!(summary.stats.failed, 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_source_never_overlaps() {
    let source = Arc::new(ScriptedSource::new(knee_pose()).with_latency(Duration::from_millis(250)));
    let (mut rx, cancel, handle) = start(Arc::clone(&source));

    let mut last_tick = 0;
    for n in 1..=5 {
        match rx.recv().await.unwrap() {
            SessionEvent::Tick(report) => {
                assert!(report.tick > last_tick);
                last_tick = report.tick;
                assert_eq!(report.game.len(), n);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    cancel.cancel();
    drop(rx);
    let summary = handle.await.unwrap();
    assert_eq!(source.max_active.load(Ordering::SeqCst), 1);
    assert!(summary.stats.dropped > 0);
    assert_eq!(
        summary.stats.applied as usize,
        summary.game.len()
    );
}

#[tokio::test(start_paused = true)]
async fn test_not_ready_source_is_skipped() {
    let source = Arc::new(ScriptedSource::new(knee_pose()));
    source.ready.store(false, Ordering::SeqCst);
    let (mut rx, cancel, handle) = start(Arc::clone(&source));

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert!(rx.try_recv().is_err());

    cancel.cancel();
    let summary = handle.await.unwrap();
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert!(summary.stats.ticks > 0);
    assert_eq!(summary.stats.not_ready, summary.stats.ticks);
    assert!(summary.game.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_pose_is_reported_and_loop_resumes() {
    let mut short = knee_pose();
    short.truncate(12);
    let source = Arc::new(ScriptedSource::new(knee_pose()).then(short));
    let (mut rx, cancel, handle) = start(source);

    match rx.recv().await.unwrap() {
        SessionEvent::Diagnostic { message, game, .. } => {
            assert!(message.contains("expected 17 keypoints, got 12"), "{}", message);
            assert!(game.is_empty());
        }
        other => panic!("expected diagnostic, got {:?}", other),
    }
    match rx.recv().await.unwrap() {
        SessionEvent::Tick(report) => assert_eq!(report.game.len(), 1),
        other => panic!("unexpected event {:?}", other),
    }

    cancel.cancel();
    drop(rx);
    let summary = handle.await.unwrap();
    assert_eq!(summary.stats.failed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_with_estimation_in_flight() {
    let source = Arc::new(ScriptedSource::new(knee_pose()).with_latency(Duration::from_secs(60)));
    let (mut rx, cancel, handle) = start(Arc::clone(&source));

    tokio::time::sleep(Duration::from_millis(500)).await;
    cancel.cancel();
    let summary = handle.await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(summary.game.is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_renderer_draws_every_event() {
    let source = Arc::new(ScriptedSource::new(knee_pose()).then(Vec::new()));
    let (tx, rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let config = Config::default();
    let scheduler = SamplingScheduler::from_config(&config, source, tx).unwrap();
    let renderer = Renderer::new(Scene::from_config(&config), RecordingSurface::default());

    let render_task = tokio::spawn(renderer.run(rx));
    let session = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(450)).await;
    cancel.cancel();
    let summary = session.await.unwrap();
    let surface = render_task.await.unwrap().unwrap();

    assert_eq!(surface.frames.len() as u64, summary.stats.applied + summary.stats.failed);
    assert_eq!(summary.stats.failed, 1);
    assert!(surface.frames.windows(2).all(|w| w[0].tick < w[1].tick));
}
