//! 一定間隔のサンプリングループ: ポーズソース → 採点 → ゲーム状態 → 描画
//!
//! 推定は同時に1つまで。前の推定が終わる前に来たティックは捨てるので、
//! ゲーム状態の更新は1つずつティック順に適用される。

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::game::{GameState, PushOutcome};
use crate::pose::{Pose, PoseEstimate, PoseSource};
use crate::scoring::{ScoreSnapshot, Scorer};

/// 採点できた1ティック分の描画材料
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub pose: Pose,
    pub snapshot: ScoreSnapshot,
    pub game: GameState,
    pub outcome: PushOutcome,
}

/// スケジューラから描画側へ送るイベント
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Tick(TickReport),
    /// 採点前に中断したティック。ゲーム状態は変わらない。
    Diagnostic {
        tick: u64,
        message: String,
        game: GameState,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    /// タイマー発火回数 (スキップ・破棄を含む)
    pub ticks: u64,
    pub not_ready: u64,
    /// 推定中だったため捨てたティック
    pub dropped: u64,
    pub failed: u64,
    pub applied: u64,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub game: GameState,
    pub stats: TickStats,
}

struct InFlight {
    tick: u64,
    handle: JoinHandle<anyhow::Result<PoseEstimate>>,
}

pub struct SamplingScheduler {
    source: Arc<dyn PoseSource>,
    scorer: Scorer,
    game: GameState,
    interval: Duration,
    events: mpsc::Sender<SessionEvent>,
    stats: TickStats,
}

impl SamplingScheduler {
    pub fn new(
        source: Arc<dyn PoseSource>,
        scorer: Scorer,
        game: GameState,
        interval: Duration,
        events: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            source,
            scorer,
            game,
            interval,
            events,
            stats: TickStats::default(),
        }
    }

    pub fn from_config(
        config: &Config,
        source: Arc<dyn PoseSource>,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Self> {
        Ok(Self::new(
            source,
            Scorer::new(config.joints.clone())?,
            GameState::new(config.session.capacity),
            Duration::from_millis(config.session.interval_ms),
            events,
        ))
    }

    /// `cancel` が発火するか、ポーズソースが尽きるまで回す。
    /// 停止時に実行中の推定は切り離し、結果は使わない。
    pub async fn run(mut self, cancel: CancellationToken) -> SessionSummary {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<InFlight> = None;

        info!(interval_ms = self.interval.as_millis() as u64, capacity = self.game.capacity(), "sampling started");

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                (tick, result) = wait_in_flight(&mut in_flight) => {
                    in_flight = None;
                    self.complete(tick, result).await;
                }

                _ = interval.tick() => {
                    self.stats.ticks += 1;
                    let tick = self.stats.ticks;

                    if in_flight.is_some() {
                        self.stats.dropped += 1;
                        trace!(tick, "estimation in flight, dropping tick");
                        continue;
                    }
                    if self.source.is_exhausted() {
                        info!(tick, "pose source exhausted");
                        break;
                    }
                    if !self.source.is_ready() {
                        self.stats.not_ready += 1;
                        trace!(tick, "pose source not ready");
                        continue;
                    }

                    let source = Arc::clone(&self.source);
                    let handle = tokio::spawn(async move { source.estimate().await });
                    in_flight = Some(InFlight { tick, handle });
                }
            }
        }

        if in_flight.is_some() {
            debug!("session stopped with an estimation in flight, discarding it");
        }
        info!(
            ticks = self.stats.ticks,
            applied = self.stats.applied,
            dropped = self.stats.dropped,
            failed = self.stats.failed,
            tokens = self.game.len(),
            "sampling stopped"
        );

        SessionSummary {
            game: self.game,
            stats: self.stats,
        }
    }

    async fn complete(&mut self, tick: u64, result: Result<PoseEstimate>) {
        let event = match result.and_then(|estimate| self.apply(tick, &estimate)) {
            Ok(report) => SessionEvent::Tick(report),
            Err(err) => {
                self.stats.failed += 1;
                warn!(tick, error = %err, "tick aborted");
                SessionEvent::Diagnostic {
                    tick,
                    message: err.to_string(),
                    game: self.game.clone(),
                }
            }
        };

        if self.events.send(event).await.is_err() {
            debug!(tick, "renderer channel closed");
        }
    }

    /// 推定結果を採点し、勝者の色をゲームに積む。
    /// 不正な姿勢はゲーム状態に触れる前にエラーを返す。
    fn apply(&mut self, tick: u64, estimate: &PoseEstimate) -> Result<TickReport> {
        let pose = Pose::from_keypoints(&estimate.keypoints)?;
        let snapshot = self.scorer.evaluate(&pose)?;
        let outcome = self.game.push(snapshot.main_category);
        self.stats.applied += 1;

        match outcome {
            PushOutcome::Completed { index } => {
                info!(tick, tokens = index + 1, color = snapshot.main_category.name(), "game over");
            }
            _ => {
                debug!(
                    tick,
                    total = snapshot.total_score,
                    turning_point = %snapshot.main_turning_point,
                    "tick scored"
                );
            }
        }

        Ok(TickReport {
            tick,
            pose,
            snapshot,
            game: self.game.clone(),
            outcome,
        })
    }
}

async fn wait_in_flight(slot: &mut Option<InFlight>) -> (u64, Result<PoseEstimate>) {
    match slot {
        Some(job) => {
            let result = match (&mut job.handle).await {
                Ok(Ok(estimate)) => Ok(estimate),
                Ok(Err(err)) => Err(Error::source_failure(err)),
                Err(join_err) => Err(Error::Task(join_err)),
            };
            (job.tick, result)
        }
        None => std::future::pending().await,
    }
}
