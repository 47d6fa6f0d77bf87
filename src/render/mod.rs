pub mod scene;
pub mod skeleton;
pub mod surface;

pub use scene::{DrawCommand, Frame, Scene};
pub use skeleton::SKELETON_CONNECTIONS;
pub use surface::{JsonLinesSurface, RecordingSurface, RenderSurface};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::scheduler::SessionEvent;

/// セッションイベントを描画命令に変換して描画面へ送る
pub struct Renderer<S: RenderSurface> {
    scene: Scene,
    surface: S,
}

impl<S: RenderSurface> Renderer<S> {
    pub fn new(scene: Scene, surface: S) -> Self {
        Self { scene, surface }
    }

    pub fn handle(&mut self, event: &SessionEvent) -> Result<()> {
        let frame = match event {
            SessionEvent::Tick(report) => {
                self.scene
                    .compose(report.tick, &report.pose, &report.snapshot, &report.game)
            }
            SessionEvent::Diagnostic { tick, message, game } => {
                self.scene.compose_diagnostic(*tick, message, game)
            }
        };
        self.surface.present(&frame)
    }

    /// チャンネルが閉じるまで描画し続ける
    pub async fn run(mut self, mut events: mpsc::Receiver<SessionEvent>) -> Result<S> {
        while let Some(event) = events.recv().await {
            self.handle(&event)?;
        }
        debug!("session event channel closed");
        Ok(self.surface)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
