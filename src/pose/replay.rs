use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::BufRead;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::source::{PoseEstimate, PoseSource};
use crate::config::SourceConfig;

/// 記録済みの推定結果 (JSON Lines) を順に返すポーズソース
///
/// 1行に1つの `PoseEstimate`。空行は無視する。
/// looping が true なら末尾の次は先頭に戻る (ループ再生のビデオと同じ)。
pub struct ReplaySource {
    frames: Vec<PoseEstimate>,
    cursor: Mutex<usize>,
    looping: bool,
    latency: Duration,
}

impl ReplaySource {
    pub fn new(frames: Vec<PoseEstimate>, looping: bool) -> Self {
        Self {
            frames,
            cursor: Mutex::new(0),
            looping,
            latency: Duration::ZERO,
        }
    }

    /// 推論にかかる時間を模擬する
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn from_reader<R: BufRead>(reader: R, looping: bool) -> Result<Self> {
        let mut frames = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read pose recording")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let frame: PoseEstimate = serde_json::from_str(line)
                .with_context(|| format!("Invalid pose on line {}", line_no + 1))?;
            frames.push(frame);
        }
        Ok(Self::new(frames, looping))
    }

    pub fn open<P: AsRef<Path>>(path: P, looping: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open pose recording {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file), looping)
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::open(&config.path, config.looping)?
            .with_latency(Duration::from_millis(config.latency_ms)))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn next_frame(&self) -> Option<PoseEstimate> {
        let mut cursor = self.cursor.lock().ok()?;
        if self.frames.is_empty() {
            return None;
        }
        if *cursor >= self.frames.len() {
            if !self.looping {
                return None;
            }
            *cursor = 0;
        }
        let frame = self.frames[*cursor].clone();
        *cursor += 1;
        Some(frame)
    }
}

#[async_trait]
impl PoseSource for ReplaySource {
    fn is_ready(&self) -> bool {
        match self.cursor.lock() {
            Ok(cursor) => !self.frames.is_empty() && (self.looping || *cursor < self.frames.len()),
            Err(_) => false,
        }
    }

    fn is_exhausted(&self) -> bool {
        if self.looping && !self.frames.is_empty() {
            return false;
        }
        match self.cursor.lock() {
            Ok(cursor) => *cursor >= self.frames.len(),
            Err(_) => true,
        }
    }

    async fn estimate(&self) -> Result<PoseEstimate> {
        let frame = self
            .next_frame()
            .context("Pose recording exhausted")?;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(frame)
    }
}
