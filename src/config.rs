use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::scoring::{default_joint_specs, JointAngleSpec};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub source: SourceConfig,
    /// 採点する関節。省略時は既定の8関節。
    #[serde(default = "default_joint_specs")]
    pub joints: Vec<JointAngleSpec>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// サンプリング間隔（ミリ秒）
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// ゲームオーバーまでのトークン数
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// ゲームオーバー後にセッションを終了するか
    #[serde(default = "default_stop_after_game_over")]
    pub stop_after_game_over: bool,
}

fn default_interval_ms() -> u64 { 100 }
fn default_capacity() -> usize { crate::game::DEFAULT_CAPACITY }
fn default_stop_after_game_over() -> bool { true }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            capacity: default_capacity(),
            stop_after_game_over: default_stop_after_game_over(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    /// 1行のマス数
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// マスの辺長（ピクセル）
    #[serde(default = "default_square_size")]
    pub square_size: f32,
    /// マス目の右下角
    #[serde(default = "default_origin_x")]
    pub origin_x: f32,
    #[serde(default = "default_origin_y")]
    pub origin_y: f32,
}

fn default_columns() -> usize { 10 }
fn default_square_size() -> f32 { 108.0 }
fn default_origin_x() -> f32 { 1080.0 }
fn default_origin_y() -> f32 { 1920.0 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            square_size: default_square_size(),
            origin_x: default_origin_x(),
            origin_y: default_origin_y(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// 描画座標系の幅（ビデオのネイティブ解像度）
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// キーポイント・骨格を描く信頼度閾値
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_arc_radius")]
    pub arc_radius: f32,
    #[serde(default = "default_arc_line_width")]
    pub arc_line_width: f32,
    /// スコアバーの左端と下端
    #[serde(default = "default_score_bar_x")]
    pub score_bar_x: f32,
    #[serde(default = "default_score_bar_base_y")]
    pub score_bar_base_y: f32,
    #[serde(default = "default_score_bar_width")]
    pub score_bar_width: f32,
    #[serde(default = "default_score_bar_height")]
    pub score_bar_height: f32,
    /// 回転インジケーター画像の左上角と辺長
    #[serde(default = "default_indicator_x")]
    pub indicator_x: f32,
    #[serde(default = "default_indicator_y")]
    pub indicator_y: f32,
    #[serde(default = "default_indicator_size")]
    pub indicator_size: f32,
    /// フレームの出力先。省略時は標準出力。
    #[serde(default)]
    pub output: Option<String>,
}

fn default_width() -> u32 { 1080 }
fn default_height() -> u32 { 1920 }
fn default_confidence_threshold() -> f32 { 0.9 }
fn default_arc_radius() -> f32 { 20.0 }
fn default_arc_line_width() -> f32 { 10.0 }
fn default_score_bar_x() -> f32 { 100.0 }
fn default_score_bar_base_y() -> f32 { 800.0 }
fn default_score_bar_width() -> f32 { 30.0 }
fn default_score_bar_height() -> f32 { 300.0 }
fn default_indicator_x() -> f32 { 870.0 }
fn default_indicator_y() -> f32 { 950.0 }
fn default_indicator_size() -> f32 { 125.0 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            confidence_threshold: default_confidence_threshold(),
            arc_radius: default_arc_radius(),
            arc_line_width: default_arc_line_width(),
            score_bar_x: default_score_bar_x(),
            score_bar_base_y: default_score_bar_base_y(),
            score_bar_width: default_score_bar_width(),
            score_bar_height: default_score_bar_height(),
            indicator_x: default_indicator_x(),
            indicator_y: default_indicator_y(),
            indicator_size: default_indicator_size(),
            output: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// 推定結果の記録 (JSON Lines)
    #[serde(default = "default_source_path")]
    pub path: String,
    /// 末尾に達したら先頭から繰り返す
    #[serde(default = "default_looping")]
    pub looping: bool,
    /// 模擬推論時間（ミリ秒）
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_source_path() -> String { "poses.jsonl".to_string() }
fn default_looping() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            looping: default_looping(),
            latency_ms: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            grid: GridConfig::default(),
            render: RenderConfig::default(),
            source: SourceConfig::default(),
            joints: default_joint_specs(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// ファイルがなければ既定値。内容が不正ならエラー。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.session.interval_ms > 0, "session.interval_ms must be positive");
        ensure!(self.session.capacity > 0, "session.capacity must be positive");
        ensure!(self.grid.columns > 0, "grid.columns must be positive");
        ensure!(self.grid.square_size > 0.0, "grid.square_size must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.render.confidence_threshold),
            "render.confidence_threshold must be within [0, 1]"
        );
        ensure!(
            self.render.score_bar_width > 0.0 && self.render.score_bar_height > 0.0,
            "render.score_bar_width and render.score_bar_height must be positive"
        );
        ensure!(self.render.indicator_size > 0.0, "render.indicator_size must be positive");
        ensure!(!self.joints.is_empty(), "at least one joint must be configured");
        for joint in &self.joints {
            ensure!(
                (0.0..=180.0).contains(&joint.target_degrees),
                "joint '{}': target_degrees {} is outside [0, 180]",
                joint.title,
                joint.target_degrees
            );
        }
        Ok(())
    }
}
