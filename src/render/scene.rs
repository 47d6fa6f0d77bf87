use serde::Serialize;

use super::skeleton::{
    DIAGNOSTIC_COLOR, KEYPOINT_COLOR, KEYPOINT_RADIUS, SKELETON_COLOR, SKELETON_CONNECTIONS,
    SKELETON_LINE_WIDTH, TEXT_COLOR,
};
use crate::config::Config;
use crate::game::{GameState, GridLayout, Rect};
use crate::pose::{Pose, Position};
use crate::scoring::{Category, ScoreSnapshot};

// レイアウト (1080x1920 の縦長フレーム基準)
const TURNING_POINT_TEXT: (f32, f32) = (100.0, 465.0);
const TURNING_POINT_FONT: f32 = 48.0;
const LABEL_FONT: f32 = 32.0;
const LABEL_TOP: f32 = 300.0;
const LABEL_ROW_HEIGHT: f32 = 32.0;
const LABELS_PER_COLUMN: usize = 4;
const LEFT_COLUMN: (f32, f32) = (100.0, 335.0);
const RIGHT_COLUMN: (f32, f32) = (500.0, 735.0);
const SCORE_BAR_OUTLINE_WIDTH: f32 = 4.0;
/// 下から順に塗る区画の色
const SCORE_BAR_COLORS: [Category; 4] = [Category::Red, Category::Blue, Category::Green, Category::Yellow];
const TOTAL_SCORE_TEXT: (f32, f32) = (100.0, 850.0);
const GAME_OVER_FONT: f32 = 60.0;
const DIAGNOSTIC_TEXT: (f32, f32) = (100.0, 200.0);

/// 描画面に送る描画命令
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Dot {
        center: Position,
        radius: f32,
        color: u32,
    },
    Line {
        from: Position,
        to: Position,
        color: u32,
        width: f32,
    },
    Arc {
        center: Position,
        radius: f32,
        start: f32,
        end: f32,
        counterclockwise: bool,
        color: u32,
        width: f32,
    },
    FillRect {
        rect: Rect,
        color: u32,
    },
    StrokeRect {
        rect: Rect,
        color: u32,
        width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: u32,
    },
    /// 回転インジケーター画像。rect の中心まわりに degrees (度) 回転する。
    RotateIndicator {
        rect: Rect,
        degrees: f32,
    },
}

/// 1ティック分の描画内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

/// 採点結果とゲーム状態を描画命令に変換する
#[derive(Debug, Clone)]
pub struct Scene {
    width: u32,
    height: u32,
    confidence_threshold: f32,
    arc_radius: f32,
    arc_line_width: f32,
    /// スコアバー全体の外枠
    score_bar: Rect,
    indicator: Rect,
    grid: GridLayout,
}

impl Scene {
    pub fn from_config(config: &Config) -> Self {
        let render = &config.render;
        Self {
            width: render.width,
            height: render.height,
            confidence_threshold: render.confidence_threshold,
            arc_radius: render.arc_radius,
            arc_line_width: render.arc_line_width,
            score_bar: Rect {
                x: render.score_bar_x,
                y: render.score_bar_base_y - render.score_bar_height,
                width: render.score_bar_width,
                height: render.score_bar_height,
            },
            indicator: Rect {
                x: render.indicator_x,
                y: render.indicator_y,
                width: render.indicator_size,
                height: render.indicator_size,
            },
            grid: GridLayout::from_config(&config.grid),
        }
    }

    pub fn compose(&self, tick: u64, pose: &Pose, snapshot: &ScoreSnapshot, game: &GameState) -> Frame {
        let mut commands = Vec::new();
        self.push_pose(pose, &mut commands);
        self.push_arcs(snapshot, &mut commands);

        commands.push(DrawCommand::Text {
            text: format!("Main Turning Point: {}", snapshot.main_turning_point),
            x: TURNING_POINT_TEXT.0,
            y: TURNING_POINT_TEXT.1,
            size: TURNING_POINT_FONT,
            color: snapshot.main_category.rgb(),
        });

        self.push_score_bar(snapshot, &mut commands);
        self.push_labels(snapshot, &mut commands);

        commands.push(DrawCommand::StrokeRect {
            rect: self.score_bar,
            color: TEXT_COLOR,
            width: SCORE_BAR_OUTLINE_WIDTH,
        });
        commands.push(DrawCommand::Text {
            text: format!("{:.2} %", snapshot.total_score),
            x: TOTAL_SCORE_TEXT.0,
            y: TOTAL_SCORE_TEXT.1,
            size: LABEL_FONT,
            color: TEXT_COLOR,
        });
        commands.push(DrawCommand::RotateIndicator {
            rect: self.indicator,
            degrees: snapshot.indicator_rotation_degrees(),
        });

        self.push_game(game, &mut commands);
        self.frame(tick, commands)
    }

    /// 不正な姿勢などで採点できなかったティック: マス目と診断表示のみ
    pub fn compose_diagnostic(&self, tick: u64, message: &str, game: &GameState) -> Frame {
        let mut commands = Vec::new();
        self.push_game(game, &mut commands);
        commands.push(DrawCommand::Text {
            text: message.to_string(),
            x: DIAGNOSTIC_TEXT.0,
            y: DIAGNOSTIC_TEXT.1,
            size: LABEL_FONT,
            color: DIAGNOSTIC_COLOR,
        });
        self.frame(tick, commands)
    }

    fn frame(&self, tick: u64, commands: Vec<DrawCommand>) -> Frame {
        Frame {
            tick,
            width: self.width,
            height: self.height,
            commands,
        }
    }

    fn push_pose(&self, pose: &Pose, commands: &mut Vec<DrawCommand>) {
        for kp in pose.keypoints() {
            if kp.is_valid(self.confidence_threshold) {
                commands.push(DrawCommand::Dot {
                    center: kp.position,
                    radius: KEYPOINT_RADIUS,
                    color: KEYPOINT_COLOR,
                });
            }
        }

        for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
            let start = pose.get(*start_idx);
            let end = pose.get(*end_idx);
            if start.is_valid(self.confidence_threshold) && end.is_valid(self.confidence_threshold) {
                commands.push(DrawCommand::Line {
                    from: start.position,
                    to: end.position,
                    color: SKELETON_COLOR,
                    width: SKELETON_LINE_WIDTH,
                });
            }
        }
    }

    fn push_arcs(&self, snapshot: &ScoreSnapshot, commands: &mut Vec<DrawCommand>) {
        for m in &snapshot.measurements {
            commands.push(DrawCommand::Arc {
                center: m.vertex,
                radius: self.arc_radius,
                start: m.heading,
                end: m.heading + m.orientation,
                counterclockwise: m.orientation < 0.0,
                color: m.category.rgb(),
                width: self.arc_line_width,
            });
        }
    }

    /// 先頭4関節のスコアを区画ごとに下から積む
    fn push_score_bar(&self, snapshot: &ScoreSnapshot, commands: &mut Vec<DrawCommand>) {
        let section_height = self.score_bar.height / SCORE_BAR_COLORS.len() as f32;
        let mut section_bottom = self.score_bar.y + self.score_bar.height;
        for (m, color) in snapshot.measurements.iter().zip(SCORE_BAR_COLORS.iter()) {
            let fill_height = m.score / 100.0 * section_height;
            commands.push(DrawCommand::FillRect {
                rect: Rect {
                    x: self.score_bar.x,
                    y: section_bottom - fill_height,
                    width: self.score_bar.width,
                    height: fill_height,
                },
                color: color.rgb(),
            });
            section_bottom -= section_height;
        }
    }

    fn push_labels(&self, snapshot: &ScoreSnapshot, commands: &mut Vec<DrawCommand>) {
        for (i, m) in snapshot.measurements.iter().enumerate() {
            let (column, row) = if i < LABELS_PER_COLUMN {
                (LEFT_COLUMN, i)
            } else {
                (RIGHT_COLUMN, i - LABELS_PER_COLUMN)
            };
            let y = LABEL_TOP + row as f32 * LABEL_ROW_HEIGHT;
            commands.push(DrawCommand::Text {
                text: m.title.clone(),
                x: column.0,
                y,
                size: LABEL_FONT,
                color: TEXT_COLOR,
            });
            commands.push(DrawCommand::Text {
                text: format!("{:.2}°", m.angle_degrees),
                x: column.1,
                y,
                size: LABEL_FONT,
                color: TEXT_COLOR,
            });
        }
    }

    fn push_game(&self, game: &GameState, commands: &mut Vec<DrawCommand>) {
        for (index, category) in game.tokens().iter().enumerate() {
            commands.push(DrawCommand::FillRect {
                rect: self.grid.square(index),
                color: category.rgb(),
            });
        }

        if game.is_terminal() {
            if let Some(last) = game.last_token() {
                commands.push(DrawCommand::Text {
                    text: "Game Over".to_string(),
                    x: self.width as f32 / 2.0,
                    y: self.height as f32 / 2.0,
                    size: GAME_OVER_FONT,
                    color: last.rgb(),
                });
            }
        }
    }
}
