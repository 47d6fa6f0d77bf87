use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub column: usize,
    pub row: usize,
}

/// 塗りつぶす正方形 (左上基準)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// トークン列をマス目に並べる
///
/// origin はマス目の右下角。行内は右から左、行は下から上へ積む。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub square_size: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl GridLayout {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            columns: config.columns,
            square_size: config.square_size,
            origin_x: config.origin_x,
            origin_y: config.origin_y,
        }
    }

    pub fn cell(&self, index: usize) -> GridCell {
        GridCell {
            column: index % self.columns,
            row: index / self.columns,
        }
    }

    pub fn square(&self, index: usize) -> Rect {
        let cell = self.cell(index);
        Rect {
            x: self.origin_x - (cell.column + 1) as f32 * self.square_size,
            y: self.origin_y - (cell.row + 1) as f32 * self.square_size,
            width: self.square_size,
            height: self.square_size,
        }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}
