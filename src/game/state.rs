use serde::Serialize;

use crate::scoring::Category;

/// 既定の容量 (10×10 マス)
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Accumulating,
    GameOver,
}

/// `GameState::push` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PushOutcome {
    /// index 番目のトークンとして追加した
    Appended { index: usize },
    /// 追加して満杯になった。セッション中1回だけ返る。
    Completed { index: usize },
    /// ゲームオーバー後のため無視した
    Ignored,
}

/// ティックごとに勝者カテゴリを1つ積み上げるゲーム状態
///
/// 容量に達したら GameOver になり、以後は変化しない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    tokens: Vec<Category>,
    capacity: usize,
}

impl GameState {
    pub fn new(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, category: Category) -> PushOutcome {
        if self.is_terminal() {
            return PushOutcome::Ignored;
        }

        let index = self.tokens.len();
        self.tokens.push(category);

        if self.is_terminal() {
            PushOutcome::Completed { index }
        } else {
            PushOutcome::Appended { index }
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_terminal() {
            GamePhase::GameOver
        } else {
            GamePhase::Accumulating
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.tokens.len() >= self.capacity
    }

    pub fn tokens(&self) -> &[Category] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 最後に積まれたトークン。ゲームオーバー表示の色になる。
    pub fn last_token(&self) -> Option<Category> {
        self.tokens.last().copied()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
