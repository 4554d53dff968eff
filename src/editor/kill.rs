//! キル状態の管理
//!
//! 同じ位置からの連続キルをクリップボードへ追記するための状態機械。
//! `just_did_kill` はキル直後の1回だけ立つワンショットフラグで、
//! 直後のドキュメント変更通知が消費する。

use crate::document::Position;

/// キル追記判定の状態
#[derive(Debug, Clone, Default)]
pub struct KillState {
    last_kill: Option<Position>,
    just_did_kill: bool,
}

impl KillState {
    /// 初期状態を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 同じ位置からの再キルなら追記する
    pub fn should_append(&self, position: Position) -> bool {
        self.last_kill == Some(position)
    }

    /// キル完了を記録
    pub fn record_kill(&mut self, position: Position) {
        self.just_did_kill = true;
        self.last_kill = Some(position);
    }

    /// ヤンクはワンショットフラグだけを下ろす
    pub fn record_yank(&mut self) {
        self.just_did_kill = false;
    }

    /// ドキュメント変更通知
    ///
    /// キル起因でない変更はキル位置を無効化する。
    pub fn on_document_changed(&mut self) {
        if !self.just_did_kill {
            self.last_kill = None;
        }
        self.just_did_kill = false;
    }

    /// アクティブエディタ切り替え通知
    pub fn on_editor_changed(&mut self) {
        self.last_kill = None;
    }

    /// 記録中のキル位置（テスト用途）
    pub fn last_kill(&self) -> Option<Position> {
        self.last_kill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_requires_same_position() {
        let mut state = KillState::new();
        let pos = Position::new(3, 0);
        assert!(!state.should_append(pos));

        state.record_kill(pos);
        state.on_document_changed(); // キル自身の変更通知
        assert!(state.should_append(pos));
        assert!(!state.should_append(Position::new(4, 0)));
    }

    #[test]
    fn unrelated_edit_clears_kill_position() {
        let mut state = KillState::new();
        let pos = Position::new(1, 2);
        state.record_kill(pos);
        state.on_document_changed();
        // キルと無関係の編集
        state.on_document_changed();
        assert!(!state.should_append(pos));
    }

    #[test]
    fn editor_switch_clears_kill_position() {
        let mut state = KillState::new();
        state.record_kill(Position::new(0, 0));
        state.on_editor_changed();
        assert!(!state.should_append(Position::new(0, 0)));
    }

    #[test]
    fn yank_consumes_one_shot_flag() {
        let mut state = KillState::new();
        state.record_kill(Position::new(0, 0));
        state.record_yank();
        // ヤンクのペーストが起こすドキュメント変更でキル位置が消える
        state.on_document_changed();
        assert!(!state.should_append(Position::new(0, 0)));
    }
}
