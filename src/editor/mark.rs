//! マークモードの管理
//!
//! Emacsのマークに相当する選択拡張モード。カーソル移動コマンドは
//! モード中は選択を伸ばす形で実行される。解除時の選択の畳み方は
//! 編集起因かどうかで変わる（マルチカーソル入力を壊さないため）。

use crate::document::Selection;
use crate::host::HostEditor;

/// マークモードの状態機械
#[derive(Debug, Clone, Default)]
pub struct MarkMode {
    active: bool,
    moved: bool,
}

impl MarkMode {
    /// 初期状態（非アクティブ）を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// マークモード中かどうか
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// マーク設定後にカーソルが動いたか
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// モード中のカーソル移動を記録
    pub fn note_motion(&mut self) {
        if self.active {
            self.moved = true;
        }
    }

    /// マークモードに入る
    ///
    /// すでにアクティブで何も動いていなければトグルとして解除する。
    /// それ以外は全選択をカーソルに畳んでからアクティブにする。
    pub fn enter<H: HostEditor>(&mut self, host: &mut H) {
        if !host.has_document() {
            return;
        }
        if self.active && !self.moved {
            self.active = false;
            return;
        }
        collapse_to_carets(host);
        self.active = true;
        self.moved = false;
    }

    /// マークモードを解除する（明示的な解除）
    pub fn exit<H: HostEditor>(&mut self, host: &mut H) {
        self.exit_with(host, true);
    }

    /// 編集起因の解除
    ///
    /// 全選択が空のマルチカーソルはそのまま残す。
    pub fn exit_on_edit<H: HostEditor>(&mut self, host: &mut H) {
        self.exit_with(host, false);
    }

    fn exit_with<H: HostEditor>(&mut self, host: &mut H, remove_secondary: bool) {
        if !host.has_document() {
            return;
        }
        let selections = host.selections();
        if selections.len() > 1 {
            let all_empty = selections.iter().all(Selection::is_empty);
            if all_empty {
                if remove_secondary {
                    // セカンダリカーソルを取り除く
                    host.set_selections(vec![selections[0]]);
                }
            } else {
                // 多重度を保ったまま各選択をアクティブ位置に畳む
                host.set_selections(
                    selections
                        .iter()
                        .map(|s| Selection::caret(s.active))
                        .collect(),
                );
            }
        } else if let Some(selection) = selections.first() {
            host.set_selections(vec![Selection::caret(selection.active)]);
        }

        self.active = false;
    }
}

fn collapse_to_carets<H: HostEditor>(host: &mut H) {
    let carets: Vec<Selection> = host
        .selections()
        .iter()
        .map(|s| Selection::caret(s.active))
        .collect();
    host.set_selections(carets);
}
