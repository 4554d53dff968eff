//! 折り畳みの管理
//!
//! トグル式の全体折り畳み。折り畳む深さはカーソル桁から決め、
//! 直後にトグルで戻した場合は折り畳み前の選択を復元する。

use crate::document::{Position, Selection};
use crate::host::HostEditor;

/// 折り畳み状態のコントローラ
#[derive(Debug, Clone, Default)]
pub struct FoldController {
    folded: bool,
    just_did_folding: bool,
    position_after_fold: Option<Position>,
    selection_before_fold: Option<Selection>,
    visible_lines_before_fold: Vec<usize>,
}

impl FoldController {
    /// 初期状態を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 折り畳み中かどうか
    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// 折り畳みと解除をトグルする
    pub fn toggle<H: HostEditor>(&mut self, host: &mut H) {
        if !host.has_document() {
            return;
        }

        if self.folded {
            let current = host.primary_selection().map(|s| s.active);
            let restore = self.just_did_folding && current == self.position_after_fold;
            host.unfold_all();
            if restore {
                if let Some(selection) = self.selection_before_fold {
                    host.set_selections(vec![selection]);
                }
            }
            self.folded = false;
            self.just_did_folding = false;
        } else {
            let Some(selection) = host.primary_selection() else {
                return;
            };
            self.selection_before_fold = Some(selection);
            self.visible_lines_before_fold = host.visible_lines();

            let level = selection.active.character;
            fold_at_indent_level(host, level);
            self.position_after_fold = host.primary_selection().map(|s| s.active);
            self.folded = true;
            self.just_did_folding = true;
        }
    }

    /// ドキュメント変更通知
    pub fn on_document_changed(&mut self) {
        self.just_did_folding = false;
    }

    /// アクティブエディタ切り替え通知
    pub fn on_editor_changed(&mut self) {
        self.just_did_folding = false;
        self.visible_lines_before_fold.clear();
    }
}

/// 指定インデントより深い行を折り畳む
///
/// インデントが深くなる直前の行を折り畳み対象として集める。
fn fold_at_indent_level<H: HostEditor>(host: &mut H, level: usize) {
    let snapshot = host.snapshot();
    let mut lines = Vec::new();
    let mut previous_indent = 0;
    for i in 0..snapshot.line_count() {
        let indent = snapshot.line_indent(i);
        if indent > level && indent > previous_indent {
            lines.push(i.saturating_sub(1));
        }
        previous_indent = indent;
    }
    host.fold_lines(&lines);
}
