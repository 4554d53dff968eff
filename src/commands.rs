//! コマンドシステム
//!
//! エディタコマンドの定義とディスパッチ。キル・マーク・折り畳み・
//! swiper・ハイライトの各状態はディスパッチャが所有し、ホストの
//! イベント通知を明示的な状態遷移に変換する。

use std::cmp::min;

use crate::document::{Position, Range, Selection};
use crate::editor::{FoldController, KillState, MarkMode};
use crate::error::HostResult;
use crate::highlight::WordHighlighter;
use crate::host::{BuiltinMove, HostEditor, PassthroughCommand, RevealKind};
use crate::logging::{LogLevel, Logger};
use crate::motion::{self, WordMotion};
use crate::search::SwiperSession;

/// カーソル移動の種類（ホスト組み込み + 単語系）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    BufferStart,
    BufferEnd,
    WordLeft,
    WordRight,
    WordPartLeft,
    WordPartRight,
}

impl CursorMotion {
    /// 単語系の移動ならそのWordMotionを返す
    fn word_motion(self) -> Option<WordMotion> {
        match self {
            CursorMotion::WordRight => Some(WordMotion::WordRight),
            CursorMotion::WordLeft => Some(WordMotion::WordLeft),
            CursorMotion::WordPartRight => Some(WordMotion::WordPartRight),
            CursorMotion::WordPartLeft => Some(WordMotion::WordPartLeft),
            _ => None,
        }
    }

    /// ホスト組み込み移動への対応付け
    fn builtin(self) -> Option<BuiltinMove> {
        match self {
            CursorMotion::Up => Some(BuiltinMove::Up),
            CursorMotion::Down => Some(BuiltinMove::Down),
            CursorMotion::Left => Some(BuiltinMove::Left),
            CursorMotion::Right => Some(BuiltinMove::Right),
            CursorMotion::LineStart => Some(BuiltinMove::LineStart),
            CursorMotion::LineEnd => Some(BuiltinMove::LineEnd),
            CursorMotion::PageUp => Some(BuiltinMove::PageUp),
            CursorMotion::PageDown => Some(BuiltinMove::PageDown),
            CursorMotion::BufferStart => Some(BuiltinMove::BufferStart),
            CursorMotion::BufferEnd => Some(BuiltinMove::BufferEnd),
            _ => None,
        }
    }
}

/// コマンドの種類
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // 編集
    Kill,
    Cut,
    Copy,
    Yank,
    Undo,
    DeleteLine,
    DeleteBlankLines,
    BreakLine,
    KeyboardQuit,

    // カーソル移動
    Move(CursorMotion),

    // 単語・サブワード削除
    DeleteWordRight,
    DeleteWordLeft,
    DeleteWordPartRight,
    DeleteWordPartLeft,

    // 表示
    Recenter,
    ToggleFold,

    // マークモード
    EnterMarkMode,
    ExitMarkMode,
    ExitMarkModeOnEdit,

    // マルチカーソル
    SplitSelectionIntoLines,

    // マーク保持のままホストへ転送
    Passthrough(PassthroughCommand),

    // swiper検索
    Swipe,
    SwiperHistoryUp,
    SwiperHistoryDown,
    SwiperCopyLine,

    // 単語ハイライト
    HighlightWord,
    ClearHighlights,
    ClearLastHighlight,

    // 未知のコマンド
    Unknown(String),
}

impl Command {
    /// 文字列からコマンドを作成
    pub fn from_string(name: &str) -> Self {
        match name {
            "kill-line" => Command::Kill,
            "kill-region" => Command::Cut,
            "copy-region-as-kill" => Command::Copy,
            "yank" => Command::Yank,
            "undo" => Command::Undo,
            "delete-line" => Command::DeleteLine,
            "delete-blank-lines" => Command::DeleteBlankLines,
            "break-line" => Command::BreakLine,
            "keyboard-quit" => Command::KeyboardQuit,
            "previous-line" => Command::Move(CursorMotion::Up),
            "next-line" => Command::Move(CursorMotion::Down),
            "backward-char" => Command::Move(CursorMotion::Left),
            "forward-char" => Command::Move(CursorMotion::Right),
            "move-beginning-of-line" => Command::Move(CursorMotion::LineStart),
            "move-end-of-line" => Command::Move(CursorMotion::LineEnd),
            "scroll-down" => Command::Move(CursorMotion::PageUp),
            "scroll-up" => Command::Move(CursorMotion::PageDown),
            "beginning-of-buffer" => Command::Move(CursorMotion::BufferStart),
            "end-of-buffer" => Command::Move(CursorMotion::BufferEnd),
            "forward-word" => Command::Move(CursorMotion::WordRight),
            "backward-word" => Command::Move(CursorMotion::WordLeft),
            "forward-word-part" => Command::Move(CursorMotion::WordPartRight),
            "backward-word-part" => Command::Move(CursorMotion::WordPartLeft),
            "kill-word" => Command::DeleteWordRight,
            "backward-kill-word" => Command::DeleteWordLeft,
            "kill-word-part" => Command::DeleteWordPartRight,
            "backward-kill-word-part" => Command::DeleteWordPartLeft,
            "recenter-top-bottom" => Command::Recenter,
            "toggle-fold" => Command::ToggleFold,
            "set-mark-command" => Command::EnterMarkMode,
            "exit-mark-mode" => Command::ExitMarkMode,
            "exit-mark-mode-on-edit" => Command::ExitMarkModeOnEdit,
            "split-selection-into-lines" => Command::SplitSelectionIntoLines,
            "indent-lines" => Command::Passthrough(PassthroughCommand::IndentLines),
            "outdent" => Command::Passthrough(PassthroughCommand::Outdent),
            "add-comment-line" => Command::Passthrough(PassthroughCommand::AddCommentLine),
            "remove-comment-line" => Command::Passthrough(PassthroughCommand::RemoveCommentLine),
            "undo-preserving-mark" => Command::Passthrough(PassthroughCommand::Undo),
            "redo" => Command::Passthrough(PassthroughCommand::Redo),
            "swiper" => Command::Swipe,
            "swiper-history-up" => Command::SwiperHistoryUp,
            "swiper-history-down" => Command::SwiperHistoryDown,
            "swiper-copy-line" => Command::SwiperCopyLine,
            "highlight-word" => Command::HighlightWord,
            "clear-highlights" => Command::ClearHighlights,
            "clear-last-highlight" => Command::ClearLastHighlight,
            _ => Command::Unknown(name.to_string()),
        }
    }

    /// コマンドの説明を取得
    pub fn description(&self) -> &'static str {
        match self {
            Command::Kill => "行末までキルしてクリップボードへ",
            Command::Cut => "選択範囲を切り取り",
            Command::Copy => "選択範囲をコピー",
            Command::Yank => "クリップボードから貼り付け",
            Command::Undo => "直前の操作を取り消し",
            Command::DeleteLine => "カーソル行を削除",
            Command::DeleteBlankLines => "連続する空行を削除",
            Command::BreakLine => "改行を挿入して次行頭へ",
            Command::KeyboardQuit => "操作をキャンセル",
            Command::Move(_) => "カーソルを移動",
            Command::DeleteWordRight => "次の単語末尾まで削除",
            Command::DeleteWordLeft => "前の単語先頭まで削除",
            Command::DeleteWordPartRight => "次のサブワード末尾まで削除",
            Command::DeleteWordPartLeft => "前のサブワード先頭まで削除",
            Command::Recenter => "画面を中央・上端・下端へ再配置",
            Command::ToggleFold => "折り畳みをトグル",
            Command::EnterMarkMode => "マークを設定",
            Command::ExitMarkMode => "マークモードを解除",
            Command::ExitMarkModeOnEdit => "編集起因でマークモードを解除",
            Command::SplitSelectionIntoLines => "選択範囲を行ごとのカーソルに分割",
            Command::Passthrough(_) => "マークを保持したままホストコマンドを実行",
            Command::Swipe => "swiper検索を開く",
            Command::SwiperHistoryUp => "検索履歴をさかのぼる",
            Command::SwiperHistoryDown => "検索履歴を進める",
            Command::SwiperCopyLine => "アクティブな検索結果の行をコピー",
            Command::HighlightWord => "カーソル下の単語をハイライト",
            Command::ClearHighlights => "ハイライトをすべて解除",
            Command::ClearLastHighlight => "最後のハイライトを解除",
            Command::Unknown(_) => "不明なコマンド",
        }
    }
}

/// コマンド実行の結果
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// 結果メッセージ
    pub message: Option<String>,
    /// 画面更新が必要か
    pub needs_refresh: bool,
}

impl CommandResult {
    /// 成功結果を作成
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            needs_refresh: true,
        }
    }

    /// エラー結果を作成
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            needs_refresh: false,
        }
    }

    /// 対象がなく何もしなかった結果を作成
    pub fn ignored() -> Self {
        Self {
            success: true,
            message: None,
            needs_refresh: false,
        }
    }
}

/// ホストから届くエディタイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    DocumentChanged,
    SelectionChanged,
    ActiveEditorChanged,
}

/// 連続recenterの表示位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecenterPosition {
    Middle,
    Top,
    Bottom,
}

/// コマンドディスパッチャ
///
/// セッションスコープの全状態を所有する。ホストはコマンド実行と
/// イベント通知だけをここへ渡す。
pub struct CommandDispatcher {
    kill: KillState,
    mark: MarkMode,
    fold: FoldController,
    swiper: SwiperSession,
    highlighter: WordHighlighter,
    recenter: RecenterPosition,
    /// 編集イベントでマークを解除するか。Passthrough実行中だけ下ろす
    remove_mark_on_edit: bool,
    logger: Logger,
}

impl CommandDispatcher {
    /// 新しいディスパッチャを作成
    pub fn new() -> Self {
        Self {
            kill: KillState::new(),
            mark: MarkMode::new(),
            fold: FoldController::new(),
            swiper: SwiperSession::new(),
            highlighter: WordHighlighter::new(),
            recenter: RecenterPosition::Middle,
            remove_mark_on_edit: true,
            // 既定ではコマンド追跡を出力しない。開発時は
            // with_logger(Logger::for_development()) で有効化する
            logger: Logger::new(LogLevel::Warning),
        }
    }

    /// ロガーを差し替える
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// マークモード中かどうか
    pub fn in_mark_mode(&self) -> bool {
        self.mark.is_active()
    }

    /// swiperセッションへの参照（ピッカーUIのイベント転送用）
    pub fn swiper(&self) -> &SwiperSession {
        &self.swiper
    }

    /// swiperセッションへの可変参照
    pub fn swiper_mut(&mut self) -> &mut SwiperSession {
        &mut self.swiper
    }

    /// キル状態への参照（テスト用途）
    pub fn kill_state(&self) -> &KillState {
        &self.kill
    }

    /// コマンドを実行する
    pub fn execute<H: HostEditor>(&mut self, host: &mut H, command: Command) -> CommandResult {
        self.logger.debug(format!("command: {:?}", command));
        match self.try_execute(host, command) {
            Ok(result) => result,
            Err(err) => CommandResult::error(err.to_string()),
        }
    }

    /// ホストイベントを状態遷移に変換する
    pub fn handle_event<H: HostEditor>(&mut self, host: &mut H, event: EditorEvent) {
        match event {
            EditorEvent::DocumentChanged => {
                self.kill.on_document_changed();
                self.fold.on_document_changed();
                if self.remove_mark_on_edit {
                    self.mark.exit_on_edit(host);
                }
                self.highlighter.refresh(host);
            }
            EditorEvent::ActiveEditorChanged => {
                self.kill.on_editor_changed();
                self.fold.on_editor_changed();
                self.highlighter.refresh(host);
            }
            EditorEvent::SelectionChanged => {}
        }
    }

    fn try_execute<H: HostEditor>(
        &mut self,
        host: &mut H,
        command: Command,
    ) -> HostResult<CommandResult> {
        if !host.has_document() {
            // アクティブなドキュメントがなければ静かに無視する
            return Ok(CommandResult::ignored());
        }

        match command {
            Command::Kill => self.execute_kill(host),
            Command::Cut => self.execute_cut(host),
            Command::Copy => self.execute_copy(host),
            Command::Yank => self.execute_yank(host),
            Command::Undo => {
                host.undo()?;
                host.set_status_message("Undo!");
                self.notify_document_changed(host);
                Ok(CommandResult::success())
            }
            Command::DeleteLine => {
                self.mark.exit(host);
                host.delete_current_lines()?;
                self.notify_document_changed(host);
                Ok(CommandResult::success())
            }
            Command::DeleteBlankLines => self.execute_delete_blank_lines(host),
            Command::BreakLine => self.execute_break_line(host),
            Command::KeyboardQuit => {
                host.set_status_message("Quit");
                Ok(CommandResult::success())
            }
            Command::Move(motion) => self.execute_move(host, motion),
            Command::DeleteWordRight => self.execute_word_delete(host, WordMotion::WordRight),
            Command::DeleteWordLeft => self.execute_word_delete(host, WordMotion::WordLeft),
            Command::DeleteWordPartRight => {
                self.execute_word_delete(host, WordMotion::WordPartRight)
            }
            Command::DeleteWordPartLeft => self.execute_word_delete(host, WordMotion::WordPartLeft),
            Command::Recenter => self.execute_recenter(host),
            Command::ToggleFold => {
                self.fold.toggle(host);
                Ok(CommandResult::success())
            }
            Command::EnterMarkMode => {
                self.mark.enter(host);
                Ok(CommandResult::success())
            }
            Command::ExitMarkMode => {
                self.mark.exit(host);
                Ok(CommandResult::success())
            }
            Command::ExitMarkModeOnEdit => {
                self.mark.exit_on_edit(host);
                Ok(CommandResult::success())
            }
            Command::SplitSelectionIntoLines => self.execute_split_selection(host),
            Command::Passthrough(passthrough) => {
                // マーク解除を抑止したままホストの編集コマンドを実行する
                self.remove_mark_on_edit = false;
                let result = host.run_passthrough(passthrough);
                self.notify_document_changed(host);
                self.remove_mark_on_edit = true;
                result?;
                Ok(CommandResult::success())
            }
            Command::Swipe => {
                self.swiper.open(host);
                Ok(CommandResult::success())
            }
            Command::SwiperHistoryUp => {
                self.swiper.history_up(host);
                Ok(CommandResult::success())
            }
            Command::SwiperHistoryDown => {
                self.swiper.history_down(host);
                Ok(CommandResult::success())
            }
            Command::SwiperCopyLine => {
                self.swiper.copy_current_line(host)?;
                Ok(CommandResult::success())
            }
            Command::HighlightWord => {
                self.highlighter.toggle_selected_word(host);
                Ok(CommandResult::success())
            }
            Command::ClearHighlights => {
                self.highlighter.clear_all(host);
                Ok(CommandResult::success())
            }
            Command::ClearLastHighlight => {
                self.highlighter.clear_last(host);
                Ok(CommandResult::success())
            }
            Command::Unknown(name) => {
                self.logger.warning(format!("unknown command: {}", name));
                Ok(CommandResult::ignored())
            }
        }
    }

    /// 自分の編集に対するドキュメント変更通知を同期的に配送する
    fn notify_document_changed<H: HostEditor>(&mut self, host: &mut H) {
        self.handle_event(host, EditorEvent::DocumentChanged);
    }

    // --- キル・ヤンク ---

    /// 行末までキルする
    ///
    /// 行に空白以外が残る場合は改行を残し、空白だけなら改行ごと
    /// 削る。同じ位置からの連続キルはクリップボードに追記される。
    fn execute_kill<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        self.mark.exit(host);

        let snapshot = host.snapshot();
        let Some(selection) = host.primary_selection() else {
            return Ok(CommandResult::ignored());
        };
        let start = snapshot.clamp(selection.active);
        let on_last_line = snapshot.is_last_line(start.line);

        let mut end = if on_last_line {
            Position::new(start.line, snapshot.line_len(start.line))
        } else {
            Position::new(start.line + 1, 0)
        };

        let text = snapshot.text_in_range(Range::new(start, end));
        if !on_last_line && !text.chars().all(char::is_whitespace) {
            // 空白以外が含まれる行は改行を残す
            end = Position::new(start.line, snapshot.line_len(start.line));
        }

        host.set_selections(vec![Selection::new(start, end)]);
        let append = self.kill.should_append(start);
        let deleted = self.cut_selection(host, append)?;
        self.kill.record_kill(start);
        if deleted {
            self.notify_document_changed(host);
        }
        Ok(CommandResult::success())
    }

    fn execute_cut<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        let deleted = self.cut_selection(host, false)?;
        if deleted {
            self.notify_document_changed(host);
        }
        Ok(CommandResult::success())
    }

    fn execute_copy<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        let text = self.primary_selection_text(host);
        host.clipboard_write(&text)?;
        self.mark.exit(host);
        Ok(CommandResult::success())
    }

    fn execute_yank<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        self.kill.record_yank();
        let text = host.clipboard_read()?;
        host.paste(&text)?;
        self.mark.exit(host);
        self.notify_document_changed(host);
        Ok(CommandResult::success())
    }

    /// プライマリ選択をクリップボードへ移して削除する
    fn cut_selection<H: HostEditor>(&mut self, host: &mut H, append: bool) -> HostResult<bool> {
        let text = self.primary_selection_text(host);
        if append {
            let existing = host.clipboard_read()?;
            host.clipboard_write(&(existing + &text))?;
        } else {
            host.clipboard_write(&text)?;
        }

        let deleted = match host.primary_selection() {
            Some(selection) if !selection.is_empty() => host.apply_deletes(&[selection.range()])?,
            _ => false,
        };
        self.mark.exit(host);
        Ok(deleted)
    }

    fn primary_selection_text<H: HostEditor>(&self, host: &H) -> String {
        match host.primary_selection() {
            Some(selection) if !selection.is_empty() => {
                host.snapshot().text_in_range(selection.range())
            }
            _ => String::new(),
        }
    }

    // --- カーソル移動・削除 ---

    fn execute_move<H: HostEditor>(
        &mut self,
        host: &mut H,
        motion: CursorMotion,
    ) -> HostResult<CommandResult> {
        let extend = self.mark.is_active();
        self.mark.note_motion();

        if let Some(word_motion) = motion.word_motion() {
            let snapshot = host.snapshot();
            let selections = host.selections();
            let updated = motion::motion_selections(&snapshot, &selections, word_motion, extend);
            let reveal = updated.first().map(|s| s.active);
            host.set_selections(updated);
            if let Some(position) = reveal {
                host.reveal(Range::new(position, position), RevealKind::Default);
            }
        } else if let Some(builtin) = motion.builtin() {
            host.cursor_move(builtin, extend)?;
        }
        Ok(CommandResult::success())
    }

    fn execute_word_delete<H: HostEditor>(
        &mut self,
        host: &mut H,
        motion: WordMotion,
    ) -> HostResult<CommandResult> {
        let snapshot = host.snapshot();
        let selections = host.selections();
        let ranges = motion::delete_ranges(&snapshot, &selections, motion);
        let ranges: Vec<Range> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        if ranges.is_empty() {
            return Ok(CommandResult::ignored());
        }
        host.apply_deletes(&ranges)?;
        self.notify_document_changed(host);
        Ok(CommandResult::success())
    }

    // --- 行の操作 ---

    fn execute_delete_blank_lines<H: HostEditor>(
        &mut self,
        host: &mut H,
    ) -> HostResult<CommandResult> {
        let snapshot = host.snapshot();
        let Some(selection) = host.primary_selection() else {
            return Ok(CommandResult::ignored());
        };
        let start_line = selection.start().line;

        // 空行上では空行ランの先頭を残して以降を削除する。
        // 非空行上では次行から始まるランを削除する。
        let (anchor, delete_from) = if snapshot.line_is_empty(start_line) {
            let mut first = start_line;
            while first > 0 && snapshot.line_is_empty(first - 1) {
                first -= 1;
            }
            (Position::new(first, 0), first + 1)
        } else {
            (selection.anchor, start_line + 1)
        };

        let mut run = 0;
        while delete_from + run + 1 < snapshot.line_count()
            && snapshot.line_is_empty(delete_from + run)
        {
            run += 1;
        }

        if run > 0 {
            host.apply_deletes(&[Range::new(
                Position::new(delete_from, 0),
                Position::new(delete_from + run, 0),
            )])?;
            self.notify_document_changed(host);
        }
        host.set_selections(vec![Selection::caret(anchor)]);
        Ok(CommandResult::success())
    }

    fn execute_break_line<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        let Some(selection) = host.primary_selection() else {
            return Ok(CommandResult::ignored());
        };
        let position = selection.active;
        host.insert_text(position, "\n")?;
        host.set_selections(vec![Selection::caret(Position::new(position.line + 1, 0))]);
        self.notify_document_changed(host);
        Ok(CommandResult::success())
    }

    fn execute_recenter<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        let Some(selection) = host.primary_selection() else {
            return Ok(CommandResult::ignored());
        };
        match self.recenter {
            RecenterPosition::Middle => {
                self.recenter = RecenterPosition::Top;
                host.reveal(selection.range(), RevealKind::Center);
            }
            RecenterPosition::Top => {
                self.recenter = RecenterPosition::Bottom;
                host.reveal(selection.range(), RevealKind::Top);
            }
            RecenterPosition::Bottom => {
                self.recenter = RecenterPosition::Middle;
                // 下端指定はホストにないため1ページ上へスクロールして代える
                host.scroll_page_up();
            }
        }
        Ok(CommandResult::success())
    }

    fn execute_split_selection<H: HostEditor>(&mut self, host: &mut H) -> HostResult<CommandResult> {
        let selections = host.selections();
        if selections.len() > 1 {
            return Ok(CommandResult::ignored());
        }
        let Some(selection) = selections.first().copied() else {
            return Ok(CommandResult::ignored());
        };
        if selection.range().is_single_line() {
            return Ok(CommandResult::ignored());
        }

        self.mark.exit(host);
        let snapshot = host.snapshot();
        let column = selection.active.character;
        let carets: Vec<Selection> = (selection.start().line..=selection.end().line)
            .map(|line| {
                Selection::caret(Position::new(line, min(snapshot.line_len(line), column)))
            })
            .collect();
        host.set_selections(carets);
        Ok(CommandResult::success())
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
