//! マッチ装飾の色分け
//!
//! swiperのマッチ範囲をパレット番号ごとのバケツに振り分ける。
//! 色は行内でのマッチ順に巡回し、アクティブ行のマッチだけ
//! 強調用のスタイル群に入る。実際の描画はホストの責務。

use super::matcher::MatchedLine;
use crate::document::{Position, Range};

/// 枠線色のパレット（ホストが参照する既定値）
pub const BORDER_COLORS: [&str; 6] = ["red", "cyan", "green", "yellow", "BlueViolet", "Fuchsia"];

/// パレットの色数
pub const PALETTE_SIZE: usize = BORDER_COLORS.len();

/// パレット番号ごとに振り分けた装飾範囲
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDecorations {
    /// 通常行のマッチ
    pub plain: Vec<Vec<Range>>,
    /// アクティブ行のマッチ
    pub active: Vec<Vec<Range>>,
}

impl MatchDecorations {
    /// 空のバケツ群を作成
    pub fn empty() -> Self {
        Self {
            plain: vec![Vec::new(); PALETTE_SIZE],
            active: vec![Vec::new(); PALETTE_SIZE],
        }
    }
}

/// 受理行のマッチ範囲をパレットに振り分ける
pub fn bucket_matches(items: &[MatchedLine], active_line: Option<usize>) -> MatchDecorations {
    let mut decorations = MatchDecorations::empty();

    for item in items {
        let is_active = Some(item.line) == active_line;
        for (index, &(start, len)) in item.ranges.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let range = Range::new(
                Position::new(item.line, start),
                Position::new(item.line, start + len),
            );
            let bucket = index % PALETTE_SIZE;
            if is_active {
                decorations.active[bucket].push(range);
            } else {
                decorations.plain[bucket].push(range);
            }
        }
    }

    decorations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(line: usize, ranges: Vec<(usize, usize)>) -> MatchedLine {
        MatchedLine { line, ranges }
    }

    #[test]
    fn colors_cycle_by_match_position_in_line() {
        let items = vec![matched(0, vec![(0, 2), (4, 2), (8, 2)])];
        let decorations = bucket_matches(&items, None);
        assert_eq!(decorations.plain[0].len(), 1);
        assert_eq!(decorations.plain[1].len(), 1);
        assert_eq!(decorations.plain[2].len(), 1);
        assert!(decorations.active.iter().all(Vec::is_empty));
    }

    #[test]
    fn palette_wraps_around() {
        let ranges: Vec<(usize, usize)> = (0..(PALETTE_SIZE + 1)).map(|i| (i * 3, 2)).collect();
        let items = vec![matched(0, ranges)];
        let decorations = bucket_matches(&items, None);
        // 7番目のマッチは色0に戻る
        assert_eq!(decorations.plain[0].len(), 2);
    }

    #[test]
    fn active_line_uses_active_buckets() {
        let items = vec![matched(0, vec![(0, 2)]), matched(3, vec![(1, 2)])];
        let decorations = bucket_matches(&items, Some(3));
        assert_eq!(decorations.plain[0].len(), 1);
        assert_eq!(decorations.plain[0][0].start.line, 0);
        assert_eq!(decorations.active[0].len(), 1);
        assert_eq!(decorations.active[0][0].start.line, 3);
    }

    #[test]
    fn zero_length_ranges_are_skipped() {
        let items = vec![matched(0, vec![(0, 0), (2, 1)])];
        let decorations = bucket_matches(&items, None);
        assert!(decorations.plain[0].is_empty());
        // 空マッチも色番号は消費する
        assert_eq!(decorations.plain[1].len(), 1);
    }
}
