//! 検索モジュール
//!
//! クエリ解析・行マッチング・履歴・装飾色分け・swiperセッション

pub mod decoration;
pub mod history;
pub mod matcher;
pub mod query;
pub mod swiper;

pub use decoration::{bucket_matches, MatchDecorations, BORDER_COLORS, PALETTE_SIZE};
pub use history::{SearchHistory, MAX_HISTORY_SIZE};
pub use matcher::{LineMatcher, MatchedLine};
pub use query::{parse_query, ParsedTerm};
pub use swiper::{SearchItem, SwiperSession, PROMPT_STRING};
