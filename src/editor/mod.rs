//! 編集層
//!
//! キル状態・マークモード・折り畳みの各コントローラ

pub mod fold;
pub mod kill;
pub mod mark;

pub use fold::FoldController;
pub use kill::KillState;
pub use mark::MarkMode;
