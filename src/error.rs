//! エラーハンドリングシステム
//!
//! emil全体で使用される統一されたエラー型を定義。
//! コアの操作はホスト不在時に静かにno-opするため、エラーは
//! ホスト境界と設定読み込みに限られる。

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug)]
pub enum EmilError {
    /// ホスト操作エラー
    #[error("Host operation failed")]
    Host(#[from] HostError),

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),

    /// アプリケーション論理エラー
    #[error("Application error: {0}")]
    Application(String),
}

/// ホストエディタ境界のエラー
#[derive(Error, Debug)]
pub enum HostError {
    #[error("clipboard operation failed: {message}")]
    Clipboard { message: String },

    #[error("edit was rejected by the host")]
    EditRejected,

    #[error("line {line} is out of range")]
    InvalidLine { line: usize },

    /// ホストアダプタ固有のエラーをそのまま運ぶ
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// 設定読み込みのエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration file: {message}")]
    Io { message: String },

    #[error("invalid configuration document: {message}")]
    Parse { message: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io { message: error.to_string() }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse { message: error.to_string() }
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, EmilError>;

/// ホスト操作用のResult型
pub type HostResult<T> = std::result::Result<T, HostError>;
