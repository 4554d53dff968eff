//! 設定管理
//!
//! ホストから読み取り専用で渡される拡張機能の設定。
//! 読み込み元（設定ファイル、ホストの設定ストア）はホストの責務で、
//! ここではJSONドキュメントの解釈のみを行う

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 拡張機能全体の設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// swiper検索の設定
    pub swiper: SwiperConfig,
    /// 単語ハイライトの設定
    pub highlight: HighlightConfig,
}

/// swiper検索の設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwiperConfig {
    /// 確定時にマッチ範囲を選択するか（falseならマッチ末尾にカーソルを置く）
    #[serde(rename = "selectMatch")]
    pub select_match: bool,
}

/// 単語ハイライトの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// 大文字小文字を無視するか
    #[serde(rename = "ignoreCase")]
    pub ignore_case: bool,
    /// ハイライト色（ライト/ダークテーマの組）
    pub colors: Vec<HighlightColor>,
}

/// ライト/ダークテーマごとのハイライト色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightColor {
    pub light: String,
    pub dark: String,
}

impl HighlightColor {
    fn pair(light: &str, dark: &str) -> Self {
        Self {
            light: light.to_string(),
            dark: dark.to_string(),
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            colors: vec![
                HighlightColor::pair("rgba(255, 212, 0, 0.5)", "rgba(255, 212, 0, 0.35)"),
                HighlightColor::pair("rgba(64, 200, 64, 0.5)", "rgba(64, 200, 64, 0.35)"),
                HighlightColor::pair("rgba(64, 160, 255, 0.5)", "rgba(64, 160, 255, 0.35)"),
                HighlightColor::pair("rgba(255, 64, 200, 0.5)", "rgba(255, 64, 200, 0.35)"),
            ],
        }
    }
}

impl ExtensionConfig {
    /// JSON文字列から設定を構築
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// ファイルから設定を読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
