use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::Duration;
use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    #[error("Failed to load {0}. error: {1}")]
    LoadFileError(PathBuf, io::ErrorKind),
    #[error(transparent)]
    TomlParseError(#[from] toml::de::Error),
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ArpConfig {
    /// 近隣テーブル検索のタイムアウト(秒)
    #[serde(default = "ArpConfig::default_timeout")]
    #[serde_as(as = "DurationSeconds<i64>")]
    pub(crate) timeout: Duration,
}

impl ArpConfig {
    const fn default_timeout() -> Duration {
        Duration::seconds(5)
    }
}

impl Default for ArpConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Config {
    /// 監視対象のホスト名またはIPアドレスのリスト
    /// この順序で各ラウンドを実行する
    #[serde(default)]
    pub(crate) targets: Vec<String>,

    /// ラウンド間の待機時間(秒)
    /// デフォルトは2秒
    #[serde_as(as = "DurationSeconds<i64>")]
    #[serde(default = "Config::default_interval")]
    pub(crate) interval: Duration,

    /// pingのタイムアウト(秒)
    /// デフォルトは5秒
    #[serde_as(as = "DurationSeconds<i64>")]
    #[serde(default = "Config::default_timeout")]
    pub(crate) timeout: Duration,

    /// 監視イベントを保持するためのバッファのサイズ
    /// デフォルトは1000イベント
    #[serde(default = "Config::default_buffer_size")]
    pub(crate) buffer_size: usize,

    /// タイムラインに保持する行数
    /// デフォルトは1000行
    #[serde(default = "Config::default_history_size")]
    pub(crate) history_size: usize,

    /// 実行するラウンド数の上限
    /// 指定しない場合は停止するまで続ける
    #[serde(default)]
    pub(crate) max_rounds: Option<u64>,

    /// ARP設定
    #[serde(default)]
    pub(crate) arp: ArpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            interval: Self::default_interval(),
            timeout: Self::default_timeout(),
            buffer_size: Self::default_buffer_size(),
            history_size: Self::default_history_size(),
            max_rounds: None,
            arp: ArpConfig::default(),
        }
    }
}
impl Config {
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFileError(path.to_path_buf(), e.kind()))?;
        toml::from_str(&content).map_err(ConfigError::TomlParseError)
    }

    /// 設定ファイルを読み込む
    /// `allow_missing` が真でファイルが存在しない場合はデフォルト設定を返す
    pub(crate) fn load_or_default(
        path: impl AsRef<Path>,
        allow_missing: bool,
    ) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::LoadFileError(_, io::ErrorKind::NotFound)) if allow_missing => {
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// デフォルトのラウンド間隔
    const fn default_interval() -> Duration {
        Duration::seconds(2)
    }

    /// デフォルトのpingタイムアウト
    const fn default_timeout() -> Duration {
        Duration::seconds(5)
    }

    /// デフォルトのバッファサイズ
    const fn default_buffer_size() -> usize {
        1000
    }

    /// デフォルトのタイムライン行数
    const fn default_history_size() -> usize {
        1000
    }
}
