use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

/// 設定ファイルを指定しなかった場合に読み込むパス
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// 設定ファイルのパス (デフォルト: ./config.toml、存在しなくてもよい)
    #[clap(long, short)]
    pub(crate) config: Option<PathBuf>,

    /// 監視対象(カンマ区切りも可)。指定した場合は設定ファイルの対象より優先する
    #[clap(value_delimiter = ',')]
    pub(crate) targets: Vec<String>,

    /// ラウンド間の待機時間(秒)
    #[clap(long, short)]
    pub(crate) interval: Option<u32>,

    /// pingのタイムアウト(秒)
    #[clap(long, short)]
    pub(crate) timeout: Option<u32>,

    /// 実行するラウンド数の上限
    #[clap(long)]
    pub(crate) max_rounds: Option<u64>,
}
impl Cli {
    pub(crate) fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// 設定ファイルを読み込む
    /// 明示的に指定されたファイルは存在しなければエラーとする
    pub(crate) fn load_config(&self) -> Result<Config, ConfigError> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(DEFAULT_CONFIG_PATH, true)?,
        };
        Ok(self.apply(config))
    }

    /// コマンドラインで対象が指定されているかどうか
    pub(crate) fn has_targets(&self) -> bool {
        self.targets.iter().any(|target| !target.trim().is_empty())
    }

    /// コマンドラインの指定で設定を上書きする
    pub(crate) fn apply(&self, mut config: Config) -> Config {
        if self.has_targets() {
            config.targets = self
                .targets
                .iter()
                .map(|target| target.trim())
                .filter(|target| !target.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(interval) = self.interval {
            config.interval = chrono::Duration::seconds(interval.into());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = chrono::Duration::seconds(timeout.into());
        }
        if self.max_rounds.is_some() {
            config.max_rounds = self.max_rounds;
        }
        config
    }
}
