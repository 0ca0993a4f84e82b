use crate::error::{FarmError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// データベースファイルのパス（未設定なら既定の場所）
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FarmError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("farm-records").join("config.json"))
    }

    /// 使用するデータベースファイルのパスを決める
    ///
    /// CLIの `--db` > 設定ファイル > 既定（データディレクトリ配下）
    pub fn database_path(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.clone();
        }
        if let Some(path) = &self.db_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("farm-records").join("farm_records.db"))
            .unwrap_or_else(|| PathBuf::from("farm_records.db"))
    }

    pub fn set_db_path(&mut self, path: PathBuf) -> Result<()> {
        self.db_path = Some(path);
        self.save()
    }
}
