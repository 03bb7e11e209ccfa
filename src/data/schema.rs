use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::Deserialize;

fn default_max_count() -> u32 {
    64
}

/// 升级定义表条目
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeEntry {
    pub id: String,
    pub name: String,
    /// 单槽上限
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct UpgradeList {
    pub upgrades: Vec<UpgradeEntry>,
}
