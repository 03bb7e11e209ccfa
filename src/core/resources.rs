use bevy::prelude::*;
use serde::Deserialize;

/// 全局配置，启动时从 config.toml 读取
///
/// 文件缺失或解析失败时直接用默认值，不视为错误。
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 是否显示窗口（demo 默认隐藏，纯 CLI 交互）
    pub window_visible: bool,
    /// 工具气罐基础容积（mL）
    pub base_volume: i32,
    /// 最大气压（bar）
    pub max_pressure: f32,
    /// 初始空气量（mL）
    pub starting_air: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_visible: false,
            base_volume: 1000,
            max_pressure: 10.0,
            starting_air: 0,
        }
    }
}

impl GameConfig {
    pub fn load() -> Self {
        match std::fs::read_to_string("config.toml") {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    warn!("config.toml 解析失败，使用默认配置: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GameConfig = toml::from_str("base_volume = 2000").unwrap();
        assert_eq!(config.base_volume, 2000);
        assert_eq!(config.max_pressure, 10.0);
        assert!(!config.window_visible);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_volume, GameConfig::default().base_volume);
    }
}
