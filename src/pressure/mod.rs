//! 气压能力：可加压资源的读数 / 容量模型

/// 每个容积升级提供的额外容积（mL）
pub const VOLUME_PER_UPGRADE: i32 = 1000;

/// 气罐状态：当前空气量 + 基础容积 + 最大气压
///
/// 实际容积 = 基础容积 + 容积升级数 × [`VOLUME_PER_UPGRADE`]，
/// 最大可存空气量（容量） = 容积 × 最大气压。
#[derive(Debug, Clone, PartialEq)]
pub struct AirHandler {
    air: i32,
    base_volume: i32,
    volume_upgrades: u32,
    max_pressure: f32,
}

impl AirHandler {
    pub fn new(base_volume: i32, max_pressure: f32) -> Self {
        Self {
            air: 0,
            base_volume,
            volume_upgrades: 0,
            max_pressure,
        }
    }

    pub fn air(&self) -> i32 {
        self.air
    }

    pub fn volume(&self) -> i32 {
        self.base_volume + self.volume_upgrades as i32 * VOLUME_PER_UPGRADE
    }

    pub fn max_pressure(&self) -> f32 {
        self.max_pressure
    }

    /// 当前气压 = 空气量 / 容积
    pub fn pressure(&self) -> f32 {
        self.air as f32 / self.volume() as f32
    }

    /// 容量：不超压时可容纳的空气量
    pub fn capacity(&self) -> i32 {
        (self.volume() as f32 * self.max_pressure) as i32
    }

    /// 充入（或抽出，负数）空气；下限为 0
    pub fn add_air(&mut self, delta: i32) {
        self.air = (self.air + delta).max(0);
    }

    pub fn set_air(&mut self, air: i32) {
        self.air = air.max(0);
    }

    /// 升级变化时由缓存层调用，重算容积
    pub fn set_volume_upgrades(&mut self, count: u32) {
        self.volume_upgrades = count;
    }
}
