use bevy::prelude::*;

/// 往工具的升级槽里装升级
#[derive(Event)]
pub struct InstallUpgradeEvent {
    pub id: String,
    pub count: u32,
}

/// 从升级槽里拆升级
#[derive(Event)]
pub struct RemoveUpgradeEvent {
    pub id: String,
    pub count: u32,
}

/// 让 CLI 请求打印已安装升级
#[derive(Event)]
pub struct ListUpgradesEvent;

/// 设置创造模式标记
#[derive(Event)]
pub struct SetCreativeEvent {
    pub on: bool,
}

/// 给工具充气（负数为放气）
#[derive(Event)]
pub struct AddAirEvent {
    pub amount: i32,
}

/// 把工具 tag 存到磁盘
#[derive(Event)]
pub struct SaveToolEvent {
    pub path: String,
}

/// 从磁盘恢复工具 tag
#[derive(Event)]
pub struct LoadToolEvent {
    pub path: String,
}
