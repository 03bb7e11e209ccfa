use super::{cache, components::*, events::*};
use crate::core::events::LogEvent;
use crate::core::resources::GameConfig;
use crate::data::{UpgradeAssets, schema::UpgradeList};
use crate::pressure::AirHandler;
use crate::tag::TagCompound;
use anyhow::Context;
use bevy::prelude::*;

/// 进入游戏时按配置初始化示例工具
pub fn setup_tool(mut commands: Commands, config: Res<GameConfig>) {
    let mut air = AirHandler::new(config.base_volume, config.max_pressure);
    air.set_air(config.starting_air);
    commands.insert_resource(Tool {
        tag: TagCompound::new(),
        air,
    });
}

/// 处理"install"——装升级并重建缓存
pub fn install_upgrade(
    mut ev_install: EventReader<InstallUpgradeEvent>,
    mut tool: ResMut<Tool>,
    upgrade_assets: Res<UpgradeAssets>,
    lists: Res<Assets<UpgradeList>>,
    mut log: EventWriter<LogEvent>,
) {
    let list = upgrade_assets
        .handle
        .as_ref()
        .and_then(|h| lists.get(h))
        .expect("upgrades must be loaded");

    for ev in ev_install.read() {
        let Some(entry) = list
            .upgrades
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(&ev.id))
        else {
            log.write(LogEvent(format!("不存在升级 ID {}", ev.id)));
            continue;
        };

        let key = cache::canonical_key(&entry.id);
        let mut inv = cache::get_upgrades(&tool.tag);
        let leftover = inv.insert(&key, ev.count, entry.max_count);
        let installed = ev.count - leftover;

        let tool = &mut *tool;
        cache::set_upgrades(&mut tool.tag, &inv, Some(&mut tool.air));

        if installed > 0 {
            log.write(LogEvent(format!("安装 {} ×{}", entry.name, installed)));
        }
        if leftover > 0 {
            warn!("升级槽已满，{} ×{} 未能装入", entry.name, leftover);
            log.write(LogEvent(format!("升级槽已满，{} ×{} 未能装入", entry.name, leftover)));
        }
    }
}

/// 处理"remove"——拆升级；容量变小时缓存层会把气压钳回
pub fn remove_upgrade(
    mut ev_remove: EventReader<RemoveUpgradeEvent>,
    mut tool: ResMut<Tool>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_remove.read() {
        let key = cache::canonical_key(&ev.id);
        let mut inv = cache::get_upgrades(&tool.tag);
        let removed = inv.remove(&key, ev.count);
        if removed == 0 {
            log.write(LogEvent(format!("未安装 {key}，无可拆卸")));
            continue;
        }

        let air_before = tool.air.air();
        let tool = &mut *tool;
        cache::set_upgrades(&mut tool.tag, &inv, Some(&mut tool.air));

        log.write(LogEvent(format!("拆下 {key} ×{removed}")));
        if tool.air.air() < air_before {
            log.write(LogEvent(format!(
                "容量降低，空气量 {} → {}",
                air_before,
                tool.air.air()
            )));
        }
    }
}

/// 打印已安装升级与气压状态
pub fn list_installed(
    mut ev_list: EventReader<ListUpgradesEvent>,
    tool: Res<Tool>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut lines = Vec::new();
    cache::add_upgrade_information(&tool.tag, &mut lines);
    if cache::has_creative_upgrade(&tool.tag) {
        lines.push("• 创造模式标记: 开".to_string());
    }
    lines.push(format!(
        "气压 {:.2} / {:.2} bar (空气 {} / {} mL)",
        tool.air.pressure(),
        tool.air.max_pressure(),
        tool.air.air(),
        tool.air.capacity()
    ));
    log.write(LogEvent(lines.join("\n")));
}

pub fn set_creative(
    mut ev_creative: EventReader<SetCreativeEvent>,
    mut tool: ResMut<Tool>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_creative.read() {
        cache::set_creative_upgrade(&mut tool.tag, ev.on);
        log.write(LogEvent(format!(
            "创造模式标记: {}",
            if ev.on { "开" } else { "关" }
        )));
    }
}

pub fn add_air(
    mut ev_air: EventReader<AddAirEvent>,
    mut tool: ResMut<Tool>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_air.read() {
        tool.air.add_air(ev.amount);
        log.write(LogEvent(format!(
            "当前气压 {:.2} bar (空气 {} mL)",
            tool.air.pressure(),
            tool.air.air()
        )));
        if tool.air.pressure() > tool.air.max_pressure() {
            warn!("气压超过上限 {:.2} bar", tool.air.max_pressure());
        }
    }
}

/// 处理"save"——工具 tag 落盘（JSON）
pub fn save_tool(
    mut ev_save: EventReader<SaveToolEvent>,
    mut tool: ResMut<Tool>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_save.read() {
        // 空气量同步进 tag 再写文件
        let air = tool.air.air();
        tool.tag.put_int("Air", air);
        match write_tag(&ev.path, &tool.tag) {
            Ok(()) => {
                log.write(LogEvent(format!("已保存到 {}", ev.path)));
            }
            Err(err) => {
                warn!("保存失败: {err:#}");
                log.write(LogEvent(format!("保存失败: {err:#}")));
            }
        };
    }
}

/// 处理"load"——从磁盘恢复 tag，并据此重建气罐状态
pub fn load_tool(
    mut ev_load: EventReader<LoadToolEvent>,
    mut tool: ResMut<Tool>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_load.read() {
        match read_tag(&ev.path) {
            Ok(tag) => {
                tool.tag = tag;
                let volume_upgrades = cache::upgrade_count(&tool.tag, cache::VOLUME_UPGRADE_ID);
                tool.air.set_volume_upgrades(volume_upgrades);
                let air = tool.tag.get_int("Air");
                tool.air.set_air(air);
                log.write(LogEvent(format!("已从 {} 恢复", ev.path)));
            }
            Err(err) => {
                warn!("读取失败: {err:#}");
                log.write(LogEvent(format!("读取失败: {err:#}")));
            }
        }
    }
}

fn write_tag(path: &str, tag: &TagCompound) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(tag)?;
    std::fs::write(path, text).with_context(|| format!("写入 {path}"))?;
    Ok(())
}

fn read_tag(path: &str) -> anyhow::Result<TagCompound> {
    let text = std::fs::read_to_string(path).with_context(|| format!("读取 {path}"))?;
    let tag = serde_json::from_str(&text).with_context(|| format!("解析 {path}"))?;
    Ok(tag)
}
