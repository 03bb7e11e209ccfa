//! 升级缓存：把 9 格升级槽聚合成"每种升级装了几个"的可查询摘要
//!
//! 原始背包和计数缓存一起写进持有者的 tag；读取计数时只查缓存，
//! 不再逐槽扫描。缓存永远由 [`set_upgrades`] 重建，不单独修改。

use super::components::{UPGRADE_INV_SIZE, UpgradeInventory};
use crate::item::ItemStack;
use crate::pressure::AirHandler;
use crate::tag::{TagCompound, TagValue};

pub const NBT_UPGRADE_TAG: &str = "UpgradeInventory";
pub const NBT_UPGRADE_CACHE_TAG: &str = "UpgradeCache";
pub const NBT_CREATIVE: &str = "CreativeUpgrade";

/// 默认命名空间；kind id 不带 ':' 时补全
pub const DEFAULT_NAMESPACE: &str = "pneuma";

/// 影响气罐容积的升级 kind
pub const VOLUME_UPGRADE_ID: &str = "pneuma:volume";

/// kind 的规范化 key：已带命名空间则原样返回
pub fn canonical_key(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("{DEFAULT_NAMESPACE}:{id}")
    }
}

/// 把升级背包写入持有者 tag，并重建计数缓存。
///
/// 持有者带气压能力时顺带重算容积：升级变化可能把容量压到当前
/// 空气量以下，此时把空气量钳到新容量。
pub fn set_upgrades(tag: &mut TagCompound, inventory: &UpgradeInventory, air: Option<&mut AirHandler>) {
    tag.put_compound(NBT_UPGRADE_TAG, inventory.serialize_tag());

    let mut cache = TagCompound::new();
    for slot in inventory.slots() {
        if slot.is_empty() {
            continue;
        }
        let key = canonical_key(&slot.id);
        let total = cache.get_int(&key) + slot.count as i32;
        cache.put_int(key, total);
    }
    tag.put_compound(NBT_UPGRADE_CACHE_TAG, cache);

    if let Some(handler) = air {
        handler.set_volume_upgrades(upgrade_count(tag, VOLUME_UPGRADE_ID));
        if handler.pressure() > handler.max_pressure() {
            let capacity = handler.capacity();
            handler.add_air(capacity - handler.air());
        }
    }
}

/// 某 kind 的已装数量；无数据时为 0。只读缓存，不扫原始背包
pub fn upgrade_count(tag: &TagCompound, kind: &str) -> u32 {
    tag.get_compound(NBT_UPGRADE_CACHE_TAG)
        .get_int(&canonical_key(kind))
        .max(0) as u32
}

/// 批量查询，结果与入参同序
pub fn upgrade_counts(tag: &TagCompound, kinds: &[&str]) -> Vec<u32> {
    let cache = tag.get_compound(NBT_UPGRADE_CACHE_TAG);
    kinds
        .iter()
        .map(|kind| cache.get_int(&canonical_key(kind)).max(0) as u32)
        .collect()
}

/// 还原 9 格原始升级堆叠（空位补空堆叠）
pub fn upgrade_stacks(tag: &TagCompound) -> Vec<ItemStack> {
    let mut stacks = vec![ItemStack::empty(); UPGRADE_INV_SIZE];
    let stored = tag.get_compound(NBT_UPGRADE_TAG);
    for value in stored.get_list("Items") {
        let TagValue::Compound(entry) = value else {
            continue;
        };
        let slot = entry.get_byte("Slot");
        if (0..UPGRADE_INV_SIZE as i8).contains(&slot) {
            stacks[slot as usize] = ItemStack::load_from(entry);
        }
    }
    stacks
}

/// 还原可编辑的升级背包
pub fn get_upgrades(tag: &TagCompound) -> UpgradeInventory {
    UpgradeInventory::from_tag(&tag.get_compound(NBT_UPGRADE_TAG))
}

pub fn has_creative_upgrade(tag: &TagCompound) -> bool {
    tag.get_bool(NBT_CREATIVE)
}

/// 创造模式标记独立于槽位内容，由外部直接设置
pub fn set_creative_upgrade(tag: &mut TagCompound, on: bool) {
    tag.put_bool(NBT_CREATIVE, on);
}

/// 生成"已安装升级"摘要行，同 kind 跨槽位合并
pub fn add_upgrade_information(tag: &TagCompound, lines: &mut Vec<String>) {
    let stacks = upgrade_stacks(tag);
    if stacks.iter().all(|s| s.is_empty()) {
        lines.push("未安装任何升级".to_string());
        return;
    }
    lines.push("已安装升级:".to_string());
    let mut seen: Vec<(String, u32)> = Vec::new();
    for stack in stacks.iter().filter(|s| !s.is_empty()) {
        let key = canonical_key(&stack.id);
        if let Some(entry) = seen.iter_mut().find(|(k, _)| *k == key) {
            entry.1 += stack.count;
        } else {
            seen.push((key, stack.count));
        }
    }
    for (key, count) in seen {
        lines.push(format!("• {count} × {key}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inv(entries: &[(usize, &str, u32)]) -> UpgradeInventory {
        let mut inv = UpgradeInventory::new();
        for &(slot, id, count) in entries {
            inv.set_slot(slot, ItemStack::new(id, count));
        }
        inv
    }

    #[test]
    fn counts_sum_quantities_per_kind() {
        let mut tag = TagCompound::new();
        let inv = inv(&[
            (0, "pneuma:speed", 3),
            (2, "pneuma:range", 1),
            (7, "pneuma:speed", 2),
        ]);
        set_upgrades(&mut tag, &inv, None);

        assert_eq!(upgrade_count(&tag, "pneuma:speed"), 5);
        assert_eq!(upgrade_count(&tag, "pneuma:range"), 1);
        assert_eq!(upgrade_count(&tag, "pneuma:volume"), 0);
    }

    #[test]
    fn count_accepts_bare_ids() {
        let mut tag = TagCompound::new();
        set_upgrades(&mut tag, &inv(&[(0, "pneuma:speed", 2)]), None);
        // "speed" 补全默认命名空间后等价于 "pneuma:speed"
        assert_eq!(upgrade_count(&tag, "speed"), 2);
    }

    #[test]
    fn stacks_round_trip() {
        let mut tag = TagCompound::new();
        let inv = inv(&[(1, "pneuma:range", 4), (8, "pneuma:speed", 1)]);
        set_upgrades(&mut tag, &inv, None);

        let stacks = upgrade_stacks(&tag);
        assert_eq!(stacks.len(), UPGRADE_INV_SIZE);
        assert_eq!(stacks[1], ItemStack::new("pneuma:range", 4));
        assert_eq!(stacks[8], ItemStack::new("pneuma:speed", 1));
        assert!(stacks[0].is_empty());

        assert_eq!(get_upgrades(&tag), inv);
    }

    #[test]
    fn set_upgrades_is_idempotent() {
        let inv = inv(&[(0, "pneuma:speed", 3), (5, "pneuma:volume", 2)]);
        let mut once = TagCompound::new();
        set_upgrades(&mut once, &inv, None);
        let mut twice = once.clone();
        set_upgrades(&mut twice, &inv, None);
        assert_eq!(once, twice);
    }

    #[test]
    fn absent_tag_yields_zero_and_false() {
        let tag = TagCompound::new();
        assert_eq!(upgrade_count(&tag, "pneuma:speed"), 0);
        assert!(!has_creative_upgrade(&tag));
        assert!(upgrade_stacks(&tag).iter().all(|s| s.is_empty()));
        assert!(get_upgrades(&tag).is_empty());
    }

    #[test]
    fn rogue_slot_index_dropped_without_shifting() {
        // 手工构造一份带 Slot=12 条目的存档，检验静默丢弃策略。
        // 这一行为与"钳位/报错"二选一之间的取舍见错误处理设计，
        // 此处锁定现状：不报错、其它槽位不移位、计数不修正。
        let mut stored = UpgradeInventory::new();
        stored.set_slot(3, ItemStack::new("pneuma:speed", 2));
        let mut inv_tag = stored.serialize_tag();
        let mut rogue = TagCompound::new();
        rogue.put_byte("Slot", 12);
        ItemStack::new("pneuma:range", 9).save_to(&mut rogue);
        let mut items = inv_tag.get_list("Items").to_vec();
        items.push(TagValue::Compound(rogue));
        inv_tag.put_list("Items", items);

        let mut tag = TagCompound::new();
        tag.put_compound(NBT_UPGRADE_TAG, inv_tag);

        let stacks = upgrade_stacks(&tag);
        assert_eq!(stacks[3], ItemStack::new("pneuma:speed", 2));
        assert!(stacks.iter().all(|s| s.id != "pneuma:range"));
    }

    #[test]
    fn batched_counts_follow_input_order() {
        let mut tag = TagCompound::new();
        let inv = inv(&[
            (0, "pneuma:range", 1),
            (1, "pneuma:speed", 4),
            (2, "pneuma:volume", 2),
        ]);
        set_upgrades(&mut tag, &inv, None);

        let counts = upgrade_counts(
            &tag,
            &["pneuma:volume", "pneuma:dispenser", "pneuma:speed", "pneuma:range"],
        );
        assert_eq!(counts, vec![2, 0, 4, 1]);
    }

    #[test]
    fn creative_flag_is_independent_of_slots() {
        let mut tag = TagCompound::new();
        set_creative_upgrade(&mut tag, true);
        assert!(has_creative_upgrade(&tag));
        // 重写升级背包不影响标记
        set_upgrades(&mut tag, &UpgradeInventory::new(), None);
        assert!(has_creative_upgrade(&tag));
        set_creative_upgrade(&mut tag, false);
        assert!(!has_creative_upgrade(&tag));
    }

    #[test]
    fn raising_capacity_never_clamps_air() {
        let mut tag = TagCompound::new();
        let mut air = AirHandler::new(1000, 10.0);
        // 读数一开始就超过 10000 的容量（正常流程不会出现，测边界）
        air.set_air(15_000);

        set_upgrades(&mut tag, &inv(&[(0, "pneuma:volume", 2)]), Some(&mut air));
        // 容量从 10000 升到 30000，读数不再超限，保持不变
        assert_eq!(air.air(), 15_000);
    }

    #[test]
    fn lowering_capacity_clamps_air_to_new_capacity() {
        let mut tag = TagCompound::new();
        let mut air = AirHandler::new(1000, 10.0);

        set_upgrades(&mut tag, &inv(&[(0, "pneuma:volume", 2)]), Some(&mut air));
        air.set_air(25_000); // 3000mL × 10bar = 30000，未超压

        // 拆掉容积升级，容量跌回 10000
        set_upgrades(&mut tag, &UpgradeInventory::new(), Some(&mut air));
        assert_eq!(air.air(), 10_000);
    }

    #[test]
    fn air_at_exact_capacity_is_untouched() {
        let mut tag = TagCompound::new();
        let mut air = AirHandler::new(1000, 10.0);
        air.set_air(10_000); // 恰好等于容量

        set_upgrades(&mut tag, &UpgradeInventory::new(), Some(&mut air));
        assert_eq!(air.air(), 10_000);
    }

    #[test]
    fn tooltip_merges_same_kind_across_slots() {
        let mut tag = TagCompound::new();
        let inv = inv(&[
            (0, "pneuma:speed", 2),
            (3, "pneuma:range", 1),
            (6, "pneuma:speed", 3),
        ]);
        set_upgrades(&mut tag, &inv, None);

        let mut lines = Vec::new();
        add_upgrade_information(&tag, &mut lines);
        assert_eq!(lines[0], "已安装升级:");
        assert!(lines.contains(&"• 5 × pneuma:speed".to_string()));
        assert!(lines.contains(&"• 1 × pneuma:range".to_string()));
    }

    #[test]
    fn tooltip_for_empty_inventory() {
        let mut lines = Vec::new();
        add_upgrade_information(&TagCompound::new(), &mut lines);
        assert_eq!(lines, vec!["未安装任何升级".to_string()]);
    }
}
