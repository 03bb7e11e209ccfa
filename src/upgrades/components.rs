use bevy::prelude::*;

use crate::item::ItemStack;
use crate::pressure::AirHandler;
use crate::tag::{TagCompound, TagValue};

/// 升级槽固定 9 格
pub const UPGRADE_INV_SIZE: usize = 9;

/// 持有升级数据的示例工具（挂在 Resource）
#[derive(Resource)]
pub struct Tool {
    pub tag: TagCompound,
    pub air: AirHandler,
}

/// 升级槽背包：9 格，空位用空堆叠占位
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeInventory {
    slots: Vec<ItemStack>,
}

impl Default for UpgradeInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl UpgradeInventory {
    pub fn new() -> Self {
        Self {
            slots: vec![ItemStack::empty(); UPGRADE_INV_SIZE],
        }
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn set_slot(&mut self, index: usize, stack: ItemStack) {
        if index < UPGRADE_INV_SIZE {
            self.slots[index] = stack;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_empty())
    }

    /// 塞入升级：优先叠到同 kind 槽位，再找空位；返回塞不下的余量
    pub fn insert(&mut self, id: &str, count: u32, max_stack: u32) -> u32 {
        let mut remaining = count;
        let probe = ItemStack::new(id, 1);

        // 先叠加已有堆叠
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.can_stack_with(&probe) && slot.count < max_stack {
                let room = max_stack - slot.count;
                let moved = remaining.min(room);
                slot.count += moved;
                remaining -= moved;
            }
        }

        // 再占空位
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                let moved = remaining.min(max_stack);
                *slot = ItemStack::new(id, moved);
                remaining -= moved;
            }
        }

        remaining
    }

    /// 取出升级；返回实际取出的数量
    pub fn remove(&mut self, id: &str, count: u32) -> u32 {
        let mut removed = 0;
        for slot in self.slots.iter_mut() {
            if removed == count {
                break;
            }
            if !slot.is_empty() && slot.id == id {
                let taken = slot.count.min(count - removed);
                slot.count -= taken;
                removed += taken;
                if slot.count == 0 {
                    *slot = ItemStack::empty();
                }
            }
        }
        removed
    }

    /// 序列化为 tag：稀疏存储，只写非空槽位
    pub fn serialize_tag(&self) -> TagCompound {
        let mut items = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.is_empty() {
                continue;
            }
            let mut entry = TagCompound::new();
            entry.put_byte("Slot", i as i8);
            slot.save_to(&mut entry);
            items.push(TagValue::Compound(entry));
        }
        let mut tag = TagCompound::new();
        tag.put_int("Size", UPGRADE_INV_SIZE as i32);
        tag.put_list("Items", items);
        tag
    }

    /// 从 tag 恢复；Slot 越界的条目直接丢弃（不报错、不移位）
    pub fn from_tag(tag: &TagCompound) -> Self {
        let mut inv = Self::new();
        for value in tag.get_list("Items") {
            let TagValue::Compound(entry) = value else {
                continue;
            };
            let slot = entry.get_byte("Slot");
            if (0..UPGRADE_INV_SIZE as i8).contains(&slot) {
                inv.slots[slot as usize] = ItemStack::load_from(entry);
            }
        }
        inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_stacks_then_fills_empty_slots() {
        let mut inv = UpgradeInventory::new();
        assert_eq!(inv.insert("pneuma:speed", 3, 64), 0);
        assert_eq!(inv.insert("pneuma:speed", 2, 64), 0);
        // 叠进同一槽位
        assert_eq!(inv.slots()[0].count, 5);
        assert!(inv.slots()[1].is_empty());
    }

    #[test]
    fn insert_reports_leftover_when_full() {
        let mut inv = UpgradeInventory::new();
        // 9 槽 × 每槽上限 1
        assert_eq!(inv.insert("pneuma:security", 12, 1), 3);
        assert!(inv.slots().iter().all(|s| s.count == 1));
    }

    #[test]
    fn remove_spans_slots_and_clears_empties() {
        let mut inv = UpgradeInventory::new();
        inv.set_slot(0, ItemStack::new("pneuma:speed", 2));
        inv.set_slot(4, ItemStack::new("pneuma:speed", 3));
        assert_eq!(inv.remove("pneuma:speed", 4), 4);
        assert!(inv.slots()[0].is_empty());
        assert_eq!(inv.slots()[4].count, 1);
        // 多取只返回实际数量
        assert_eq!(inv.remove("pneuma:speed", 10), 1);
        assert!(inv.is_empty());
    }

    #[test]
    fn tag_round_trip_preserves_slot_positions() {
        let mut inv = UpgradeInventory::new();
        inv.set_slot(2, ItemStack::new("pneuma:range", 4));
        inv.set_slot(8, ItemStack::new("pneuma:speed", 1));
        let back = UpgradeInventory::from_tag(&inv.serialize_tag());
        assert_eq!(back, inv);
    }

    #[test]
    fn out_of_range_slot_is_dropped_silently() {
        let mut inv = UpgradeInventory::new();
        inv.set_slot(1, ItemStack::new("pneuma:speed", 2));
        let mut tag = inv.serialize_tag();

        // 伪造一个 Slot=12 的条目混进列表
        let mut rogue = TagCompound::new();
        rogue.put_byte("Slot", 12);
        ItemStack::new("pneuma:range", 7).save_to(&mut rogue);
        let mut items = tag.get_list("Items").to_vec();
        items.push(TagValue::Compound(rogue));
        tag.put_list("Items", items);

        let back = UpgradeInventory::from_tag(&tag);
        // 合法槽位不受影响，越界条目消失
        assert_eq!(back.slots()[1], ItemStack::new("pneuma:speed", 2));
        assert!(back.slots().iter().all(|s| s.id != "pneuma:range"));
    }
}
