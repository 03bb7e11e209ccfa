//! 运行时物品堆叠及其 tag 序列化

use crate::tag::TagCompound;

/// 物品堆叠：kind id + 数量 + 可选附加 tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemStack {
    pub id: String,
    pub count: u32,
    pub tag: Option<TagCompound>,
}

impl ItemStack {
    pub fn new(id: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
            tag: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.id.is_empty()
    }

    /// 同 kind 且附加 tag 相同才可合并
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        !self.is_empty() && self.id == other.id && self.tag == other.tag
    }

    /// 写入槽位条目（不含 Slot 字段，由背包层补上）
    pub fn save_to(&self, entry: &mut TagCompound) {
        entry.put_str("Id", self.id.clone());
        entry.put_int("Count", self.count as i32);
        if let Some(tag) = &self.tag {
            entry.put_compound("Tag", tag.clone());
        }
    }

    /// 从槽位条目恢复；数据不全时退化为空堆叠
    pub fn load_from(entry: &TagCompound) -> Self {
        let id = entry.get_str("Id").to_string();
        let count = entry.get_int("Count").max(0) as u32;
        if id.is_empty() || count == 0 {
            return Self::empty();
        }
        let tag = match entry.contains("Tag") {
            true => Some(entry.get_compound("Tag")),
            false => None,
        };
        Self { id, count, tag }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_round_trip() {
        let stack = ItemStack::new("pneuma:speed", 3);
        let mut entry = TagCompound::new();
        stack.save_to(&mut entry);
        assert_eq!(ItemStack::load_from(&entry), stack);
    }

    #[test]
    fn malformed_entry_becomes_empty() {
        let mut entry = TagCompound::new();
        entry.put_int("Count", 5);
        assert!(ItemStack::load_from(&entry).is_empty());

        let mut entry = TagCompound::new();
        entry.put_str("Id", "pneuma:range");
        assert!(ItemStack::load_from(&entry).is_empty());
    }

    #[test]
    fn stacking_requires_same_id_and_tag() {
        let a = ItemStack::new("pneuma:speed", 1);
        let b = ItemStack::new("pneuma:speed", 2);
        let c = ItemStack::new("pneuma:range", 1);
        assert!(a.can_stack_with(&b));
        assert!(!a.can_stack_with(&c));

        let mut tagged = ItemStack::new("pneuma:speed", 1);
        tagged.tag = Some(TagCompound::new());
        assert!(!a.can_stack_with(&tagged));
    }
}
