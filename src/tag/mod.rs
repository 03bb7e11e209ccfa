//! NBT 风格的持久化文档：有序 key-value，带类型化读取接口
//!
//! 读取接口在 key 缺失或类型不符时一律返回默认值（0 / false / 空），
//! 不向调用方抛错——损坏或缺失的存档数据等价于"空数据"。

use serde::{Deserialize, Serialize};

/// 文档中的一个值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    Byte(i8),
    Int(i32),
    String(String),
    List(Vec<TagValue>),
    Compound(TagCompound),
}

/// 有序 key-value 文档（同 key 覆盖，保持首次插入位置）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagCompound {
    entries: Vec<(String, TagValue)>,
}

const EMPTY_LIST: &[TagValue] = &[];

impl TagCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// 写入一个值；key 已存在时原位覆盖
    pub fn put(&mut self, key: impl Into<String>, value: TagValue) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn put_byte(&mut self, key: impl Into<String>, value: i8) {
        self.put(key, TagValue::Byte(value));
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i32) {
        self.put(key, TagValue::Int(value));
    }

    /// bool 按 NBT 惯例存成 byte 0/1
    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.put_byte(key, if value { 1 } else { 0 });
    }

    pub fn put_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, TagValue::String(value.into()));
    }

    pub fn put_list(&mut self, key: impl Into<String>, value: Vec<TagValue>) {
        self.put(key, TagValue::List(value));
    }

    pub fn put_compound(&mut self, key: impl Into<String>, value: TagCompound) {
        self.put(key, TagValue::Compound(value));
    }

    pub fn get_byte(&self, key: &str) -> i8 {
        match self.get(key) {
            Some(TagValue::Byte(v)) => *v,
            _ => 0,
        }
    }

    pub fn get_int(&self, key: &str) -> i32 {
        match self.get(key) {
            Some(TagValue::Int(v)) => *v,
            Some(TagValue::Byte(v)) => i32::from(*v),
            _ => 0,
        }
    }

    /// byte != 0 即为 true
    pub fn get_bool(&self, key: &str) -> bool {
        self.get_byte(key) != 0
    }

    pub fn get_str(&self, key: &str) -> &str {
        match self.get(key) {
            Some(TagValue::String(v)) => v,
            _ => "",
        }
    }

    pub fn get_list(&self, key: &str) -> &[TagValue] {
        match self.get(key) {
            Some(TagValue::List(v)) => v,
            _ => EMPTY_LIST,
        }
    }

    /// 缺失或类型不符时返回空文档
    pub fn get_compound(&self, key: &str) -> TagCompound {
        match self.get(key) {
            Some(TagValue::Compound(v)) => v.clone(),
            _ => TagCompound::new(),
        }
    }

    /// 遍历所有键值对（按插入顺序）
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
