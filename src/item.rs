//! Tradable item records.
//!
//! An [`Item`] is the host's item stack reduced to what the auction house
//! needs: a material, a quantity, cosmetic metadata used for search, and a
//! free-form tag map that bundles write their embedded payloads into.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MAX_ITEM_PAYLOAD_SIZE;
use crate::error::AuctionResult;
use crate::util::{cbor_from_limited_reader, matches_keyword, to_cbor};

/// Material of the visually-keyed head variant.
pub const PLAYER_HEAD: &str = "PLAYER_HEAD";

/// Material of an empty slot.
pub const AIR: &str = "AIR";

/// A single tag value on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagValue {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

impl TagValue {
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub material: String,
    pub amount: u32,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub enchantments: Vec<String>,
    /// Skin texture key; only meaningful for [`PLAYER_HEAD`].
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, TagValue>,
}

impl Item {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            display_name: None,
            lore: Vec::new(),
            enchantments: Vec::new(),
            texture: None,
            tags: BTreeMap::new(),
        }
    }

    /// A head whose identity is its texture.
    pub fn player_head(texture: impl Into<String>, amount: u32) -> Self {
        Self::new(PLAYER_HEAD, amount).with_texture(texture)
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_lore(mut self, line: impl Into<String>) -> Self {
        self.lore.push(line.into());
        self
    }

    #[must_use]
    pub fn with_enchantment(mut self, name: impl Into<String>) -> Self {
        self.enchantments.push(name.into());
        self
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn is_air(&self) -> bool {
        self.material.eq_ignore_ascii_case(AIR) || self.amount == 0
    }

    pub fn is_player_head(&self) -> bool {
        self.material.eq_ignore_ascii_case(PLAYER_HEAD)
    }

    /// Structural equality ignoring the stack size.
    pub fn is_similar(&self, other: &Self) -> bool {
        self.material == other.material
            && self.display_name == other.display_name
            && self.lore == other.lore
            && self.enchantments == other.enchantments
            && self.texture == other.texture
            && self.tags == other.tags
    }

    /// Identity rule used when counting or removing items from a container.
    ///
    /// Heads share one structural shape regardless of whose face they carry,
    /// so they match on texture alone.
    pub fn matches_identity(&self, candidate: &Self) -> bool {
        if self.is_player_head() {
            candidate.is_player_head() && candidate.texture == self.texture
        } else {
            self.is_similar(candidate)
        }
    }

    /// Display name, or the material in title case (`DIAMOND_SWORD` → `Diamond Sword`).
    pub fn name(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        self.material
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn lore(&self) -> &[String] {
        &self.lore
    }

    pub fn enchantments(&self) -> &[String] {
        &self.enchantments
    }

    /// Whether `keyword` occurs in the name, any lore line or any enchantment.
    pub fn matches_search(&self, keyword: &str) -> bool {
        matches_keyword(keyword, &self.name())
            || self.lore.iter().any(|l| matches_keyword(keyword, l))
            || self.enchantments.iter().any(|e| matches_keyword(keyword, e))
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: TagValue) {
        self.tags.insert(key.into(), value);
    }

    /// Serialize the item to CBOR bytes
    pub fn to_cbor(&self) -> AuctionResult<Vec<u8>> {
        to_cbor(self)
    }

    /// Deserialize an item from CBOR bytes
    pub fn from_cbor(data: &[u8]) -> AuctionResult<Self> {
        cbor_from_limited_reader(data, MAX_ITEM_PAYLOAD_SIZE)
    }
}
