//! Packing several items into one carrier item and back.
//!
//! A bundle is an ordinary [`Item`] whose tag map carries:
//! - `bundle-item-count`: number of embedded items,
//! - `bundle-set-<id>`: a provenance marker unique to this bundle,
//! - `bundle-item-<i>`: the CBOR payload of item `i`, for `i` in `0..count`.
//!
//! Per-index keys let the carrier keep unrelated tags of its own, and a
//! damaged entry is found by its index without scanning the others.

use tracing::debug;

use crate::config::{bundle_tags, BundleConfig};
use crate::error::{AuctionError, AuctionResult};
use crate::item::{Item, TagValue};
use crate::traits::RandomSource;

fn entry_key(index: usize) -> String {
    format!("{}{index}", bundle_tags::ITEM_PREFIX)
}

/// Whether `item` carries a bundle count tag.
pub fn is_bundle(item: &Item) -> bool {
    item.tag(bundle_tags::COUNT).is_some()
}

/// The provenance marker written at pack time.
pub fn embedding_set_id(carrier: &Item) -> Option<&str> {
    carrier
        .tags
        .keys()
        .find_map(|k| k.strip_prefix(bundle_tags::SET_PREFIX))
}

/// Embed `items` into `carrier`, preserving their order.
pub fn pack<R: RandomSource + ?Sized>(
    mut carrier: Item,
    items: &[Item],
    rng: &R,
) -> AuctionResult<Item> {
    if items.is_empty() {
        return Err(AuctionError::InvalidArgument(
            "cannot create a bundle with no items".into(),
        ));
    }
    if is_bundle(&carrier) {
        return Err(AuctionError::InvalidArgument(
            "carrier already holds a bundle".into(),
        ));
    }
    let count = i64::try_from(items.len())
        .map_err(|_| AuctionError::InvalidArgument("too many items for one bundle".into()))?;

    let payloads = items
        .iter()
        .map(Item::to_cbor)
        .collect::<AuctionResult<Vec<_>>>()?;

    let set_id = rng.unique_id();
    carrier.set_tag(bundle_tags::COUNT, TagValue::Int(count));
    carrier.set_tag(
        format!("{}{set_id}", bundle_tags::SET_PREFIX),
        TagValue::Str(set_id.clone()),
    );
    for (index, payload) in payloads.into_iter().enumerate() {
        carrier.set_tag(entry_key(index), TagValue::Bytes(payload));
    }

    debug!("Packed {} items into bundle {}", items.len(), set_id);
    Ok(carrier)
}

/// Recover the embedded items, in pack order.
///
/// Returns `Ok(None)` when `carrier` is not a bundle. Any missing or
/// undecodable entry fails the whole unpack.
pub fn unpack(carrier: &Item) -> AuctionResult<Option<Vec<Item>>> {
    let Some(count_tag) = carrier.tag(bundle_tags::COUNT) else {
        return Ok(None);
    };
    let count = count_tag
        .as_int()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| AuctionError::CorruptBundle {
            index: 0,
            reason: format!("invalid item count {count_tag:?}"),
        })?;

    let mut items = Vec::with_capacity(count.min(carrier.tags.len()));
    for index in 0..count {
        let payload = carrier
            .tag(&entry_key(index))
            .ok_or_else(|| AuctionError::CorruptBundle {
                index,
                reason: "entry missing".into(),
            })?
            .as_bytes()
            .ok_or_else(|| AuctionError::CorruptBundle {
                index,
                reason: "entry is not a byte payload".into(),
            })?;
        let item = Item::from_cbor(payload).map_err(|e| AuctionError::CorruptBundle {
            index,
            reason: e.to_string(),
        })?;
        items.push(item);
    }

    debug!("Unpacked {} items from bundle", items.len());
    Ok(Some(items))
}

/// Build a glowing carrier named after `base_item` and pack `items` into it.
pub fn create_bundle<R: RandomSource + ?Sized>(
    base_item: &Item,
    items: &[Item],
    config: &BundleConfig,
    rng: &R,
) -> AuctionResult<Item> {
    let mut carrier = Item::new(config.material.clone(), 1)
        .with_display_name(config.name.replace("%item_name%", &base_item.name()));
    carrier.lore = config
        .lore
        .iter()
        .map(|line| line.replace("%item_name%", &base_item.name()))
        .collect();

    let mut bundle = pack(carrier, items, rng)?;
    bundle.set_tag(bundle_tags::GLOW, TagValue::Int(1));
    Ok(bundle)
}
