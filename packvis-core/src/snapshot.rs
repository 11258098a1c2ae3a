//! Snapshot data model for streamed bin-packing state
//!
//! One `Snapshot` per simulation step arrives over the transport as a JSON
//! record. The wire field names follow the producer's schema; the Rust-side
//! names describe the role each field plays in the scene.

use crate::color::Color;
use crate::{Point3f, Vector3f};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of a packed box, unique within one snapshot.
pub type BoxId = u32;

/// Extents of a staged box, as streamed for buffer slots.
pub type SlotSize = Vector3f;

/// Position, extents, and mass of one packed box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackedBox {
    pub position: Point3f,
    pub size: Vector3f,
    pub mass: f32,
}

/// A complete externally computed state update.
///
/// Ids referenced by `adjacency`, `removable`, `blocked`, or `last_placed`
/// should exist in `boxes`; dangling references are tolerated downstream by
/// skipping them silently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Packed boxes keyed by id.
    #[serde(rename = "id_relation")]
    pub boxes: BTreeMap<BoxId, PackedBox>,
    /// Directed placement-order graph: source id to destination ids. An edge
    /// `(a, b)` means `a` was placed causally before `b`; destination order
    /// is preserved from the wire.
    #[serde(rename = "graph")]
    pub adjacency: BTreeMap<BoxId, Vec<BoxId>>,
    /// Ids eligible for removal.
    #[serde(rename = "removable_ids")]
    pub removable: BTreeSet<BoxId>,
    /// Ids currently out of candidate status.
    #[serde(rename = "out_of_candidate_ids")]
    pub blocked: BTreeSet<BoxId>,
    /// The most recently placed id, if any. The wire encodes "none" as a
    /// negative sentinel.
    #[serde(
        rename = "last_packed_id",
        default,
        serialize_with = "ser_last_placed",
        deserialize_with = "de_last_placed"
    )]
    pub last_placed: Option<BoxId>,
    /// Item-buffer staging slots. `None` is an empty slot and keeps its
    /// index; slot sequences are never compacted.
    #[serde(rename = "buffer_boxes")]
    pub item_buffer: Vec<Option<SlotSize>>,
    /// Temporary-save staging slots, same shape as the item buffer.
    #[serde(rename = "temporary_save_boxes")]
    pub temporary_save: Vec<Option<SlotSize>>,
    pub reward_sum: f32,
    pub packing_count: u32,
    pub removal_count: u32,
    /// Episode end marker.
    pub done: bool,
}

impl Snapshot {
    /// Overlay line summarizing the episode: filling rate, rendered box
    /// count, and action tally.
    pub fn info_line(&self, rendered_boxes: usize) -> String {
        format!(
            "Filling Rate: {:>4.1}%, Num of Boxes: {},  Action: {} (Packing: {}, Removal: {})",
            self.reward_sum,
            rendered_boxes,
            self.packing_count + self.removal_count,
            self.packing_count,
            self.removal_count,
        )
    }
}

fn de_last_placed<'de, D>(deserializer: D) -> Result<Option<BoxId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|id| BoxId::try_from(id).ok()))
}

fn ser_last_placed<S>(value: &Option<BoxId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(id) => serializer.serialize_i64(i64::from(*id)),
        None => serializer.serialize_i64(-1),
    }
}

/// One packed box resolved for rendering.
///
/// Rebuilt from scratch on every snapshot; an id reused across snapshots
/// gets a fresh record and fresh scene objects, never a mutated one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRecord {
    pub id: BoxId,
    pub center: Point3f,
    pub size: Vector3f,
    pub mass: f32,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &str = r#"{
        "id_relation": {
            "1": {"position": [0.5, 0.5, 0.5], "size": [1.0, 1.0, 1.0], "mass": 2.5},
            "2": {"position": [1.5, 0.5, 0.5], "size": [1.0, 1.0, 1.0], "mass": 0.0}
        },
        "graph": {"1": [2]},
        "removable_ids": [2],
        "out_of_candidate_ids": [],
        "last_packed_id": 2,
        "buffer_boxes": [null, [2.0, 2.0, 2.0], null],
        "temporary_save_boxes": [],
        "reward_sum": 12.5,
        "packing_count": 2,
        "removal_count": 0,
        "done": false
    }"#;

    #[test]
    fn decodes_wire_schema() {
        let snapshot: Snapshot = serde_json::from_str(WIRE).unwrap();
        assert_eq!(snapshot.boxes.len(), 2);
        let first = &snapshot.boxes[&1];
        assert_eq!(first.position, Point3f::new(0.5, 0.5, 0.5));
        assert_eq!(first.size, Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(snapshot.adjacency[&1], vec![2]);
        assert!(snapshot.removable.contains(&2));
        assert_eq!(snapshot.last_placed, Some(2));
        assert_eq!(snapshot.item_buffer.len(), 3);
        assert!(snapshot.item_buffer[0].is_none());
        assert_eq!(snapshot.item_buffer[1], Some(Vector3f::new(2.0, 2.0, 2.0)));
        assert!(snapshot.temporary_save.is_empty());
        assert!(!snapshot.done);
    }

    #[test]
    fn negative_last_packed_id_decodes_to_none() {
        let wire = WIRE.replace("\"last_packed_id\": 2", "\"last_packed_id\": -1");
        let snapshot: Snapshot = serde_json::from_str(&wire).unwrap();
        assert_eq!(snapshot.last_placed, None);
    }

    #[test]
    fn last_placed_round_trips_through_sentinel() {
        let mut snapshot = Snapshot::default();
        snapshot.last_placed = None;
        let encoded = serde_json::to_string(&snapshot).unwrap();
        assert!(encoded.contains("\"last_packed_id\":-1"));
        let decoded: Snapshot = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.last_placed, None);
    }

    #[test]
    fn info_line_matches_overlay_format() {
        let snapshot: Snapshot = serde_json::from_str(WIRE).unwrap();
        assert_eq!(
            snapshot.info_line(2),
            "Filling Rate: 12.5%, Num of Boxes: 2,  Action: 2 (Packing: 2, Removal: 0)"
        );
    }
}
