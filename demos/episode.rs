//! Scripted episode generation shared by the demo binaries.

use packvis_core::{PackedBox, Point3f, Snapshot, Vector3f, BIN_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn random_size(rng: &mut StdRng) -> Vector3f {
    Vector3f::new(
        rng.gen_range(1.0..3.0),
        rng.gen_range(1.0..3.0),
        rng.gen_range(1.0..3.0),
    )
}

/// Build a deterministic packing episode of `steps` snapshots.
///
/// Boxes fill a 3x3 grid per layer, each new box linked from its
/// predecessor in the placement graph; the staging slots cycle between
/// filled and empty so gaps show up in the viewer.
pub fn scripted_episode(steps: u32, seed: u64) -> Vec<Snapshot> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut snapshots = Vec::with_capacity(steps as usize);
    let mut boxes = BTreeMap::new();
    let mut adjacency: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    let mut packed_volume = 0.0f32;
    let cell = BIN_SIZE / 3.0;

    for id in 0..steps {
        let size = random_size(&mut rng);
        let column = (id % 3) as f32;
        let row = ((id / 3) % 3) as f32;
        let layer = (id / 9) as f32;
        let position = Point3f::new(
            column * cell + size.x / 2.0,
            row * cell + size.y / 2.0,
            layer * cell + size.z / 2.0,
        );
        packed_volume += size.x * size.y * size.z;
        boxes.insert(
            id,
            PackedBox {
                position,
                size,
                mass: rng.gen_range(0.5..5.0),
            },
        );
        if id > 0 {
            adjacency.entry(id - 1).or_default().push(id);
        }

        let mut snapshot = Snapshot::default();
        snapshot.boxes = boxes.clone();
        snapshot.adjacency = adjacency.clone();
        if id > 0 {
            snapshot.removable.insert(id - 1);
        }
        if id > 1 {
            snapshot.blocked.insert(id - 2);
        }
        snapshot.last_placed = Some(id);
        snapshot.item_buffer = vec![
            Some(random_size(&mut rng)),
            if id % 2 == 0 {
                None
            } else {
                Some(random_size(&mut rng))
            },
        ];
        snapshot.temporary_save = vec![if id % 3 == 0 {
            Some(random_size(&mut rng))
        } else {
            None
        }];
        snapshot.reward_sum = packed_volume / BIN_SIZE.powi(3) * 100.0;
        snapshot.packing_count = id + 1;
        snapshot.removal_count = 0;
        snapshot.done = id + 1 == steps;
        snapshots.push(snapshot);
    }
    snapshots
}
