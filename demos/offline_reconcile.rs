//! Reconciles a scripted episode without a window and prints scene counts,
//! a quick way to inspect reconciliation output on a headless machine.

use anyhow::Result;
use packvis_demos::scripted_episode;
use packvis_scene::{ReconcilerConfig, SceneReconciler};

fn main() -> Result<()> {
    let mut reconciler = SceneReconciler::with_seed(ReconcilerConfig::default(), 7);

    for (step, snapshot) in scripted_episode(24, 7).iter().enumerate() {
        reconciler.reconcile(snapshot);
        reconciler.reconcile_staging_areas(snapshot);
        let scene = reconciler.scene();
        println!(
            "step {:>2}: {} boxes, {} edges, {} staged | {}",
            step,
            scene.boxes.len(),
            scene.edges.len(),
            scene.item_buffer.slot_boxes.len() + scene.temporary_save.slot_boxes.len(),
            snapshot.info_line(scene.boxes.len()),
        );
    }
    Ok(())
}
