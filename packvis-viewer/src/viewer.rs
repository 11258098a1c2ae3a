//! Interactive viewer event loop
//!
//! Drains the snapshot inbox between frames, reconciles synchronously on the
//! windowing thread, and redraws continuously. Display toggles mutate the
//! reconciler's live config and re-reconcile the last snapshot so the change
//! is visible immediately.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::Key,
    window::{Window, WindowBuilder},
};

use packvis_core::{Error, Result, SceneGroup, Snapshot};
use packvis_scene::{ReconcilerConfig, SceneReconciler};

use crate::camera::Camera;
use crate::capture::Capture;
use crate::renderer::{RenderConfig, SceneRenderer};
use crate::scenery::build_scenery;
use crate::tessellate::tessellate_group;

/// Startup options collected from the command line.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub config: ReconcilerConfig,
    pub seed: Option<u64>,
    pub capture_dir: PathBuf,
    pub save_at_end: bool,
    pub show_grid: bool,
}

/// The viewer shell: reconciler, camera, static scenery, and input state.
pub struct Viewer {
    reconciler: SceneReconciler,
    camera: Camera,
    scenery: SceneGroup,
    show_grid: bool,
    capture: Capture,
    save_at_end: bool,
    last_snapshot: Option<Snapshot>,
    pending_snapshot: bool,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    mouse_pressed: bool,
    right_mouse_pressed: bool,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        let reconciler = match options.seed {
            Some(seed) => SceneReconciler::with_seed(options.config, seed),
            None => SceneReconciler::new(options.config),
        };
        Self {
            reconciler,
            camera: Camera::default(),
            scenery: build_scenery(options.show_grid),
            show_grid: options.show_grid,
            capture: Capture::new(options.capture_dir),
            save_at_end: options.save_at_end,
            last_snapshot: None,
            pending_snapshot: false,
            last_mouse_pos: None,
            mouse_pressed: false,
            right_mouse_pressed: false,
        }
    }

    /// Reconcile one incoming snapshot, update the overlay line, and queue a
    /// capture at episode end when configured.
    fn apply_snapshot(&mut self, snapshot: Snapshot, window: &Window) {
        self.reconciler.reconcile(&snapshot);
        self.reconciler.reconcile_staging_areas(&snapshot);

        let rendered = self.reconciler.scene().boxes.len();
        let info = snapshot.info_line(rendered);
        log::info!("{info}");
        window.set_title(&format!("packvis | {info}"));

        if snapshot.done {
            log::info!("episode finished");
            if self.save_at_end {
                self.pending_snapshot = true;
            }
        }
        self.last_snapshot = Some(snapshot);
    }

    /// Re-run both reconciliation entry points against the last snapshot so
    /// a config toggle shows up without waiting for the next message.
    fn reapply(&mut self) {
        if let Some(snapshot) = self.last_snapshot.as_ref() {
            self.reconciler.reconcile(snapshot);
            self.reconciler.reconcile_staging_areas(snapshot);
        }
    }

    fn handle_key(&mut self, key: &Key) {
        match key {
            Key::Character(c) => match c.as_str() {
                "o" | "O" => {
                    let config = &mut self.reconciler.config;
                    config.show_outer = !config.show_outer;
                    log::info!("outer areas: {}", config.show_outer);
                    self.reapply();
                }
                "c" | "C" => {
                    let config = &mut self.reconciler.config;
                    config.show_centers = !config.show_centers;
                    log::info!("center markers: {}", config.show_centers);
                    self.reapply();
                }
                "g" | "G" => {
                    let config = &mut self.reconciler.config;
                    config.show_graph = !config.show_graph;
                    log::info!("placement graph: {}", config.show_graph);
                    self.reapply();
                }
                "x" | "X" => {
                    let config = &mut self.reconciler.config;
                    config.random_color = !config.random_color;
                    log::info!("random colors: {}", config.random_color);
                    self.reapply();
                }
                "t" | "T" => {
                    let config = &mut self.reconciler.config;
                    config.box_transparent = !config.box_transparent;
                    log::info!("transparent boxes: {}", config.box_transparent);
                    self.reapply();
                }
                "b" | "B" => {
                    self.show_grid = !self.show_grid;
                    self.scenery = build_scenery(self.show_grid);
                    log::info!("bin grids: {}", self.show_grid);
                }
                "p" | "P" => {
                    self.pending_snapshot = true;
                }
                "v" | "V" => {
                    let recording = self.capture.toggle_recording();
                    log::info!(
                        "{} recording",
                        if recording { "started" } else { "stopped" }
                    );
                }
                "r" | "R" => {
                    self.camera.reset();
                    log::info!("camera reset");
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Tessellate every group for this frame: reconciled content first, then
    /// the static scenery.
    fn build_batches(&self) -> (Vec<crate::renderer::MeshVertex>, Vec<crate::renderer::LineVertex>) {
        let mut meshes = Vec::new();
        let mut lines = Vec::new();
        let scene = self.reconciler.scene();
        tessellate_group(&scene.group, &mut meshes, &mut lines);
        tessellate_group(&scene.item_buffer.group, &mut meshes, &mut lines);
        tessellate_group(&scene.temporary_save.group, &mut meshes, &mut lines);
        tessellate_group(&self.scenery, &mut meshes, &mut lines);
        (meshes, lines)
    }

    /// Run the viewer until the window closes, reconciling snapshots from
    /// `inbox` as they arrive.
    pub fn run(mut self, inbox: Receiver<Snapshot>) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {e}")))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title("packvis")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 675.0))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {e}")))?,
        );

        let window_clone = window.clone();
        let mut renderer =
            pollster::block_on(SceneRenderer::new(&window_clone, RenderConfig::default()))?;

        let size = window.inner_size();
        self.camera.aspect_ratio = size.width as f32 / size.height.max(1) as f32;

        log::info!(
            "viewer ready; keys: o outer, c centers, g graph, x random color, \
             t transparency, b grids, r camera, p snapshot, v record"
        );

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::AboutToWait => {
                        while let Ok(snapshot) = inbox.try_recv() {
                            self.apply_snapshot(snapshot, &window);
                        }
                        window.request_redraw();
                    }
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::CloseRequested => {
                            target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            self.camera.aspect_ratio =
                                new_size.width as f32 / new_size.height.max(1) as f32;
                        }
                        WindowEvent::MouseInput { state, button, .. } => match button {
                            MouseButton::Left => {
                                self.mouse_pressed = state == ElementState::Pressed;
                            }
                            MouseButton::Right => {
                                self.right_mouse_pressed = state == ElementState::Pressed;
                            }
                            _ => {}
                        },
                        WindowEvent::CursorMoved { position, .. } => {
                            if let Some(last_pos) = self.last_mouse_pos {
                                let delta_x = (position.x - last_pos.x) as f32;
                                let delta_y = (position.y - last_pos.y) as f32;
                                if self.mouse_pressed {
                                    self.camera.orbit(delta_x * 0.01, delta_y * 0.01);
                                } else if self.right_mouse_pressed {
                                    self.camera.pan(delta_x * 0.02, delta_y * 0.02);
                                }
                            }
                            self.last_mouse_pos = Some(position);
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                                winit::event::MouseScrollDelta::PixelDelta(pos) => {
                                    pos.y as f32 / 100.0
                                }
                            };
                            self.camera.zoom(scroll * 0.1);
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.state == ElementState::Pressed {
                                self.handle_key(&event.logical_key);
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            renderer.update_camera(
                                self.camera.view_matrix(),
                                self.camera.projection_matrix(),
                                self.camera.position.coords,
                            );

                            let (meshes, lines) = self.build_batches();

                            let capture_path = self.next_capture_path();
                            if let Err(err) =
                                renderer.render(&meshes, &lines, capture_path.as_deref())
                            {
                                log::error!("render: {err}");
                            }
                        }
                        _ => {}
                    },
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {e}")))?;

        Ok(())
    }

    /// Resolve the capture target for this frame, if any: a queued one-off
    /// snapshot wins over the recording sequence.
    fn next_capture_path(&mut self) -> Option<PathBuf> {
        if self.pending_snapshot {
            self.pending_snapshot = false;
            let reward = self
                .last_snapshot
                .as_ref()
                .map(|s| s.reward_sum)
                .unwrap_or(0.0);
            match self.capture.snapshot_path(reward) {
                Ok(path) => return Some(path),
                Err(err) => log::error!("snapshot capture: {err}"),
            }
        }
        if self.capture.recording {
            match self.capture.frame_path() {
                Ok(path) => return Some(path),
                Err(err) => log::error!("frame capture: {err}"),
            }
        }
        None
    }
}
