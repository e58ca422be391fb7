//! The render engine: GPU context, camera, renderers, scene, and the
//! command executor that mutates them.
//!
//! All mutation happens synchronously on the thread that delivers input
//! events; the engine holds no locks and spawns no threads.

/// The engine's interactive command vocabulary.
pub mod command;

use glam::Vec3;

pub use self::command::LinemarkCommand;
use crate::camera::CameraController;
use crate::error::LinemarkError;
use crate::gpu::{DepthTexture, RenderContext};
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::picking::{pick, resolve_feature};
use crate::renderer::{MarkerRenderer, StickRenderer};
use crate::scene::Scene;
use crate::util::FrameTiming;

/// Default demo segment endpoints, used by [`SegmentRenderEngine::new`].
const DEFAULT_SEGMENT: (Vec3, Vec3) = (
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(10.0, 10.0, 0.0),
);

/// Renders a segment scene into a window surface and executes interactive
/// commands against it.
pub struct SegmentRenderEngine {
    context: RenderContext,
    camera: CameraController,
    depth: DepthTexture,
    sticks: StickRenderer,
    markers: MarkerRenderer,
    scene: Scene,
    input: InputProcessor,
    options: Options,
    frame_timing: FrameTiming,
}

impl SegmentRenderEngine {
    /// Create an engine showing the default demo segment.
    ///
    /// # Errors
    ///
    /// Returns [`LinemarkError::Gpu`] if GPU context creation fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        options: Options,
    ) -> Result<Self, LinemarkError> {
        Self::new_with_segment(
            window,
            initial_size,
            options,
            DEFAULT_SEGMENT.0,
            DEFAULT_SEGMENT.1,
        )
        .await
    }

    /// Create an engine showing a single segment between the given
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`LinemarkError::Gpu`] if GPU context creation fails.
    pub async fn new_with_segment(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        options: Options,
        start: Vec3,
        end: Vec3,
    ) -> Result<Self, LinemarkError> {
        let context = RenderContext::new(window, initial_size).await?;

        let mut scene = Scene::new();
        let id =
            scene.add_segment(start, end, options.colors.marker_palette());
        log::info!(
            "scene ready: segment {id} from ({:.1}, {:.1}, {:.1}) to \
             ({:.1}, {:.1}, {:.1})",
            start.x,
            start.y,
            start.z,
            end.x,
            end.y,
            end.z
        );

        let mut camera = CameraController::new(&context, &options.camera);
        camera.fit_to_positions(&[start, end]);

        let sticks = StickRenderer::new(
            &context,
            &camera.layout,
            &scene,
            Vec3::from_array(options.colors.segment),
        );
        let markers = MarkerRenderer::new(&context, &camera.layout, &scene);
        let depth = DepthTexture::new(
            &context.device,
            initial_size.0,
            initial_size.1,
        );
        let input =
            InputProcessor::with_key_bindings(options.keybindings.clone());

        Ok(Self {
            context,
            camera,
            depth,
            sticks,
            markers,
            scene,
            input,
            options,
            frame_timing: FrameTiming::new(0),
        })
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Read-only access to the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Feed a raw input event through the processor, executing the
    /// resulting command if any. Returns `true` when the event was
    /// consumed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match self.input.handle_event(event) {
            Some(cmd) => {
                self.execute(cmd);
                true
            }
            None => false,
        }
    }

    /// Look up a physical key press in the bindings and execute the bound
    /// command. Returns `true` when the key was consumed.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        match self.input.handle_key_press(key) {
            Some(cmd) => {
                self.execute(cmd);
                true
            }
            None => false,
        }
    }

    /// Execute a single command against the scene and camera.
    pub fn execute(&mut self, cmd: LinemarkCommand) {
        match cmd {
            LinemarkCommand::Pick { x, y } => self.pick_at(x, y),
            LinemarkCommand::ToggleMarkers => {
                for seg in self.scene.segments_mut() {
                    seg.toggle_markers();
                }
                self.sync_markers();
            }
            LinemarkCommand::ClearHighlight => {
                for seg in self.scene.segments_mut() {
                    seg.clear_highlight();
                }
                self.sync_markers();
            }
            LinemarkCommand::RotateCamera { delta } => {
                self.camera.rotate(delta);
            }
            LinemarkCommand::PanCamera { delta } => self.camera.pan(delta),
            LinemarkCommand::Zoom { delta } => self.camera.zoom(delta),
        }
    }

    /// Run the pick pipeline for a click at the given position.
    fn pick_at(&mut self, x: f32, y: f32) {
        let view_proj = self.camera.camera.build_matrix();
        let viewport = self.context.viewport();

        let Some(hit) = pick(&self.scene, view_proj, x, y, viewport) else {
            return;
        };
        log::debug!(
            "picked segment {} at ({:.3}, {:.3}, {:.3})",
            hit.segment,
            hit.world_point.x,
            hit.world_point.y,
            hit.world_point.z
        );

        let Some(seg) = self.scene.segment_mut(hit.segment) else {
            return;
        };
        if let Some(feature) =
            resolve_feature(seg, hit.world_point, view_proj)
        {
            log::info!("highlighting {feature:?} on segment {}", hit.segment);
            seg.highlight(feature);
            self.sync_markers();
        }
    }

    /// Re-upload marker instances after a visibility or color change.
    fn sync_markers(&mut self) {
        self.markers.update(&self.context.queue, &self.scene);
    }

    /// Reconfigure the surface, camera, and depth buffer for a new window
    /// size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.camera.resize(width, height);
        self.depth =
            DepthTexture::new(&self.context.device, width, height);
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain texture cannot be
    /// acquired; callers typically resize and retry on `Lost`/`Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.camera.update_gpu(&self.context.queue);

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        {
            let [r, g, b] = self.options.colors.background;
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("main render pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(r),
                                    g: f64::from(g),
                                    b: f64::from(b),
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            self.sticks.draw(&mut pass, &self.camera.bind_group);
            self.markers.draw(&mut pass, &self.camera.bind_group);
        }

        self.context.submit(encoder);
        frame.present();
        self.frame_timing.end_frame();

        Ok(())
    }
}
