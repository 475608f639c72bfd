//! egui overlay: loading indicator, controls info and optional FPS counter.

use egui::{Align2, Color32, RichText};
use renderer::OverlayTarget;
use viewer::StatusPanel;
use winit::{event::WindowEvent, window::Window};

const INFO_TEXT: &str = "Drag to rotate · Scroll to zoom · Right-drag to pan";

pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let mut style = (*ctx.style()).clone();
        style.visuals.window_shadow = egui::epaint::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, None, 1, false);

        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Returns true if egui wants the event for itself.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Record the overlay into `target`. Returns command buffers that must be
    /// submitted before the target encoder.
    pub fn draw(
        &mut self,
        window: &Window,
        target: OverlayTarget<'_>,
        status: &StatusPanel,
        fps: Option<f32>,
    ) -> Vec<wgpu::CommandBuffer> {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            if status.loading_visible {
                let color = status
                    .loading_color
                    .map(to_color32)
                    .unwrap_or(Color32::from_gray(40));
                egui::Area::new(egui::Id::new("loading"))
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label(RichText::new(&status.loading_text).color(color).size(18.0));
                    });
            }
            if status.info_visible {
                egui::Area::new(egui::Id::new("info"))
                    .anchor(Align2::LEFT_TOP, [10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(RichText::new(INFO_TEXT).color(Color32::from_gray(60)));
                    });
            }
            if let Some(fps) = fps {
                egui::Area::new(egui::Id::new("fps"))
                    .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(RichText::new(format!("{fps:.0} FPS")).monospace());
                    });
            }
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(target.device, target.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: target.size,
            pixels_per_point: full_output.pixels_per_point,
        };
        let extra = self.renderer.update_buffers(
            target.device,
            target.queue,
            target.encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut rpass = target
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer
                .render(&mut rpass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        extra
    }
}

fn to_color32([r, g, b]: [f32; 3]) -> Color32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(c(r), c(g), c(b))
}
