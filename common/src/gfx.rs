use crate::{config::RendererConfig, shader::FULLSCREEN_TRIANGLE_VERTEX_COUNT};

/// Drawable area in pixels plus depth range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Covers the whole client area, origin at (0, 0), depth [0, 1].
    pub fn from_client_size((width, height): (i32, i32)) -> Self {
        Self {
            top_left_x: 0.0,
            top_left_y: 0.0,
            width: width.max(0) as f32,
            height: height.max(0) as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// Commands a frame is built from, in the order [`render_frame`] issues them.
pub trait FrameCommands {
    fn clear(&mut self, color: [f32; 4]);

    /// Triangle-list topology, vertex and pixel shader. No other stages or bindings.
    fn bind_pipeline(&mut self);

    fn draw(&mut self, vertex_count: u32, start_vertex: u32);

    fn present(&mut self, sync_interval: u32) -> Result<(), Box<dyn std::error::Error>>;
}

/// One clear, one draw of the full-screen triangle, one present.
pub fn render_frame<C: FrameCommands>(
    commands: &mut C,
    config: &RendererConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    commands.clear(config.clear_color);
    commands.bind_pipeline();
    commands.draw(FULLSCREEN_TRIANGLE_VERTEX_COUNT, 0);
    commands.present(config.sync_interval)
}
