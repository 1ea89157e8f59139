/// Settings for the single top-level window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Outer size in logical pixels, window chrome included.
    pub size: (i32, i32),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Minimal D3D11".to_string(),
            size: (800, 600),
        }
    }
}

/// Settings for device, swap chain and per-frame work.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    pub buffer_count: u32,
    /// Refresh rate hint as numerator / denominator.
    pub refresh_rate: (u32, u32),
    pub clear_color: [f32; 4],
    pub sync_interval: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            buffer_count: 1,
            refresh_rate: (60, 1),
            // Cornflower blue.
            clear_color: [0.4, 0.6, 0.9, 1.0],
            sync_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "Minimal D3D11");
        assert_eq!(config.size, (800, 600));
    }

    #[test]
    fn renderer_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.buffer_count, 1);
        assert_eq!(config.refresh_rate, (60, 1));
        assert_eq!(config.clear_color, [0.4, 0.6, 0.9, 1.0]);
        assert_eq!(config.sync_interval, 1);
    }
}
