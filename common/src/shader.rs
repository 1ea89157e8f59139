//! Embedded HLSL programs and the options they are compiled with.

/// Clip-space corners of the triangle emitted by [`VERTEX_SHADER`], indexed by `SV_VertexID`.
///
/// The triangle overshoots the [-1, 1] square so a single primitive covers the whole viewport.
pub const FULLSCREEN_TRIANGLE: [[f32; 2]; 3] = [[-1.0, -1.0], [3.0, -1.0], [-1.0, 3.0]];

pub const FULLSCREEN_TRIANGLE_VERTEX_COUNT: u32 = FULLSCREEN_TRIANGLE.len() as u32;

const VS_SOURCE: &str = r#"
float4 VSMain(uint id : SV_VertexID) : SV_Position
{
    float2 pos[3] = {
        float2(-1.0, -1.0),
        float2( 3.0, -1.0),
        float2(-1.0,  3.0)
    };
    return float4(pos[id], 0.0, 1.0);
}
"#;

const PS_SOURCE: &str = r#"
float4 PSMain() : SV_Target
{
    return float4(1.0, 0.0, 0.0, 1.0);
}
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderDesc {
    pub source: &'static str,
    pub entry_point: &'static str,
    pub target: &'static str,
}

pub const VERTEX_SHADER: ShaderDesc = ShaderDesc {
    source: VS_SOURCE,
    entry_point: "VSMain",
    target: "vs_5_0",
};

pub const PIXEL_SHADER: ShaderDesc = ShaderDesc {
    source: PS_SOURCE,
    entry_point: "PSMain",
    target: "ps_5_0",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub strictness: bool,
    pub debug_info: bool,
    pub skip_optimization: bool,
}

impl CompileOptions {
    pub fn release() -> Self {
        Self {
            strictness: true,
            debug_info: false,
            skip_optimization: false,
        }
    }

    pub fn debug() -> Self {
        Self {
            strictness: true,
            debug_info: true,
            skip_optimization: true,
        }
    }

    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::debug()
        } else {
            Self::release()
        }
    }
}

/// Compiler error blobs are NUL-terminated ANSI text; returns `None` when nothing readable is left.
pub fn diagnostics_text(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Barycentric containment, edges included.
    fn contains(triangle: &[[f32; 2]; 3], p: [f32; 2]) -> bool {
        let cross = |a: [f32; 2], b: [f32; 2], c: [f32; 2]| {
            (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
        };
        let [a, b, c] = *triangle;
        let d1 = cross(a, b, p);
        let d2 = cross(b, c, p);
        let d3 = cross(c, a, p);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    #[test]
    fn triangle_covers_clip_square() {
        for x in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            for y in [-1.0, -0.5, 0.0, 0.5, 1.0] {
                assert!(contains(&FULLSCREEN_TRIANGLE, [x, y]), "({x}, {y})");
            }
        }
        assert!(!contains(&FULLSCREEN_TRIANGLE, [1.5, 1.5]));
    }

    #[test]
    fn vertex_source_matches_triangle_table() {
        assert_eq!(FULLSCREEN_TRIANGLE_VERTEX_COUNT, 3);
        assert!(VS_SOURCE.contains("float2 pos[3]"));
        assert!(VS_SOURCE.contains("float2(-1.0, -1.0)"));
        assert!(VS_SOURCE.contains("float2( 3.0, -1.0)"));
        assert!(VS_SOURCE.contains("float2(-1.0,  3.0)"));
        assert!(VS_SOURCE.contains("SV_VertexID"));
    }

    #[test]
    fn pixel_source_is_opaque_red() {
        assert!(PS_SOURCE.contains("float4(1.0, 0.0, 0.0, 1.0)"));
    }

    #[test]
    fn entry_points_and_targets() {
        assert_eq!(
            (VERTEX_SHADER.entry_point, VERTEX_SHADER.target),
            ("VSMain", "vs_5_0")
        );
        assert_eq!(
            (PIXEL_SHADER.entry_point, PIXEL_SHADER.target),
            ("PSMain", "ps_5_0")
        );
        assert!(VERTEX_SHADER.source.contains(VERTEX_SHADER.entry_point));
        assert!(PIXEL_SHADER.source.contains(PIXEL_SHADER.entry_point));
    }

    #[test]
    fn strictness_in_every_build() {
        assert_eq!(
            CompileOptions::release(),
            CompileOptions {
                strictness: true,
                debug_info: false,
                skip_optimization: false,
            }
        );
        let debug = CompileOptions::debug();
        assert!(debug.strictness && debug.debug_info && debug.skip_optimization);
        assert!(CompileOptions::for_build().strictness);
        assert_eq!(
            CompileOptions::for_build().debug_info,
            cfg!(debug_assertions)
        );
    }

    #[test]
    fn diagnostics_are_trimmed() {
        assert_eq!(
            diagnostics_text(b"(3,5): error X3000: syntax error\n\0").as_deref(),
            Some("(3,5): error X3000: syntax error")
        );
        assert_eq!(diagnostics_text(b"\0"), None);
        assert_eq!(diagnostics_text(b""), None);
    }
}
