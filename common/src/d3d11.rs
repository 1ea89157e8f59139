use log::{debug, error, info, warn};
use windows::{
    core::PCSTR,
    Win32::{
        Foundation::HMODULE,
        Graphics::{
            Direct3D::{
                Fxc::{
                    D3DCompile, D3DCOMPILE_DEBUG, D3DCOMPILE_ENABLE_STRICTNESS,
                    D3DCOMPILE_SKIP_OPTIMIZATION,
                },
                ID3DBlob, D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST, D3D_DRIVER_TYPE_HARDWARE,
            },
            Direct3D11::{
                D3D11CreateDeviceAndSwapChain, ID3D11Device, ID3D11DeviceContext,
                ID3D11PixelShader, ID3D11RenderTargetView, ID3D11Texture2D, ID3D11VertexShader,
                D3D11_CREATE_DEVICE_FLAG, D3D11_SDK_VERSION, D3D11_VIEWPORT,
            },
            Dxgi::{
                Common::{DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_MODE_DESC, DXGI_RATIONAL, DXGI_SAMPLE_DESC},
                DXGIGetDebugInterface1, IDXGIDebug1, IDXGISwapChain, DXGI_DEBUG_ALL,
                DXGI_DEBUG_RLO_DETAIL, DXGI_DEBUG_RLO_IGNORE_INTERNAL, DXGI_PRESENT,
                DXGI_SWAP_CHAIN_DESC, DXGI_SWAP_EFFECT_DISCARD, DXGI_USAGE_RENDER_TARGET_OUTPUT,
            },
        },
    },
};

use crate::{
    config::RendererConfig,
    error::InitError,
    gfx::{render_frame, FrameCommands, Viewport},
    os::Window,
    shader::{diagnostics_text, CompileOptions, ShaderDesc, PIXEL_SHADER, VERTEX_SHADER},
    util::AsCString,
};

impl From<Viewport> for D3D11_VIEWPORT {
    fn from(viewport: Viewport) -> Self {
        D3D11_VIEWPORT {
            TopLeftX: viewport.top_left_x,
            TopLeftY: viewport.top_left_y,
            Width: viewport.width,
            Height: viewport.height,
            MinDepth: viewport.min_depth,
            MaxDepth: viewport.max_depth,
        }
    }
}

pub fn compile_flags(options: CompileOptions) -> u32 {
    let mut flags = 0;
    if options.strictness {
        flags |= D3DCOMPILE_ENABLE_STRICTNESS;
    }
    if options.debug_info {
        flags |= D3DCOMPILE_DEBUG;
    }
    if options.skip_optimization {
        flags |= D3DCOMPILE_SKIP_OPTIMIZATION;
    }
    flags
}

unsafe fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize())
}

/// Compiles `desc` to bytecode. Compiler output goes to the debug channel on failure.
pub fn compile_shader(desc: &ShaderDesc, options: CompileOptions) -> Result<ID3DBlob, InitError> {
    let entry_point = desc.entry_point.as_c_string();
    let target = desc.target.as_c_string();

    let mut code: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;

    let result = unsafe {
        D3DCompile(
            desc.source.as_ptr() as *const _,
            desc.source.len(),
            None,
            None,
            None,
            PCSTR(entry_point.as_ptr() as _),
            PCSTR(target.as_ptr() as _),
            compile_flags(options),
            0,
            &mut code,
            Some(&mut errors),
        )
    };

    let compile_error = |diagnostics: String| InitError::ShaderCompile {
        entry_point: desc.entry_point,
        target: desc.target,
        diagnostics,
    };

    if let Err(e) = result {
        let diagnostics = errors
            .as_ref()
            .and_then(|blob| diagnostics_text(unsafe { blob_bytes(blob) }))
            .or_else(|| diagnostics_text(e.message().as_bytes()))
            .unwrap_or_else(|| format!("HRESULT {:#010x}", e.code().0));

        error!(
            "{} ({}) failed to compile:\n{diagnostics}",
            desc.entry_point, desc.target
        );

        return Err(compile_error(diagnostics));
    }

    code.ok_or_else(|| compile_error("compiler returned no bytecode".to_string()))
}

/// Every object the renderer owns. Fields drop in declaration order, which is the release order.
#[allow(unused)]
struct GpuResources {
    pixel_shader: ID3D11PixelShader,
    vertex_shader: ID3D11VertexShader,
    render_target_view: ID3D11RenderTargetView,
    swap_chain: IDXGISwapChain,
    context: ID3D11DeviceContext,
    device: ID3D11Device,
}

impl Drop for GpuResources {
    fn drop(&mut self) {
        unsafe { self.context.ClearState() };
    }
}

impl FrameCommands for GpuResources {
    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.context
                .ClearRenderTargetView(&self.render_target_view, &color)
        };
    }

    fn bind_pipeline(&mut self) {
        unsafe {
            self.context
                .IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            self.context.VSSetShader(&self.vertex_shader, None);
            self.context.PSSetShader(&self.pixel_shader, None);
        }
    }

    fn draw(&mut self, vertex_count: u32, start_vertex: u32) {
        unsafe { self.context.Draw(vertex_count, start_vertex) };
    }

    fn present(&mut self, sync_interval: u32) -> Result<(), Box<dyn std::error::Error>> {
        unsafe { self.swap_chain.Present(sync_interval, DXGI_PRESENT(0)) }.ok()?;
        Ok(())
    }
}

fn create_device_and_swap_chain(
    window: &Window,
    config: &RendererConfig,
) -> Result<(ID3D11Device, ID3D11DeviceContext, IDXGISwapChain), InitError> {
    let swap_chain_desc = DXGI_SWAP_CHAIN_DESC {
        BufferDesc: DXGI_MODE_DESC {
            // Zero lets DXGI take the size from the output window.
            Width: 0,
            Height: 0,
            RefreshRate: DXGI_RATIONAL {
                Numerator: config.refresh_rate.0,
                Denominator: config.refresh_rate.1,
            },
            Format: DXGI_FORMAT_R8G8B8A8_UNORM,
            ..Default::default()
        },
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: config.buffer_count,
        OutputWindow: window.get_handle(),
        Windowed: true.into(),
        SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
        ..Default::default()
    };

    let mut swap_chain: Option<IDXGISwapChain> = None;
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;

    unsafe {
        D3D11CreateDeviceAndSwapChain(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            HMODULE::default(),
            D3D11_CREATE_DEVICE_FLAG(0),
            None,
            D3D11_SDK_VERSION,
            Some(&swap_chain_desc),
            Some(&mut swap_chain),
            Some(&mut device),
            None,
            Some(&mut context),
        )
    }
    .map_err(|e| InitError::DeviceCreation(e.to_string()))?;

    match (device, context, swap_chain) {
        (Some(device), Some(context), Some(swap_chain)) => Ok((device, context, swap_chain)),
        _ => Err(InitError::DeviceCreation(
            "driver returned no device, context or swap chain".to_string(),
        )),
    }
}

fn resource_error(resource: &'static str, reason: impl ToString) -> InitError {
    InitError::ResourceCreation {
        resource,
        reason: reason.to_string(),
    }
}

fn create_render_target_view(
    device: &ID3D11Device,
    swap_chain: &IDXGISwapChain,
) -> Result<ID3D11RenderTargetView, InitError> {
    // Released on every path out of this function.
    let back_buffer = unsafe { swap_chain.GetBuffer::<ID3D11Texture2D>(0) }
        .map_err(|e| resource_error("back buffer", e))?;

    let mut render_target_view: Option<ID3D11RenderTargetView> = None;
    unsafe { device.CreateRenderTargetView(&back_buffer, None, Some(&mut render_target_view)) }
        .map_err(|e| resource_error("render target view", e))?;

    render_target_view.ok_or_else(|| resource_error("render target view", "driver returned no view"))
}

fn create_shaders(
    device: &ID3D11Device,
    options: CompileOptions,
) -> Result<(ID3D11VertexShader, ID3D11PixelShader), InitError> {
    let vs_blob = compile_shader(&VERTEX_SHADER, options)?;
    let ps_blob = compile_shader(&PIXEL_SHADER, options)?;

    let mut vertex_shader: Option<ID3D11VertexShader> = None;
    unsafe { device.CreateVertexShader(blob_bytes(&vs_blob), None, Some(&mut vertex_shader)) }
        .map_err(|e| resource_error("vertex shader", e))?;
    let vertex_shader =
        vertex_shader.ok_or_else(|| resource_error("vertex shader", "driver returned no shader"))?;

    let mut pixel_shader: Option<ID3D11PixelShader> = None;
    unsafe { device.CreatePixelShader(blob_bytes(&ps_blob), None, Some(&mut pixel_shader)) }
        .map_err(|e| resource_error("pixel shader", e))?;
    let pixel_shader =
        pixel_shader.ok_or_else(|| resource_error("pixel shader", "driver returned no shader"))?;

    // No input layout: the vertex shader reads only SV_VertexID.
    Ok((vertex_shader, pixel_shader))
}

pub struct Renderer {
    resources: Option<GpuResources>,
    config: RendererConfig,
    viewport: Viewport,
    frames_presented: u64,
}

impl Renderer {
    /// Runs the whole initialization sequence. Anything acquired before a failing step is released.
    pub fn new(window: &Window, config: RendererConfig) -> Result<Self, InitError> {
        let (device, context, swap_chain) = create_device_and_swap_chain(window, &config)?;
        debug!("D3D11: device and swap chain created");

        let render_target_view = create_render_target_view(&device, &swap_chain)?;
        unsafe { context.OMSetRenderTargets(Some(&[Some(render_target_view.clone())]), None) };

        let viewport = Viewport::from_client_size(window.get_physical_size());
        let d3d_viewport: D3D11_VIEWPORT = viewport.into();
        unsafe { context.RSSetViewports(Some(&[d3d_viewport])) };
        debug!("D3D11: viewport {}x{}", viewport.width, viewport.height);

        let (vertex_shader, pixel_shader) = create_shaders(&device, CompileOptions::for_build())?;
        debug!("D3D11: shaders ready");

        Ok(Self {
            resources: Some(GpuResources {
                pixel_shader,
                vertex_shader,
                render_target_view,
                swap_chain,
                context,
                device,
            }),
            config,
            viewport,
            frames_presented: 0,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_ready(&self) -> bool {
        self.resources.is_some()
    }

    /// Clear, draw, present. Blocks in present until the next vertical blank.
    pub fn render_frame(&mut self) {
        let Some(resources) = self.resources.as_mut() else {
            return;
        };

        match render_frame(resources, &self.config) {
            Ok(()) => self.frames_presented += 1,
            Err(e) => warn!("failed to present the frame: {e}"),
        }
    }

    /// Releases every GPU object. Further calls do nothing.
    pub fn release(&mut self) {
        if let Some(resources) = self.resources.take() {
            std::mem::drop(resources);
            info!("D3D11: released after {} frames", self.frames_presented);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.release();
    }
}

pub fn report_live_objects() {
    unsafe {
        if cfg!(debug_assertions) {
            if let Ok(dxgi_debug) = DXGIGetDebugInterface1::<IDXGIDebug1>(0) {
                let _ = dxgi_debug.ReportLiveObjects(
                    DXGI_DEBUG_ALL,
                    DXGI_DEBUG_RLO_DETAIL | DXGI_DEBUG_RLO_IGNORE_INTERNAL,
                );
            }
        }
    }
}
