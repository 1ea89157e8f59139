use thiserror::Error;

/// Failures that abort startup before the render loop is entered.
#[derive(Error, Debug)]
pub enum InitError {
    /// Window class registration or window creation failed
    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    /// No compatible adapter or driver for the device and swap chain
    #[error("Device creation failed: {0}")]
    DeviceCreation(String),

    /// Back buffer, render target view or shader object could not be created
    #[error("Failed to create {resource}: {reason}")]
    ResourceCreation {
        resource: &'static str,
        reason: String,
    },

    /// HLSL source did not compile for its stage
    #[error("Shader {entry_point} ({target}) failed to compile: {diagnostics}")]
    ShaderCompile {
        entry_point: &'static str,
        target: &'static str,
        diagnostics: String,
    },

    #[error("Direct3D 11 is only available on Windows")]
    UnsupportedPlatform,
}
