//! Error types for bauble.
//!
//! The simulation itself never fails at runtime: degenerate geometry and
//! placement exhaustion are absorbed where they happen. Errors only surface
//! when a configuration is unusable or when the native host cannot open a
//! window or a GPU device.

use std::fmt;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter is NaN or infinite.
    NotFinite { name: &'static str },
    /// A parameter must be strictly positive.
    NotPositive { name: &'static str, value: f32 },
    /// A parameter must not be negative.
    Negative { name: &'static str, value: f32 },
    /// A coefficient lies outside its unit range.
    OutOfUnitRange { name: &'static str, value: f32 },
    /// `min_size` is larger than `max_size`.
    InvertedSizeRange { min: f32, max: f32 },
    /// A count that must be at least one is zero.
    ZeroCount { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFinite { name } => write!(f, "`{}` must be finite", name),
            ConfigError::NotPositive { name, value } => {
                write!(f, "`{}` must be positive, got {}", name, value)
            }
            ConfigError::Negative { name, value } => {
                write!(f, "`{}` must not be negative, got {}", name, value)
            }
            ConfigError::OutOfUnitRange { name, value } => {
                write!(f, "`{}` must lie within [0, 1], got {}", name, value)
            }
            ConfigError::InvertedSizeRange { min, max } => {
                write!(f, "size range is inverted: min {} > max {}", min, max)
            }
            ConfigError::ZeroCount { name } => write!(f, "`{}` must be at least 1", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found (needs Vulkan, Metal, DX12 or WebGPU)"
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while hosting a visualization in a native window.
#[derive(Debug)]
pub enum HostError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            HostError::Window(e) => write!(f, "Failed to create window: {}", e),
            HostError::Gpu(e) => write!(f, "GPU error: {}", e),
            HostError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::EventLoop(e) => Some(e),
            HostError::Window(e) => Some(e),
            HostError::Gpu(e) => Some(e),
            HostError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for HostError {
    fn from(e: winit::error::EventLoopError) -> Self {
        HostError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for HostError {
    fn from(e: winit::error::OsError) -> Self {
        HostError::Window(e)
    }
}

impl From<GpuError> for HostError {
    fn from(e: GpuError) -> Self {
        HostError::Gpu(e)
    }
}

impl From<ConfigError> for HostError {
    fn from(e: ConfigError) -> Self {
        HostError::Config(e)
    }
}
