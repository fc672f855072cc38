use std::fmt;

/// What can go wrong while bringing up the GPU.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window handle did not yield a wgpu surface.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter was willing to drive the surface.
    AdapterRequest(wgpu::RequestAdapterError),
    /// The adapter refused the device request.
    DeviceRequest(wgpu::RequestDeviceError),
    /// The adapter reports no usable configuration for the surface.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "could not create a rendering surface: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no suitable GPU adapter: {e}")
            }
            Self::DeviceRequest(e) => {
                write!(f, "GPU device unavailable: {e}")
            }
            Self::UnsupportedSurface => {
                write!(f, "adapter cannot present to this surface")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedSurface => None,
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
        }
    }
}

/// Bundles the wgpu device and queue with the window surface they present to.
pub struct RenderContext {
    /// Logical GPU device.
    pub device: wgpu::Device,
    /// Submission queue for the device.
    pub queue: wgpu::Queue,
    /// Presentation surface tied to the window.
    pub surface: wgpu::Surface<'static>,
    /// Active surface configuration.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Bring up wgpu for a window: instance, surface, adapter, device.
    /// Picks an sRGB swapchain format when the surface offers one and locks
    /// presentation to Fifo.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderContextError`] naming whichever setup stage failed.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vitrine device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let mut config = surface
            .get_default_config(&adapter, initial_size.0, initial_size.1)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        let caps = surface.get_capabilities(&adapter);
        if let Some(srgb) =
            caps.formats.iter().copied().find(wgpu::TextureFormat::is_srgb)
        {
            config.format = srgb;
        }
        config.present_mode = wgpu::PresentMode::Fifo;

        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Swapchain texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Surface width in physical pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Surface height in physical pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Reconfigure the surface after a window resize. Zero-sized requests
    /// are dropped, wgpu would reject them.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Grab the next swapchain image.
    ///
    /// # Errors
    ///
    /// Passes through [`wgpu::SurfaceError`]; the caller decides whether a
    /// lost or outdated surface means reconfigure or give up.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Open a command encoder for one frame's work.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            })
    }

    /// Close the encoder and hand its buffer to the queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}
