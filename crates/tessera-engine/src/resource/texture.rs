use super::TextureHandle;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureType {
    #[default]
    None,
    D1,
    D2,
    D3,
    /// Render target attachment.
    FrameBuffer,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureFormat {
    #[default]
    None,
    Rgb8,
    Rgba8,
}

impl TextureFormat {
    /// Bytes per texel, or 0 for `None`.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::None => 0,
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// `None` means "pick the default for this texture type".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureWrapMode {
    #[default]
    None,
    Repeat,
    Clamp,
}

/// `None` means "pick the default" (linear) for the main filter and
/// "no mipmapping" for the mip filter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureFilterMode {
    #[default]
    None,
    Nearest,
    Linear,
}

/// Creation parameters for a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextureInitSettings {
    pub ty: TextureType,
    pub format: TextureFormat,
    pub wrap_mode: TextureWrapMode,
    pub filter_mode: TextureFilterMode,
    pub mip_filter_mode: TextureFilterMode,
    /// 0 or 1 disables anisotropic filtering. Powers of two enable it; -1
    /// requests the highest supported value.
    pub anisotropy: i32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl TextureInitSettings {
    /// Plain 2D texture with default sampling.
    pub fn texture_2d(format: TextureFormat, width: u32, height: u32) -> Self {
        Self {
            ty: TextureType::D2,
            format,
            width,
            height,
            depth: 1,
            ..Self::default()
        }
    }

    /// Replaces `None` sampling modes with their defaults.
    ///
    /// Framebuffer attachments clamp; everything else repeats. Filtering
    /// defaults to linear. The mip filter is left untouched.
    pub fn resolved(mut self) -> Self {
        if self.wrap_mode == TextureWrapMode::None {
            self.wrap_mode = match self.ty {
                TextureType::FrameBuffer => TextureWrapMode::Clamp,
                _ => TextureWrapMode::Repeat,
            };
        }
        if self.filter_mode == TextureFilterMode::None {
            self.filter_mode = TextureFilterMode::Linear;
        }
        self
    }

    /// Size in bytes of a `width * height` region in this format.
    #[inline]
    pub fn region_size(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.format.bytes_per_pixel()
    }
}

/// Texture descriptor. `settings` is always the resolved form.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Texture {
    pub handle: TextureHandle,
    pub settings: TextureInitSettings,
    pub has_mipmaps: bool,
}

impl Texture {
    pub fn new(handle: TextureHandle, settings: TextureInitSettings) -> Self {
        Self {
            handle,
            settings: settings.resolved(),
            has_mipmaps: false,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.settings.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.settings.height
    }

    /// Returns true if the region lies inside the top mip level.
    pub fn contains_region(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let right = x.checked_add(width);
        let bottom = y.checked_add(height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= self.width() && b <= self.height())
    }
}
