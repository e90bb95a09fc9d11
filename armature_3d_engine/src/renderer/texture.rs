/// Texture trait and texture descriptor

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
}

impl TextureFormat {
    /// Size in bytes of one pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM => 4,
        }
    }
}

/// Descriptor for creating a texture
///
/// With `data: None` the backend loads `name` as an image file and the
/// width/height are only a hint.
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Texture name or image file (e.g., "woodbox.bmp")
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Optional raw pixel bytes (width * height * bytes_per_pixel)
    pub data: Option<Vec<u8>>,
}

impl TextureDesc {
    /// Texture loaded by the backend from an image file
    pub fn from_file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 1,
            height: 1,
            format: TextureFormat::R8G8B8A8_UNORM,
            data: None,
        }
    }

    /// Expected size of `data` in bytes
    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel() as u64
    }
}

/// Texture resource trait
pub trait Texture: Send + Sync {
    fn name(&self) -> &str;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn format(&self) -> TextureFormat;
}
