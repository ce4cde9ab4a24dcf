use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::RenderError;

/// File name used when exporting without an explicit path.
pub const DEFAULT_EXPORT_NAME: &str = "glitch-contour.png";

/// A finished square RGBA8 render.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer {
    image: RgbaImage,
}

impl OutputBuffer {
    pub(crate) fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.image
            .save_with_format(path.as_ref(), ImageFormat::Png)?;
        Ok(())
    }

    /// Write the buffer as [`DEFAULT_EXPORT_NAME`] inside `dir`.
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<std::path::PathBuf, RenderError> {
        let path = dir.as_ref().join(DEFAULT_EXPORT_NAME);
        self.save_png(&path)?;
        Ok(path)
    }
}

#[cfg(feature = "serialize")]
mod serialize {
    use base64::{prelude::BASE64_STANDARD, Engine};
    use image::RgbaImage;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::OutputBuffer;

    impl Serialize for OutputBuffer {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&BASE64_STANDARD.encode(self.pixels()))
        }
    }

    impl<'de> Deserialize<'de> for OutputBuffer {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let base64 = String::deserialize(deserializer)?;
            let bytes = BASE64_STANDARD.decode(base64).map_err(de::Error::custom)?;

            let size = ((bytes.len() / 4) as f64).sqrt().round() as u32;
            if size as usize * size as usize * 4 != bytes.len() {
                return Err(de::Error::custom(format!(
                    "{} bytes is not a square RGBA image",
                    bytes.len()
                )));
            }

            RgbaImage::from_raw(size, size, bytes)
                .map(OutputBuffer::from_image)
                .ok_or_else(|| de::Error::custom("pixel buffer too small"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(size: u32) -> OutputBuffer {
        OutputBuffer::from_image(RgbaImage::from_fn(size, size, |x, y| {
            let v = if (x + y) % 2 == 0 { 0 } else { 255 };
            image::Rgba([v, v, v, 255])
        }))
    }

    #[test]
    fn test_accessors() {
        let buffer = checker(3);
        assert_eq!(buffer.size(), 3);
        assert_eq!(buffer.pixels().len(), 3 * 3 * 4);
        assert_eq!(buffer.pixel(1, 0), Some([255, 255, 255, 255]));
        assert_eq!(buffer.pixel(3, 0), None);
    }

    #[test]
    fn test_export_round_trip() {
        let dir = std::env::temp_dir().join(format!("glitch-contour-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let buffer = checker(8);
        let path = buffer.export_to_dir(&dir).unwrap();
        assert!(path.ends_with(DEFAULT_EXPORT_NAME));

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(&loaded, buffer.as_image());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_serialize_cbor() {
        let buffer = checker(5);
        let bytes = serde_cbor::to_vec(&buffer).unwrap();
        let decoded: OutputBuffer = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(decoded, buffer);

        let not_square = serde_cbor::to_vec(&"AAAAAAAAAAA=").unwrap();
        assert!(serde_cbor::from_slice::<OutputBuffer>(&not_square).is_err());
    }
}
