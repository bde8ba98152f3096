use crate::error::Result;

use image::{ImageFormat, RgbaImage};
use std::{fs, io::Cursor, path::Path};
use tracing::info;

pub const DEFAULT_FILE_NAME: &str = "protein_text.png";

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;

    Ok(buffer)
}

/// Write `image` as a PNG file, returning the number of bytes written.
pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let bytes = encode_png(image)?;
    fs::write(path, &bytes)?;

    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "exported png"
    );

    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_bytes_decode_to_same_image() {
        let mut image = RgbaImage::from_pixel(7, 3, Rgba([0, 0, 0, 0]));
        image.put_pixel(2, 1, Rgba([10, 200, 30, 128]));

        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn save_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "protein-alphabet-{}-export.png",
            std::process::id()
        ));
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));

        let written = save_png(&image, &path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len() as usize, written);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let image = RgbaImage::new(1, 1);
        let err = save_png(&image, "/definitely/not/here/out.png").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
