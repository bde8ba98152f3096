use crate::error::{Error, Result};

use image::{ImageReader, RgbaImage, imageops, imageops::FilterType};
use std::{collections::BTreeMap, fs, path::Path, sync::OnceLock};
use tracing::{debug, info, warn};

static ALPHABET: OnceLock<Alphabet> = OnceLock::new();

/// Letter images keyed by uppercase character.
#[derive(Clone, Debug, Default)]
pub struct Alphabet {
    letters: BTreeMap<char, RgbaImage>,
}

impl Alphabet {
    /// Load `A.png` through `Z.png` from `dir`.
    ///
    /// Letters without a file are left out and later skipped by layout. A
    /// missing directory, an empty catalog, or a file that fails to decode is
    /// a `MissingAsset` error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        if !fs::metadata(dir).map(|m| m.is_dir()).unwrap_or(false) {
            return Err(Error::missing_asset(dir, "not a readable directory"));
        }

        let mut letters = BTreeMap::new();
        for ch in 'A'..='Z' {
            let path = dir.join(format!("{ch}.png"));
            if !path.is_file() {
                warn!(letter = %ch, path = %path.display(), "letter image not found");
                continue;
            }

            let img = decode(&path)?;

            debug!(letter = %ch, width = img.width(), height = img.height(), "loaded letter");
            letters.insert(ch, img);
        }

        if letters.is_empty() {
            return Err(Error::missing_asset(dir, "no letter images A.png-Z.png"));
        }

        info!(dir = %dir.display(), letters = letters.len(), "alphabet loaded");

        Ok(Self { letters })
    }

    /// Build an alphabet from in-memory images. Keys are uppercased.
    pub fn from_images(images: impl IntoIterator<Item = (char, RgbaImage)>) -> Self {
        let letters = images
            .into_iter()
            .filter(|(_, img)| img.width() > 0 && img.height() > 0)
            .flat_map(|(ch, img)| ch.to_uppercase().map(move |up| (up, img.clone())))
            .collect();

        Self { letters }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Width of `ch` once scaled to `height`, keeping the aspect ratio.
    pub fn scaled_width(&self, ch: char, height: u32) -> Option<u32> {
        let img = self.letters.get(&ch)?;
        let width = img.width() as u64 * height as u64 / img.height() as u64;

        Some(u32::try_from(width).ok()?.max(1))
    }

    /// `ch` resampled to `height` pixels tall.
    pub fn scaled(&self, ch: char, height: u32) -> Option<RgbaImage> {
        let img = self.letters.get(&ch)?;
        let width = self.scaled_width(ch, height)?;

        if img.dimensions() == (width, height) {
            return Some(img.clone());
        }

        Some(imageops::resize(img, width, height, FilterType::Lanczos3))
    }
}

// The format comes from the file content, not the `.png` extension.
fn decode(path: &Path) -> Result<RgbaImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| Error::missing_asset(path, e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| Error::missing_asset(path, e.to_string()))?;

    Ok(img.to_rgba8())
}

/// How far below the cell top a letter is drawn, as a fraction of its height.
pub fn baseline_shift(ch: char) -> f64 {
    match ch {
        'L' => 0.12,
        'I' => 0.10,
        'J' => 0.15,
        'T' => 0.08,
        _ => 0.0,
    }
}

pub fn baseline_offset(ch: char, height: u32) -> u32 {
    (baseline_shift(ch) * height as f64) as u32
}

/// Make `alphabet` the process-wide catalog. The first call wins.
pub fn install(alphabet: Alphabet) -> &'static Alphabet {
    ALPHABET.get_or_init(|| alphabet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba};
    use std::{io::Cursor, path::PathBuf};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "protein-alphabet-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_directory_is_missing_asset() {
        let err = Alphabet::load("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::MissingAsset { .. }));
    }

    #[test]
    fn empty_directory_is_missing_asset() {
        let dir = scratch_dir("empty");
        let err = Alphabet::load(&dir).unwrap_err();
        assert!(matches!(err, Error::MissingAsset { .. }));
    }

    #[test]
    fn partial_catalog_loads_present_letters() {
        let dir = scratch_dir("partial");
        RgbaImage::from_pixel(4, 8, Rgba([255, 0, 0, 255]))
            .save(dir.join("A.png"))
            .unwrap();
        RgbaImage::from_pixel(6, 8, Rgba([0, 255, 0, 255]))
            .save(dir.join("Q.png"))
            .unwrap();

        let alphabet = Alphabet::load(&dir).unwrap();
        assert_eq!(alphabet.len(), 2);
        assert!(alphabet.scaled_width('A', 8).is_some());
        assert!(alphabet.scaled_width('Q', 8).is_some());
        assert!(alphabet.scaled_width('B', 8).is_none());
    }

    #[test]
    fn undecodable_letter_is_missing_asset() {
        let dir = scratch_dir("corrupt");
        fs::write(dir.join("B.png"), b"not a png").unwrap();

        let err = Alphabet::load(&dir).unwrap_err();
        match err {
            Error::MissingAsset { path, .. } => assert!(path.ends_with("B.png")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scaling_keeps_aspect_ratio() {
        let alphabet = Alphabet::from_images([('a', RgbaImage::new(50, 100))]);

        assert_eq!(alphabet.scaled_width('A', 200), Some(100));
        assert_eq!(alphabet.scaled('A', 40).unwrap().dimensions(), (20, 40));
        assert_eq!(alphabet.scaled_width('B', 200), None);
    }

    #[test]
    fn letter_format_is_detected_from_content() {
        let dir = scratch_dir("jpeg");
        let mut bytes = Vec::new();
        RgbImage::from_pixel(8, 16, Rgb([200, 40, 40]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        fs::write(dir.join("A.png"), &bytes).unwrap();

        let alphabet = Alphabet::load(&dir).unwrap();
        assert_eq!(alphabet.len(), 1);
        assert_eq!(alphabet.scaled_width('A', 16), Some(8));
    }

    #[test]
    fn scaled_width_beyond_u32_is_unavailable() {
        let alphabet = Alphabet::from_images([('A', RgbaImage::new(1 << 20 | 1, 1))]);

        assert_eq!(alphabet.scaled_width('A', 4096), None);
        assert!(alphabet.scaled('A', 4096).is_none());
        assert_eq!(alphabet.scaled_width('A', 1), Some(1 << 20 | 1));
    }

    #[test]
    fn baseline_offsets() {
        assert_eq!(baseline_offset('J', 100), 15);
        assert_eq!(baseline_offset('L', 100), 12);
        assert_eq!(baseline_offset('A', 100), 0);
    }
}
