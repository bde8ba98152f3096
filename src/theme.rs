use clap::ValueEnum;
use image::{Rgba, RgbaImage};

pub type Rgb = (u8, u8, u8);

/// How a theme recolors a glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    None,
    Solid(Rgb),
    /// Top row is `low`, bottom row is `high`.
    Gradient { low: Rgb, high: Rgb },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorTheme {
    #[default]
    Original,
    SecondaryStructure,
    Hydrophobicity,
    Electrostatics,
    ProteinCore,
    NucleicAcidBinding,
    Neuroscience,
    InfectionImmunity,
    Grayscale,
    HighContrast,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 10] = [
        ColorTheme::Original,
        ColorTheme::SecondaryStructure,
        ColorTheme::Hydrophobicity,
        ColorTheme::Electrostatics,
        ColorTheme::ProteinCore,
        ColorTheme::NucleicAcidBinding,
        ColorTheme::Neuroscience,
        ColorTheme::InfectionImmunity,
        ColorTheme::Grayscale,
        ColorTheme::HighContrast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Original => "Original",
            ColorTheme::SecondaryStructure => "Secondary structure (PyMOL-like)",
            ColorTheme::Hydrophobicity => "Hydrophobicity (Kyte–Doolittle)",
            ColorTheme::Electrostatics => "Electrostatics",
            ColorTheme::ProteinCore => "Protein core",
            ColorTheme::NucleicAcidBinding => "Nucleic-acid binding",
            ColorTheme::Neuroscience => "Neuroscience",
            ColorTheme::InfectionImmunity => "Infection / immunity",
            ColorTheme::Grayscale => "Grayscale (publication)",
            ColorTheme::HighContrast => "High contrast (presentation)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ColorTheme::Original => "Original coloring from the rendered protein structure.",
            ColorTheme::SecondaryStructure => {
                "Inspired by standard secondary-structure coloring (α-helices in red)."
            }
            ColorTheme::Hydrophobicity => {
                "Blue → hydrophilic, Red → hydrophobic (Kyte–Doolittle inspired)."
            }
            ColorTheme::Electrostatics => "Blue tones inspired by electrostatic surface coloring.",
            ColorTheme::ProteinCore => "Muted green inspired by hydrophobic protein cores.",
            ColorTheme::NucleicAcidBinding => "Blue tones inspired by DNA/RNA-binding proteins.",
            ColorTheme::Neuroscience => "Purple tones inspired by brain and synaptic imagery.",
            ColorTheme::InfectionImmunity => "Warm tones inspired by host–pathogen interactions.",
            ColorTheme::Grayscale => "Neutral grayscale for publication figures.",
            ColorTheme::HighContrast => "High-contrast white for dark backgrounds.",
        }
    }

    pub fn fill(self) -> Fill {
        match self {
            ColorTheme::Original => Fill::None,
            ColorTheme::SecondaryStructure => Fill::Solid((220, 50, 50)),
            ColorTheme::Hydrophobicity => Fill::Gradient {
                low: (50, 80, 200),
                high: (200, 50, 50),
            },
            ColorTheme::Electrostatics => Fill::Solid((130, 130, 230)),
            ColorTheme::ProteinCore => Fill::Solid((120, 160, 120)),
            ColorTheme::NucleicAcidBinding => Fill::Solid((90, 160, 220)),
            ColorTheme::Neuroscience => Fill::Solid((160, 120, 200)),
            ColorTheme::InfectionImmunity => Fill::Solid((180, 140, 90)),
            ColorTheme::Grayscale => Fill::Solid((190, 190, 190)),
            ColorTheme::HighContrast => Fill::Solid((255, 255, 255)),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Recolor `img` in place. Transparent pixels stay transparent.
    pub fn apply(self, img: &mut RgbaImage) {
        match self.fill() {
            Fill::None => {}
            Fill::Solid(color) => {
                for pixel in img.pixels_mut() {
                    *pixel = tint(*pixel, color);
                }
            }
            Fill::Gradient { low, high } => {
                let denom = img.height().saturating_sub(1).max(1) as f32;
                for (_, y, pixel) in img.enumerate_pixels_mut() {
                    let t = y as f32 / denom;
                    *pixel = tint(*pixel, lerp(low, high, t));
                }
            }
        }
    }
}

fn lerp(low: Rgb, high: Rgb, t: f32) -> Rgb {
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t) as u8;
    (mix(low.0, high.0), mix(low.1, high.1), mix(low.2, high.2))
}

// `color` at the pixel's own alpha, composited over the pixel.
fn tint(pixel: Rgba<u8>, color: Rgb) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    if a == 0 {
        return pixel;
    }

    let alpha = a as f32 / 255.0;
    let out_alpha = alpha + alpha * (1.0 - alpha);
    let channel = |top: u8, bottom: u8| {
        let value =
            (top as f32 * alpha + bottom as f32 * alpha * (1.0 - alpha)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(color.0, r),
        channel(color.1, g),
        channel(color.2, b),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
