//! Palette synthesis: hue bands times luminance variants.
//!
//! Layout of the 256-entry table:
//!
//! ```text
//! [0, shades_offset)                          black
//! [shades_offset, shades_offset + shades * L)  swatches, L luminances per hue
//! [populated_end, 256)                        neutral fill, reserved UI colours
//! ```
//!
//! Channels are 6-bit VGA values in `0..=63`.

use serde::{Deserialize, Serialize};

use crate::error::{PaletteError, StarfieldError};

/// Number of entries in a palette table.
pub const PALETTE_SIZE: usize = 256;
/// Largest channel value of a 6-bit palette entry.
pub const MAX_CHANNEL: u8 = 63;

/// A 6-bit-per-channel palette entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::grey(0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Expands to 8-bit RGBA with full alpha.
    pub fn to_rgba8(self) -> [u8; 4] {
        let widen = |c: u8| {
            let c = c.min(MAX_CHANNEL);
            (c << 2) | (c >> 4)
        };
        [widen(self.r), widen(self.g), widen(self.b), 255]
    }
}

/// A colour pinned to a fixed index for UI layers sharing the palette.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservedColor {
    pub index: usize,
    pub color: Rgb,
}

/// Where the swatches sit in the table; everything a renderer needs to pick
/// a colour index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwatchLayout {
    pub shades: u32,
    pub shades_offset: u32,
    pub luminance_count: u32,
}

impl SwatchLayout {
    /// First palette index of the swatch group for `hue_bucket`.
    ///
    /// Buckets beyond the last hue are clamped to it, so the result always
    /// addresses a populated swatch.
    pub fn hue_to_color_index(&self, hue_bucket: u32) -> u8 {
        let bucket = hue_bucket.min(self.shades.saturating_sub(1));
        (self.shades_offset + bucket * self.luminance_count) as u8
    }
}

/// Shape of the starfield's portion of the palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSpec {
    /// Number of evenly spaced hues.
    pub shades: u32,
    /// Index of the first swatch; everything before it is black.
    pub shades_offset: u32,
    /// Brightness multipliers per hue, brightest first.
    pub luminances: Vec<f32>,
    /// Colour for every entry past the swatches.
    pub fill: Rgb,
    /// Entries in the fill region overwritten after synthesis.
    pub reserved: Vec<ReservedColor>,
}

impl Default for PaletteSpec {
    fn default() -> Self {
        Self {
            shades: 17,
            shades_offset: 1,
            luminances: vec![1.0, 0.5, 0.25],
            fill: Rgb::grey(MAX_CHANNEL),
            reserved: vec![
                ReservedColor {
                    index: 252,
                    color: Rgb::grey(12),
                },
                ReservedColor {
                    index: 253,
                    color: Rgb::grey(28),
                },
                ReservedColor {
                    index: 254,
                    color: Rgb::grey(MAX_CHANNEL),
                },
            ],
        }
    }
}

impl PaletteSpec {
    pub fn luminance_count(&self) -> u32 {
        self.luminances.len() as u32
    }

    /// First index past the swatches.
    pub fn populated_end(&self) -> usize {
        self.shades_offset as usize + self.shades as usize * self.luminances.len()
    }

    pub fn layout(&self) -> SwatchLayout {
        SwatchLayout {
            shades: self.shades,
            shades_offset: self.shades_offset,
            luminance_count: self.luminance_count(),
        }
    }

    pub fn hue_to_color_index(&self, hue_bucket: u32) -> u8 {
        self.layout().hue_to_color_index(hue_bucket)
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.shades == 0 {
            return Err(PaletteError::NoShades);
        }
        if self.luminances.is_empty() {
            return Err(PaletteError::NoLuminances);
        }
        if let Some(&bad) = self
            .luminances
            .iter()
            .find(|l| !(0.0..=1.0).contains(*l))
        {
            return Err(PaletteError::InvalidLuminance(bad));
        }
        let required = self.populated_end();
        if required > PALETTE_SIZE {
            return Err(PaletteError::TooManyEntries {
                required,
                capacity: PALETTE_SIZE,
            });
        }
        for reserved in &self.reserved {
            check_reserved(reserved.index, required)?;
        }
        Ok(())
    }

    /// Synthesizes the full table.
    pub fn build(&self) -> Result<Palette, StarfieldError> {
        self.validate()?;

        let mut entries = vec![self.fill; PALETTE_SIZE];
        let offset = self.shades_offset as usize;
        entries[..offset].fill(Rgb::BLACK);

        let per_hue = self.luminances.len();
        // Whole-degree steps; with 17 shades the wheel stops at 336, short of 360.
        let hue_step = 360 / self.shades;
        for shade in 0..self.shades as usize {
            let hue = (hue_step * shade as u32) as f32;
            let base = offset + shade * per_hue;
            for (lum, &value) in self.luminances.iter().enumerate() {
                let [r, g, b] = hsv_to_rgb8(hue, 1.0, value);
                // Quartering maps 8-bit channels onto the 6-bit table.
                entries[base + lum] = Rgb::new(r / 4, g / 4, b / 4);
            }
        }

        let mut palette = Palette {
            entries,
            populated_end: self.populated_end(),
        };
        for reserved in &self.reserved {
            palette.reserve(reserved.index, reserved.color)?;
        }

        log::debug!(
            "built starfield palette: {} hues x {} luminances, swatches end at {}",
            self.shades,
            per_hue,
            palette.populated_end
        );
        Ok(palette)
    }
}

fn check_reserved(index: usize, populated_end: usize) -> Result<(), PaletteError> {
    if index >= PALETTE_SIZE {
        return Err(PaletteError::ReservedOutOfRange(index));
    }
    if index < populated_end {
        return Err(PaletteError::ReservedOverlap {
            index,
            first_free: populated_end,
        });
    }
    Ok(())
}

/// Builds a palette of `shades` hues with the given luminance variants, using
/// the default black offset and fill and no reserved colours.
pub fn build_palette(shades: u32, luminances: &[f32]) -> Result<Palette, StarfieldError> {
    PaletteSpec {
        shades,
        luminances: luminances.to_vec(),
        reserved: Vec::new(),
        ..PaletteSpec::default()
    }
    .build()
}

/// A synthesized 256-entry palette, ready for the palette-setting facility.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    entries: Vec<Rgb>,
    populated_end: usize,
}

impl Palette {
    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    pub fn get(&self, index: u8) -> Rgb {
        self.entries[index as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First index past the starfield swatches.
    pub fn populated_end(&self) -> usize {
        self.populated_end
    }

    /// Pins `color` at `index`. Only the fill region may be overwritten.
    pub fn reserve(&mut self, index: usize, color: Rgb) -> Result<(), PaletteError> {
        check_reserved(index, self.populated_end)?;
        self.entries[index] = color;
        Ok(())
    }

    /// The whole table as 8-bit RGBA, indexed like the palette.
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.entries.iter().map(|c| c.to_rgba8()).collect()
    }
}

/// Converts hue (degrees), saturation and value (both `[0, 1]`) to 8-bit RGB.
pub fn hsv_to_rgb8(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    let chroma = value * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = value - chroma;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let to_byte = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_palette_layout() {
        let palette = build_palette(17, &[1.0, 0.5, 0.25]).unwrap();
        assert_eq!(palette.len(), PALETTE_SIZE);
        assert!(palette.populated_end() >= 1 + 17 * 3);
        assert_eq!(palette.get(0), Rgb::BLACK);
        // Hue 0 at full luminance is pure red, quartered.
        assert_eq!(palette.get(1), Rgb::new(63, 0, 0));
        assert_eq!(palette.get(52), Rgb::grey(MAX_CHANNEL));
        assert_eq!(palette.get(255), Rgb::grey(MAX_CHANNEL));
    }

    #[test]
    fn test_hues_step_in_whole_degrees() {
        let palette = build_palette(17, &[1.0, 0.5, 0.25]).unwrap();
        // 360 / 17 = 21, so shade 16 sits at 336 degrees.
        let [r, g, b] = hsv_to_rgb8(336.0, 1.0, 1.0);
        assert_eq!([r, g, b], [255, 0, 102]);
        assert_eq!(palette.get(1 + 16 * 3), Rgb::new(63, 0, 25));
        let [r, g, b] = hsv_to_rgb8(21.0, 1.0, 1.0);
        assert_eq!(palette.get(1 + 3), Rgb::new(r / 4, g / 4, b / 4));
    }

    #[test]
    fn test_luminance_variants_darken() {
        let palette = build_palette(17, &[1.0, 0.5, 0.25]).unwrap();
        for shade in 0..17usize {
            let base = 1 + shade * 3;
            let full = palette.entries()[base];
            let half = palette.entries()[base + 1];
            let quarter = palette.entries()[base + 2];
            let sum = |c: Rgb| c.r as u32 + c.g as u32 + c.b as u32;
            assert!(sum(full) > sum(half), "shade {shade}: {full:?} vs {half:?}");
            assert!(sum(half) > sum(quarter), "shade {shade}: {half:?} vs {quarter:?}");
        }
    }

    #[test]
    fn test_swatches_stay_six_bit() {
        let palette = PaletteSpec::default().build().unwrap();
        for (i, c) in palette.entries().iter().enumerate() {
            assert!(
                c.r <= MAX_CHANNEL && c.g <= MAX_CHANNEL && c.b <= MAX_CHANNEL,
                "entry {i} = {c:?}"
            );
        }
    }

    #[test]
    fn test_black_region_respects_offset() {
        let spec = PaletteSpec {
            shades_offset: 4,
            ..PaletteSpec::default()
        };
        let palette = spec.build().unwrap();
        for i in 0..4u8 {
            assert_eq!(palette.get(i), Rgb::BLACK);
        }
        assert_ne!(palette.get(4), Rgb::BLACK);
    }

    #[test]
    fn test_default_reserved_ui_colours_applied() {
        let palette = PaletteSpec::default().build().unwrap();
        assert_eq!(palette.get(252), Rgb::grey(12));
        assert_eq!(palette.get(253), Rgb::grey(28));
        assert_eq!(palette.get(254), Rgb::grey(63));
    }

    #[test]
    fn test_reserved_cannot_overwrite_swatch() {
        let mut palette = build_palette(17, &[1.0, 0.5, 0.25]).unwrap();
        assert_eq!(
            palette.reserve(10, Rgb::grey(1)),
            Err(PaletteError::ReservedOverlap {
                index: 10,
                first_free: 52
            })
        );
        assert_eq!(
            palette.reserve(256, Rgb::grey(1)),
            Err(PaletteError::ReservedOutOfRange(256))
        );
        assert!(palette.reserve(52, Rgb::grey(1)).is_ok());
    }

    #[test]
    fn test_too_many_entries_fails() {
        let err = build_palette(100, &[1.0, 0.5, 0.25]).unwrap_err();
        assert_eq!(
            err,
            StarfieldError::PaletteAllocation(PaletteError::TooManyEntries {
                required: 301,
                capacity: 256
            })
        );
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            build_palette(0, &[1.0]),
            Err(StarfieldError::PaletteAllocation(PaletteError::NoShades))
        ));
        assert!(matches!(
            build_palette(17, &[]),
            Err(StarfieldError::PaletteAllocation(PaletteError::NoLuminances))
        ));
        assert!(matches!(
            build_palette(17, &[1.5]),
            Err(StarfieldError::PaletteAllocation(PaletteError::InvalidLuminance(_)))
        ));
    }

    #[test]
    fn test_hue_to_color_index_monotonic_and_bounded() {
        let spec = PaletteSpec::default();
        let mut previous = 0u8;
        for bucket in 0..64 {
            let index = spec.hue_to_color_index(bucket);
            assert!(index >= previous, "bucket {bucket} went backwards");
            assert!(
                (index as usize) + spec.luminances.len() <= spec.populated_end(),
                "bucket {bucket} -> {index} leaves the swatches"
            );
            previous = index;
        }
        assert_eq!(spec.hue_to_color_index(0), 1);
        assert_eq!(spec.hue_to_color_index(16), 1 + 16 * 3);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb8(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb8(120.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb8(240.0, 1.0, 1.0), [0, 0, 255]);
        assert_eq!(hsv_to_rgb8(60.0, 0.0, 1.0), [255, 255, 255]);
        assert_eq!(hsv_to_rgb8(300.0, 1.0, 0.0), [0, 0, 0]);
    }

    #[test]
    fn test_rgba8_expands_full_range() {
        assert_eq!(Rgb::grey(MAX_CHANNEL).to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Rgb::BLACK.to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_spec_roundtrips_through_ron() {
        let spec = PaletteSpec::default();
        let text = ron::to_string(&spec).unwrap();
        let back: PaletteSpec = ron::from_str(&text).unwrap();
        assert_eq!(spec, back);
    }
}
