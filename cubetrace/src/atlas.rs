//! [`TextureAtlas`]: material colors looked up in an image of 16×16 tiles.

use std::fs;
use std::io;
use std::path::Path;

use crate::material::Material;
use crate::math::{FreePoint, Rgba, fract_positive};
use crate::sampler::{MaterialSampler, Side};

/// Edge length of one tile of a [`TextureAtlas`], in texels.
pub const TILE_SIZE: u32 = 16;

/// Errors from loading a [`TextureAtlas`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AtlasError {
    /// The file could not be read.
    #[error("failed to load texture atlas")]
    Io(#[from] io::Error),
    /// The data is not a valid PNG image.
    #[error("failed to load texture atlas")]
    Decode(#[from] png::DecodingError),
    /// The image is not 8-bit RGBA.
    #[error("texture atlas must have 4 color components (found {color_type:?} at {bit_depth:?})")]
    NotRgba8 {
        /// Color type of the image as decoded.
        color_type: png::ColorType,
        /// Bit depth of the image as decoded.
        bit_depth: png::BitDepth,
    },
    /// The image does not contain every tile the layout refers to.
    #[error("texture atlas is {width}×{height} but must be at least {min_width}×{min_height}")]
    TooSmall {
        /// Width of the image.
        width: u32,
        /// Height of the image.
        height: u32,
        /// Minimum width required.
        min_width: u32,
        /// Minimum height required.
        min_height: u32,
    },
}

/// A [`MaterialSampler`] reading from an RGBA image in which each material's top, side,
/// and bottom faces have a [`TILE_SIZE`]-texel square tile.
///
/// Texels are used as-is, without filtering; transparent texels let light through.
#[derive(Clone, PartialEq)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    /// Rows from top to bottom, 4 bytes per texel.
    data: Box<[u8]>,
}

impl TextureAtlas {
    /// Reads an atlas from a PNG file.
    pub fn from_path(path: &Path) -> Result<Self, AtlasError> {
        Self::from_reader(io::BufReader::new(fs::File::open(path)?))
    }

    /// Decodes an atlas from PNG data.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, AtlasError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::EXPAND);
        let mut reader = decoder.read_info()?;
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer)?;
        if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
            return Err(AtlasError::NotRgba8 {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }
        buffer.truncate(info.buffer_size());

        let (min_width, min_height) = required_size();
        if info.width < min_width || info.height < min_height {
            return Err(AtlasError::TooSmall {
                width: info.width,
                height: info.height,
                min_width,
                min_height,
            });
        }

        log::debug!(
            "loaded texture atlas of {}×{} texels",
            info.width,
            info.height
        );
        Ok(Self {
            width: info.width,
            height: info.height,
            data: buffer.into_boxed_slice(),
        })
    }

    /// Size of the image, in texels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn texel(&self, x: u32, y: u32) -> Rgba {
        let index = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(index..index + 4) {
            Some(&[r, g, b, a]) => Rgba::from_u8([r, g, b, a]),
            _ => Rgba::TRANSPARENT,
        }
    }
}

impl MaterialSampler for TextureAtlas {
    fn sample(&self, material: Material, side: Side, point: FreePoint) -> Rgba {
        if material.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let u = fract_positive(point.x);
        let v = 1.0 - fract_positive(point.y);
        let w = fract_positive(point.z);
        // Which pair of coordinates varies across the face depends on its orientation.
        let (s, t) = match side {
            Side::Top | Side::Bottom => (u, w),
            Side::Side if u == 0.0 => (w, v),
            Side::Side if w == 0.0 => (u, v),
            Side::Side => (u, w),
        };
        let (tile_x, tile_y) = tile_origin(material, side);
        let texel_offset = |c: f64| ((c * f64::from(TILE_SIZE)) as u32).min(TILE_SIZE - 1);
        self.texel(tile_x + texel_offset(s), tile_y + texel_offset(t))
    }
}

impl std::fmt::Debug for TextureAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAtlas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Texel coordinates of the upper-left corner of the tile for a material's side.
fn tile_origin(material: Material, side: Side) -> (u32, u32) {
    use Material::*;
    match (material, side) {
        (Dirt, Side::Side) => (48, 0),
        (Dirt, Side::Bottom) => (32, 0),
        (Log, Side::Side) => (64, 16),
        (Air | Dirt, _) => (0, 0),
        (Stone, _) => (16, 0),
        (Coal, _) => (32, 32),
        (Iron, _) => (16, 32),
        (Gold, _) => (0, 32),
        (Diamond, _) => (32, 48),
        (Log, _) => (80, 16),
        (Leaf, _) => (64, 48),
        (Water, _) => (64, 0),
        (Sand, _) => (32, 16),
        (Glass, _) => (16, 48),
        (Obsidian, _) => (80, 32),
        (Quartz, _) => (32, 64),
        (Bedrock, _) => (16, 16),
    }
}

/// Smallest image which contains every tile.
fn required_size() -> (u32, u32) {
    Material::all()
        .flat_map(|m| [Side::Top, Side::Side, Side::Bottom].map(|side| tile_origin(m, side)))
        .fold((0, 0), |(w, h), (x, y)| {
            (w.max(x + TILE_SIZE), h.max(y + TILE_SIZE))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Encodes an image whose every tile is filled with a color derived from its position.
    fn encode_test_atlas(color_type: png::ColorType, width: u32, height: u32) -> Vec<u8> {
        let components = match color_type {
            png::ColorType::Rgba => 4,
            _ => 3,
        };
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let pixel = [(x / TILE_SIZE * 40) as u8, (y / TILE_SIZE * 40) as u8, 7, 255];
                data.extend_from_slice(&pixel[..components]);
            }
        }
        let mut png_bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_bytes, width, height);
            encoder.set_color(color_type);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&data).unwrap();
        }
        png_bytes
    }

    #[test]
    fn required_size_covers_layout() {
        assert_eq!(required_size(), (96, 80));
    }

    #[test]
    fn sample_chooses_tile_by_side() {
        let atlas =
            TextureAtlas::from_reader(&encode_test_atlas(png::ColorType::Rgba, 96, 80)[..])
                .unwrap();
        let top = atlas.sample(Material::Dirt, Side::Top, FreePoint::new(3.5, 2.0, 4.5));
        let side = atlas.sample(Material::Dirt, Side::Side, FreePoint::new(3.0, 2.5, 4.5));
        let bottom = atlas.sample(Material::Dirt, Side::Bottom, FreePoint::new(3.5, 2.0, 4.5));
        assert_eq!(top, Rgba::from_u8([0, 0, 7, 255]));
        assert_eq!(side, Rgba::from_u8([120, 0, 7, 255]));
        assert_eq!(bottom, Rgba::from_u8([80, 0, 7, 255]));

        let quartz = atlas.sample(Material::Quartz, Side::Side, FreePoint::new(0.25, 0.5, 9.0));
        assert_eq!(quartz, Rgba::from_u8([80, 160, 7, 255]));
    }

    #[test]
    fn rejects_rgb() {
        let error = TextureAtlas::from_reader(&encode_test_atlas(png::ColorType::Rgb, 96, 80)[..])
            .unwrap_err();
        assert!(matches!(error, AtlasError::NotRgba8 { .. }), "{error:?}");
        assert!(error.to_string().starts_with("texture atlas must have 4 color components"));
    }

    #[test]
    fn rejects_small() {
        let error =
            TextureAtlas::from_reader(&encode_test_atlas(png::ColorType::Rgba, 32, 32)[..])
                .unwrap_err();
        assert!(matches!(error, AtlasError::TooSmall { .. }), "{error:?}");
    }

    #[test]
    fn rejects_garbage() {
        let error = TextureAtlas::from_reader(&b"not a png"[..]).unwrap_err();
        assert!(matches!(error, AtlasError::Decode(_)), "{error:?}");
    }
}
