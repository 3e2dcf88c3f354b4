use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use png::{Encoder, chunk::ChunkType};

use cubetrace_render::Framebuffer;

/// Writes the contents of `framebuffer` to a new PNG file at `path`, top row first.
pub fn write_png(path: &Path, framebuffer: &Framebuffer) -> Result<(), std::io::Error> {
    let file = File::create(path)?;
    let mut buf_writer = BufWriter::new(file);
    write_png_to(&mut buf_writer, framebuffer)?;
    let file = buf_writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

fn write_png_to<W: Write>(writer: W, framebuffer: &Framebuffer) -> Result<(), std::io::Error> {
    let size = framebuffer.size();
    let mut png_encoder = Encoder::new(writer, size.width, size.height);
    png_encoder.set_color(png::ColorType::Rgba);
    png_encoder.set_depth(png::BitDepth::Eight);
    png_encoder.set_compression(png::Compression::Best);
    let mut png_writer = png_encoder.write_header()?;
    write_color_metadata(&mut png_writer)?;
    png_writer.write_image_data(&framebuffer.to_rgba_top_down())?;
    png_writer.finish()?;
    Ok(())
}

fn write_color_metadata<W: Write>(png_writer: &mut png::Writer<W>) -> Result<(), std::io::Error> {
    // Values from http://www.libpng.org/pub/png/spec/1.2/PNG-Chunks.html#C.sRGB

    // Write sRGB chunk to declare that the image is sRGB.
    png_writer.write_chunk(ChunkType(*b"sRGB"), &[0])?;
    // Write compatibility gamma information
    png_writer.write_chunk(ChunkType(*b"gAMA"), &45455_u32.to_be_bytes())?;
    // Write compatibility chromaticity information
    png_writer.write_chunk(
        ChunkType(*b"cHRM"),
        &[
            31270, // White Point x
            32900, // White Point y
            64000, // Red x
            33000, // Red y
            30000, // Green x
            60000, // Green y
            15000, // Blue x
            6000,  // Blue y
        ]
        .into_iter()
        .flat_map(u32::to_be_bytes)
        .collect::<Vec<u8>>(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubetrace::math::ImageSize;
    use pretty_assertions::assert_eq;

    /// Reads back a file with the decoder half of the `png` crate.
    fn read_png(path: &Path) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(File::open(path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        let info_chunk = reader.info();
        assert!(info_chunk.srgb.is_some(), "missing sRGB chunk");
        assert!(info_chunk.source_gamma.is_some(), "missing gAMA chunk");
        assert!(info_chunk.source_chromaticities.is_some(), "missing cHRM chunk");
        (info, buf)
    }

    #[test]
    fn writes_top_row_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        // An unrendered framebuffer is transparent black.
        let framebuffer = Framebuffer::new(ImageSize::new(3, 2)).unwrap();

        write_png(&path, &framebuffer).unwrap();

        let (info, data) = read_png(&path);
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(data, framebuffer.to_rgba_top_down());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let framebuffer = Framebuffer::new(ImageSize::new(1, 1)).unwrap();
        let error = write_png(&dir.path().join("no/such/dir.png"), &framebuffer).unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
    }
}
