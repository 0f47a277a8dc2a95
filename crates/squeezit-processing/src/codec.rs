//! Transcoder backed by the `image` crate for decoding and for the lossless
//! and default-quality encoders, mozjpeg for JPEG, libwebp for WebP and ravif
//! for AVIF.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat};
use squeezit_core::Format;

use crate::quality::EncodeQuality;
use crate::transcoder::{TranscodeError, Transcoder};

/// AVIF encoder speed (1-10); higher is faster with larger output.
const AVIF_SPEED: u8 = 6;

/// Largest width or height libwebp accepts
const WEBP_MAX_DIMENSION: u32 = 16383;

/// Largest width or height a JPEG frame header can hold
const JPEG_MAX_DIMENSION: u32 = 65535;

/// Detect the format of an encoded buffer from its magic bytes.
pub fn sniff_format(data: &[u8]) -> Option<Format> {
    match image::guess_format(data).ok()? {
        ImageFormat::Jpeg => Some(Format::Jpeg),
        ImageFormat::Png => Some(Format::Png),
        ImageFormat::WebP => Some(Format::Webp),
        ImageFormat::Avif => Some(Format::Avif),
        ImageFormat::Gif => Some(Format::Gif),
        ImageFormat::Tiff => Some(Format::Tiff),
        ImageFormat::Bmp => Some(Format::Bmp),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTranscoder;

impl ImageTranscoder {
    pub fn new() -> Self {
        Self
    }

    /// Refuse images the target encoder cannot represent. mozjpeg panics on
    /// errors instead of returning them, so these are caught up front.
    fn check_dimensions(img: &DynamicImage, target: Format) -> Result<(), TranscodeError> {
        let limit = match target {
            Format::Webp => WEBP_MAX_DIMENSION,
            Format::Jpeg => JPEG_MAX_DIMENSION,
            _ => return Ok(()),
        };
        let (width, height) = img.dimensions();
        if width > limit || height > limit {
            return Err(TranscodeError::Encode {
                format: target,
                message: format!(
                    "Image is {}x{}, larger than the {}px {} limit",
                    width, height, limit, target
                ),
            });
        }
        Ok(())
    }

    fn encode(img: &DynamicImage, target: Format) -> Result<Vec<u8>, TranscodeError> {
        Self::check_dimensions(img, target)?;
        let quality = EncodeQuality::for_format(target);
        match (target, quality) {
            (Format::Jpeg, EncodeQuality::Lossy(q)) => Self::encode_jpeg(img, q),
            (Format::Webp, EncodeQuality::Lossy(q)) => Self::encode_webp(img, q),
            (Format::Avif, EncodeQuality::Lossy(q)) => Self::encode_avif(img, q),
            (Format::Png, _) => Self::write_with_image(img, ImageFormat::Png, target),
            (Format::Gif, _) => Self::write_with_image(
                &DynamicImage::ImageRgba8(img.to_rgba8()),
                ImageFormat::Gif,
                target,
            ),
            (Format::Tiff, _) => Self::write_with_image(img, ImageFormat::Tiff, target),
            (Format::Bmp, _) => Self::write_with_image(
                &DynamicImage::ImageRgba8(img.to_rgba8()),
                ImageFormat::Bmp,
                target,
            ),
            (other, _) => Err(TranscodeError::UnsupportedEncoder(other)),
        }
    }

    fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, TranscodeError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let encode_err = |e: std::io::Error| TranscodeError::Encode {
            format: Format::Jpeg,
            message: e.to_string(),
        };

        let mut comp = comp.start_compress(Vec::new()).map_err(encode_err)?;
        comp.write_scanlines(&rgb_img).map_err(encode_err)?;
        comp.finish().map_err(encode_err)
    }

    fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, TranscodeError> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let encoded = encoder
            .encode_simple(false, quality)
            .map_err(|e| TranscodeError::Encode {
                format: Format::Webp,
                message: format!("{:?}", e),
            })?;
        Ok(encoded.to_vec())
    }

    fn encode_avif(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, TranscodeError> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let pixels: Vec<rgb::RGBA8> = rgba_img
            .as_raw()
            .chunks_exact(4)
            .map(|px| rgb::RGBA8::new(px[0], px[1], px[2], px[3]))
            .collect();
        let buffer = ravif::Img::new(pixels.as_slice(), width as usize, height as usize);

        let encoded = ravif::Encoder::new()
            .with_quality(quality)
            .with_speed(AVIF_SPEED)
            .encode_rgba(buffer)
            .map_err(|e| TranscodeError::Encode {
                format: Format::Avif,
                message: e.to_string(),
            })?;

        Ok(encoded.avif_file)
    }

    fn write_with_image(
        img: &DynamicImage,
        image_format: ImageFormat,
        target: Format,
    ) -> Result<Vec<u8>, TranscodeError> {
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, image_format)
            .map_err(|e| TranscodeError::Encode {
                format: target,
                message: e.to_string(),
            })?;
        Ok(cursor.into_inner())
    }
}

impl Transcoder for ImageTranscoder {
    fn transcode(&self, input: &[u8], target: Format) -> Result<Vec<u8>, TranscodeError> {
        if target == Format::Heic {
            return Err(TranscodeError::UnsupportedEncoder(target));
        }
        if input.is_empty() {
            return Err(TranscodeError::EmptyInput);
        }

        let img =
            image::load_from_memory(input).map_err(|e| TranscodeError::Decode(e.to_string()))?;

        tracing::debug!(
            source = ?sniff_format(input),
            target = %target,
            width = img.width(),
            height = img.height(),
            "Decoded image"
        );

        Self::encode(&img, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(32, 24, |x, y| {
            Rgba([(x * 8) as u8, (y * 10) as u8, 128, 255])
        });
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format(&sample_png()), Some(Format::Png));
        assert_eq!(sniff_format(b"not an image"), None);
    }

    #[test]
    fn test_png_to_jpeg() {
        let out = ImageTranscoder::new()
            .transcode(&sample_png(), Format::Jpeg)
            .unwrap();
        assert_eq!(&out[..2], &[0xFF, 0xD8]);
        assert_eq!(sniff_format(&out), Some(Format::Jpeg));
    }

    #[test]
    fn test_png_to_webp() {
        let out = ImageTranscoder::new()
            .transcode(&sample_png(), Format::Webp)
            .unwrap();
        assert_eq!(&out[..4], b"RIFF");
        assert_eq!(&out[8..12], b"WEBP");
    }

    #[test]
    fn test_png_to_avif() {
        let out = ImageTranscoder::new()
            .transcode(&sample_png(), Format::Avif)
            .unwrap();
        assert_eq!(&out[4..8], b"ftyp");
    }

    #[test]
    fn test_default_quality_targets() {
        let transcoder = ImageTranscoder::new();
        let input = sample_png();

        let gif = transcoder.transcode(&input, Format::Gif).unwrap();
        assert_eq!(&gif[..4], b"GIF8");

        let bmp = transcoder.transcode(&input, Format::Bmp).unwrap();
        assert_eq!(&bmp[..2], b"BM");

        let tiff = transcoder.transcode(&input, Format::Tiff).unwrap();
        assert_eq!(sniff_format(&tiff), Some(Format::Tiff));

        let png = transcoder.transcode(&input, Format::Png).unwrap();
        assert_eq!(sniff_format(&png), Some(Format::Png));
    }

    #[test]
    fn test_round_trip_through_jpeg_keeps_dimensions() {
        let transcoder = ImageTranscoder::new();
        let jpeg = transcoder.transcode(&sample_png(), Format::Jpeg).unwrap();
        let webp = transcoder.transcode(&jpeg, Format::Webp).unwrap();
        let decoded = image::load_from_memory(&webp).unwrap();
        assert_eq!(decoded.dimensions(), (32, 24));
    }

    fn wide_png(width: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, 1, Rgba([10, 20, 30, 255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_oversized_webp_is_an_encode_error() {
        let err = ImageTranscoder::new()
            .transcode(&wide_png(16384), Format::Webp)
            .unwrap_err();
        assert!(matches!(
            err,
            TranscodeError::Encode {
                format: Format::Webp,
                ..
            }
        ));
    }

    #[test]
    fn test_webp_at_dimension_limit_encodes() {
        let out = ImageTranscoder::new()
            .transcode(&wide_png(16383), Format::Webp)
            .unwrap();
        assert_eq!(&out[..4], b"RIFF");
    }

    #[test]
    fn test_oversized_jpeg_is_an_encode_error() {
        let err = ImageTranscoder::new()
            .transcode(&wide_png(65536), Format::Jpeg)
            .unwrap_err();
        assert!(matches!(
            err,
            TranscodeError::Encode {
                format: Format::Jpeg,
                ..
            }
        ));
    }

    #[test]
    fn test_heic_has_no_encoder() {
        let err = ImageTranscoder::new()
            .transcode(&sample_png(), Format::Heic)
            .unwrap_err();
        assert!(matches!(err, TranscodeError::UnsupportedEncoder(Format::Heic)));
    }

    #[test]
    fn test_garbage_input_fails_to_decode() {
        let transcoder = ImageTranscoder::new();
        assert!(matches!(
            transcoder.transcode(b"definitely not pixels", Format::Png),
            Err(TranscodeError::Decode(_))
        ));
        assert!(matches!(
            transcoder.transcode(&[], Format::Png),
            Err(TranscodeError::EmptyInput)
        ));
    }
}
