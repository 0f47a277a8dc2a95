use squeezit_core::Format;

/// Encoder settings used for a target format. Quality is fixed per format and
/// never chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeQuality {
    /// Lossy encoder quality (0-100)
    Lossy(f32),
    /// Lossless encoding at the codec's default compression level
    Lossless,
    /// Whatever the codec does when given no options
    CodecDefault,
}

impl EncodeQuality {
    pub fn for_format(format: Format) -> Self {
        match format {
            Format::Jpeg => EncodeQuality::Lossy(80.0),
            Format::Png => EncodeQuality::Lossless,
            Format::Webp => EncodeQuality::Lossy(80.0),
            Format::Avif => EncodeQuality::Lossy(50.0),
            Format::Heic => EncodeQuality::Lossy(80.0),
            Format::Gif | Format::Tiff | Format::Bmp => EncodeQuality::CodecDefault,
        }
    }
}
