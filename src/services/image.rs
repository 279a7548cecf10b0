use crate::models::ThumbnailFormat;
use anyhow::{bail, Result};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

pub fn decode_image(data: &[u8], mime_type: &str) -> Result<DynamicImage> {
    let format = match mime_type {
        "image/jpeg" => ImageFormat::Jpeg,
        "image/png" => ImageFormat::Png,
        "image/gif" => ImageFormat::Gif,
        "image/webp" => ImageFormat::WebP,
        _ => bail!("Unsupported image format: {}", mime_type),
    };
    Ok(image::load_from_memory_with_format(data, format)?)
}

/// Resizes to an exact square box with a cover/center-crop fit and encodes in
/// the requested format. Returns the encoded bytes and final dimensions.
pub fn cover_thumbnail(
    img: &DynamicImage,
    box_px: u32,
    format: ThumbnailFormat,
    quality: u8,
) -> Result<(Vec<u8>, u32, u32)> {
    let thumbnail = img.resize_to_fill(box_px, box_px, image::imageops::FilterType::Lanczos3);
    let (width, height) = thumbnail.dimensions();

    let bytes = encode_image(&thumbnail, format, quality)?;
    Ok((bytes, width, height))
}

pub fn encode_image(img: &DynamicImage, format: ThumbnailFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        ThumbnailFormat::Webp => encode_webp(img),
        ThumbnailFormat::Jpeg => {
            let mut buffer = Cursor::new(Vec::new());
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
            img.write_with_encoder(encoder)?;
            Ok(buffer.into_inner())
        }
        ThumbnailFormat::Png => {
            let mut buffer = Cursor::new(Vec::new());
            img.write_to(&mut buffer, ImageFormat::Png)?;
            Ok(buffer.into_inner())
        }
    }
}

fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut buffer = Cursor::new(Vec::new());
    let encoder = WebPEncoder::new_lossless(&mut buffer);
    encoder.encode(&rgba, width, height, image::ExtendedColorType::Rgba8)?;

    Ok(buffer.into_inner())
}
