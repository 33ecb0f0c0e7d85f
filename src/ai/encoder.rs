//! Conversion between raw image bytes and the encodings the model service
//! exchanges: bare base64 for request parts, PNG data-URLs for results.

use crate::models::{EncodedImage, ImageAsset, PNG_MIME};
use crate::{Error, Result};
use base64::Engine as _;

/// Encode an asset for transport.
///
/// The MIME type is `mime_override` when given, else the asset's own type,
/// else PNG. Bytes are not validated.
pub fn encode_image(asset: &ImageAsset, mime_override: Option<&str>) -> EncodedImage {
    let mime_type = mime_override
        .or(asset.mime_type.as_deref())
        .unwrap_or(PNG_MIME)
        .to_string();

    EncodedImage {
        data: base64::engine::general_purpose::STANDARD.encode(&asset.bytes),
        mime_type,
    }
}

/// Wrap base64 image data as a PNG data-URL, whatever type it was declared
/// as. Results are always framed as PNG so alpha is honored when rendered.
pub fn to_png_data_url(base64_data: &str) -> String {
    format!("data:{};base64,{}", PNG_MIME, base64_data)
}

/// Split a base64 data-URL into its MIME type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidInput("Not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput("Data URL has no payload".to_string()))?;
    let mime_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidInput("Data URL is not base64 encoded".to_string()))?;

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    Ok((mime_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let asset = ImageAsset::new(vec![1, 2, 3], "image/jpeg");
        let encoded = encode_image(&asset, Some("image/png"));
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(encoded.data, "AQID");
    }

    #[test]
    fn test_source_mime_used_without_override() {
        let asset = ImageAsset::new(vec![0xFF, 0xD8], "image/webp");
        assert_eq!(encode_image(&asset, None).mime_type, "image/webp");
    }

    #[test]
    fn test_untyped_blob_defaults_to_png() {
        let asset = ImageAsset::from_bytes(b"not really an image".to_vec());
        let encoded = encode_image(&asset, None);
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&encoded.data)
                .unwrap(),
            b"not really an image"
        );
    }

    #[test]
    fn test_png_data_url_prefix() {
        assert_eq!(to_png_data_url("AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_decode_data_url() {
        let (mime, bytes) = decode_data_url("data:image/png;base64,AQID").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_data_url_rejects_other_shapes() {
        assert!(matches!(
            decode_data_url("https://example.com/a.png"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decode_data_url("data:text/plain,hello"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(Error::Decode(_))
        ));
    }
}
