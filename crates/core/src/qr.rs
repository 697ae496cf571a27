//! QR card payloads.
//!
//! Each printed kit card carries a QR code pointing at the activation page
//! with the key pre-filled. Codes use the highest error-correction level so a
//! scuffed card still scans.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use url::Url;

use crate::types::LicenseKey;

/// QR error-correction level used for printed cards.
pub const ERROR_CORRECTION: EcLevel = EcLevel::H;

/// Smallest rendered side of a card's code, in pixels.
pub const CARD_SIZE_PX: u32 = 240;

const DARK: &str = "#111827";
const LIGHT: &str = "#ffffff";

/// Path of the activation page.
pub const ACTIVATION_PATH: &str = "/kit_activation";

/// Query parameter carrying the key.
pub const KEY_PARAM: &str = "key";

#[derive(thiserror::Error, Debug)]
pub enum QrError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("base url cannot carry a path: {0}")]
    CannotBeABase(String),
    #[error("payload cannot be encoded as a QR code: {0}")]
    Encode(qrcode::types::QrError),
}

/// A printable card: the activation URL and its QR code as inline SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCard {
    pub payload: String,
    pub svg: String,
}

/// Build the activation URL encoded in a card's QR code.
///
/// `key` is taken verbatim so that admin records which are not canonical
/// still produce a card.
///
/// ```
/// use atribot_core::qr::activation_payload;
///
/// let payload = activation_payload("https://www.atribot.in", "AB12-CD34-EF56-GH01").unwrap();
/// assert_eq!(payload, "https://www.atribot.in/kit_activation?key=AB12-CD34-EF56-GH01");
/// ```
///
/// # Errors
///
/// Returns [`QrError`] if `base_url` does not parse as an absolute URL.
pub fn activation_payload(base_url: &str, key: &str) -> Result<String, QrError> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(QrError::CannotBeABase(base_url.to_owned()));
    }
    url.set_path(ACTIVATION_PATH);
    url.set_query(None);
    url.query_pairs_mut().append_pair(KEY_PARAM, key);
    Ok(url.into())
}

/// Payload for a canonical key.
///
/// # Errors
///
/// Returns [`QrError`] if `base_url` is invalid.
pub fn payload_for_key(base_url: &str, key: &LicenseKey) -> Result<String, QrError> {
    activation_payload(base_url, key.as_str())
}

/// Single-letter name of [`ERROR_CORRECTION`], as printed on cards.
#[must_use]
pub const fn error_correction_label() -> char {
    match ERROR_CORRECTION {
        EcLevel::L => 'L',
        EcLevel::M => 'M',
        EcLevel::Q => 'Q',
        EcLevel::H => 'H',
    }
}

/// Encode `payload` at [`ERROR_CORRECTION`].
///
/// # Errors
///
/// Returns [`QrError::Encode`] if the payload does not fit in a QR code.
pub fn encode(payload: &str) -> Result<QrCode, QrError> {
    QrCode::with_error_correction_level(payload, ERROR_CORRECTION).map_err(QrError::Encode)
}

/// Render `payload` as an `<svg>` element ready to inline in HTML.
///
/// # Errors
///
/// Returns [`QrError::Encode`] if the payload does not fit in a QR code.
pub fn render_svg(payload: &str) -> Result<String, QrError> {
    let mut image = encode(payload)?
        .render::<svg::Color<'_>>()
        .min_dimensions(CARD_SIZE_PX, CARD_SIZE_PX)
        .dark_color(svg::Color(DARK))
        .light_color(svg::Color(LIGHT))
        .build();

    // The renderer emits a standalone document; HTML only wants the element.
    if let Some(start) = image.find("<svg") {
        image.drain(..start);
    }
    Ok(image)
}

/// Build the card for `key` printed against `base_url`.
///
/// # Errors
///
/// Returns [`QrError`] if `base_url` is invalid or the payload cannot be
/// encoded.
pub fn card_for(base_url: &str, key: &str) -> Result<QrCard, QrError> {
    let payload = activation_payload(base_url, key)?;
    let svg = render_svg(&payload)?;
    Ok(QrCard { payload, svg })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_replaces_existing_path() {
        let payload = activation_payload("http://localhost:3000/some/page?x=1", "AB12").unwrap();
        assert_eq!(payload, "http://localhost:3000/kit_activation?key=AB12");
    }

    #[test]
    fn test_payload_encodes_unsafe_characters() {
        let payload = activation_payload("https://www.atribot.in", "A B&C").unwrap();
        assert_eq!(payload, "https://www.atribot.in/kit_activation?key=A+B%26C");
    }

    #[test]
    fn test_payload_rejects_relative_base() {
        assert!(matches!(
            activation_payload("www.atribot.in", "AB12"),
            Err(QrError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            activation_payload("mailto:team@atribot.in", "AB12"),
            Err(QrError::CannotBeABase(_))
        ));
    }

    #[test]
    fn test_payload_for_key() {
        let key = LicenseKey::parse("ab12cd34ef56gh02").unwrap();
        let payload = payload_for_key("https://www.atribot.in/", &key).unwrap();
        assert!(payload.ends_with("?key=AB12-CD34-EF56-GH02"));
    }

    #[test]
    fn test_codes_use_high_error_correction() {
        let code = encode("https://www.atribot.in/kit_activation?key=AB12-CD34-EF56-GH01").unwrap();
        assert_eq!(code.error_correction_level(), EcLevel::H);
        assert_eq!(error_correction_label(), 'H');
    }

    #[test]
    fn test_card_carries_inline_svg() {
        let card = card_for("https://www.atribot.in", "AB12-CD34-EF56-GH03").unwrap();
        assert_eq!(
            card.payload,
            "https://www.atribot.in/kit_activation?key=AB12-CD34-EF56-GH03"
        );
        assert!(card.svg.starts_with("<svg"));
        assert!(card.svg.trim_end().ends_with("</svg>"));
        assert!(card.svg.contains(DARK));
    }

    #[test]
    fn test_oversized_payload_is_refused() {
        let huge = "A".repeat(8_000);
        assert!(matches!(render_svg(&huge), Err(QrError::Encode(_))));
    }
}
