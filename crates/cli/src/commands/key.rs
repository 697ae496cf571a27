//! License key commands.
//!
//! # Environment Variables
//!
//! - `ATRIBOT_QR_BASE_URL` - Site encoded into QR payloads (default: <https://www.atribot.in>)

use atribot_core::admission::check_license_key;
use atribot_core::inventory::generate_records;
use atribot_core::qr::{error_correction_label, payload_for_key, render_svg};
use atribot_core::{LevelId, LicenseKey, format_license_key};

use super::CommandError;

const DEFAULT_QR_BASE_URL: &str = "https://www.atribot.in";

/// Normalize a key. Never fails; short input gives a short key.
pub fn format(raw: &str) -> String {
    format_license_key(raw)
}

/// Check a key against the demo admission table.
pub fn check(raw: &str) -> Result<String, CommandError> {
    let level = check_license_key(raw)?;
    tracing::info!(level = %level, "Key admitted");
    Ok(format!(
        "{}: Level {} ({})",
        format_license_key(raw),
        level.number(),
        level.name()
    ))
}

/// Generate `count` random keys for `level`, one per line.
pub fn generate(level: LevelId, count: u32) -> Result<String, CommandError> {
    let today = chrono::Utc::now().date_naive();
    let records = generate_records(level, count, today, &mut rand::rng())?;
    tracing::info!(level = %level, count = records.len(), "Keys generated");

    Ok(records
        .iter()
        .map(|r| r.key.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// QR payload for a key, with its error-correction level.
///
/// With `svg`, the printable code is emitted instead.
pub fn qr(raw: &str, base_url: Option<String>, svg: bool) -> Result<String, CommandError> {
    let key = LicenseKey::parse(raw)?;
    let base_url = base_url.unwrap_or_else(|| {
        dotenvy::dotenv().ok();
        std::env::var("ATRIBOT_QR_BASE_URL").unwrap_or_else(|_| DEFAULT_QR_BASE_URL.to_string())
    });

    let payload = payload_for_key(&base_url, &key)?;
    if svg {
        return Ok(render_svg(&payload)?);
    }
    Ok(format!(
        "{payload}\nerror correction: {}",
        error_correction_label()
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format("ab12 cd34"), "AB12-CD34");
    }

    #[test]
    fn test_check_known_key() {
        let out = check("ab12cd34ef56gh03").unwrap();
        assert_eq!(out, "AB12-CD34-EF56-GH03: Level 3 (Robot Explorer)");
    }

    #[test]
    fn test_check_rejects_unknown_and_short_keys() {
        assert!(matches!(
            check("ZZZZ-ZZZZ-ZZZZ-ZZZZ"),
            Err(CommandError::Admission(_))
        ));
        assert!(matches!(check("AB12"), Err(CommandError::Admission(_))));
    }

    #[test]
    fn test_generate_lines() {
        let out = generate(LevelId::Level2, 3).unwrap();
        let keys: Vec<&str> = out.lines().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| LicenseKey::parse(k).is_ok()));
    }

    #[test]
    fn test_generate_rejects_bad_batch() {
        assert!(matches!(
            generate(LevelId::Level1, 0),
            Err(CommandError::Inventory(_))
        ));
    }

    #[test]
    fn test_qr_with_explicit_base() {
        let out = qr("ab12cd34ef56gh01", Some("https://kits.example.com".to_string()), false).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("https://kits.example.com/kit_activation?key=AB12-CD34-EF56-GH01")
        );
        assert_eq!(lines.next(), Some("error correction: H"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_qr_svg_output() {
        let out = qr("ab12cd34ef56gh01", Some("https://kits.example.com".to_string()), true).unwrap();
        assert!(out.starts_with("<svg"));
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_qr_rejects_short_key() {
        assert!(matches!(
            qr("AB12", Some("https://kits.example.com".to_string()), false),
            Err(CommandError::Key(_))
        ));
    }
}
