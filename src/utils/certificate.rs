// src/utils/certificate.rs

use chrono::{Datelike, Utc};
use rand::Rng;

use crate::error::AppError;

/// Generates a certificate id of the form `UC-<6 random digits>-<year>`.
/// Uniqueness relies on negligible collision probability; it is not checked.
pub fn generate_certificate_id() -> String {
    let digits: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("UC-{:06}-{}", digits, Utc::now().year())
}

/// Boundary to the external document renderer. Returns the URL of the
/// synthesized certificate artifact. Callers treat failures here as
/// non-fatal: the certification record is already persisted.
pub fn render_certificate(certificate_id: &str) -> Result<String, AppError> {
    Ok(format!("/certificates/{}.pdf", certificate_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_id_format() {
        let id = generate_certificate_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "UC");
        assert_eq!(parts[1].len(), 6);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2], Utc::now().year().to_string());
    }

    #[test]
    fn certificate_url_embeds_id() {
        let url = render_certificate("UC-123456-2026").unwrap();
        assert_eq!(url, "/certificates/UC-123456-2026.pdf");
    }
}
