//! URLs derived from a link target: its domain, a favicon and QR images.
//! Image generation itself is done by third-party services.

use url::Url;

// ───── Body ─────────────────────────────────────────────────────────────── //

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";
const QR_CODE_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Host of `url` without a leading `www.`, `None` when it does not parse.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{FAVICON_SERVICE}?domain={host}&sz=64"))
}

/// Image URL of a 300x300 QR code pointing to `profile_url`.
pub fn qr_code_url(profile_url: &str) -> String {
    format!(
        "{QR_CODE_SERVICE}?size=300x300&data={}",
        urlencoding::encode(profile_url)
    )
}

// ───── Unit tests ───────────────────────────────────────────────────────── //
