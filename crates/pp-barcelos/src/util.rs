/// Build the HTTP client used for webhook submissions.
pub fn default_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().gzip(true).brotli(true).build()
}

/// Upper-case base 36 digits, in value order.
pub(crate) const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode a number in upper-case base 36.
pub(crate) fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
