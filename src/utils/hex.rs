/// Clean a hex string by removing "0x" prefix and whitespace
pub fn clean_hex(s: &str) -> &str {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x") {
        stripped
    } else {
        s
    }
}

pub fn is_hex_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Normalise a private key to the `0x`-prefixed 64-hex-char form.
pub fn normalize_private_key(raw: &str) -> Option<String> {
    let body = clean_hex(raw);
    if body.len() != 64 || !is_hex_digits(body) {
        return None;
    }
    Some(format!("0x{body}"))
}
