pub mod fields;
pub mod info_client;
pub mod parse;

pub use info_client::{InfoClient, InfoClientError, DEFAULT_INFO_URL};

/// `0x` followed by 40 hex digits.
pub fn is_eth_address(s: &str) -> bool {
    let s = s.trim();
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Trim, lowercase, and validate an address.
pub fn normalize_address(s: &str) -> Option<String> {
    let addr = s.trim().to_lowercase();
    is_eth_address(&addr).then_some(addr)
}
