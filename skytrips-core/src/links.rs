use rand::distributions::Alphanumeric;
use rand::Rng;

pub const RESULTS_PATH: &str = "/flights-results";
pub const SHORT_LINK_PREFIX: &str = "/s/";
pub const SHORT_HASH_LEN: usize = 8;

/// `/flights-results?q=<token>`. The token must come from the codec, which
/// never emits characters that need escaping.
pub fn results_path(token: &str) -> String {
    format!("{}?q={}", RESULTS_PATH, token)
}

pub fn short_path(hash: &str) -> String {
    format!("{}{}", SHORT_LINK_PREFIX, hash)
}

pub fn generate_short_hash() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_HASH_LEN)
        .map(char::from)
        .collect()
}

pub fn is_valid_short_hash(hash: &str) -> bool {
    (4..=32).contains(&hash.len()) && hash.bytes().all(|b| b.is_ascii_alphanumeric())
}
