use rand::Rng;

pub const CARD_PREFIX: &str = "CARD";
pub const SPACE_PREFIX: &str = "SPACE";
pub const CONTENT_PREFIX: &str = "CONTENT";
pub const FILE_PREFIX: &str = "FILE";

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a string identifier of the form `<PREFIX>_<unix millis>_<9 base36 chars>`.
pub fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{prefix}_{millis}_{suffix}")
}
