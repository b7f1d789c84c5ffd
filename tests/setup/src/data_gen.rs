use rand::{distributions::Uniform, Rng};

/// Alphabet of Algorand addresses (RFC 4648 base32, no padding)
const ADDRESS_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const ADDRESS_LEN: usize = 58;

/// 1x1 transparent PNG
pub const ONE_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00,
    0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00,
    0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x60, 0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0xe9, 0xfa,
    0xdc, 0xd8, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Random string shaped like an Algorand account address
pub fn rand_address() -> String {
    rand::thread_rng()
        .sample_iter(Uniform::from(0..ADDRESS_ALPHABET.len()))
        .take(ADDRESS_LEN)
        .map(|i| ADDRESS_ALPHABET[i] as char)
        .collect()
}

pub fn rand_asset_id() -> u64 {
    rand::thread_rng().gen_range(1_000_000..100_000_000)
}
