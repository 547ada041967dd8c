const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Generate a human-facing credit memo number
///
/// Layout: `CM-<yyyymmdd>-<token>` where the token is base36 of
///   - 41 bits: milliseconds since 2024-01-01 UTC
///   - 12 bits: random (4096 values per ms)
pub fn credit_memo_number() -> String {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = chrono::Utc::now();
    let ts = ((now.timestamp_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF) as u64;
    let rand_bits: u64 = rand::thread_rng().gen_range(0..0x1000);
    format!(
        "CM-{}-{}",
        now.format("%Y%m%d"),
        to_base36((ts << 12) | rand_bits)
    )
}
