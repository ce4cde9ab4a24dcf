pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Affine remap of `value` from `[start1, stop1]` to `[start2, stop2]`, unclamped.
pub fn map_range(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}

pub fn distance(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    (p1.0 - p2.0).hypot(p1.1 - p2.1)
}

/// One SplitMix64 output for state `x`.
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stable across platforms and toolchains.
pub fn hash_2d(x: i64, y: i64, seed: u64) -> u64 {
    splitmix64(splitmix64(splitmix64(seed) ^ x as u64) ^ y as u64)
}

/// Round to the nearest integer and saturate into a color channel.
pub fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
