//! Pseudo-random numbers for ids, colors and pixel subsets.

/// Source of pseudo-random numbers
///
/// Implement this trait to plug in a hardware generator. The crate ships
/// [`SplitMix64`], which is good enough for visual effects.
pub trait RandomSource {
    /// Next 32 random bits
    fn next_u32(&mut self) -> u32;

    /// Random value in `low..high`
    ///
    /// Returns `low` if the range is empty.
    fn random_range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_u32() % (high - low)
    }

    /// Random value in `0..0x7fff_ffff`
    fn random31(&mut self) -> u32 {
        self.random_range(0, 0x7fff_ffff)
    }
}

/// `SplitMix64` generator
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for SplitMix64 {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        (z ^ (z >> 31)) as u32
    }
}
