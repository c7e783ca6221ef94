//! Packed depth sample decoding.
//!
//! Each 16-bit sample carries the distance in millimeters in its high 13 bits
//! and a player segmentation tag in its low 3 bits.

/// Width of the player index field at the bottom of each sample
pub const PLAYER_INDEX_BITMASK_WIDTH: u32 = 3;
pub const PLAYER_INDEX_BITMASK: u16 = (1 << PLAYER_INDEX_BITMASK_WIDTH) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedSample {
    pub distance_mm: u16,
    pub player_index: u8,
}

#[inline]
pub const fn decode(sample: u16) -> DecodedSample {
    DecodedSample {
        distance_mm: decode_distance(sample),
        player_index: (sample & PLAYER_INDEX_BITMASK) as u8,
    }
}

#[inline]
pub const fn decode_distance(sample: u16) -> u16 {
    sample >> PLAYER_INDEX_BITMASK_WIDTH
}

/// Pack a distance and player index back into a sample. Distance bits above
/// the 13-bit field are lost.
#[inline]
pub const fn encode(distance_mm: u16, player_index: u8) -> u16 {
    (distance_mm << PLAYER_INDEX_BITMASK_WIDTH) | (player_index as u16 & PLAYER_INDEX_BITMASK)
}
