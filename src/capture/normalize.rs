//! Distance to display byte normalization.
//!
//! The default mapping divides by 256 and truncates. Sensor distances stay
//! below ~8000 mm so the output only spans roughly 0..=31, which gives a dark,
//! low-contrast image. That mapping is kept as the default so existing
//! consumers see the same bytes; [`NormalizeMode::Ranged`] stretches a chosen
//! working range over the full byte instead.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::decoder::decode_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NormalizeMode {
    /// `distance / 256`, truncated to a byte
    #[default]
    Legacy,
    /// Linear stretch of `[min_mm, max_mm]` onto `0..=255`, clamped
    Ranged { min_mm: u16, max_mm: u16 },
}

/// `distance_mm / 256` truncated to a byte. Not clamped: the quotient only
/// exceeds 255 for distances no 13-bit sample can hold.
#[inline]
pub const fn normalize(distance_mm: u16) -> u8 {
    (distance_mm / 256) as u8
}

/// Stretch `[min_mm, max_mm]` onto `0..=255`. A zero distance means "no
/// reading" and stays black. Falls back to [`normalize`] for an empty range.
pub fn normalize_ranged(distance_mm: u16, min_mm: u16, max_mm: u16) -> u8 {
    if min_mm >= max_mm {
        return normalize(distance_mm);
    }
    if distance_mm == 0 {
        return 0;
    }
    let clamped = distance_mm.clamp(min_mm, max_mm);
    let span = u32::from(max_mm - min_mm);
    (u32::from(clamped - min_mm) * 255 / span) as u8
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    mode: NormalizeMode,
}

impl Normalizer {
    pub fn new(mode: NormalizeMode) -> Self {
        if let NormalizeMode::Ranged { min_mm, max_mm } = mode {
            if min_mm >= max_mm {
                warn!(
                    min_mm,
                    max_mm, "Empty normalization range, using legacy normalization"
                );
                return Self::default();
            }
        }
        Self { mode }
    }

    pub fn mode(&self) -> NormalizeMode {
        self.mode
    }

    #[inline]
    pub fn normalize(&self, distance_mm: u16) -> u8 {
        match self.mode {
            NormalizeMode::Legacy => normalize(distance_mm),
            NormalizeMode::Ranged { min_mm, max_mm } => {
                normalize_ranged(distance_mm, min_mm, max_mm)
            }
        }
    }

    /// Decode and normalize every packed sample of a frame.
    pub fn normalize_frame(&self, samples: &[u16]) -> Vec<u8> {
        samples
            .iter()
            .map(|&sample| self.normalize(decode_distance(sample)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_range() {
        for distance in 0..=8191u16 {
            let byte = normalize(distance);
            assert_eq!(byte as u16, distance / 256);
            assert!(byte <= 31);
        }
        assert_eq!(normalize(255), 0);
        assert_eq!(normalize(256), 1);
        assert_eq!(normalize(8000), 31);
    }

    #[test]
    fn test_legacy_truncates_without_clamping() {
        assert_eq!(normalize(65_279), 254);
        assert_eq!(normalize(65_535), 255);
    }

    #[test]
    fn test_ranged() {
        assert_eq!(normalize_ranged(0, 500, 4000), 0);
        assert_eq!(normalize_ranged(100, 500, 4000), 0);
        assert_eq!(normalize_ranged(500, 500, 4000), 0);
        assert_eq!(normalize_ranged(4000, 500, 4000), 255);
        assert_eq!(normalize_ranged(8000, 500, 4000), 255);
        assert_eq!(normalize_ranged(2250, 500, 4000), 127);
    }

    #[test]
    fn test_empty_range_falls_back() {
        let normalizer = Normalizer::new(NormalizeMode::Ranged {
            min_mm: 4000,
            max_mm: 4000,
        });
        assert_eq!(normalizer.mode(), NormalizeMode::Legacy);
        assert_eq!(normalize_ranged(2048, 10, 5), 8);
    }

    #[test]
    fn test_normalize_frame_decodes_samples() {
        let normalizer = Normalizer::default();
        // 256 mm, 512 mm with player tags, 8191 mm
        let samples: [u16; 3] = [256 << 3, 512 << 3 | 3, 0xFFFF];
        assert_eq!(normalizer.normalize_frame(&samples), vec![1, 2, 31]);
    }
}
