//! Per-sprite opaque-pixel bitmaps
//!
//! A mask is derived once from a sprite's alpha channel and is the only thing
//! collision ever looks at. Rows are packed into `u64` words.

/// Bitmap of opaque pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Create an empty (fully transparent) mask
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Build a mask from a predicate over pixel coordinates
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from tightly packed RGBA8 pixels.
    ///
    /// A pixel is opaque when its alpha is strictly greater than `threshold`.
    /// Missing trailing pixels (short buffer) are treated as transparent.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8], threshold: u8) -> Self {
        let mut mask = Self::new(width, height);
        for (i, px) in rgba
            .chunks_exact(4)
            .take(width as usize * height as usize)
            .enumerate()
        {
            if px[3] > threshold {
                let x = (i % width as usize) as u32;
                let y = (i / width as usize) as u32;
                mask.set(x, y, true);
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> (usize, u64) {
        let word = y as usize * self.words_per_row + (x / 64) as usize;
        (word, 1u64 << (x % 64))
    }

    /// Opaque test; out-of-range coordinates are transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let (word, bit) = self.index(x as u32, y as u32);
        self.bits[word] & bit != 0
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.index(x, y);
        if opaque {
            self.bits[word] |= bit;
        } else {
            self.bits[word] &= !bit;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// First pixel (in this mask's coordinates) where `other`, placed at
    /// `offset` relative to this mask's origin, shares an opaque pixel.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_threshold() {
        // 2x1: first pixel alpha 127 (transparent), second 128 (opaque)
        let rgba = [0, 0, 0, 127, 0, 0, 0, 128];
        let mask = Mask::from_rgba(2, 1, &rgba, 127);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_wide_rows_cross_word_boundary() {
        let mask = Mask::from_fn(130, 2, |x, _| x == 63 || x == 64 || x == 129);
        assert!(mask.get(63, 1));
        assert!(mask.get(64, 1));
        assert!(mask.get(129, 0));
        assert!(!mask.get(65, 0));
        assert_eq!(mask.count(), 6);
    }

    #[test]
    fn test_overlap_respects_transparent_pixels() {
        // Two hollow squares whose bounding boxes overlap but whose outlines don't
        let ring = Mask::from_fn(10, 10, |x, y| x == 0 || y == 0 || x == 9 || y == 9);
        let dot = Mask::from_fn(2, 2, |_, _| true);
        assert!(!ring.overlaps(&dot, (4, 4)));
        assert_eq!(ring.overlap(&dot, (8, 4)), Some((9, 4)));
    }

    #[test]
    fn test_overlap_disjoint_rects() {
        let a = Mask::from_fn(5, 5, |_, _| true);
        assert!(!a.overlaps(&a, (5, 0)));
        assert!(!a.overlaps(&a, (0, -5)));
        assert!(a.overlaps(&a, (4, -4)));
    }

    #[test]
    fn test_empty_mask_never_overlaps() {
        let empty = Mask::new(8, 8);
        let full = Mask::from_fn(8, 8, |_, _| true);
        assert!(!empty.overlaps(&full, (0, 0)));
        assert!(!full.overlaps(&empty, (0, 0)));
    }
}
