use std::cmp;

use imageproc::stats::histogram;

use crate::common::{BinaryBitmap, BitMatrix, ReadError, ReadResult};

use super::luminance::LuminanceMap;

// Binarizer trait
//------------------------------------------------------------------------------

/// Turns luminance into a dark/light decision per pixel. The reader tries its binarizers
/// in order, so an implementation may refuse an image it cannot handle well.
pub trait Binarizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn binarize(&self, luma: &LuminanceMap) -> ReadResult<BinaryBitmap>;
}

// Adaptive binarizer
// Steps:
// 1. Divides image into blocks of 8x8 pixels. Note: The last fractional block is shifted
//    back to end at the image edge, so few pixels might overlap into 2 blocks
// 2. Calculates average of each block
// 3. Calculates the threshold for each block by averaging 5x5 block around the current block
// 4. Sets binary pixel as dark if pixel value less than or equal to threshold
// Note: If the pixel value is equal to threshold, it is set as dark for the edge case when
// threshold is 0 in which case the pixel should be black
//------------------------------------------------------------------------------

const BLOCK_POW: u32 = 3;
const BLOCK_SZ: u32 = 1 << BLOCK_POW;
const MIN_DIM: u32 = BLOCK_SZ * 5;
const MIN_DYNAMIC_RANGE: u8 = 24;

/// Local contrast binarizer. Copes with uneven lighting, needs at least 40x40 pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdaptiveBinarizer;

impl Binarizer for AdaptiveBinarizer {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn binarize(&self, luma: &LuminanceMap) -> ReadResult<BinaryBitmap> {
        let (w, h) = (luma.width(), luma.height());
        if w < MIN_DIM || h < MIN_DIM {
            return Err(ReadError::ImageTooSmall(w, h));
        }

        let (wsteps, hsteps) = (steps(w), steps(h));
        let blk_avg = Self::calculate_block_average(luma, wsteps, hsteps);
        let thresh = Self::calculate_threshold(&blk_avg, wsteps, hsteps);

        let mut res = BitMatrix::new(w, h);
        for by in 0..hsteps {
            let yoff = block_offset(by, h);
            for bx in 0..wsteps {
                let xoff = block_offset(bx, w);
                let t = thresh[by * wsteps + bx];
                for y in yoff..yoff + BLOCK_SZ {
                    for x in xoff..xoff + BLOCK_SZ {
                        if luma.get(x, y) <= t {
                            res.set(x, y, true);
                        }
                    }
                }
            }
        }
        Ok(res)
    }
}

impl AdaptiveBinarizer {
    fn calculate_block_average(luma: &LuminanceMap, wsteps: usize, hsteps: usize) -> Vec<u32> {
        let (w, h) = (luma.width(), luma.height());
        let mut avg = vec![0u32; wsteps * hsteps];

        for by in 0..hsteps {
            let yoff = block_offset(by, h);
            for bx in 0..wsteps {
                let xoff = block_offset(bx, w);

                let mut sum = 0u32;
                let (mut mn, mut mx) = (u8::MAX, u8::MIN);
                for y in yoff..yoff + BLOCK_SZ {
                    for x in xoff..xoff + BLOCK_SZ {
                        let p = luma.get(x, y);
                        sum += p as u32;
                        mn = cmp::min(mn, p);
                        mx = cmp::max(mx, p);
                    }
                }

                // If variance is low, assume the block is light. Unless the block has top/left
                // neighbors darker than it, in which case it is part of a dark region.
                let i = by * wsteps + bx;
                avg[i] = if mx - mn > MIN_DYNAMIC_RANGE {
                    sum >> (2 * BLOCK_POW)
                } else {
                    let mut a = mn as u32 / 2;
                    if by > 0 && bx > 0 {
                        let ng_avg = (avg[i - wsteps] + 2 * avg[i - 1] + avg[i - wsteps - 1]) / 4;
                        if (mn as u32) < ng_avg {
                            a = ng_avg;
                        }
                    }
                    a
                };
            }
        }

        avg
    }

    fn calculate_threshold(avg: &[u32], wsteps: usize, hsteps: usize) -> Vec<u8> {
        let (maxx, maxy) = (wsteps - 3, hsteps - 3);
        let mut res = vec![0u8; wsteps * hsteps];

        for y in 0..hsteps {
            let cy = y.clamp(2, maxy);
            for x in 0..wsteps {
                let cx = x.clamp(2, maxx);
                let mut sum = 0u32;
                for ny in cy - 2..=cy + 2 {
                    let ni = ny * wsteps + cx;
                    sum += avg[ni - 2..=ni + 2].iter().sum::<u32>();
                }
                res[y * wsteps + x] = (sum / 25) as u8;
            }
        }
        res
    }
}

fn steps(len: u32) -> usize {
    len.div_ceil(BLOCK_SZ) as usize
}

fn block_offset(step: usize, len: u32) -> u32 {
    cmp::min((step as u32) << BLOCK_POW, len - BLOCK_SZ)
}

// Global histogram binarizer
// Steps:
// 1. Buckets luminance of the whole image into 32 bins
// 2. Picks the tallest bin as first peak and the bin maximizing count * distance² as second
// 3. Picks the valley between the peaks favoring empty bins far from the first peak
// 4. Sets binary pixel as dark if pixel value is strictly below the valley
//------------------------------------------------------------------------------

const LUMA_BITS: u32 = 5;
const LUMA_SHIFT: u32 = 8 - LUMA_BITS;
const LUMA_BUCKETS: usize = 1 << LUMA_BITS;

/// Single threshold binarizer. Robust on small or evenly lit images.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalHistogramBinarizer;

impl Binarizer for GlobalHistogramBinarizer {
    fn name(&self) -> &'static str {
        "global histogram"
    }

    fn binarize(&self, luma: &LuminanceMap) -> ReadResult<BinaryBitmap> {
        let hist = histogram(luma.image());
        let mut buckets = [0u32; LUMA_BUCKETS];
        for (v, &count) in hist.channels[0].iter().enumerate() {
            buckets[v >> LUMA_SHIFT] += count;
        }

        let black_point = estimate_black_point(&buckets)?;
        Ok(BitMatrix::from_fn(luma.width(), luma.height(), |x, y| luma.get(x, y) < black_point))
    }
}

fn estimate_black_point(buckets: &[u32; LUMA_BUCKETS]) -> ReadResult<u8> {
    let max_count = *buckets.iter().max().unwrap_or(&0) as i64;

    let mut first_peak = 0;
    let mut first_peak_sz = 0;
    for (i, &c) in buckets.iter().enumerate() {
        if c > first_peak_sz {
            first_peak = i;
            first_peak_sz = c;
        }
    }

    // Second peak is tall and far from the first
    let mut second_peak = 0;
    let mut second_peak_score = 0i64;
    for (i, &c) in buckets.iter().enumerate() {
        let dist = i as i64 - first_peak as i64;
        let score = c as i64 * dist * dist;
        if score > second_peak_score {
            second_peak = i;
            second_peak_score = score;
        }
    }

    let (first_peak, second_peak) = if first_peak > second_peak {
        (second_peak, first_peak)
    } else {
        (first_peak, second_peak)
    };

    if second_peak - first_peak <= LUMA_BUCKETS / 16 {
        return Err(ReadError::FlatHistogram);
    }

    let mut valley = second_peak - 1;
    let mut valley_score = -1i64;
    for i in (first_peak + 1..second_peak).rev() {
        let from_first = (i - first_peak) as i64;
        let score =
            from_first * from_first * (second_peak - i) as i64 * (max_count - buckets[i] as i64);
        if score > valley_score {
            valley = i;
            valley_score = score;
        }
    }

    Ok((valley << LUMA_SHIFT) as u8)
}

#[cfg(test)]
mod binarize_tests {
    use test_case::test_case;

    use super::{AdaptiveBinarizer, Binarizer, GlobalHistogramBinarizer, LUMA_BUCKETS};
    use crate::{common::ReadError, reader::luminance::gray};

    fn checkerboard(x: u32, y: u32, sz: u32) -> bool {
        ((x / sz) + (y / sz)) & 1 == 1
    }

    #[test_case(39, 100; "narrow")]
    #[test_case(100, 39; "short")]
    #[test_case(0, 0; "empty")]
    fn test_adaptive_too_small(w: u32, h: u32) {
        let luma = gray(w, h, |_, _| 255);
        assert_eq!(AdaptiveBinarizer.binarize(&luma), Err(ReadError::ImageTooSmall(w, h)));
    }

    #[test_case(64, 64, 8; "aligned blocks")]
    #[test_case(60, 50, 6; "straddling blocks")]
    #[test_case(41, 43, 3; "fractional blocks")]
    fn test_adaptive_bilevel(w: u32, h: u32, sz: u32) {
        let luma = gray(w, h, |x, y| if checkerboard(x, y, sz) { 0 } else { 255 });
        let bmp = AdaptiveBinarizer.binarize(&luma).unwrap();
        for y in 0..h {
            for x in 0..w {
                assert_eq!(bmp.get(x, y), checkerboard(x, y, sz), "Mismatch at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_adaptive_uniform_is_light() {
        let luma = gray(80, 80, |_, _| 128);
        let bmp = AdaptiveBinarizer.binarize(&luma).unwrap();
        assert_eq!(bmp.count_dark(), 0);
    }

    #[test]
    fn test_global_bilevel() {
        let luma = gray(30, 20, |x, y| if checkerboard(x, y, 5) { 0 } else { 255 });
        let bmp = GlobalHistogramBinarizer.binarize(&luma).unwrap();
        for y in 0..20 {
            for x in 0..30 {
                assert_eq!(bmp.get(x, y), checkerboard(x, y, 5), "Mismatch at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_global_two_tones() {
        let luma = gray(20, 20, |x, _| if x < 10 { 40 } else { 200 });
        let bmp = GlobalHistogramBinarizer.binarize(&luma).unwrap();
        assert!(bmp.get(0, 0));
        assert!(bmp.get(9, 19));
        assert!(!bmp.get(10, 0));
        assert_eq!(bmp.count_dark(), 200);
    }

    #[test_case(0; "black")]
    #[test_case(12; "near black")]
    fn test_global_flat(v: u8) {
        let luma = gray(20, 20, |_, _| v);
        assert_eq!(GlobalHistogramBinarizer.binarize(&luma), Err(ReadError::FlatHistogram));
    }

    #[test]
    fn test_global_empty() {
        let luma = gray(0, 0, |_, _| 0);
        assert_eq!(GlobalHistogramBinarizer.binarize(&luma), Err(ReadError::FlatHistogram));
    }

    #[test]
    fn test_global_uniform_gray_is_light() {
        let luma = gray(20, 20, |_, _| 128);
        let bmp = GlobalHistogramBinarizer.binarize(&luma).unwrap();
        assert_eq!(bmp.count_dark(), 0);
    }

    #[test]
    fn test_black_point_between_peaks() {
        let mut buckets = [0u32; LUMA_BUCKETS];
        buckets[2] = 100;
        buckets[28] = 80;
        let bp = super::estimate_black_point(&buckets).unwrap();
        assert!(bp > 2 << 3 && bp < 28 << 3, "Black point {bp} outside peaks");
    }
}
