//! High-frequency energy maps for video frames
//!
//! A Laplacian magnitude map highlights the fine-detail content GAN
//! upsampling tends to distort. The map feeds both the heuristic video
//! model (block statistics) and the heatmap artifacts.

use crate::types::Frame;

/// Per-pixel high-frequency energy, normalized to [0, 1]
///
/// 4-neighbor Laplacian magnitude; border pixels are zero.
pub fn hf_energy_map(frame: &Frame) -> Vec<f32> {
    let w = frame.width as usize;
    let h = frame.height as usize;
    let px = &frame.pixels;
    let mut map = vec![0.0f32; w * h];

    if w < 3 || h < 3 || px.len() < w * h {
        return map;
    }

    // Max |4c - n - s - e - w| is 4 * 255
    const NORM: f32 = 4.0 * 255.0;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let c = px[y * w + x] as i32;
            let n = px[(y - 1) * w + x] as i32;
            let s = px[(y + 1) * w + x] as i32;
            let e = px[y * w + x + 1] as i32;
            let wv = px[y * w + x - 1] as i32;
            let lap = (4 * c - n - s - e - wv).abs() as f32;
            map[y * w + x] = lap / NORM;
        }
    }

    map
}

/// Mean energy of each cell on a `grid x grid` partition of the map
pub fn block_energies(map: &[f32], width: usize, height: usize, grid: usize) -> Vec<f32> {
    let mut blocks = vec![0.0f32; grid * grid];
    if width == 0 || height == 0 || grid == 0 || map.len() < width * height {
        return blocks;
    }

    let mut counts = vec![0u32; grid * grid];
    for y in 0..height {
        let by = y * grid / height;
        for x in 0..width {
            let bx = x * grid / width;
            blocks[by * grid + bx] += map[y * width + x];
            counts[by * grid + bx] += 1;
        }
    }

    for (b, &c) in blocks.iter_mut().zip(&counts) {
        if c > 0 {
            *b /= c as f32;
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(value: u8) -> Frame {
        Frame {
            width: 16,
            height: 16,
            pixels: vec![value; 256],
        }
    }

    #[test]
    fn flat_frame_has_zero_energy() {
        let map = hf_energy_map(&flat_frame(128));
        assert!(map.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn checkerboard_has_high_energy() {
        let mut frame = flat_frame(0);
        for y in 0..16usize {
            for x in 0..16usize {
                if (x + y) % 2 == 0 {
                    frame.pixels[y * 16 + x] = 255;
                }
            }
        }
        let map = hf_energy_map(&frame);
        // Interior pixels of a checkerboard hit the Laplacian maximum
        assert!(map[5 * 16 + 5] > 0.99);
    }

    #[test]
    fn energy_is_bounded() {
        let mut frame = flat_frame(0);
        for (i, p) in frame.pixels.iter_mut().enumerate() {
            *p = (i * 37 % 256) as u8;
        }
        let map = hf_energy_map(&frame);
        assert!(map.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn block_energies_partition() {
        let map = vec![1.0f32; 64];
        let blocks = block_energies(&map, 8, 8, 4);
        assert_eq!(blocks.len(), 16);
        for &b in &blocks {
            assert!((b - 1.0).abs() < 1e-6);
        }
    }
}
