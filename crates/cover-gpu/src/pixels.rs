/// RGBA8 channel contract fixed by spec §6: `R` = target silhouette, `B` =
/// obstacle, `G` = terrain, alpha = target stencil. A pixel is blocked iff
/// `R>127 AND (B>127 OR G>alphaThreshold*255)`, using a strict `>` for the
/// green/terrain comparison (spec §9 open-question resolution).
pub const CHANNEL_BLOCK_THRESHOLD: u8 = 127;

/// Per-call totals produced by any of the four counting strategies (spec
/// §4.4.d): all four must agree on these numbers to within ±1 pixel on
/// identical inputs (spec §8 "GPU agreement").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCounts {
    pub red_total: u32,
    pub red_blocked: u32,
}

impl PixelCounts {
    pub fn percent_visible(&self) -> f32 {
        if self.red_total == 0 {
            return 1.0;
        }
        1.0 - (self.red_blocked as f32 / self.red_total as f32)
    }
}

/// Whether a single RGBA8 pixel counts as "red" (part of the target
/// silhouette) and, if so, whether it's blocked, per the §6 channel
/// contract. `alpha_threshold` is a `0.0..=1.0` fraction, matching the host
/// setting; the green channel comparison converts it to the `0..=255` scale
/// internally.
fn classify_pixel(r: u8, g: u8, b: u8, alpha_threshold: f32) -> (bool, bool) {
    let is_red = r > CHANNEL_BLOCK_THRESHOLD;
    if !is_red {
        return (false, false);
    }
    let green_cutoff = (alpha_threshold * 255.0).round() as u8;
    let blocked_by_obstacle = b > CHANNEL_BLOCK_THRESHOLD;
    let blocked_by_terrain = g > green_cutoff;
    (true, blocked_by_obstacle || blocked_by_terrain)
}

/// CPU readback strategy (spec §4.4.d, strategy 4): full-buffer pass with
/// bitwise thresholding. This is the one always available (no GPU pipeline
/// required) and the reference the other three strategies are checked
/// against.
///
/// `pixels` is a tightly packed RGBA8 buffer (`width * height * 4` bytes).
pub fn count_from_pixels(pixels: &[u8], width: u32, height: u32, alpha_threshold: f32) -> PixelCounts {
    let expected_len = (width as usize) * (height as usize) * 4;
    debug_assert_eq!(pixels.len(), expected_len, "pixel buffer size does not match width*height*4");

    let mut red_total = 0;
    let mut red_blocked = 0;
    for pixel in pixels.chunks_exact(4) {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
        let (is_red, blocked) = classify_pixel(r, g, b, alpha_threshold);
        if is_red {
            red_total += 1;
            if blocked {
                red_blocked += 1;
            }
        }
    }
    PixelCounts { red_total, red_blocked }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_red_unblocked_buffer_is_fully_visible() {
        let mut pixels = vec![0u8; 4 * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[255, 0, 0, 255]);
        }
        let counts = count_from_pixels(&pixels, 1, 1, 0.75);
        assert_eq!(counts.red_total, 1);
        assert_eq!(counts.red_blocked, 0);
        assert_eq!(counts.percent_visible(), 1.0);
    }

    #[test]
    fn blue_obstacle_blocks_red_pixel() {
        let pixels = vec![255u8, 0, 255, 255];
        let counts = count_from_pixels(&pixels, 1, 1, 0.75);
        assert_eq!(counts.red_blocked, 1);
    }

    #[test]
    fn green_terrain_uses_strict_threshold() {
        let at_threshold = vec![255u8, 191, 0, 255]; // 0.75 * 255 ~= 191
        let counts = count_from_pixels(&at_threshold, 1, 1, 0.75);
        assert_eq!(counts.red_blocked, 0, "exactly-at-threshold green must not block (strict >)");

        let above_threshold = vec![255u8, 200, 0, 255];
        let counts = count_from_pixels(&above_threshold, 1, 1, 0.75);
        assert_eq!(counts.red_blocked, 1);
    }

    #[test]
    fn non_red_pixel_does_not_count_towards_total() {
        let pixels = vec![0u8, 0, 0, 0];
        let counts = count_from_pixels(&pixels, 1, 1, 0.75);
        assert_eq!(counts.red_total, 0);
        assert_eq!(counts.percent_visible(), 1.0);
    }

    #[test]
    fn two_terrain_walls_cooperate_to_fully_block() {
        // A single terrain wall below threshold does not block; two
        // overlapping terrain walls summing their green contribution do
        // (glossary: "two overlapping terrain walls together act as a full
        // wall").
        let one_wall = vec![255u8, 100, 0, 255];
        assert_eq!(count_from_pixels(&one_wall, 1, 1, 0.75).red_blocked, 0);

        let two_walls = vec![255u8, 200, 0, 255];
        assert_eq!(count_from_pixels(&two_walls, 1, 1, 0.75).red_blocked, 1);
    }
}
