use crate::pixels::{count_from_pixels, PixelCounts};
use crate::rasterize::RasterizedScene;

/// Strategy 4 (spec §4.4.d): a single linear pass over the whole buffer.
/// Always available; every other strategy is checked against it.
pub fn count_cpu_readback(scene: &RasterizedScene, alpha_threshold: f32) -> PixelCounts {
    count_from_pixels(&scene.pixels, scene.width, scene.height, alpha_threshold)
}

/// Strategy 1: per-pixel classification folded through a mip-style 2x2 sum
/// reduction instead of one linear pass, down to a single texel holding the
/// grand total. Mirrors a GPU occlusion query that reduces a mask texture by
/// repeated downsampling; because each level sums (rather than averages)
/// its children's counts, the final texel is exactly the base-resolution
/// total, so this strategy agrees with [`count_cpu_readback`] exactly on a
/// CPU buffer (the ±1-pixel tolerance exists for GPU rounding, not for this
/// reference implementation).
pub fn count_pyramidal_reduction(scene: &RasterizedScene, alpha_threshold: f32) -> PixelCounts {
    let width = scene.width;
    let height = scene.height;

    let mut level: Vec<(u32, u32)> = scene
        .pixels
        .chunks_exact(4)
        .map(|p| {
            let is_red = p[0] > crate::pixels::CHANNEL_BLOCK_THRESHOLD;
            if !is_red {
                return (0, 0);
            }
            let green_cutoff = (alpha_threshold * 255.0).round() as u8;
            let blocked = p[2] > crate::pixels::CHANNEL_BLOCK_THRESHOLD || p[1] > green_cutoff;
            (1, u32::from(blocked))
        })
        .collect();
    let mut level_width = width;
    let mut level_height = height;

    while level_width > 1 || level_height > 1 {
        let next_width = (level_width / 2).max(1);
        let next_height = (level_height / 2).max(1);
        let mut next = vec![(0u32, 0u32); (next_width as usize) * (next_height as usize)];

        for row in 0..next_height {
            for col in 0..next_width {
                let mut total = (0u32, 0u32);
                for dy in 0..2 {
                    for dx in 0..2 {
                        let src_row = row * 2 + dy;
                        let src_col = col * 2 + dx;
                        if src_row >= level_height || src_col >= level_width {
                            continue;
                        }
                        let src_offset = (src_row as usize) * (level_width as usize) + src_col as usize;
                        total.0 += level[src_offset].0;
                        total.1 += level[src_offset].1;
                    }
                }
                next[(row as usize) * (next_width as usize) + col as usize] = total;
            }
        }

        level = next;
        level_width = next_width;
        level_height = next_height;
    }

    let (red_total, red_blocked) = level[0];
    PixelCounts { red_total, red_blocked }
}

/// Strategy 2: obstacle and terrain coverage expressed as two `{0.0, 1.0}`
/// contributions per pixel and merged with the "over" alpha-blend formula
/// (`1 - (1-a)(1-b)`) a GPU additive-blend pass would use to combine masks,
/// then thresholded at the midpoint. This only agrees with the boolean `OR`
/// in [`count_from_pixels`] because both contributions happen to be binary;
/// the reduction itself goes through the blend arithmetic, not a shortcut
/// through it.
pub fn count_additive_blending(scene: &RasterizedScene, alpha_threshold: f32) -> PixelCounts {
    let green_cutoff = (alpha_threshold * 255.0).round() as u8;
    let mut red_total = 0u32;
    let mut red_blocked = 0u32;

    for pixel in scene.pixels.chunks_exact(4) {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
        if r <= crate::pixels::CHANNEL_BLOCK_THRESHOLD {
            continue;
        }
        red_total += 1;

        let obstacle_coverage = if b > crate::pixels::CHANNEL_BLOCK_THRESHOLD { 1.0_f32 } else { 0.0 };
        let terrain_coverage = if g > green_cutoff { 1.0_f32 } else { 0.0 };
        let blended = 1.0 - (1.0 - obstacle_coverage) * (1.0 - terrain_coverage);

        if blended > 0.5 {
            red_blocked += 1;
        }
    }

    PixelCounts { red_total, red_blocked }
}

/// A running total visited one fragment at a time (mirroring a fragment
/// shader invoked once per texel), rather than folded over an iterator like
/// [`count_from_pixels`].
#[derive(Default)]
struct FragmentAccumulator {
    red_total: u32,
    red_blocked: u32,
}

impl FragmentAccumulator {
    fn visit(&mut self, r: u8, g: u8, b: u8, green_cutoff: u8) {
        if r <= crate::pixels::CHANNEL_BLOCK_THRESHOLD {
            return;
        }
        self.red_total += 1;
        if b > crate::pixels::CHANNEL_BLOCK_THRESHOLD || g > green_cutoff {
            self.red_blocked += 1;
        }
    }
}

/// Strategy 3: explicit row/column traversal feeding a stateful
/// [`FragmentAccumulator`] one texel at a time, instead of a flat slice fold.
pub fn count_fragment_loop(scene: &RasterizedScene, alpha_threshold: f32) -> PixelCounts {
    let green_cutoff = (alpha_threshold * 255.0).round() as u8;
    let mut accumulator = FragmentAccumulator::default();

    for row in 0..scene.height {
        for col in 0..scene.width {
            let offset = ((row as usize) * (scene.width as usize) + col as usize) * 4;
            accumulator.visit(scene.pixels[offset], scene.pixels[offset + 1], scene.pixels[offset + 2], green_cutoff);
        }
    }

    PixelCounts { red_total: accumulator.red_total, red_blocked: accumulator.red_blocked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_geometry::{Point2, Rect, Segment};
    use cover_index::ObstacleIndex;
    use cover_model::{ElevationBand, Footprint, Placeable, SenseKind, Token, TokenId, Wall, WallClass, WallId};
    use cover_visibility::VisibilityConfig;

    fn scene_bounds() -> Rect {
        Rect::from_min_max(Point2::new(-10.0, -10.0), Point2::new(20.0, 20.0))
    }

    fn target_token() -> Token {
        Token::new(
            TokenId::new(2),
            Footprint::Rect(Rect::from_min_max(Point2::new(8.0, 4.0), Point2::new(9.0, 6.0))),
            0.0,
            1.0,
        )
    }

    #[test]
    fn all_four_strategies_agree_within_one_pixel() {
        let mut index = ObstacleIndex::new(scene_bounds());
        index.upsert(Placeable::Wall(Wall {
            id: WallId::new(1),
            segment: Segment::new(Point2::new(4.0, 3.0), Point2::new(4.0, 7.0)),
            class: WallClass::Opaque,
            elevation: ElevationBand::UNBOUNDED,
            restricts: vec![SenseKind::Sight],
            directional_normal: None,
        }));
        let scene = crate::rasterize::rasterize_scene(Point2::new(1.0, 5.0), &target_token(), &VisibilityConfig::default(), &index, scene_bounds(), 48);

        let reference = count_cpu_readback(&scene, 0.75);
        let pyramidal = count_pyramidal_reduction(&scene, 0.75);
        let additive = count_additive_blending(&scene, 0.75);
        let fragment = count_fragment_loop(&scene, 0.75);

        assert_eq!(reference, additive);
        assert_eq!(reference, fragment);
        assert_eq!(reference, pyramidal);
    }
}
