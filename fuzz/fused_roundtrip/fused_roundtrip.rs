#![no_main]

use arbitrary::Arbitrary;
use fuselet::{Fuselet, ImageMut};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Data {
    tiles_x: u8,
    tiles_y: u8,
    levels: u8,
    seed: u16,
}

fuzz_target!(|data: Data| {
    let levels = (data.levels % 3 + 1) as usize;
    let tile = 1usize << (levels + 1);
    let size_x = tile * (data.tiles_x as usize % 4 + 1);
    let size_y = tile * (data.tiles_y as usize % 4 + 1);

    let original: Vec<f32> = (0..size_x * size_y)
        .map(|i| ((i as u32).wrapping_mul(data.seed as u32 | 1) % 8191) as f32 - 4000.0)
        .collect();
    let mut plane = original.clone();

    let executor = Fuselet::make_cdf97_fused_f32();
    let mut image = ImageMut::new(&mut plane, size_x, size_y).unwrap();
    executor.execute_forward(&mut image, levels).unwrap();
    let mut image = ImageMut::new(&mut plane, size_x, size_y).unwrap();
    executor.execute_inverse(&mut image, levels).unwrap();

    for (o, r) in original.iter().zip(plane.iter()) {
        assert!((o - r).abs() < 1e-1);
    }
});
