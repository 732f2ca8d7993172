#![no_main]

use arbitrary::Arbitrary;
use fuselet::{Fuselet, ImageMut};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Data {
    size_x: u8,
    size_y: u8,
    levels: u8,
    seed: u32,
}

fuzz_target!(|data: Data| {
    let size_x = data.size_x as usize + 4;
    let size_y = data.size_y as usize + 4;
    let levels = data.levels as usize % fuselet::max_levels(size_x, size_y) + 1;

    let original: Vec<i32> = (0..size_x * size_y)
        .map(|i| ((i as u32).wrapping_mul(data.seed | 1) >> 12) as i32 - 500_000)
        .collect();
    let mut plane = original.clone();

    let executor = Fuselet::make_cdf97_i32();
    let mut image = ImageMut::new(&mut plane, size_x, size_y).unwrap();
    executor.execute_forward(&mut image, levels).unwrap();
    let mut image = ImageMut::new(&mut plane, size_x, size_y).unwrap();
    executor.execute_inverse(&mut image, levels).unwrap();

    assert_eq!(original, plane);
});
