//! Host block sizes from 1 to 4096 samples, including sizes that do not
//! divide the chunk size, produce finite output identical to one long block.

use hallverb_effects::HallReverb;

const SR: f32 = 44100.0;
const SIZES: [usize; 11] = [1, 2, 7, 32, 64, 128, 256, 512, 1024, 2048, 4096];
const TOTAL: usize = 8192;

fn signal() -> Vec<f32> {
    (0..TOTAL)
        .map(|i| libm::sinf(i as f32 * 0.031) * 0.5 + if i % 997 == 0 { 0.5 } else { 0.0 })
        .collect()
}

fn render(block: usize, input: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let mut hall = HallReverb::new(SR);
    hall.set_late_decay(1.5);
    let mut l = vec![0.0; input.len()];
    let mut r = vec![0.0; input.len()];
    for (start, chunk) in input.chunks(block).enumerate().map(|(i, c)| (i * block, c)) {
        let end = start + chunk.len();
        hall.process(chunk, chunk, &mut l[start..end], &mut r[start..end]);
    }
    (l, r)
}

#[test]
fn test_all_block_sizes_match_single_block() {
    let input = signal();
    let (ref_l, ref_r) = render(TOTAL, &input);
    assert!(ref_l.iter().chain(&ref_r).all(|s| s.is_finite()));

    for block in SIZES {
        let (l, r) = render(block, &input);
        assert_eq!(l, ref_l, "left differs at block size {block}");
        assert_eq!(r, ref_r, "right differs at block size {block}");
    }
}

#[test]
fn test_extreme_sample_rates() {
    for sr in [8000.0, 22050.0, 96000.0, 192000.0] {
        let mut hall = HallReverb::new(sr);
        hall.set_late_room_size(3.6);
        hall.set_early_room_size(3.6);
        hall.set_late_predelay(200.0);
        let input = signal();
        let mut l = vec![0.0; TOTAL];
        let mut r = vec![0.0; TOTAL];
        hall.process(&input, &input, &mut l, &mut r);
        assert!(l.iter().chain(&r).all(|s| s.is_finite()), "non-finite output at {sr} Hz");
    }
}
