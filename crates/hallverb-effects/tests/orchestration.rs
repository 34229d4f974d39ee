//! Orchestration tests for [`HallReverb`].
//!
//! Gate, chunker and router behaviour is checked against recording stand-in
//! engines whose output is trivially predictable. Mixing and reset behaviour
//! is also checked end-to-end with the built-in engines.

use hallverb_core::StereoEngine;
use hallverb_effects::{
    EarlyEngine, EarlyReflections, HallParam, HallReverb, LateEngine, LateReverb, SharedParams,
};

const SR: f32 = 44100.0;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    SampleRate(f32),
    RoomSize(f32),
    Predelay(f32),
    Set(&'static str, f32),
    Process(usize),
    Mute,
}

/// Early stand-in: halves its input.
#[derive(Debug, Default)]
struct FakeEarly {
    log: Vec<Event>,
}

impl StereoEngine for FakeEarly {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.log.push(Event::SampleRate(sample_rate));
    }

    fn process_replace(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        self.log.push(Event::Process(in_l.len()));
        for i in 0..in_l.len() {
            out_l[i] = 0.5 * in_l[i];
            out_r[i] = 0.5 * in_r[i];
        }
    }

    fn mute(&mut self) {
        self.log.push(Event::Mute);
    }
}

macro_rules! record_setters {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method(&mut self, value: f32) {
                self.log.push(Event::Set(stringify!($method), value));
            }
        )*
    };
}

impl EarlyEngine for FakeEarly {
    record_setters!(set_output_hpf, set_output_lpf, set_stereo_width);

    fn set_room_size(&mut self, factor: f32) {
        self.log.push(Event::RoomSize(factor));
    }
}

/// Late stand-in: one-sample delay, so state crosses chunk boundaries.
#[derive(Debug, Default)]
struct FakeLate {
    log: Vec<Event>,
    last: [f32; 2],
}

impl StereoEngine for FakeLate {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.log.push(Event::SampleRate(sample_rate));
    }

    fn process_replace(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        self.log.push(Event::Process(in_l.len()));
        for i in 0..in_l.len() {
            out_l[i] = self.last[0];
            out_r[i] = self.last[1];
            self.last = [in_l[i], in_r[i]];
        }
    }

    fn mute(&mut self) {
        self.last = [0.0; 2];
        self.log.push(Event::Mute);
    }
}

impl LateEngine for FakeLate {
    record_setters!(
        set_ap_feedback,
        set_crossover_high,
        set_crossover_low,
        set_decay,
        set_decay_factor_high,
        set_decay_factor_low,
        set_diffusion,
        set_lfo1_freq,
        set_lfo2_freq,
        set_lfo_factor,
        set_output_hpf,
        set_output_lpf,
        set_spin,
        set_spin_factor,
        set_stereo_width,
        set_wander_ms,
    );

    fn set_predelay_ms(&mut self, ms: f32) {
        self.log.push(Event::Predelay(ms));
    }

    fn set_room_size(&mut self, factor: f32) {
        self.log.push(Event::RoomSize(factor));
    }
}

type FakeHall<const C: usize> = HallReverb<FakeEarly, FakeLate, C>;

fn fake<const C: usize>() -> FakeHall<C> {
    HallReverb::with_engines(FakeEarly::default(), FakeLate::default(), SR)
}

fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|i| ((i * 37) % 101) as f32 / 50.0 - 1.0).collect()
}

fn run<E: EarlyEngine, L: LateEngine, const C: usize>(
    hall: &mut HallReverb<E, L, C>,
    left: &[f32],
    right: &[f32],
) -> (Vec<f32>, Vec<f32>) {
    let mut out_l = vec![0.0; left.len()];
    let mut out_r = vec![0.0; right.len()];
    hall.process(left, right, &mut out_l, &mut out_r);
    (out_l, out_r)
}

fn count(log: &[Event], pred: impl Fn(&Event) -> bool) -> usize {
    log.iter().filter(|e| pred(e)).count()
}

#[test]
fn test_construction_pushes_immediates_only() {
    let hall = fake::<64>();
    let early = &hall.early().log;
    let late = &hall.late().log;

    assert_eq!(early[0], Event::SampleRate(SR));
    assert_eq!(late[0], Event::SampleRate(SR));
    assert!(early.contains(&Event::Set("set_output_lpf", 16000.0)));
    assert!(late.contains(&Event::Set("set_decay", 0.4)));
    assert!(late.contains(&Event::Set("set_wander_ms", 22.0)));
    assert_eq!(count(early, |e| matches!(e, Event::RoomSize(_))), 0);
    assert_eq!(count(late, |e| matches!(e, Event::RoomSize(_) | Event::Predelay(_))), 0);
    assert!(hall.has_pending_reconfiguration());
}

#[test]
fn test_deferred_applied_once_per_call() {
    let mut hall = fake::<64>();
    run(&mut hall, &[0.0; 8], &[0.0; 8]);
    let early_mark = hall.early().log.len();
    let late_mark = hall.late().log.len();

    hall.set_early_room_size(1.0);
    hall.set_early_room_size(2.0);
    hall.set_early_room_size(3.0);
    hall.set_late_predelay(12.0);
    hall.set_late_predelay(40.0);
    assert_eq!(hall.early().log.len(), early_mark, "deferred setters must not reach the engine");
    assert_eq!(hall.late().log.len(), late_mark);

    let input = ramp(1024);
    run(&mut hall, &input, &input);

    let early = &hall.early().log[early_mark..];
    assert_eq!(early[0], Event::RoomSize(3.0), "applied before the first chunk");
    assert_eq!(count(early, |e| matches!(e, Event::RoomSize(_))), 1);
    assert_eq!(count(early, |e| *e == Event::Process(64)), 16);

    let late = &hall.late().log[late_mark..];
    assert_eq!(late[0], Event::Predelay(40.0));
    assert_eq!(count(late, |e| matches!(e, Event::Predelay(_))), 1);
    assert_eq!(count(late, |e| matches!(e, Event::RoomSize(_))), 0, "late room untouched");

    run(&mut hall, &input, &input);
    assert_eq!(count(&hall.early().log, |e| matches!(e, Event::RoomSize(_))), 2);
    assert_eq!(count(&hall.early().log[early_mark..], |e| matches!(e, Event::RoomSize(_))), 1);
}

#[test]
fn test_immediate_setters_reach_engine_at_once() {
    let mut hall = fake::<64>();
    hall.set_late_decay(2.5);
    hall.set_early_stereo_width(-0.5);
    hall.set_param(HallParam::LateSpin, 7.0);

    assert_eq!(hall.late().log.last(), Some(&Event::Set("set_spin", 7.0)));
    assert!(hall.late().log.contains(&Event::Set("set_decay", 2.5)));
    assert_eq!(hall.early().log.last(), Some(&Event::Set("set_stereo_width", -0.5)));
}

#[test]
fn test_values_are_not_clamped() {
    let mut hall = fake::<64>();
    for (i, param) in HallParam::ALL.into_iter().enumerate() {
        let value = -1000.0 + i as f32 * 123.25;
        hall.set_param(param, value);
        assert_eq!(hall.param(param), value, "{param}");
    }
    assert!(hall.late().log.contains(&Event::Set("set_decay", -1000.0 + 11.0 * 123.25)));
}

#[test]
fn test_chunks_cover_block_in_order() {
    let mut hall = fake::<100>();
    let input: Vec<f32> = (0..1050).map(|i| i as f32).collect();
    let (out_l, _) = run(&mut hall, &input, &input);

    let sizes: Vec<usize> = hall
        .early()
        .log
        .iter()
        .filter_map(|e| match e {
            Event::Process(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, [100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 50]);

    // dry 0.8·x + early 0.1·0.5x + late 0.2·(x[n-1] + 0.2·0.5·x[n-1])
    for (n, &y) in out_l.iter().enumerate() {
        let x = n as f32;
        let prev = if n == 0 { 0.0 } else { x - 1.0 };
        let expected = 0.8 * x + 0.1 * (0.5 * x) + 0.2 * (0.2 * (0.5 * prev) + prev);
        assert!((y - expected).abs() <= 1e-3 * expected.abs().max(1.0), "sample {n}: {y} vs {expected}");
    }
}

#[test]
fn test_zero_length_block_does_not_touch_engines() {
    let mut hall = fake::<64>();
    let mark = hall.early().log.len();
    hall.process(&[], &[], &mut [], &mut []);
    assert!(
        !hall.early().log[mark..].iter().any(|e| matches!(e, Event::Process(_))),
        "no chunk for an empty block"
    );
}

#[test]
fn test_dry_path_is_exactly_linear() {
    let mut hall = HallReverb::new(SR);
    hall.set_early_level(0.0);
    hall.set_late_level(0.0);
    hall.set_dry_level(0.37);

    let left = ramp(3000);
    let right: Vec<f32> = left.iter().map(|x| -x).collect();
    let (out_l, out_r) = run(&mut hall, &left, &right);
    for i in 0..left.len() {
        assert_eq!(out_l[i], 0.37 * left[i]);
        assert_eq!(out_r[i], 0.37 * right[i]);
    }
}

#[test]
fn test_mix_is_linear_superposition() {
    let input = ramp(4096);
    let isolated = |dry: f32, early: f32, late: f32| {
        let mut hall = HallReverb::new(SR);
        hall.set_dry_level(dry);
        hall.set_early_level(early);
        hall.set_late_level(late);
        run(&mut hall, &input, &input)
    };

    let (dry, _) = isolated(1.0, 0.0, 0.0);
    let (early, _) = isolated(0.0, 1.0, 0.0);
    let (late, _) = isolated(0.0, 0.0, 1.0);
    let (mixed, _) = isolated(0.8, 0.1, 0.2);

    for i in 0..input.len() {
        let expected = 0.8 * dry[i] + 0.1 * early[i] + 0.2 * late[i];
        assert!((mixed[i] - expected).abs() < 1e-5, "sample {i}: {} vs {expected}", mixed[i]);
    }
}

#[test]
fn test_silence_after_mute() {
    let mut hall = HallReverb::new(SR);
    hall.set_late_decay(5.0);
    let noise = ramp(8192);
    run(&mut hall, &noise, &noise);

    hall.mute();
    let zeros = vec![0.0; 8192];
    let (l, r) = run(&mut hall, &zeros, &zeros);
    assert!(l.iter().chain(&r).all(|s| *s == 0.0), "tail leaked through mute");
}

#[test]
fn test_mute_keeps_parameters_and_dirty_flags() {
    let mut hall = fake::<64>();
    run(&mut hall, &[0.0; 4], &[0.0; 4]);
    hall.set_late_room_size(2.0);
    hall.set_dry_level(0.25);
    hall.mute();

    assert!(hall.has_pending_reconfiguration());
    assert_eq!(hall.param(HallParam::DryLevel), 0.25);
    assert_eq!(hall.early().log.last(), Some(&Event::Mute));
    assert_eq!(hall.late().log.last(), Some(&Event::Mute));

    run(&mut hall, &[0.0; 4], &[0.0; 4]);
    assert!(hall.late().log.contains(&Event::RoomSize(2.0)));
}

#[test]
fn test_chunk_size_is_not_observable() {
    let input_l = ramp(5000);
    let input_r: Vec<f32> = input_l.iter().rev().copied().collect();

    let mut small: HallReverb<EarlyReflections, LateReverb, 7> =
        HallReverb::with_engines(EarlyReflections::new(SR), LateReverb::new(SR), SR);
    let mut large: HallReverb<EarlyReflections, LateReverb, 8192> =
        HallReverb::with_engines(EarlyReflections::new(SR), LateReverb::new(SR), SR);
    for hall_param in [HallParam::LateRoomSize, HallParam::EarlyRoomSize] {
        small.set_param(hall_param, 1.3);
        large.set_param(hall_param, 1.3);
    }

    let (sl, sr) = run(&mut small, &input_l, &input_r);
    let (ll, lr) = run(&mut large, &input_l, &input_r);
    assert_eq!(sl, ll, "left differs between chunk sizes");
    assert_eq!(sr, lr, "right differs between chunk sizes");
}

#[test]
fn test_impulse_scenario() {
    let mut hall = HallReverb::new(SR);
    let mut impulse = vec![0.0; 1024];
    impulse[0] = 1.0;
    let (l, r) = run(&mut hall, &impulse, &impulse);

    assert_eq!(l[0], 0.8, "dry level only at sample 0");
    assert_eq!(r[0], 0.8);

    let first_reflection = hall.early().first_tap_samples();
    assert!(
        l[1..first_reflection].iter().all(|s| *s == 0.0),
        "nothing may arrive before the earliest reflection"
    );

    let wet_energy: f32 = l[1..].iter().chain(&r[1..]).map(|s| s * s).sum();
    assert!(wet_energy > 0.0);
    assert!(l.iter().chain(&r).all(|s| s.is_finite()));
}

#[test]
fn test_late_onset_not_before_predelay() {
    let mut hall = HallReverb::new(SR);
    hall.set_dry_level(0.0);
    hall.set_early_level(0.0);
    hall.set_late_level(1.0);
    hall.set_late_predelay(20.0);

    let mut impulse = vec![0.0; 8192];
    impulse[0] = 1.0;
    let (l, _) = run(&mut hall, &impulse, &impulse);

    let predelay = hall.late().predelay_samples();
    assert_eq!(predelay, 882);
    let onset = l.iter().position(|s| *s != 0.0).expect("late engine stayed silent");
    assert!(onset >= predelay, "late onset {onset} before predelay {predelay}");
}

#[test]
fn test_mono_layout_duplicates_input() {
    let input = ramp(2000);

    let mut mono = HallReverb::new(SR);
    let mut mono_l = vec![0.0; 2000];
    let mut mono_r = vec![0.0; 2000];
    mono.process_channels(&[input.as_slice()], &mut [mono_l.as_mut_slice(), mono_r.as_mut_slice()]);

    let mut stereo = HallReverb::new(SR);
    let (st_l, st_r) = run(&mut stereo, &input, &input);

    assert_eq!(mono_l, st_l);
    assert_eq!(mono_r, st_r);
}

#[test]
fn test_stereo_layout_matches_process() {
    let left = ramp(700);
    let right: Vec<f32> = left.iter().map(|x| 0.5 * x).collect();

    let mut a = HallReverb::new(SR);
    let mut out_l = vec![0.0; 700];
    let mut out_r = vec![0.0; 700];
    a.process_channels(
        &[left.as_slice(), right.as_slice()],
        &mut [out_l.as_mut_slice(), out_r.as_mut_slice()],
    );

    let mut b = HallReverb::new(SR);
    assert_eq!((out_l, out_r), run(&mut b, &left, &right));
}

#[test]
#[should_panic(expected = "unsupported channel layout")]
fn test_stereo_to_mono_layout_panics() {
    let mut hall = HallReverb::new(SR);
    let input = [0.0; 16];
    let mut out = [0.0; 16];
    hall.process_channels(&[input.as_slice(), input.as_slice()], &mut [out.as_mut_slice()]);
}

#[test]
#[should_panic(expected = "unsupported channel layout")]
fn test_three_inputs_panic() {
    let mut hall = HallReverb::new(SR);
    let input = [0.0; 16];
    let mut out_l = [0.0; 16];
    let mut out_r = [0.0; 16];
    hall.process_channels(
        &[input.as_slice(), input.as_slice(), input.as_slice()],
        &mut [out_l.as_mut_slice(), out_r.as_mut_slice()],
    );
}

#[test]
fn test_in_place_matches_separate_buffers() {
    let left = ramp(3000);
    let right: Vec<f32> = left.iter().map(|x| x * x - 0.5).collect();

    let mut separate = HallReverb::new(SR);
    let (sep_l, sep_r) = run(&mut separate, &left, &right);

    let mut in_place = HallReverb::new(SR);
    let mut buf_l = left.clone();
    let mut buf_r = right.clone();
    in_place.process_in_place(&mut buf_l, &mut buf_r);

    assert_eq!(buf_l, sep_l);
    assert_eq!(buf_r, sep_r);
}

#[test]
fn test_in_place_matches_separate_buffers_across_small_chunks() {
    let left = ramp(50);
    let right: Vec<f32> = left.iter().map(|x| -x).collect();

    let mut separate = fake::<7>();
    let (sep_l, sep_r) = run(&mut separate, &left, &right);

    let mut in_place = fake::<7>();
    let mut buf_l = left.clone();
    let mut buf_r = right.clone();
    in_place.process_in_place(&mut buf_l, &mut buf_r);

    assert_eq!(buf_l, sep_l, "each chunk reads its dry input before overwriting it");
    assert_eq!(buf_r, sep_r);
}

#[test]
fn test_sample_rate_change_reconfigures_everything() {
    let mut hall = fake::<64>();
    run(&mut hall, &[0.0; 4], &[0.0; 4]);
    let mark = hall.late().log.len();

    hall.set_sample_rate(96000.0);
    assert_eq!(hall.sample_rate(), 96000.0);
    assert!(hall.has_pending_reconfiguration());
    let late = &hall.late().log[mark..];
    assert_eq!(late[0], Event::SampleRate(96000.0));
    assert!(late.contains(&Event::Set("set_lfo1_freq", 0.9)));

    run(&mut hall, &[0.0; 4], &[0.0; 4]);
    let late = &hall.late().log[mark..];
    assert!(late.contains(&Event::RoomSize(0.5)));
    assert!(late.contains(&Event::Predelay(8.0)));
}

#[test]
fn test_shared_params_applied_exactly_once() {
    let shared = SharedParams::new();
    let mut hall = fake::<64>();

    std::thread::scope(|s| {
        s.spawn(|| {
            shared.set(HallParam::LateDecay, 4.0);
            shared.set(HallParam::EarlyRoomSize, 2.5);
        });
    });

    hall.apply_shared(&shared);
    hall.apply_shared(&shared);

    assert_eq!(hall.param(HallParam::LateDecay), 4.0);
    assert_eq!(hall.param(HallParam::EarlyRoomSize), 2.5);
    assert_eq!(
        count(&hall.late().log, |e| *e == Event::Set("set_decay", 4.0)),
        1,
        "a pending change is forwarded once"
    );
    assert!(hall.has_pending_reconfiguration(), "room size still waits for process");
}
