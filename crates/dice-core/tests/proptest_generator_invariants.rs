#![forbid(unsafe_code)]

//! Property tests for the scene generator and toggle overrides.
//!
//! 1. **Chaos monotonicity** - speed, size max and every chaos-scaled
//!    probability gate are non-decreasing in the chaos level.
//! 2. **Toggle involution** - applying a toggle on and then off returns the
//!    scene it started from, for any generated scene.
//! 3. **Assembled scenes are valid** - every scope yields a tree that passes
//!    the validity predicate and carries the configured particle count.

use dice_core::assembly::{ShuffleScope, build_configuration};
use dice_core::generator::{
    COLLISIONS_BASE, GenerationParams, MOVE_ATTRACT_BASE, RANDOM_COLOR_BASE, ROTATE_BASE,
    STROKE_BASE, SceneGenerator, TRAIL_BASE, TRIANGLES_BASE, TWINKLE_BASE, WOBBLE_BASE,
};
use dice_core::scene::is_valid_configuration;
use dice_core::state::OriginalModeMemory;
use dice_core::toggles::{apply_cursor, apply_gravity, apply_walls};
use dice_core::{AppState, ChaosLevel, DiceSettings, SceneConfig, SceneRng, scaled_probability};
use proptest::prelude::*;

const GATES: [f64; 9] = [
    RANDOM_COLOR_BASE,
    STROKE_BASE,
    TRAIL_BASE,
    MOVE_ATTRACT_BASE,
    COLLISIONS_BASE,
    WOBBLE_BASE,
    ROTATE_BASE,
    TRIANGLES_BASE,
    TWINKLE_BASE,
];

fn chaos_pair() -> impl Strategy<Value = (ChaosLevel, ChaosLevel)> {
    (1i64..=10, 1i64..=10).prop_map(|(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        (ChaosLevel::new(lo), ChaosLevel::new(hi))
    })
}

fn params(chaos: ChaosLevel) -> GenerationParams {
    GenerationParams {
        chaos,
        dark_mode: true,
    }
}

fn generated_scene(seed: u64, chaos: ChaosLevel) -> SceneConfig {
    let mut state = AppState::new(chaos, true);
    let mut rng = SceneRng::seeded(seed);
    build_configuration(&mut state, &mut rng, &DiceSettings::default(), ShuffleScope::All)
}

proptest! {
    #[test]
    fn probability_gates_are_monotone((lo, hi) in chaos_pair()) {
        for base in GATES {
            prop_assert!(scaled_probability(base, lo) <= scaled_probability(base, hi));
        }
    }

    #[test]
    fn arbitrary_bases_are_monotone(base in 0.0f64..=1.0, (lo, hi) in chaos_pair()) {
        prop_assert!(scaled_probability(base, lo) <= scaled_probability(base, hi));
    }

    #[test]
    fn size_max_is_monotone(seed in any::<u64>(), (lo, hi) in chaos_pair()) {
        let low = SceneGenerator::new(&mut SceneRng::seeded(seed), params(lo)).appearance();
        let high = SceneGenerator::new(&mut SceneRng::seeded(seed), params(hi)).appearance();
        prop_assert!(low.size.value.max <= high.size.value.max);
    }

    #[test]
    fn speed_is_monotone_for_a_fixed_draw(seed in any::<u64>(), (lo, hi) in chaos_pair()) {
        let low = SceneGenerator::new(&mut SceneRng::seeded(seed), params(lo)).movement();
        let high = SceneGenerator::new(&mut SceneRng::seeded(seed), params(hi)).movement();
        prop_assert!(low.speed <= high.speed);
    }

    #[test]
    fn gravity_is_an_involution(seed in any::<u64>(), chaos in 1i64..=10) {
        let original = generated_scene(seed, ChaosLevel::new(chaos));
        let mut config = original.clone();
        apply_gravity(&mut config, true, 20.0);
        apply_gravity(&mut config, false, 20.0);
        prop_assert_eq!(config, original);
    }

    #[test]
    fn walls_are_an_involution(seed in any::<u64>(), chaos in 1i64..=10) {
        let original = generated_scene(seed, ChaosLevel::new(chaos));
        let mut config = original.clone();
        let mut memory = OriginalModeMemory::default();
        apply_walls(&mut config, true, &mut memory);
        apply_walls(&mut config, false, &mut memory);
        prop_assert_eq!(config, original);
        prop_assert!(memory.out_modes.is_none());
    }

    #[test]
    fn cursor_is_an_involution(seed in any::<u64>(), chaos in 1i64..=10) {
        let original = generated_scene(seed, ChaosLevel::new(chaos));
        let mut config = original.clone();
        let mut memory = OriginalModeMemory::default();
        apply_cursor(&mut config, true, &mut memory);
        apply_cursor(&mut config, false, &mut memory);
        prop_assert_eq!(config, original);
    }

    #[test]
    fn assembled_scenes_are_valid(seed in any::<u64>(), chaos in 1i64..=10, scope in 0usize..5) {
        let scopes = [
            ShuffleScope::All,
            ShuffleScope::Appearance,
            ShuffleScope::Movement,
            ShuffleScope::Interaction,
            ShuffleScope::Fx,
        ];
        let level = ChaosLevel::new(chaos);
        let mut state = AppState::new(level, seed % 2 == 0);
        let mut rng = SceneRng::seeded(seed);
        let settings = DiceSettings::default();
        let first = build_configuration(&mut state, &mut rng, &settings, ShuffleScope::All);
        state.particles.current = Some(first);
        let next = build_configuration(&mut state, &mut rng, &settings, scopes[scope]);

        let value = serde_json::to_value(&next).unwrap();
        prop_assert!(is_valid_configuration(&value));
        prop_assert_eq!(next.particles.number.value, settings.particles.count_for(level));
    }
}
