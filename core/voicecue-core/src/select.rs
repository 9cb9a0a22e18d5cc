//! Reduces a [`SoundSpec`] to one sound identifier.
//!
//! The picking strategy sits behind [`VariantPicker`] so tests and batch
//! tools can swap the thread-local RNG for a seeded or fixed choice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::SoundSpec;

/// Identifier used whenever a spec cannot produce a usable name.
pub const FALLBACK_SOUND: &str = "task_complete";

/// Chooses an index into a non-empty list of variants.
pub trait VariantPicker {
    /// `len` is always at least 1; the result must be below `len`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform choice using the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl VariantPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Uniform choice from a seeded generator; reproducible across runs.
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl VariantPicker for SeededPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always the first variant.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl VariantPicker for FirstPicker {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

/// Returns one identifier from `spec`, never an empty one.
pub fn select(spec: &SoundSpec, picker: &mut dyn VariantPicker) -> String {
    let chosen = match spec {
        SoundSpec::Single(name) => Some(name.as_str()),
        SoundSpec::Variants(names) => {
            let usable: Vec<&str> = names
                .iter()
                .map(String::as_str)
                .filter(|name| !name.trim().is_empty())
                .collect();
            if usable.is_empty() {
                None
            } else {
                let idx = picker.pick(usable.len()).min(usable.len() - 1);
                usable.get(idx).copied()
            }
        }
        SoundSpec::Malformed(value) => {
            tracing::warn!(value = %value, "Malformed sound spec");
            None
        }
    };

    match chosen {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            tracing::warn!(fallback = FALLBACK_SOUND, "Sound spec produced no identifier");
            FALLBACK_SOUND.to_string()
        }
    }
}
