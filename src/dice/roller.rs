//! d10 sources
//!
//! Every resolution draws faces from a `DiceRoller`. A seeded roller makes
//! whole sessions reproducible; the scripted roller feeds exact faces to
//! tests. Parallel resolutions each own their roller (or their own stream
//! of one seed) so draws never interleave nondeterministically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Uniform d10 source
pub trait DiceRoller {
    /// Next face in [1, 10]
    fn next_d10(&mut self) -> u8;
}

/// ChaCha8-backed roller, seedable for reproducible sessions
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: ChaCha8Rng,
}

impl SeededRoller {
    /// Same seed, same sequence of faces, every time
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// OS-entropy seeding for play sessions that don't need replay
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl DiceRoller for SeededRoller {
    fn next_d10(&mut self) -> u8 {
        self.rng.gen_range(1..=10)
    }
}

/// Scripted roller yielding a fixed sequence of faces
///
/// Test support: panics when the script runs dry, which in a test is the
/// right kind of loud.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    faces: VecDeque<u8>,
}

impl ScriptedRoller {
    pub fn new(faces: &[u8]) -> Self {
        debug_assert!(faces.iter().all(|f| (1..=10).contains(f)));
        Self {
            faces: faces.iter().copied().collect(),
        }
    }

    /// Faces not yet drawn
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceRoller for ScriptedRoller {
    fn next_d10(&mut self) -> u8 {
        self.faces
            .pop_front()
            .expect("scripted roller ran out of faces")
    }
}
