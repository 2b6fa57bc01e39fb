// THEORY:
// The algorithm selector turns a difficulty into a concrete transform. Difficulty is
// split into three tiers, each with a fixed pool of transforms, and the pick within a
// pool is uniform. Easy tiers lean on large, obvious edits (removing or adding an
// object, flipping); hard tiers lean on faint photometric and geometric perturbation.
//
// Algorithms are a closed set, so they are an enum and dispatch is a single `match`
// (see `transforms::apply`). The discriminants are the stable ids 0..=9 used when
// reporting which algorithm produced a difference.

use crate::core_modules::difficulty::Difficulty;
use rand::Rng;

/// The ten difference-synthesis algorithms, with their stable ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[repr(u8)]
pub enum AlgorithmId {
    ColorShift = 0,
    ObjectRemoval = 1,
    TextureChange = 2,
    ShapeDeform = 3,
    SubtlePattern = 4,
    ScaleChange = 5,
    Rotation = 6,
    Flip = 7,
    Blur = 8,
    Addition = 9,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 10] = [
        AlgorithmId::ColorShift,
        AlgorithmId::ObjectRemoval,
        AlgorithmId::TextureChange,
        AlgorithmId::ShapeDeform,
        AlgorithmId::SubtlePattern,
        AlgorithmId::ScaleChange,
        AlgorithmId::Rotation,
        AlgorithmId::Flip,
        AlgorithmId::Blur,
        AlgorithmId::Addition,
    ];

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmId::ColorShift => "color_shift",
            AlgorithmId::ObjectRemoval => "object_removal",
            AlgorithmId::TextureChange => "texture_change",
            AlgorithmId::ShapeDeform => "shape_deform",
            AlgorithmId::SubtlePattern => "subtle_pattern",
            AlgorithmId::ScaleChange => "scale_change",
            AlgorithmId::Rotation => "rotation",
            AlgorithmId::Flip => "flip",
            AlgorithmId::Blur => "blur",
            AlgorithmId::Addition => "addition",
        }
    }
}

impl From<AlgorithmId> for u8 {
    fn from(algorithm: AlgorithmId) -> u8 {
        algorithm.id()
    }
}

impl TryFrom<u8> for AlgorithmId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_id(value).ok_or(value)
    }
}

const EASY_POOL: [AlgorithmId; 5] = [
    AlgorithmId::ColorShift,
    AlgorithmId::ObjectRemoval,
    AlgorithmId::Rotation,
    AlgorithmId::Flip,
    AlgorithmId::Addition,
];

const MEDIUM_POOL: [AlgorithmId; 4] = [
    AlgorithmId::TextureChange,
    AlgorithmId::ShapeDeform,
    AlgorithmId::ScaleChange,
    AlgorithmId::Blur,
];

const HARD_POOL: [AlgorithmId; 4] = [
    AlgorithmId::SubtlePattern,
    AlgorithmId::ShapeDeform,
    AlgorithmId::TextureChange,
    AlgorithmId::Blur,
];

/// A difficulty band with its own algorithm pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Difficulty 1-3.
    Easy,
    /// Difficulty 4-7.
    Medium,
    /// Difficulty 8-10.
    Hard,
}

impl Tier {
    pub fn for_difficulty(difficulty: Difficulty) -> Tier {
        match difficulty.get() {
            0..=3 => Tier::Easy,
            4..=7 => Tier::Medium,
            _ => Tier::Hard,
        }
    }

    pub fn pool(self) -> &'static [AlgorithmId] {
        match self {
            Tier::Easy => &EASY_POOL,
            Tier::Medium => &MEDIUM_POOL,
            Tier::Hard => &HARD_POOL,
        }
    }
}

/// Picks an algorithm uniformly from the difficulty's tier pool.
pub fn select_algorithm<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> AlgorithmId {
    let pool = Tier::for_difficulty(difficulty).pool();
    pool[rng.random_range(0..pool.len())]
}

/// Picks uniformly among the tier's algorithms that have not been tried yet.
/// Returns `None` once the whole pool is exhausted.
pub fn select_algorithm_excluding<R: Rng + ?Sized>(
    difficulty: Difficulty,
    tried: &[AlgorithmId],
    rng: &mut R,
) -> Option<AlgorithmId> {
    let remaining: Vec<AlgorithmId> = Tier::for_difficulty(difficulty)
        .pool()
        .iter()
        .copied()
        .filter(|a| !tried.contains(a))
        .collect();
    if remaining.is_empty() {
        return None;
    }
    Some(remaining[rng.random_range(0..remaining.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn ids_are_stable_and_round_trip() {
        for (i, algorithm) in AlgorithmId::ALL.iter().enumerate() {
            assert_eq!(algorithm.id() as usize, i);
            assert_eq!(AlgorithmId::try_from(i as u8), Ok(*algorithm));
        }
        assert_eq!(AlgorithmId::try_from(10), Err(10));
    }

    #[test]
    fn tiers_follow_difficulty_bands() {
        assert_eq!(Tier::for_difficulty(Difficulty::new(1)), Tier::Easy);
        assert_eq!(Tier::for_difficulty(Difficulty::new(3)), Tier::Easy);
        assert_eq!(Tier::for_difficulty(Difficulty::new(4)), Tier::Medium);
        assert_eq!(Tier::for_difficulty(Difficulty::new(7)), Tier::Medium);
        assert_eq!(Tier::for_difficulty(Difficulty::new(8)), Tier::Hard);
        assert_eq!(Tier::for_difficulty(Difficulty::new(10)), Tier::Hard);
    }

    #[test]
    fn selection_stays_in_pool_and_covers_it() {
        let mut rng = Pcg32::seed_from_u64(7);
        for d in 1..=10 {
            let difficulty = Difficulty::new(d);
            let pool = Tier::for_difficulty(difficulty).pool();
            let mut seen = Vec::new();
            for _ in 0..500 {
                let algorithm = select_algorithm(difficulty, &mut rng);
                assert!(pool.contains(&algorithm), "{algorithm:?} not in pool for {d}");
                if !seen.contains(&algorithm) {
                    seen.push(algorithm);
                }
            }
            assert_eq!(seen.len(), pool.len());
        }
    }

    #[test]
    fn excluding_walks_the_whole_pool_then_stops() {
        let mut rng = Pcg32::seed_from_u64(11);
        let difficulty = Difficulty::new(2);
        let mut tried = Vec::new();
        while let Some(next) = select_algorithm_excluding(difficulty, &tried, &mut rng) {
            assert!(!tried.contains(&next));
            tried.push(next);
        }
        assert_eq!(tried.len(), Tier::Easy.pool().len());
    }
}
