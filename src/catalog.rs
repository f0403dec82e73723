//! Stretch and exercise animations offered to the UI

use rand::{seq::SliceRandom, Rng};

pub const STRETCH_GIFS: [&str; 8] = [
    "stretch1.gif",
    "stretch2.gif",
    "stretch3.gif",
    "stretch4.gif",
    "stretch5.gif",
    "stretch6.gif",
    "stretch7.gif",
    "stretch8.gif",
];

pub const EXERCISE_GIFS: [&str; 6] = [
    "pushups.gif",
    "squats.gif",
    "High-knees.gif",
    "jumping-jack.gif",
    "lunges.gif",
    "mountain-climber.gif",
];

/// Stretches shown in one session
pub const STRETCH_SET_SIZE: usize = 4;

/// Up to `count` distinct stretches in random order
pub fn pick_stretches<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<&'static str> {
    STRETCH_GIFS.choose_multiple(rng, count).copied().collect()
}

pub fn pick_exercise<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    EXERCISE_GIFS.choose(rng).copied().unwrap_or(EXERCISE_GIFS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stretch_sets_never_repeat() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let picked = pick_stretches(&mut rng, STRETCH_SET_SIZE);
            assert_eq!(picked.len(), STRETCH_SET_SIZE);
            assert_eq!(picked.iter().collect::<HashSet<_>>().len(), STRETCH_SET_SIZE);
            assert!(picked.iter().all(|gif| STRETCH_GIFS.contains(gif)));
        }
    }

    #[test]
    fn oversized_requests_return_the_whole_catalog() {
        let picked = pick_stretches(&mut rand::thread_rng(), 20);
        assert_eq!(picked.len(), STRETCH_GIFS.len());
    }

    #[test]
    fn exercises_come_from_the_catalog() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            assert!(EXERCISE_GIFS.contains(&pick_exercise(&mut rng)));
        }
    }
}
