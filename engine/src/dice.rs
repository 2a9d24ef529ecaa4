use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::CheckError;

#[derive(Debug)]
enum Source {
    Rng(ChaCha8Rng),
    Scripted { values: Vec<u8>, next: usize },
}

/// The d20 source handed to the resolver.
///
/// Seeded dice give reproducible sessions; scripted dice replay a fixed
/// sequence (cycling when it runs out) for tests and recorded games.
#[derive(Debug)]
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Rng(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            source: Source::Rng(ChaCha8Rng::from_entropy()),
        }
    }

    /// Every scripted value must be a legal face; an empty script is rejected.
    pub fn from_scripted(values: Vec<u8>) -> Result<Self, CheckError> {
        if values.is_empty() {
            return Err(CheckError::EmptyScript);
        }
        if let Some(&bad) = values.iter().find(|v| !(1..=20).contains(*v)) {
            return Err(CheckError::ScriptedOutOfRange(bad));
        }
        Ok(Self {
            source: Source::Scripted { values, next: 0 },
        })
    }

    /// One uniform draw in 1..=20.
    pub fn d20(&mut self) -> u8 {
        match &mut self.source {
            Source::Rng(rng) => rng.gen_range(1..=20),
            Source::Scripted { values, next } => {
                let v = values[*next % values.len()];
                *next += 1;
                v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_cycles() {
        let mut d = Dice::from_scripted(vec![3, 18]).unwrap();
        assert_eq!([d.d20(), d.d20(), d.d20()], [3, 18, 3]);
    }

    #[test]
    fn scripted_faces_must_be_legal() {
        assert_eq!(
            Dice::from_scripted(vec![5, 0]).unwrap_err(),
            CheckError::ScriptedOutOfRange(0)
        );
        assert_eq!(
            Dice::from_scripted(vec![21]).unwrap_err(),
            CheckError::ScriptedOutOfRange(21)
        );
        assert_eq!(Dice::from_scripted(vec![]).unwrap_err(), CheckError::EmptyScript);
        assert!(Dice::from_scripted(vec![1, 20]).is_ok());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Dice::from_seed(99);
        let mut b = Dice::from_seed(99);
        for _ in 0..32 {
            let r = a.d20();
            assert_eq!(r, b.d20());
            assert!((1..=20).contains(&r));
        }
    }
}
