//! # Tracking Identifiers
//!
//! Sources of per-label tracking numbers. The sheet compositor asks an
//! [`IdSource`] for one identifier per generated label; tests inject
//! [`FixedIds`] or [`SeededIds`] to make sheets reproducible.
//!
//! Generated identifiers are a prefix followed by random decimal digits.
//! Collisions are not checked, so uniqueness within a sheet is probabilistic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TrackingConfig;

/// Produces tracking identifiers.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

impl<F> IdSource for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Append `count` random decimal digits to `prefix`.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str, count: usize) -> String {
    let mut id = String::with_capacity(prefix.len() + count);
    id.push_str(prefix);
    for _ in 0..count {
        let digit = rng.random_range(0..10u8);
        id.push(char::from(b'0' + digit));
    }
    id
}

/// Identifiers drawn from the thread-local random generator.
#[derive(Debug, Clone)]
pub struct RandomIds {
    prefix: String,
    digits: usize,
}

impl RandomIds {
    pub fn new(prefix: impl Into<String>, digits: usize) -> Self {
        Self {
            prefix: prefix.into(),
            digits,
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.prefix.clone(), config.digits)
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let mut rng = rand::rng();
        random_id(&mut rng, &self.prefix, self.digits)
    }
}

/// Identifiers from a seeded generator; the same seed gives the same sequence.
#[derive(Debug, Clone)]
pub struct SeededIds {
    prefix: String,
    digits: usize,
    rng: StdRng,
}

impl SeededIds {
    pub fn new(prefix: impl Into<String>, digits: usize, seed: u64) -> Self {
        Self {
            prefix: prefix.into(),
            digits,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_config(config: &TrackingConfig, seed: u64) -> Self {
        Self::new(config.prefix.clone(), config.digits, seed)
    }
}

impl IdSource for SeededIds {
    fn next_id(&mut self) -> String {
        random_id(&mut self.rng, &self.prefix, self.digits)
    }
}

/// A fixed list of identifiers, repeated from the start once exhausted.
#[derive(Debug, Clone)]
pub struct FixedIds {
    ids: Vec<String>,
    cursor: usize,
}

impl FixedIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }
}

impl IdSource for FixedIds {
    fn next_id(&mut self) -> String {
        if self.ids.is_empty() {
            return String::new();
        }
        let id = self.ids[self.cursor % self.ids.len()].clone();
        self.cursor += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_id_format() {
        let mut ids = RandomIds::new("TRK", 10);
        for _ in 0..50 {
            let id = ids.next_id();
            assert_eq!(id.len(), 13);
            assert!(id.starts_with("TRK"));
            assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededIds::new("PC", 8, 42);
        let mut b = SeededIds::new("PC", 8, 42);
        let first: Vec<_> = (0..5).map(|_| a.next_id()).collect();
        let second: Vec<_> = (0..5).map(|_| b.next_id()).collect();
        assert_eq!(first, second);

        let mut c = SeededIds::new("PC", 8, 43);
        let third: Vec<_> = (0..5).map(|_| c.next_id()).collect();
        assert_ne!(first, third);
    }

    #[test]
    fn test_fixed_cycles() {
        let mut ids = FixedIds::new(["A1", "B2"]);
        assert_eq!(ids.next_id(), "A1");
        assert_eq!(ids.next_id(), "B2");
        assert_eq!(ids.next_id(), "A1");

        let mut empty = FixedIds::new(Vec::<String>::new());
        assert_eq!(empty.next_id(), "");
    }

    #[test]
    fn test_closure_source() {
        let mut n = 0;
        let mut source = || {
            n += 1;
            format!("N{}", n)
        };
        assert_eq!(source.next_id(), "N1");
        assert_eq!(source.next_id(), "N2");
    }

    #[test]
    fn test_from_config() {
        let config = TrackingConfig {
            prefix: "POST".to_string(),
            digits: 4,
        };
        let id = RandomIds::from_config(&config).next_id();
        assert!(id.starts_with("POST"));
        assert_eq!(id.len(), 8);
    }
}
