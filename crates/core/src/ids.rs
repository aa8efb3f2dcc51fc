//! Record identifier generation.
//!
//! Tokens are random and short; uniqueness is probabilistic and collisions are not
//! detected.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

pub const QUOTE_ID_PREFIX: &str = "QT-";
const QUOTE_TOKEN_LEN: usize = 5;
const SHORT_TOKEN_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdScheme {
    /// `QT-` followed by five uppercase hex characters.
    Quote,
    /// Eight lowercase hex characters.
    Short,
}

pub trait IdGenerator: Send + Sync {
    fn generate(&self, scheme: IdScheme) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self, scheme: IdScheme) -> String {
        let token = Uuid::new_v4().simple().to_string();
        match scheme {
            IdScheme::Quote => {
                format!("{QUOTE_ID_PREFIX}{}", token[..QUOTE_TOKEN_LEN].to_ascii_uppercase())
            }
            IdScheme::Short => token[..SHORT_TOKEN_LEN].to_string(),
        }
    }
}

/// Deterministic ids (`QT-00001`, `00000001`, ...) for tests and fixtures.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self, scheme: IdScheme) -> String {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        match scheme {
            IdScheme::Quote => format!("{QUOTE_ID_PREFIX}{sequence:0width$X}", width = QUOTE_TOKEN_LEN),
            IdScheme::Short => format!("{sequence:0width$x}", width = SHORT_TOKEN_LEN),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{
        IdGenerator, IdScheme, SequentialIdGenerator, UuidIdGenerator, QUOTE_ID_PREFIX,
        QUOTE_TOKEN_LEN,
    };

    fn is_quote_id(id: &str) -> bool {
        id.strip_prefix(QUOTE_ID_PREFIX).is_some_and(|token| {
            token.len() == QUOTE_TOKEN_LEN
                && token.chars().all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch))
        })
    }

    #[test]
    fn quote_ids_use_prefix_and_uppercase_hex() {
        let generator = UuidIdGenerator;
        for _ in 0..64 {
            let id = generator.generate(IdScheme::Quote);
            assert!(is_quote_id(&id), "unexpected quote id shape: {id}");
        }
    }

    #[test]
    fn short_ids_are_eight_hex_chars() {
        let id = UuidIdGenerator.generate(IdScheme::Short);
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn short_ids_rarely_collide() {
        let generator = UuidIdGenerator;
        let ids: HashSet<String> = (0..200).map(|_| generator.generate(IdScheme::Short)).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn sequential_generator_is_deterministic() {
        let generator = SequentialIdGenerator::new();
        assert_eq!(generator.generate(IdScheme::Quote), "QT-00001");
        assert_eq!(generator.generate(IdScheme::Short), "00000002");
        assert_eq!(generator.generate(IdScheme::Quote), "QT-00003");
    }

    #[test]
    fn quote_id_shape_rejects_lowercase_and_wrong_length() {
        assert!(!is_quote_id("QT-DEMO1"));
        assert!(!is_quote_id("QT-abcde"));
        assert!(!is_quote_id("QT-ABC"));
        assert!(is_quote_id("QT-0A9F3"));
    }
}
