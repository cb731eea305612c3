//! Short paste identifier generation with bounded collision handling.

use crate::constants::{ID_ALPHABET, ID_ATTEMPTS_PER_LENGTH, ID_LENGTH, ID_MAX_LENGTH};
use crate::error::AppError;
use rand::Rng;

/// Draw an identifier of `length` characters uniformly from `[a-z0-9]`.
pub fn generate_id<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Whether `value` has the shape of a paste identifier.
pub fn is_valid_id(value: &str) -> bool {
    (ID_LENGTH..=ID_MAX_LENGTH).contains(&value.len())
        && value.bytes().all(|b| ID_ALPHABET.contains(&b))
}

/// Allocates identifiers by drawing candidates until one is claimed.
///
/// After `attempts_per_length` collisions at one length the candidate length
/// grows by one, up to `max_length`.
#[derive(Debug, Clone, Copy)]
pub struct IdAllocator {
    length: usize,
    max_length: usize,
    attempts_per_length: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            length: ID_LENGTH,
            max_length: ID_MAX_LENGTH,
            attempts_per_length: ID_ATTEMPTS_PER_LENGTH,
        }
    }
}

impl IdAllocator {
    /// Build an allocator with custom limits.
    ///
    /// `max_length` is clamped to at least `length`, and `attempts_per_length`
    /// to at least one.
    pub fn with_limits(length: usize, max_length: usize, attempts_per_length: usize) -> Self {
        Self {
            length,
            max_length: max_length.max(length),
            attempts_per_length: attempts_per_length.max(1),
        }
    }

    /// Run `claim` on fresh candidates until it succeeds.
    ///
    /// `claim` must return [`AppError::IdConflict`] when the candidate is
    /// already taken; any other error aborts allocation.
    ///
    /// # Returns
    /// Whatever `claim` produced for the first unclaimed candidate.
    ///
    /// # Errors
    /// Returns [`AppError::AllocationExhausted`] when every length ran out of
    /// attempts, or the first non-conflict error from `claim`.
    pub fn allocate<T, F>(&self, mut claim: F) -> Result<T, AppError>
    where
        F: FnMut(String) -> Result<T, AppError>,
    {
        let mut rng = rand::thread_rng();
        let mut attempts = 0usize;
        for length in self.length..=self.max_length {
            for _ in 0..self.attempts_per_length {
                attempts += 1;
                match claim(generate_id(&mut rng, length)) {
                    Err(AppError::IdConflict(id)) => {
                        tracing::debug!("Paste id '{}' already taken, drawing again", id);
                    }
                    other => return other,
                }
            }
            if length < self.max_length {
                tracing::warn!(
                    "Paste id space at length {} is crowded; escalating to {}",
                    length,
                    length + 1
                );
            }
        }
        Err(AppError::AllocationExhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_use_the_fixed_alphabet() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let id = generate_id(&mut rng, ID_LENGTH);
            assert_eq!(id.len(), 4);
            assert!(id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
            assert!(is_valid_id(&id));
        }
    }

    #[test]
    fn is_valid_id_rejects_other_shapes() {
        for value in ["abc", "ABCD", "ab-1", "abcdefghi", ""] {
            assert!(!is_valid_id(value), "value: {}", value);
        }
    }

    #[test]
    fn allocate_retries_on_conflict() {
        let mut seen = Vec::new();
        let id = IdAllocator::default()
            .allocate(|candidate| {
                seen.push(candidate.clone());
                if seen.len() < 3 {
                    Err(AppError::IdConflict(candidate))
                } else {
                    Ok(candidate)
                }
            })
            .expect("third candidate should be claimed");
        assert_eq!(seen.len(), 3);
        assert_eq!(seen.last(), Some(&id));
    }

    #[test]
    fn allocate_escalates_length_after_repeated_conflicts() {
        let allocator = IdAllocator::with_limits(4, 5, 2);
        let id = allocator
            .allocate(|candidate| {
                if candidate.len() == 4 {
                    Err(AppError::IdConflict(candidate))
                } else {
                    Ok(candidate)
                }
            })
            .expect("length 5 should succeed");
        assert_eq!(id.len(), 5);
    }

    #[test]
    fn allocate_reports_exhaustion() {
        let allocator = IdAllocator::with_limits(4, 5, 3);
        let err = allocator
            .allocate::<String, _>(|candidate| Err(AppError::IdConflict(candidate)))
            .expect_err("every candidate conflicts");
        assert!(matches!(err, AppError::AllocationExhausted { attempts: 6 }));
    }

    #[test]
    fn allocate_propagates_storage_errors() {
        let mut calls = 0;
        let err = IdAllocator::default()
            .allocate::<String, _>(|_| {
                calls += 1;
                Err(AppError::StorageMessage("disk full".to_string()))
            })
            .expect_err("storage error aborts");
        assert_eq!(calls, 1);
        assert!(matches!(err, AppError::StorageMessage(_)));
    }

    #[test]
    fn ids_are_reasonably_spread() {
        let mut rng = rand::thread_rng();
        let ids: HashSet<String> = (0..500).map(|_| generate_id(&mut rng, ID_LENGTH)).collect();
        assert!(ids.len() > 490);
    }
}
