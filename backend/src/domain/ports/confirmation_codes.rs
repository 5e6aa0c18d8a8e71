//! Port for confirmation code generation.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::domain::{ClaimValidationError, ConfirmationCode};

#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationCodeGenerator: Send + Sync {
    /// Fresh code for a claim at `restaurant_name`.
    fn generate(&self, restaurant_name: &str) -> Result<ConfirmationCode, ClaimValidationError>;
}

/// Draws suffixes uniformly from `[0-9A-Z]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomConfirmationCodes;

impl ConfirmationCodeGenerator for RandomConfirmationCodes {
    fn generate(&self, restaurant_name: &str) -> Result<ConfirmationCode, ClaimValidationError> {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ConfirmationCode::SUFFIX_LEN)
            .map(|_| {
                let index = rng.gen_range(0..ConfirmationCode::ALPHABET.len());
                char::from(ConfirmationCode::ALPHABET[index])
            })
            .collect();
        ConfirmationCode::from_parts(restaurant_name, &suffix)
    }
}

/// Deterministic generator: suffixes count up from `00000001`.
#[derive(Debug, Default)]
pub struct FixtureConfirmationCodes {
    next: AtomicU64,
}

impl ConfirmationCodeGenerator for FixtureConfirmationCodes {
    fn generate(&self, restaurant_name: &str) -> Result<ConfirmationCode, ClaimValidationError> {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        ConfirmationCode::from_parts(restaurant_name, &format!("{:08}", n % 100_000_000))
    }
}
