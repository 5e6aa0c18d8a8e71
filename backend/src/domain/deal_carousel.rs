//! Deal rotation for restaurants that offer more than one deal.
//!
//! The carousel is view state: it only decides which deal index is selected.
//! The selected index then feeds the claim workflow via `ClaimRequest`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Direction of a carousel step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Next,
    Previous,
}

impl std::str::FromStr for StepDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            _ => Err(UnknownDirection(s.to_owned())),
        }
    }
}

/// Error returned for unknown step directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {0:?}; expected next or previous")]
pub struct UnknownDirection(pub String);

/// Delays applied around a deal change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    pub fade: Duration,
    pub settle: Duration,
}

impl Default for CarouselTiming {
    fn default() -> Self {
        Self {
            fade: Duration::from_millis(200),
            settle: Duration::from_millis(50),
        }
    }
}

/// Error returned when a carousel is created or positioned out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    #[error("a carousel needs at least one deal")]
    Empty,
    #[error("deal index {index} is out of range for {len} deals")]
    OutOfRange { index: usize, len: usize },
}

/// Selected deal index with wrap-around stepping.
///
/// ## Invariants
/// - `index < len` and `len >= 1`.
/// - An in-flight [`DealCarousel::step`] borrows the carousel mutably, so no
///   other step can start until it completes or is dropped.
/// - Dropping a step during the fade leaves the index untouched; dropping it
///   during the settle keeps the new index.
///
/// # Examples
/// ```
/// use tastetrail::domain::{DealCarousel, StepDirection};
///
/// let mut carousel = DealCarousel::new(3).expect("three deals");
/// carousel.step_now(StepDirection::Previous);
/// assert_eq!(carousel.index(), 2);
/// carousel.step_now(StepDirection::Next);
/// assert_eq!(carousel.index(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealCarousel {
    index: usize,
    len: usize,
}

impl DealCarousel {
    pub fn new(len: usize) -> Result<Self, CarouselError> {
        Self::at(0, len)
    }

    /// Carousel positioned at `index`.
    pub fn at(index: usize, len: usize) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        if index >= len {
            return Err(CarouselError::OutOfRange { index, len });
        }
        Ok(Self { index, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index that a step in `direction` would select.
    pub fn peek(&self, direction: StepDirection) -> usize {
        match direction {
            StepDirection::Next => (self.index + 1) % self.len,
            StepDirection::Previous => (self.index + self.len - 1) % self.len,
        }
    }

    /// Step without delay. Returns `false` when the step was ignored.
    pub fn step_now(&mut self, direction: StepDirection) -> bool {
        if self.len <= 1 {
            return false;
        }
        self.index = self.peek(direction);
        true
    }

    /// Step with the fade/settle delays.
    ///
    /// The target index is fixed before the fade and committed in one
    /// assignment after it. Returns `false` without waiting when the step is
    /// ignored.
    pub async fn step(&mut self, direction: StepDirection, timing: CarouselTiming) -> bool {
        if self.len <= 1 {
            return false;
        }
        let target = self.peek(direction);
        tokio::time::sleep(timing.fade).await;
        self.index = target;
        tokio::time::sleep(timing.settle).await;
        true
    }
}
