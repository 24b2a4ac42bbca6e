//! Random batch selection
//!
//! Every slot of a batch is an independent uniform draw over the whole
//! list, with replacement. Nothing is remembered between batches: the same
//! item may repeat inside one batch and across consecutive ones.

use rand::Rng;
use tracing::debug;

use crate::count::SampleCount;

/// Draw `count` items uniformly at random, with replacement
///
/// An empty list yields an empty batch whatever the count; callers treat
/// that as the signal to go back to loading a list.
///
/// # Example
/// ```
/// use list_selector::count::SampleCount;
/// use list_selector::selector::draw_batch;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let list = vec!["apple".to_string(), "banana".to_string(), "cherry".to_string()];
/// let mut rng = StdRng::seed_from_u64(42);
/// let batch = draw_batch(&list, SampleCount::new(2).unwrap(), &mut rng);
/// assert_eq!(batch.len(), 2);
/// assert!(batch.iter().all(|item| list.contains(item)));
/// ```
pub fn draw_batch<R: Rng + ?Sized>(list: &[String], count: SampleCount, rng: &mut R) -> Vec<String> {
    if list.is_empty() {
        return Vec::new();
    }

    (0..count.as_usize())
        .map(|_| list[rng.gen_range(0..list.len())].clone())
        .collect()
}

/// Which view the caller should show after a selector transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Stay on (or move to) the selection view
    Selection,
    /// The list is empty; go back to loading one
    Configure,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Unloaded,
    Ready(Vec<String>),
}

/// Holds the current batch and decides when to leave the selection view
#[derive(Debug, Clone, Default)]
pub struct Selector {
    stage: Stage,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Current batch, if one is being shown
    pub fn batch(&self) -> Option<&[String]> {
        match &self.stage {
            Stage::Ready(batch) => Some(batch),
            Stage::Unloaded => None,
        }
    }

    /// Enter the selection view, drawing the first batch
    pub fn enter<R: Rng + ?Sized>(
        &mut self,
        list: &[String],
        count: SampleCount,
        rng: &mut R,
    ) -> Navigation {
        self.draw(list, count, rng)
    }

    /// Draw a fresh batch to replace the current one
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        list: &[String],
        count: SampleCount,
        rng: &mut R,
    ) -> Navigation {
        self.draw(list, count, rng)
    }

    /// Leave the selection view without drawing
    pub fn reset(&mut self) {
        self.stage = Stage::Unloaded;
    }

    fn draw<R: Rng + ?Sized>(&mut self, list: &[String], count: SampleCount, rng: &mut R) -> Navigation {
        let batch = draw_batch(list, count, rng);
        if batch.is_empty() {
            debug!("empty batch, returning to configuration");
            self.stage = Stage::Unloaded;
            return Navigation::Configure;
        }

        debug!(size = batch.len(), "drew batch");
        self.stage = Stage::Ready(batch);
        Navigation::Selection
    }
}
