/// List Selector - draw random items from a newline-delimited list
///
/// A list is loaded from uploaded text or a predefined list, stored
/// together with a display name and a sample size, and then sampled in
/// batches: every batch draws `items_per_select` items uniformly at random,
/// with replacement. The list, its name, the sample size and the UI
/// preferences are persisted through a pluggable backend.
///
/// # Example
///
/// ```
/// # tokio_test::block_on(async {
/// use list_selector::{open_app, persist::MemoryStorage, View};
/// use std::sync::Arc;
///
/// let mut app = open_app(Arc::new(MemoryStorage::new())).unwrap();
/// app.set_items_per_select_input("2").unwrap();
///
/// // Either upload text...
/// app.select_upload("fruits.txt");
/// assert_eq!(app.finish_upload(Some("apple\nbanana\ncherry")).unwrap(), View::Selection);
/// assert_eq!(app.batch().unwrap().len(), 2);
///
/// // ...or pick a predefined list
/// app.load_predefined("say-anything-en").await.unwrap();
/// assert_eq!(app.get_started().unwrap(), View::Selection);
/// # });
/// ```
pub mod app;
pub mod count;
pub mod diagnostic;
pub mod i18n;
pub mod lists;
pub mod loader;
pub mod observe;
pub mod persist;
pub mod prefs;
pub mod query;
pub mod selector;
pub mod span;
pub mod store;

#[cfg(feature = "builtin-lists")]
pub mod builtin_lists;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Re-export main types for convenience
pub use app::{App, AppError, View};
pub use count::{parse_sample_count, CountError, SampleCount};
pub use lists::{split_lines, PredefinedList};
pub use loader::{ListSource, LoadError};
pub use persist::{PersistError, Persistence};
pub use selector::draw_batch;
pub use store::{ListState, ListStore};

/// Open a session with the default list source and an entropy-seeded RNG
pub fn open_app(persistence: Arc<dyn Persistence>) -> Result<App<StdRng>, AppError> {
    App::open(persistence, loader::default_source(), StdRng::from_entropy())
}

/// Open a session whose batches are reproducible for a given seed
pub fn open_app_with_seed(
    persistence: Arc<dyn Persistence>,
    seed: u64,
) -> Result<App<StdRng>, AppError> {
    App::open(persistence, loader::default_source(), StdRng::seed_from_u64(seed))
}

/// Draw one batch with a seeded RNG
///
/// # Example
/// ```
/// use list_selector::{draw_batch_with_seed, SampleCount};
///
/// let list = vec!["x".to_string()];
/// assert_eq!(draw_batch_with_seed(&list, SampleCount::new(3).unwrap(), 7), vec!["x"; 3]);
/// ```
pub fn draw_batch_with_seed(list: &[String], count: SampleCount, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    draw_batch(list, count, &mut rng)
}

/// Identifiers of every predefined list
pub fn list_predefined() -> Vec<String> {
    PredefinedList::all()
        .iter()
        .map(|list| list.id().to_string())
        .collect()
}
