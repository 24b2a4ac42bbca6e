/// Tests for applying deep-link parameters to a session
use list_selector::app::{App, AppError, View};
use list_selector::loader::{InMemorySource, LoadError};
use list_selector::persist::MemoryStorage;
use list_selector::prefs::{Lang, Theme};
use list_selector::query::QueryError;
use list_selector::store::LIST_STORE_KEY;
use list_selector::PredefinedList;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn app_with(source: InMemorySource) -> App<StdRng> {
    App::open(
        Arc::new(MemoryStorage::new()),
        Arc::new(source),
        StdRng::seed_from_u64(42),
    )
    .unwrap()
}

fn source() -> InMemorySource {
    let source = InMemorySource::new();
    source.add(PredefinedList::SayAnythingEn, "hello\nworld");
    source.add(PredefinedList::SayAnythingRu, "привет\nмир");
    source
}

#[tokio::test]
async fn test_apply_full_query() {
    let mut app = app_with(source());
    let rejected = app
        .apply_query("?lang=ru&mode=dark&list=say-anything-ru&count=4")
        .await
        .unwrap();
    assert!(rejected.is_empty());

    let prefs = app.preferences();
    assert_eq!(prefs.lang, Lang::Ru);
    assert_eq!(prefs.theme, Theme::Dark);

    let state = app.list_state();
    assert_eq!(state.list, vec!["привет", "мир"]);
    assert_eq!(state.filename, "say-anything-ru.txt");
    assert_eq!(state.items_per_select.get(), 4);

    assert_eq!(app.get_started().unwrap(), View::Selection);
    assert_eq!(app.batch().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invalid_params_never_reach_the_store() {
    let mut app = app_with(source());
    app.set_items_per_select_input("2").unwrap();

    let rejected = app
        .apply_query("?lang=xx&mode=sepia&list=groceries&count=NaN")
        .await
        .unwrap();

    assert_eq!(rejected.len(), 4);
    assert!(matches!(rejected[2], QueryError::UnknownList { .. }));
    assert_eq!(app.preferences().lang, Lang::En);
    assert_eq!(app.preferences().theme, Theme::Light);
    assert!(app.list_state().list.is_empty());
    assert_eq!(app.list_state().items_per_select.get(), 2);
}

#[tokio::test]
async fn test_valid_params_apply_beside_invalid_ones() {
    let mut app = app_with(source());
    let rejected = app.apply_query("count=-1&lang=ru").await.unwrap();

    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].param(), "count");
    assert_eq!(app.preferences().lang, Lang::Ru);
    assert_eq!(app.list_state().items_per_select.get(), 1);
}

#[tokio::test]
async fn test_oversized_count_keeps_prior_value() {
    let storage = MemoryStorage::new();
    let mut app = App::open(
        Arc::new(storage.clone()),
        Arc::new(source()),
        StdRng::seed_from_u64(42),
    )
    .unwrap();
    app.set_items_per_select_input("2").unwrap();

    let rejected = app.apply_query("?count=4294967295").await.unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].param(), "count");
    assert_eq!(app.list_state().items_per_select.get(), 2);

    let raw = storage.get(LIST_STORE_KEY).unwrap();
    assert!(raw.contains(r#""itemsPerSelect":2"#), "persisted: {}", raw);

    app.select_upload("a.txt");
    assert_eq!(app.finish_upload(Some("a\nb")).unwrap(), View::Selection);
    assert_eq!(app.batch().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_after_other_params() {
    let empty = InMemorySource::new();
    let mut app = app_with(empty);

    let result = app.apply_query("count=3&list=say-anything-en").await;
    assert!(matches!(
        result,
        Err(AppError::Load(LoadError::NotFound(PredefinedList::SayAnythingEn)))
    ));
    assert_eq!(app.list_state().items_per_select.get(), 3);
    assert_eq!(app.list_state().filename, "");
}

#[tokio::test]
async fn test_empty_query_changes_nothing() {
    let mut app = app_with(source());
    assert!(app.apply_query("").await.unwrap().is_empty());
    assert!(app.apply_query("?").await.unwrap().is_empty());
    assert_eq!(app.preferences(), Default::default());
}
