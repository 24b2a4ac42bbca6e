//! Application context
//!
//! [`App`] owns both stores, the selector, the list source and the random
//! source, and implements what the configuration and selection pages do.
//! It replaces any process-wide store: create one per session and pass it
//! to whatever renders it.

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::count::{CountError, SampleCount};
use crate::i18n;
use crate::lists::{split_lines, PredefinedList, UnknownList};
use crate::loader::{ListSource, LoadError};
use crate::observe::Subscription;
use crate::persist::{PersistError, Persistence};
use crate::prefs::{Lang, Preferences, PrefsStore, Theme};
use crate::query::{QueryError, QueryParams};
use crate::selector::{Navigation, Selector};
use crate::store::{ListState, ListStore};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Persist(#[from] PersistError),
    #[error(transparent)]
    UnknownList(#[from] UnknownList),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Invalid items per select: {0}")]
    Count(#[from] CountError),
    #[error("No file")]
    NoFile,
    #[error("No file reader result")]
    MissingContent,
    #[error("Upload of {0:?} is still in flight")]
    UploadInFlight(String),
}

/// The page currently shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Configure,
    Selection,
}

impl From<Navigation> for View {
    fn from(nav: Navigation) -> Self {
        match nav {
            Navigation::Selection => View::Selection,
            Navigation::Configure => View::Configure,
        }
    }
}

pub struct App<R: Rng + Send> {
    lists: ListStore,
    prefs: PrefsStore,
    selector: Selector,
    view: View,
    pending_upload: Option<String>,
    source: Arc<dyn ListSource>,
    rng: R,
}

impl<R: Rng + Send> App<R> {
    /// Open a session, rehydrating both stores from `persistence`
    ///
    /// # Example
    /// ```
    /// use list_selector::app::{App, View};
    /// use list_selector::loader::InMemorySource;
    /// use list_selector::persist::MemoryStorage;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use std::sync::Arc;
    ///
    /// let app = App::open(
    ///     Arc::new(MemoryStorage::new()),
    ///     Arc::new(InMemorySource::new()),
    ///     StdRng::seed_from_u64(42),
    /// )
    /// .unwrap();
    /// assert_eq!(app.view(), View::Configure);
    /// ```
    pub fn open(
        persistence: Arc<dyn Persistence>,
        source: Arc<dyn ListSource>,
        rng: R,
    ) -> Result<Self, AppError> {
        let lists = ListStore::open(Arc::clone(&persistence))?;
        let prefs = PrefsStore::open(persistence)?;

        let mut app = App {
            lists,
            prefs,
            selector: Selector::new(),
            view: View::Configure,
            pending_upload: None,
            source,
            rng,
        };
        app.sync_filename();
        Ok(app)
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn list_state(&self) -> &ListState {
        self.lists.state()
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs.preferences()
    }

    /// Batch shown on the selection page
    pub fn batch(&self) -> Option<&[String]> {
        self.selector.batch()
    }

    pub fn pending_upload(&self) -> Option<&str> {
        self.pending_upload.as_deref()
    }

    /// Label next to the upload button: the chosen file, else the stored name
    pub fn displayed_filename(&self) -> &str {
        self.pending_upload
            .as_deref()
            .unwrap_or_else(|| self.lists.filename())
    }

    /// Translate a page phrase into the current language
    pub fn t<'a>(&self, phrase: &'a str) -> &'a str {
        i18n::translate(self.prefs.lang(), phrase)
    }

    pub fn next_button_label(&self) -> &'static str {
        let len = self.batch().map_or(0, <[String]>::len);
        i18n::translate(self.prefs.lang(), i18n::next_button_label(len))
    }

    /// Whether "Clear" has anything to reset
    pub fn can_clear(&self) -> bool {
        !self.lists.list().is_empty() || self.lists.items_per_select() > SampleCount::ONE
    }

    pub fn can_get_started(&self) -> bool {
        self.pending_upload.is_some() || !self.lists.list().is_empty()
    }

    pub fn subscribe_list<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ListState) + Send + Sync + 'static,
    {
        self.lists.subscribe(listener)
    }

    pub fn subscribe_preferences<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Preferences) + Send + Sync + 'static,
    {
        self.prefs.subscribe(listener)
    }

    pub fn set_lang(&mut self, lang: Lang) {
        self.prefs.set_lang(lang);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.set_theme(theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.prefs.toggle_theme()
    }

    /// Set the sample size from the count field; invalid input keeps the old value
    pub fn set_items_per_select_input(&mut self, raw: &str) -> Result<SampleCount, AppError> {
        Ok(self.lists.set_items_per_select_input(raw)?)
    }

    pub fn set_items_per_select_number(&mut self, n: f64) -> Result<SampleCount, AppError> {
        Ok(self.lists.set_items_per_select_number(n)?)
    }

    pub fn set_items_per_select(&mut self, count: SampleCount) {
        self.lists.set_items_per_select(count);
    }

    /// Apply deep-link parameters
    ///
    /// Valid parameters are applied; rejected ones are logged and returned
    /// so the caller can show them. A failed list fetch is the only error.
    pub async fn apply_query(&mut self, query: &str) -> Result<Vec<QueryError>, AppError> {
        let (params, errors) = QueryParams::parse(query);
        for error in &errors {
            warn!(param = error.param(), error = %error, "ignoring query parameter");
        }

        self.apply_params(&params);
        if let Some(list) = params.list {
            self.load_list(list).await?;
        }

        Ok(errors)
    }

    /// Apply the parameters that need no fetching: lang, mode and count
    pub fn apply_params(&mut self, params: &QueryParams) {
        if let Some(lang) = params.lang {
            self.set_lang(lang);
        }
        if let Some(theme) = params.mode {
            self.set_theme(theme);
        }
        if let Some(count) = params.count {
            self.set_items_per_select(count);
        }
    }

    /// Load a predefined list by identifier
    ///
    /// Unknown identifiers are rejected before the source is consulted.
    pub async fn load_predefined(&mut self, id: &str) -> Result<(), AppError> {
        let list = id.parse::<PredefinedList>().map_err(|e| {
            warn!(id, "unknown predefined list");
            e
        })?;
        self.load_list(list).await
    }

    pub async fn load_list(&mut self, list: PredefinedList) -> Result<(), AppError> {
        debug!(%list, "fetching predefined list");
        let text = self.source.fetch(list).await.map_err(|e| {
            warn!(%list, error = %e, "failed to fetch predefined list");
            e
        })?;

        self.load_list_text(list, &text);
        Ok(())
    }

    /// Store the text of a predefined list fetched by the caller
    pub fn load_list_text(&mut self, list: PredefinedList, text: &str) {
        self.lists.set_list(split_lines(text));
        self.lists.set_filename(list.filename());
    }

    /// A file was picked; its content arrives later through `finish_upload`
    pub fn select_upload(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.lists.set_filename(name.clone());
        self.pending_upload = Some(name);
    }

    pub fn cancel_upload(&mut self) {
        self.pending_upload = None;
        self.sync_filename();
    }

    /// Complete the in-flight upload with the file's text
    ///
    /// Missing or empty content leaves everything as it was and the user on
    /// the configuration page.
    pub fn finish_upload(&mut self, content: Option<&str>) -> Result<View, AppError> {
        if self.pending_upload.is_none() {
            warn!("No file");
            return Err(AppError::NoFile);
        }

        let Some(text) = content.filter(|text| !text.is_empty()) else {
            warn!("No file reader result");
            return Err(AppError::MissingContent);
        };

        self.lists.set_list(split_lines(text));
        self.pending_upload = None;
        Ok(self.enter_selection())
    }

    /// Go to the selection page with the stored list
    pub fn get_started(&mut self) -> Result<View, AppError> {
        if let Some(name) = &self.pending_upload {
            return Err(AppError::UploadInFlight(name.clone()));
        }
        if self.lists.list().is_empty() {
            warn!("No file");
            return Err(AppError::NoFile);
        }
        Ok(self.enter_selection())
    }

    /// Draw the next batch; an empty list sends the user back
    ///
    /// Does nothing outside the selection page.
    pub fn regenerate(&mut self) -> View {
        if self.view != View::Selection {
            return self.view;
        }
        let nav = self.selector.regenerate(
            self.lists.list(),
            self.lists.items_per_select(),
            &mut self.rng,
        );
        self.navigate(nav)
    }

    /// Leave the selection page to pick another list
    pub fn change_list(&mut self) -> View {
        self.navigate(Navigation::Configure)
    }

    /// Reset the list, its name and the sample size
    pub fn clear(&mut self) {
        self.lists.clear();
        self.sync_filename();
        if self.view == View::Selection {
            self.navigate(Navigation::Configure);
        }
    }

    fn enter_selection(&mut self) -> View {
        let nav = self.selector.enter(
            self.lists.list(),
            self.lists.items_per_select(),
            &mut self.rng,
        );
        self.navigate(nav)
    }

    fn navigate(&mut self, nav: Navigation) -> View {
        let view = View::from(nav);
        if view == View::Configure {
            self.selector.reset();
        }
        if view != self.view {
            debug!(from = ?self.view, to = ?view, "navigate");
        }
        self.view = view;
        view
    }

    /// No list and no upload in flight means no name to show
    fn sync_filename(&mut self) {
        if self.pending_upload.is_none()
            && self.lists.list().is_empty()
            && !self.lists.filename().is_empty()
        {
            self.lists.set_filename("");
        }
    }
}

impl<R: Rng + Send> std::fmt::Debug for App<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("lists", &self.lists)
            .field("prefs", &self.prefs)
            .field("view", &self.view)
            .field("pending_upload", &self.pending_upload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemorySource;
    use crate::persist::MemoryStorage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app(storage: &MemoryStorage) -> App<StdRng> {
        let source = InMemorySource::new();
        source.add(PredefinedList::SayAnythingEn, "one\ntwo\nthree");
        App::open(
            Arc::new(storage.clone()),
            Arc::new(source),
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    #[test]
    fn test_get_started_without_list() {
        let mut app = app(&MemoryStorage::new());
        assert!(!app.can_get_started());
        assert!(matches!(app.get_started(), Err(AppError::NoFile)));
        assert_eq!(app.view(), View::Configure);
    }

    #[test]
    fn test_upload_flow() {
        let mut app = app(&MemoryStorage::new());
        app.select_upload("fruits.txt");
        assert_eq!(app.displayed_filename(), "fruits.txt");
        assert!(matches!(app.get_started(), Err(AppError::UploadInFlight(_))));

        let view = app.finish_upload(Some("apple\nbanana")).unwrap();
        assert_eq!(view, View::Selection);
        assert_eq!(app.list_state().filename, "fruits.txt");
        assert_eq!(app.batch().unwrap().len(), 1);
        assert!(app.pending_upload().is_none());
    }

    #[test]
    fn test_upload_without_content_stays_on_configure() {
        let mut app = app(&MemoryStorage::new());
        app.select_upload("empty.txt");

        assert!(matches!(app.finish_upload(None), Err(AppError::MissingContent)));
        assert!(matches!(app.finish_upload(Some("")), Err(AppError::MissingContent)));
        assert_eq!(app.view(), View::Configure);
        assert_eq!(app.pending_upload(), Some("empty.txt"));
    }

    #[test]
    fn test_cancel_upload_clears_name_without_list() {
        let mut app = app(&MemoryStorage::new());
        app.select_upload("draft.txt");
        app.cancel_upload();
        assert_eq!(app.list_state().filename, "");
    }

    #[test]
    fn test_open_clears_stale_filename() {
        let storage = MemoryStorage::new();
        storage.insert(
            crate::store::LIST_STORE_KEY,
            r#"{"filename":"gone.txt","list":[],"itemsPerSelect":2}"#,
        );
        let app = app(&storage);
        assert_eq!(app.list_state().filename, "");
        assert_eq!(app.list_state().items_per_select.get(), 2);
    }

    #[tokio::test]
    async fn test_load_predefined() {
        let mut app = app(&MemoryStorage::new());
        app.load_predefined("say-anything-en").await.unwrap();
        assert_eq!(app.list_state().list, vec!["one", "two", "three"]);
        assert_eq!(app.list_state().filename, "say-anything-en.txt");

        assert!(matches!(
            app.load_predefined("missing").await,
            Err(AppError::UnknownList(_))
        ));
        assert!(matches!(
            app.load_predefined("say-anything-ru").await,
            Err(AppError::Load(LoadError::NotFound(_)))
        ));
        assert_eq!(app.list_state().filename, "say-anything-en.txt");
    }

    #[test]
    fn test_clear_leaves_selection() {
        let mut app = app(&MemoryStorage::new());
        app.select_upload("a.txt");
        app.finish_upload(Some("x")).unwrap();
        assert!(app.can_clear());

        app.clear();
        assert_eq!(app.view(), View::Configure);
        assert_eq!(app.batch(), None);
        assert!(!app.can_clear());
    }

    #[test]
    fn test_regenerate_outside_selection_is_ignored() {
        let mut app = app(&MemoryStorage::new());
        app.select_upload("a.txt");
        app.finish_upload(Some("x\ny")).unwrap();
        app.change_list();

        assert_eq!(app.regenerate(), View::Configure);
        assert_eq!(app.view(), View::Configure);
        assert_eq!(app.batch(), None);
    }

    #[test]
    fn test_can_clear_with_only_count() {
        let mut app = app(&MemoryStorage::new());
        assert!(!app.can_clear());
        app.set_items_per_select_input("2").unwrap();
        assert!(app.can_clear());
    }

    #[test]
    fn test_translated_labels() {
        let mut app = app(&MemoryStorage::new());
        app.select_upload("a.txt");
        app.finish_upload(Some("x\ny")).unwrap();
        assert_eq!(app.next_button_label(), "Get next one");

        app.set_lang(Lang::Ru);
        assert_eq!(app.t(i18n::GET_STARTED), "Начать");
        assert_eq!(app.next_button_label(), "Следующий");
    }
}
