use list_selector::app::{App, View};
use list_selector::lists::PredefinedList;
use list_selector::persist::{PersistError, Persistence};
use list_selector::prefs::Lang;
use list_selector::query::QueryParams;
use list_selector::{diagnostic, loader};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

/// Browser `localStorage`, looked up on every access
#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .ok_or_else(|| PersistError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| PersistError::Unavailable("localStorage disabled".to_string()))
    }
}

impl Persistence for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| PersistError::Unavailable(format!("{:?}", e)))
    }
}

#[derive(Serialize)]
struct QueryOutcome {
    /// Predefined list the page should fetch and pass to `load_list_text`
    list: Option<&'static str>,
    errors: Vec<String>,
}

fn view_name(view: View) -> String {
    match view {
        View::Configure => "configure".to_string(),
        View::Selection => "selection".to_string(),
    }
}

/// One browser session of the selector page
#[wasm_bindgen]
pub struct WebApp {
    app: App<StdRng>,
}

#[wasm_bindgen]
impl WebApp {
    /// Open a session backed by `localStorage`
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebApp, String> {
        Self::open(StdRng::from_entropy())
    }

    /// Open a session with reproducible batches
    pub fn with_seed(seed: u64) -> Result<WebApp, String> {
        Self::open(StdRng::seed_from_u64(seed))
    }

    fn open(rng: StdRng) -> Result<WebApp, String> {
        let app = App::open(Arc::new(LocalStorage), loader::default_source(), rng)
            .map_err(|e| format!("{}", e))?;
        Ok(WebApp { app })
    }

    /// Apply deep-link parameters from `location.search`
    ///
    /// Returns `{ list, errors }`: the list identifier still to be fetched,
    /// and a rendered diagnostic per rejected parameter.
    pub fn apply_query(&mut self, query: &str) -> Result<JsValue, String> {
        let (params, errors) = QueryParams::parse(query);
        self.app.apply_params(&params);

        let outcome = QueryOutcome {
            list: params.list.map(PredefinedList::id),
            errors: errors
                .iter()
                .map(|e| diagnostic::report_query_error("query", query, e))
                .collect(),
        };
        serde_wasm_bindgen::to_value(&outcome).map_err(|e| format!("{}", e))
    }

    pub fn is_known_list(id: &str) -> bool {
        id.parse::<PredefinedList>().is_ok()
    }

    /// Store the fetched text of a predefined list
    pub fn load_list_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let list = id.parse::<PredefinedList>().map_err(|e| format!("{}", e))?;
        self.app.load_list_text(list, text);
        Ok(())
    }

    /// Load a predefined list bundled into the module
    #[cfg(feature = "builtin-lists")]
    pub fn load_builtin(&mut self, id: &str) -> Result<(), String> {
        let list = id.parse::<PredefinedList>().map_err(|e| format!("{}", e))?;
        let text = list_selector::builtin_lists::get(list)
            .ok_or_else(|| format!("List not found: {}", list))?;
        self.app.load_list_text(list, text);
        Ok(())
    }

    pub fn select_upload(&mut self, name: &str) {
        self.app.select_upload(name);
    }

    pub fn cancel_upload(&mut self) {
        self.app.cancel_upload();
    }

    /// Finish the upload with the `FileReader` result; returns the view to show
    pub fn finish_upload(&mut self, content: Option<String>) -> Result<String, String> {
        self.app
            .finish_upload(content.as_deref())
            .map(view_name)
            .map_err(|e| format!("{}", e))
    }

    pub fn get_started(&mut self) -> Result<String, String> {
        self.app
            .get_started()
            .map(view_name)
            .map_err(|e| format!("{}", e))
    }

    pub fn regenerate(&mut self) -> String {
        view_name(self.app.regenerate())
    }

    pub fn change_list(&mut self) -> String {
        view_name(self.app.change_list())
    }

    pub fn clear(&mut self) {
        self.app.clear();
    }

    /// Set items per select from a number input's `valueAsNumber`
    ///
    /// Invalid values keep the previous count, which is returned either way.
    pub fn set_items_per_select(&mut self, value: f64) -> u32 {
        match self.app.set_items_per_select_number(value) {
            Ok(count) => count.get(),
            Err(_) => self.app.list_state().items_per_select.get(),
        }
    }

    pub fn view(&self) -> String {
        view_name(self.app.view())
    }

    /// Current batch as a JS array of strings (empty outside the selection view)
    pub fn batch(&self) -> Result<JsValue, String> {
        let batch = self.app.batch().unwrap_or_default();
        serde_wasm_bindgen::to_value(batch).map_err(|e| format!("{}", e))
    }

    /// `{ filename, list, itemsPerSelect }`
    pub fn state(&self) -> Result<JsValue, String> {
        serde_wasm_bindgen::to_value(self.app.list_state()).map_err(|e| format!("{}", e))
    }

    pub fn displayed_filename(&self) -> String {
        self.app.displayed_filename().to_string()
    }

    pub fn can_clear(&self) -> bool {
        self.app.can_clear()
    }

    pub fn can_get_started(&self) -> bool {
        self.app.can_get_started()
    }

    pub fn lang(&self) -> String {
        self.app.preferences().lang.code().to_string()
    }

    pub fn set_lang(&mut self, code: &str) -> Result<(), String> {
        let lang = code.parse::<Lang>().map_err(|e| format!("{}", e))?;
        self.app.set_lang(lang);
        Ok(())
    }

    pub fn is_dark_mode(&self) -> bool {
        self.app.preferences().theme.is_dark()
    }

    /// Flip the color theme; returns whether dark mode is now on
    pub fn toggle_theme(&mut self) -> bool {
        self.app.toggle_theme().is_dark()
    }

    /// Translate a page phrase into the current language
    pub fn t(&self, phrase: &str) -> String {
        self.app.t(phrase).to_string()
    }

    pub fn next_button_label(&self) -> String {
        self.app.next_button_label().to_string()
    }
}

/// Identifiers of the predefined lists, for the list picker
#[wasm_bindgen]
pub fn predefined_lists() -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(&list_selector::list_predefined()).map_err(|e| format!("{}", e))
}
