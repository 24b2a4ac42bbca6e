/// Phrase translation for the page text
///
/// English phrases are their own keys. Other languages map a phrase to its
/// translation and fall back to the English phrase when one is missing.
use crate::prefs::Lang;

pub const TITLE: &str = "Random List Item Selector";
pub const SUBTITLE: &str = "Upload your list and get random items from it.";
pub const UPLOAD: &str = "Upload a TXT file";
pub const UPLOAD_HINT: &str = "1 line – 1 item";
pub const ITEMS_PER_SELECT: &str = "Items per select";
pub const GET_STARTED: &str = "Get started";
pub const CLEAR: &str = "Clear";
pub const NEXT_ONE: &str = "Get next one";
pub const NEXT_ONES: &str = "Get next ones";
pub const CHANGE: &str = "Change";

const RU: &[(&str, &str)] = &[
    (TITLE, "Случайный выбор из списка"),
    (SUBTITLE, "Загрузите свой список и получайте из него случайные элементы."),
    (UPLOAD, "Загрузить TXT файл"),
    (UPLOAD_HINT, "1 строка – 1 элемент"),
    (ITEMS_PER_SELECT, "Элементов за раз"),
    (GET_STARTED, "Начать"),
    (CLEAR, "Очистить"),
    (NEXT_ONE, "Следующий"),
    (NEXT_ONES, "Следующие"),
    (CHANGE, "Изменить"),
];

fn table(lang: Lang) -> Option<&'static [(&'static str, &'static str)]> {
    match lang {
        Lang::En => None,
        Lang::Ru => Some(RU),
    }
}

/// Translate a phrase
///
/// # Example
/// ```
/// use list_selector::i18n::{translate, CLEAR};
/// use list_selector::prefs::Lang;
///
/// assert_eq!(translate(Lang::En, CLEAR), "Clear");
/// assert_eq!(translate(Lang::Ru, CLEAR), "Очистить");
/// assert_eq!(translate(Lang::Ru, "unknown phrase"), "unknown phrase");
/// ```
pub fn translate<'a>(lang: Lang, phrase: &'a str) -> &'a str {
    table(lang)
        .and_then(|entries| entries.iter().find(|(key, _)| *key == phrase))
        .map(|(_, translated)| *translated)
        .unwrap_or(phrase)
}

/// Label of the regenerate button, pluralized by batch size
pub fn next_button_label(batch_len: usize) -> &'static str {
    if batch_len > 1 {
        NEXT_ONES
    } else {
        NEXT_ONE
    }
}
