/// Predefined list identifiers and the line-splitting contract
use std::fmt;
use std::str::FromStr;

/// A list shipped with the application, addressed by a short identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedList {
    SayAnythingEn,
    SayAnythingRu,
}

impl PredefinedList {
    pub fn all() -> &'static [PredefinedList] {
        &[PredefinedList::SayAnythingEn, PredefinedList::SayAnythingRu]
    }

    pub fn id(self) -> &'static str {
        match self {
            PredefinedList::SayAnythingEn => "say-anything-en",
            PredefinedList::SayAnythingRu => "say-anything-ru",
        }
    }

    /// Display label used once the list is loaded
    pub fn filename(self) -> String {
        format!("{}.txt", self.id())
    }
}

impl fmt::Display for PredefinedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown list: {0:?}")]
pub struct UnknownList(pub String);

impl FromStr for PredefinedList {
    type Err = UnknownList;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PredefinedList::all()
            .iter()
            .copied()
            .find(|list| list.id() == s)
            .ok_or_else(|| UnknownList(s.to_string()))
    }
}

/// Split source text into list items, one per `'\n'`
///
/// Nothing is trimmed or filtered: blank lines and a trailing empty line
/// after a final newline are items too, and `'\r'` stays part of its line.
///
/// # Example
/// ```
/// use list_selector::lists::split_lines;
///
/// assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b", ""]);
/// assert_eq!(split_lines(""), vec![""]);
/// ```
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}
