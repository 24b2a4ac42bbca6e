/// List text bundled into the binary
use crate::lists::PredefinedList;

pub const LISTS: &[(PredefinedList, &str)] = &[
    (
        PredefinedList::SayAnythingEn,
        include_str!("../lists/say-anything-en.txt"),
    ),
    (
        PredefinedList::SayAnythingRu,
        include_str!("../lists/say-anything-ru.txt"),
    ),
];

pub fn get(list: PredefinedList) -> Option<&'static str> {
    LISTS
        .iter()
        .find(|(known, _)| *known == list)
        .map(|(_, text)| *text)
}
