//! Deep-link parameters
//!
//! A start-up URL may carry `lang`, `mode`, `list` and `count` parameters.
//! Each one is validated here, so the stores only ever see values that
//! already passed; anything invalid is reported with the span of the
//! offending value and otherwise ignored.

use crate::count::{parse_sample_count, CountError, SampleCount};
use crate::lists::PredefinedList;
use crate::prefs::{Lang, Theme};
use crate::span::{Span, Spanned};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid lang param: {value:?}")]
    InvalidLang { value: String, span: Span },
    #[error("Invalid mode param: {value:?}")]
    InvalidMode { value: String, span: Span },
    #[error("Invalid list param: {value:?}")]
    UnknownList { value: String, span: Span },
    #[error("Invalid count param: {value:?} ({reason})")]
    InvalidCount {
        value: String,
        reason: CountError,
        span: Span,
    },
}

impl QueryError {
    /// Span of the rejected value in the query string
    pub fn span(&self) -> Span {
        match self {
            QueryError::InvalidLang { span, .. } => *span,
            QueryError::InvalidMode { span, .. } => *span,
            QueryError::UnknownList { span, .. } => *span,
            QueryError::InvalidCount { span, .. } => *span,
        }
    }

    pub fn param(&self) -> &'static str {
        match self {
            QueryError::InvalidLang { .. } => "lang",
            QueryError::InvalidMode { .. } => "mode",
            QueryError::UnknownList { .. } => "list",
            QueryError::InvalidCount { .. } => "count",
        }
    }
}

/// Validated deep-link parameters; `None` means absent, empty or rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub lang: Option<Lang>,
    pub mode: Option<Theme>,
    pub list: Option<PredefinedList>,
    pub count: Option<SampleCount>,
}

impl QueryParams {
    /// Parse a query string such as `?list=say-anything-en&count=3`
    ///
    /// The first occurrence of a key wins. Unknown keys are ignored.
    ///
    /// # Example
    /// ```
    /// use list_selector::query::QueryParams;
    ///
    /// let (params, errors) = QueryParams::parse("?lang=ru&count=zero");
    /// assert_eq!(params.lang.map(|l| l.code()), Some("ru"));
    /// assert!(params.count.is_none());
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn parse(query: &str) -> (QueryParams, Vec<QueryError>) {
        let mut params = QueryParams::default();
        let mut errors = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for (key, value) in pairs(query) {
            if value.value.is_empty() || seen.contains(&key) {
                continue;
            }

            let Spanned { value, span } = value;
            match key.as_str() {
                "lang" => match value.parse() {
                    Ok(lang) => params.lang = Some(lang),
                    Err(_) => errors.push(QueryError::InvalidLang { value, span }),
                },
                "mode" => match value.parse() {
                    Ok(theme) => params.mode = Some(theme),
                    Err(_) => errors.push(QueryError::InvalidMode { value, span }),
                },
                "list" => match value.parse() {
                    Ok(list) => params.list = Some(list),
                    Err(_) => errors.push(QueryError::UnknownList { value, span }),
                },
                "count" => match parse_sample_count(&value) {
                    Ok(count) => params.count = Some(count),
                    Err(reason) => errors.push(QueryError::InvalidCount {
                        value,
                        reason,
                        span,
                    }),
                },
                _ => continue,
            }
            seen.push(key);
        }

        (params, errors)
    }

    pub fn is_empty(&self) -> bool {
        *self == QueryParams::default()
    }
}

/// Split into decoded `(key, value)` pairs, keeping each value's raw span
fn pairs(query: &str) -> Vec<(String, Spanned<String>)> {
    let offset = usize::from(query.starts_with('?'));
    let mut pos = offset;
    let mut out = Vec::new();

    for segment in query[offset..].split('&') {
        let start = pos;
        pos += segment.len() + 1;
        if segment.is_empty() {
            continue;
        }

        let (raw_key, raw_value, value_start) = match segment.find('=') {
            Some(eq) => (&segment[..eq], &segment[eq + 1..], start + eq + 1),
            None => (segment, "", start + segment.len()),
        };
        let span = Span::new(value_start, value_start + raw_value.len());
        out.push((decode(raw_key), Spanned::new(decode(raw_value), span)));
    }

    out
}

/// Form-style decoding: `+` is a space and `%XX` a byte
///
/// Malformed escapes are kept literally.
fn decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = hex {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_params() {
        let (params, errors) =
            QueryParams::parse("?lang=ru&mode=dark&list=say-anything-en&count=3");
        assert!(errors.is_empty());
        assert_eq!(params.lang, Some(Lang::Ru));
        assert_eq!(params.mode, Some(Theme::Dark));
        assert_eq!(params.list, Some(PredefinedList::SayAnythingEn));
        assert_eq!(params.count.map(SampleCount::get), Some(3));
    }

    #[test]
    fn test_leading_question_mark_is_optional() {
        let (a, _) = QueryParams::parse("count=2");
        let (b, _) = QueryParams::parse("?count=2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_and_unknown_params_are_ignored() {
        let (params, errors) = QueryParams::parse("?lang=&count&utm_source=x&&");
        assert!(params.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_invalid_values_are_reported_with_spans() {
        let query = "?lang=de&mode=dim&list=nope&count=0";
        let (params, errors) = QueryParams::parse(query);
        assert!(params.is_empty());
        assert_eq!(errors.len(), 4);

        let spans: Vec<&str> = errors
            .iter()
            .map(|e| e.span().slice(query).unwrap())
            .collect();
        assert_eq!(spans, vec!["de", "dim", "nope", "0"]);
        assert_eq!(
            errors[3],
            QueryError::InvalidCount {
                value: "0".to_string(),
                reason: CountError::NotPositive,
                span: Span::new(34, 35),
            }
        );
    }

    #[test]
    fn test_nan_count_is_rejected() {
        let (params, errors) = QueryParams::parse("count=NaN");
        assert!(params.count.is_none());
        assert_eq!(errors[0].param(), "count");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let (params, errors) = QueryParams::parse("count=2&count=5&count=oops");
        assert_eq!(params.count.map(SampleCount::get), Some(2));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_decoding() {
        assert_eq!(decode("a+b%20c"), "a b c");
        assert_eq!(decode("%D1%80%D1%83"), "ру");
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz"), "%zz");

        let (params, _) = QueryParams::parse("%63ount=%34");
        assert_eq!(params.count.map(SampleCount::get), Some(4));
    }
}
