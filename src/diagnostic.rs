/// Diagnostic reporting for rejected deep-link parameters using ariadne
use crate::count::CountError;
use crate::lists::PredefinedList;
use crate::prefs::Lang;
use crate::query::QueryError;
use ariadne::{Color, Label, Report, ReportKind, Source};

fn known_lists() -> String {
    PredefinedList::all()
        .iter()
        .map(|list| list.id())
        .collect::<Vec<_>>()
        .join(", ")
}

fn known_langs() -> String {
    Lang::all()
        .iter()
        .map(|lang| lang.code())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Report a rejected query parameter against the query string
pub fn report_query_error(source_name: &str, query: &str, error: &QueryError) -> String {
    let mut output = Vec::new();
    let span = error.span();

    let report = match error {
        QueryError::InvalidLang { value, .. } => {
            Report::build(ReportKind::Warning, source_name, span.start)
                .with_message("Invalid lang param")
                .with_label(
                    Label::new((source_name, span.range()))
                        .with_message(format!("'{}' is not a supported language", value))
                        .with_color(Color::Yellow),
                )
                .with_help(format!("Supported languages: {}", known_langs()))
                .finish()
        }
        QueryError::InvalidMode { value, .. } => {
            Report::build(ReportKind::Warning, source_name, span.start)
                .with_message("Invalid mode param")
                .with_label(
                    Label::new((source_name, span.range()))
                        .with_message(format!("'{}' is not a color mode", value))
                        .with_color(Color::Yellow),
                )
                .with_help("Use 'light' or 'dark'")
                .finish()
        }
        QueryError::UnknownList { value, .. } => {
            Report::build(ReportKind::Warning, source_name, span.start)
                .with_message("Invalid list param")
                .with_label(
                    Label::new((source_name, span.range()))
                        .with_message(format!("no predefined list named '{}'", value))
                        .with_color(Color::Yellow),
                )
                .with_help(format!("Known lists: {}", known_lists()))
                .finish()
        }
        QueryError::InvalidCount { reason, .. } => {
            let builder = Report::build(ReportKind::Warning, source_name, span.start)
                .with_message("Invalid count param")
                .with_label(
                    Label::new((source_name, span.range()))
                        .with_message(reason.to_string())
                        .with_color(Color::Yellow),
                );
            match reason {
                CountError::Fractional | CountError::NotPositive => builder
                    .with_help("The count is a whole number of items, 1 or more")
                    .finish(),
                _ => builder
                    .with_note("The previous items per select value is kept")
                    .finish(),
            }
        }
    };

    report
        .write((source_name, Source::from(query)), &mut output)
        .expect("Failed to write diagnostic");

    String::from_utf8(output).expect("Invalid UTF-8 in diagnostic output")
}

/// Report every rejected parameter, in query order
pub fn report_query_errors(source_name: &str, query: &str, errors: &[QueryError]) -> String {
    errors
        .iter()
        .map(|error| report_query_error(source_name, query, error))
        .collect()
}
