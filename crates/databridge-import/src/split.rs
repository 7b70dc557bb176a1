//! Stripping the form marker from object text.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ImportError, ImportResult};

/// An object's text with its `SPXML-FORM="..."` marker taken out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSplit {
    /// The captured form reference.
    pub form_ref: String,
    /// The text without the marker. Parsing it yields only the fields the
    /// author wrote.
    pub concise: String,
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    // Leading whitespace goes with the marker so the element keeps one
    // separator between its name and any remaining attribute.
    MARKER.get_or_init(|| Regex::new(r#"\s+SPXML-FORM="([^"]+)""#).expect("valid marker pattern"))
}

/// Remove the first form marker from `text`.
///
/// Fails with [`ImportError::MalformedObject`] when no marker is present.
/// Nothing else in the text is altered.
pub fn split_form(text: &str) -> ImportResult<FormSplit> {
    let caps = marker()
        .captures(text)
        .ok_or_else(|| ImportError::malformed("no SPXML-FORM marker"))?;
    let (Some(whole), Some(form_ref)) = (caps.get(0), caps.get(1)) else {
        return Err(ImportError::malformed("no SPXML-FORM marker"));
    };

    let mut concise = String::with_capacity(text.len() - whole.len());
    concise.push_str(&text[..whole.start()]);
    concise.push_str(&text[whole.end()..]);
    Ok(FormSplit {
        form_ref: form_ref.as_str().to_owned(),
        concise,
    })
}
