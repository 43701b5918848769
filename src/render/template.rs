//! `{{placeholder}}` substitution for the text templates

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DbDictError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Replace every `{{name}}` in `template` with its value.
///
/// A placeholder without a value is an error, so a template edit can never
/// silently leave markers in the output.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len() * 2);
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = values
            .iter()
            .find(|(key, _)| *key == name.as_str())
            .map(|(_, value)| *value)
            .ok_or_else(|| DbDictError::Template {
                message: format!("no value for placeholder {{{{{}}}}}", name.as_str()),
            })?;

        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}
