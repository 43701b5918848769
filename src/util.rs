//! Shared utility helpers.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// Mark used for a true flag in rendered output
pub const YES: &str = "✔";
/// Mark used for a false flag in rendered output
pub const NO: &str = "-";

/// Maximum length of a worksheet name
pub const SHEET_NAME_MAX: usize = 31;

static TYPE_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_ ]*?)\s*\(\s*(\d+)\s*(?:,\s*(-?\d+)\s*)?\)").unwrap()
});

/// Render a flag as a yes/no mark.
#[inline]
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        YES
    } else {
        NO
    }
}

/// Case-insensitive equality without allocating.
#[inline]
pub fn eq_ci(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.as_bytes().eq_ignore_ascii_case(b.as_bytes())
}

/// Size attributes parsed out of a declared type such as `VARCHAR(255)` or
/// `DECIMAL(10,2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeSize {
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
}

/// Derive length/precision/scale from a declared type.
///
/// `NAME(n)` is a length for character and binary types and a precision for
/// numeric ones; `NAME(p,s)` is always precision and scale.
pub fn parse_type_size(declared: &str) -> TypeSize {
    let Some(caps) = TYPE_SIZE.captures(declared) else {
        return TypeSize::default();
    };

    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let first = caps.get(2).and_then(|m| m.as_str().parse::<i64>().ok());
    let second = caps.get(3).and_then(|m| m.as_str().parse::<i64>().ok());

    match second {
        Some(scale) => TypeSize {
            length: None,
            precision: first,
            scale: Some(scale),
        },
        None if is_numeric_type(name) => TypeSize {
            length: None,
            precision: first,
            scale: None,
        },
        None => TypeSize {
            length: first,
            precision: None,
            scale: None,
        },
    }
}

fn is_numeric_type(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    [
        "dec", "numeric", "number", "float", "double", "real", "int", "bit", "money",
    ]
    .iter()
    .any(|prefix| name.starts_with(prefix) || name.ends_with("int"))
}

/// Split a delimited column-name list, trimming whitespace and identifier
/// quotes. Empty entries are dropped; order is kept.
pub fn split_column_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| {
            name.trim()
                .trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Make a name safe to use as a single path segment.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == ' ');
    if cleaned.is_empty() {
        "database".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Apply worksheet naming rules: at most 31 characters, none of `[]:*?/\`,
/// and no leading or trailing apostrophe.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(SHEET_NAME_MAX)
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Allocates one distinct worksheet name per table.
///
/// Names are sanitized first. A name already taken, compared
/// case-insensitively, gets a `~2`, `~3`, ... suffix and its base is cut so
/// the result still fits in 31 characters.
#[derive(Debug, Default)]
pub struct SheetNames {
    taken: HashSet<String>,
    assigned: HashMap<String, String>,
}

impl SheetNames {
    /// Start with `reserved` sheet names already in use
    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: reserved
                .into_iter()
                .map(|name| name.to_ascii_lowercase())
                .collect(),
            assigned: HashMap::new(),
        }
    }

    /// Sheet name for `table`, allocating one on first use
    pub fn assign(&mut self, table: &str) -> String {
        if let Some(name) = self.assigned.get(table) {
            return name.clone();
        }

        let base = sanitize_sheet_name(table);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate.to_ascii_lowercase()) {
            let suffix = format!("~{}", n);
            let keep = SHEET_NAME_MAX - suffix.len();
            candidate = base.chars().take(keep).collect::<String>() + &suffix;
            n += 1;
        }

        self.taken.insert(candidate.to_ascii_lowercase());
        self.assigned.insert(table.to_string(), candidate.clone());
        candidate
    }
}

/// Hyperlink location for cell A1 of a worksheet
pub fn sheet_location(sheet: &str) -> String {
    format!("'{}'!A1", sheet.replace('\'', "''"))
}
