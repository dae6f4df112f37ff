//! Identifier derivation from a human-entered project name
//!
//! A formal name like "My Cool App" yields the app name `my_cool_app`, the
//! module name `my_cool_app` and the class name `MyCoolApp`. All functions
//! are pure and total: a name that collapses to nothing yields a placeholder.

use unicode_normalization::UnicodeNormalization;

/// App name used when the formal name has no usable characters
pub const FALLBACK_APP_NAME: &str = "myapp";

/// Class name used when the formal name has no usable characters
pub const FALLBACK_CLASS_NAME: &str = "MyApp";

/// Names that cannot be used as an app name because they shadow
/// keywords or well-known modules of the generated project
const RESERVED_NAMES: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "false", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "none", "nonlocal", "not", "or", "pass", "raise", "return", "true", "try", "while",
    "with", "yield", "main", "test", "tests",
];

/// Identifiers derived from a formal name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentifiers {
    pub app_name: String,
    pub module_name: String,
    pub class_name: String,
}

impl DerivedIdentifiers {
    /// Derive every identifier from the formal name
    pub fn from_formal_name(formal_name: &str) -> Self {
        let app_name = derive_app_name(formal_name);
        let module_name = derive_module_name(&app_name);
        let class_name = derive_class_name(formal_name);
        Self {
            app_name,
            module_name,
            class_name,
        }
    }
}

/// Construct a candidate app name from a formal name
///
/// The name is decomposed (NFKD) so accented letters keep their base letter,
/// whitespace and hyphens become underscores, everything outside
/// `[0-9a-zA-Z_]` is dropped, and the result is lowercased.
pub fn derive_app_name(formal_name: &str) -> String {
    let mut name = String::with_capacity(formal_name.len());
    for ch in formal_name.nfkd() {
        let ch = if ch.is_whitespace() || ch == '-' { '_' } else { ch };
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if ch == '_' && name.ends_with('_') {
            continue;
        }
        name.push(ch.to_ascii_lowercase());
    }

    let trimmed = name.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_APP_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Construct a valid module name from an app name
pub fn derive_module_name(app_name: &str) -> String {
    app_name.replace('-', "_")
}

/// Construct a class name from a formal name
///
/// Words are split on anything that is not alphanumeric, each word gets an
/// uppercase first letter, and the words are joined. A class name that would
/// start with a digit is prefixed with `_`.
pub fn derive_class_name(formal_name: &str) -> String {
    let normalized: String = formal_name.nfkc().collect();

    let mut class_name = String::with_capacity(normalized.len());
    for word in normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            class_name.extend(first.to_uppercase());
            class_name.push_str(chars.as_str());
        }
    }

    match class_name.chars().next() {
        None => FALLBACK_CLASS_NAME.to_string(),
        Some(first) if !first.is_alphabetic() => format!("_{}", class_name),
        Some(_) => class_name,
    }
}

/// Check that an app name can be used for a project directory and module
pub fn is_valid_app_name(app_name: &str) -> bool {
    !app_name.is_empty()
        && app_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !app_name.starts_with('_')
        && !app_name.ends_with('_')
        && !is_reserved_name(app_name)
}

/// Check whether a name collides with a reserved word
pub fn is_reserved_name(app_name: &str) -> bool {
    RESERVED_NAMES.contains(&app_name)
}
