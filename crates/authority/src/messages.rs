//! Denial message resolution.
//!
//! Message lookup never fails: absence of a localized string falls through a
//! deterministic chain (specific key → `unauthorized.default` in the
//! configured locale → the fallback locale → a hard-coded English constant)
//! and always terminates in a non-empty string.

use std::collections::HashMap;

use authority_core::{Action, AliasTable, ResourceType};

/// Terminal fallback when no catalog entry applies.
pub const DEFAULT_UNAUTHORIZED_MESSAGE: &str = "You are not authorized to access this page.";

/// Locale-keyed catalog of denial message templates.
///
/// Keys are dotted paths (`unauthorized.destroy.project`); templates may
/// interpolate `{action}` and `{subject}`. The subject placeholder receives
/// the humanized type name (`ProjectCategory` → `project category`), key
/// segments use underscore snake case (`project_category`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    locale: String,
    fallback_locale: String,
    tables: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    /// English-only catalog with `en` as both locale and fallback.
    pub fn new() -> Self {
        Self::with_locale("en", "en")
    }

    pub fn with_locale(locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        let mut tables = HashMap::new();
        tables.insert("en".to_string(), Self::english_table());
        Self {
            locale: locale.into(),
            fallback_locale: fallback_locale.into(),
            tables,
        }
    }

    fn english_table() -> HashMap<String, String> {
        HashMap::from([(
            "unauthorized.default".to_string(),
            DEFAULT_UNAUTHORIZED_MESSAGE.to_string(),
        )])
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub fn set_fallback_locale(&mut self, locale: impl Into<String>) {
        self.fallback_locale = locale.into();
    }

    /// Insert or replace a single template under the given locale.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.tables
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Merge a JSON document into the given locale's table, flattening nested
    /// objects into dotted keys. Non-string leaves are ignored.
    ///
    /// ```
    /// use authority::MessageCatalog;
    /// use serde_json::json;
    ///
    /// let mut catalog = MessageCatalog::new();
    /// catalog.merge_json("en", &json!({
    ///     "unauthorized": { "destroy.project": "Hands off {subject}!" }
    /// }));
    /// ```
    pub fn merge_json(&mut self, locale: &str, document: &serde_json::Value) {
        let table = self.tables.entry(locale.to_string()).or_default();
        flatten_into(table, "", document);
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Resolve the denial message for (action, subject).
    ///
    /// Candidate keys are tried most specific first: for each subject in
    /// (snake-cased subject, `all`), each action in (the bare action, then
    /// every alias target subsuming it, then `manage`) forms
    /// `unauthorized.{action}.{subject}`. The bare action is deliberately
    /// tried before its aliases so `unauthorized.destroy.project` beats
    /// `unauthorized.delete.project`.
    pub fn unauthorized_message(
        &self,
        action: &Action,
        subject: &ResourceType,
        aliases: &AliasTable,
    ) -> String {
        let keys = unauthorized_message_keys(action, subject, aliases);
        let template = keys
            .iter()
            .find_map(|key| self.lookup(&self.locale, &format!("unauthorized.{key}")))
            .or_else(|| self.lookup(&self.locale, "unauthorized.default"))
            .or_else(|| self.lookup(&self.fallback_locale, "unauthorized.default"))
            .unwrap_or(DEFAULT_UNAUTHORIZED_MESSAGE);

        template
            .replace("{action}", action.as_str())
            .replace("{subject}", &snake_case(subject.as_str(), ' '))
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn unauthorized_message_keys(
    action: &Action,
    subject: &ResourceType,
    aliases: &AliasTable,
) -> Vec<String> {
    let mut action_names = vec![action.clone()];
    for target in aliases.aliases_for_action(action.clone()) {
        if !action_names.contains(&target) {
            action_names.push(target);
        }
    }
    let manage = Action::new(Action::MANAGE);
    if !action_names.contains(&manage) {
        action_names.push(manage);
    }

    let subjects = [snake_case(subject.as_str(), '_'), ResourceType::ALL.to_string()];

    let mut keys = Vec::with_capacity(action_names.len() * subjects.len());
    for subject in &subjects {
        for action in &action_names {
            keys.push(format!("{}.{}", action.as_str(), subject));
        }
    }
    keys
}

fn flatten_into(table: &mut HashMap<String, String>, prefix: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(entries) => {
            for (key, nested) in entries {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(table, &path, nested);
            }
        }
        serde_json::Value::String(template) => {
            table.insert(prefix.to_string(), template.clone());
        }
        _ => {}
    }
}

/// `ProjectCategory` → `project_category` (or `project category` with `' '`).
fn snake_case(name: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push(delimiter);
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
