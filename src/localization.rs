use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use unic_langid::LanguageIdentifier;

const DEFAULT_LANGUAGE: &str = "en";

/// Message files compiled into the binary, keyed by language code
const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("pl", include_str!("../locales/pl/main.ftl")),
];

/// Localization manager for the order cards bot
pub struct LocalizationManager {
    bundles: HashMap<String, Arc<FluentBundle<FluentResource>>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every bundled language
    pub fn new() -> Result<Self> {
        Self::from_resources(RESOURCES)
    }

    /// Create a manager from `(language code, fluent source)` pairs
    pub fn from_resources(resources: &[(&str, &str)]) -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in resources {
            let locale: LanguageIdentifier = code.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(code.to_string(), Arc::new(bundle));
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // messages go to Telegram as plain text; no bidi isolation marks
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid message file for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Get a localized message in the given language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        // Per-key fallback: a message missing from the requested language comes from English
        let found = [language, DEFAULT_LANGUAGE]
            .into_iter()
            .filter_map(|code| self.bundles.get(code))
            .find_map(|bundle| bundle.get_message(key).map(|msg| (bundle, msg)));

        let (bundle, msg) = match found {
            Some(found) => found,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        let value = if let Some(args) = args {
            let fluent_args = FluentArgs::from_iter(
                args.iter().map(|(k, v)| (*k, FluentValue::from(*v))),
            );
            bundle.format_pattern(pattern, Some(&fluent_args), &mut errors)
        } else {
            bundle.format_pattern(pattern, None, &mut errors)
        };

        value.into_owned()
    }

    /// Get a localized message in English
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, DEFAULT_LANGUAGE, args)
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager; repeated calls are no-ops
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_none() {
        let manager = LocalizationManager::new()?;
        let _ = LOCALIZATION_MANAGER.set(manager);
    }
    Ok(())
}

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| {
        LocalizationManager::new().expect("Bundled message files should be valid")
    })
}

/// Map a Telegram language code (e.g. "pl-PL") to a supported language
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let primary = language_code
        .and_then(|code| code.split(['-', '_']).next())
        .map(|code| code.to_lowercase());

    match primary.as_deref() {
        Some("pl") => "pl",
        _ => DEFAULT_LANGUAGE,
    }
}

/// Localized message for the user's language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(key, detect_language(language_code), None)
}

/// Localized message with arguments for the user's language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(
        key,
        detect_language(language_code),
        Some(&args_map),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language(Some("pl")), "pl");
        assert_eq!(detect_language(Some("pl-PL")), "pl");
        assert_eq!(detect_language(Some("en-US")), "en");
        assert_eq!(detect_language(Some("de")), "en");
        assert_eq!(detect_language(None), "en");
    }

    #[test]
    fn test_every_english_key_has_polish_translation() {
        let manager = LocalizationManager::new().unwrap();
        for line in RESOURCES[0].1.lines() {
            let Some((key, _)) = line.split_once(" =") else {
                continue;
            };
            if key.starts_with(' ') || key.starts_with('#') {
                continue;
            }
            let polish = manager.bundles["pl"].get_message(key);
            assert!(polish.is_some(), "Missing Polish translation for '{}'", key);
        }
    }
}
