use crate::constants::{
    ALL_LANGUAGES, DEFAULT_PAGE_SIZE, DEFAULT_USER_AGENT, ENGLISH_LANG, WIKIDATA_ENTITY_PREFIX,
    WIKIDATA_ENTITY_PREFIX_URL, WIKIDATA_ENTITY_REGEX, WIKIDATA_PROP_PREFIX,
    WIKIDATA_PROP_PREFIX_URL, WIKIDATA_PROP_REGEX, WIKIDATA_SPARQL_ENDPOINT,
    WIKIDATA_SUBCLASS_PROP,
};
use crate::ConfigurationError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used, reason = "The pattern is a constant")]
static ENTITY_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WIKIDATA_ENTITY_REGEX).unwrap());
#[allow(clippy::unwrap_used, reason = "The pattern is a constant")]
static PROP_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(WIKIDATA_PROP_REGEX).unwrap());

/// The configuration of an [EntityModel](crate::EntityModel).
///
/// Holds everything the query compiler and the decoder need besides the fields themselves. The
/// defaults target the public Wikidata Query Service.
#[derive(Clone, Debug)]
pub struct ModelMeta {
    /// The primary language of labels, descriptions and alternative labels.
    pub language: String,
    /// Comma-separated languages the label service falls back to.
    pub fallback_languages: String,
    pub endpoint: String,
    /// Prefix declarations emitted in front of every query.
    pub prefixes: BTreeMap<String, String>,
    pub page_size: usize,
    pub entity_prefix: String,
    pub prop_prefix: String,
    pub subclass_prop: String,
    /// Stripped from entity identifiers that are returned as URLs.
    pub entity_prefix_url: String,
    pub entity_id_regex: Regex,
    pub prop_id_regex: Regex,
    pub user_agent: String,
    /// Name of the shape used for conformance checks.
    pub schema: Option<String>,
}

impl Default for ModelMeta {
    fn default() -> Self {
        let prefixes = BTreeMap::from([
            (
                WIKIDATA_ENTITY_PREFIX.to_owned(),
                WIKIDATA_ENTITY_PREFIX_URL.to_owned(),
            ),
            (
                WIKIDATA_PROP_PREFIX.to_owned(),
                WIKIDATA_PROP_PREFIX_URL.to_owned(),
            ),
        ]);
        Self {
            language: ENGLISH_LANG.to_owned(),
            fallback_languages: ALL_LANGUAGES.to_owned(),
            endpoint: WIKIDATA_SPARQL_ENDPOINT.to_owned(),
            prefixes,
            page_size: DEFAULT_PAGE_SIZE,
            entity_prefix: WIKIDATA_ENTITY_PREFIX.to_owned(),
            prop_prefix: WIKIDATA_PROP_PREFIX.to_owned(),
            subclass_prop: WIKIDATA_SUBCLASS_PROP.to_owned(),
            entity_prefix_url: WIKIDATA_ENTITY_PREFIX_URL.to_owned(),
            entity_id_regex: ENTITY_ID_REGEX.clone(),
            prop_id_regex: PROP_ID_REGEX.clone(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            schema: None,
        }
    }
}

impl ModelMeta {
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_fallback_languages(mut self, languages: impl Into<String>) -> Self {
        self.fallback_languages = languages.into();
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, url: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), url.into());
        self
    }

    #[must_use]
    pub fn without_prefixes(mut self) -> Self {
        self.prefixes.clear();
        self
    }

    /// Sets the page size. A page size of zero is raised to one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_entity_id_regex(mut self, pattern: &str) -> Result<Self, ConfigurationError> {
        self.entity_id_regex = compile_regex(pattern)?;
        Ok(self)
    }

    pub fn with_prop_id_regex(mut self, pattern: &str) -> Result<Self, ConfigurationError> {
        self.prop_id_regex = compile_regex(pattern)?;
        Ok(self)
    }

    /// Returns the language list of the label service, starting with `language` or, if
    /// absent, with the primary language of the model.
    pub fn languages(&self, language: Option<&str>) -> String {
        let primary = language.unwrap_or(&self.language);
        if self.fallback_languages.is_empty() {
            primary.to_owned()
        } else {
            format!("{primary},{}", self.fallback_languages)
        }
    }

    /// Finds the first entity identifier (e.g. `Q123`) in `value`.
    pub fn find_entity_id<'value>(&self, value: &'value str) -> Option<&'value str> {
        self.entity_id_regex.find(value).map(|m| m.as_str())
    }

    /// Finds the first property identifier (e.g. `P31`) in `value`.
    pub fn find_prop_id<'value>(&self, value: &'value str) -> Option<&'value str> {
        self.prop_id_regex.find(value).map(|m| m.as_str())
    }

    /// Reduces `value` to a bare entity identifier.
    ///
    /// The entity prefix URL is stripped if present. Otherwise, the first match of the entity
    /// regex is returned. If neither succeeds, `value` is returned unchanged.
    pub fn strip_entity_id<'value>(&self, value: &'value str) -> &'value str {
        if let Some(id) = value.strip_prefix(self.entity_prefix_url.as_str()) {
            if !id.is_empty() {
                return id;
            }
        }
        self.find_entity_id(value).unwrap_or(value)
    }

    /// Normalises `value` to an entity identifier with an uppercase leading letter, so `q42`
    /// and `http://www.wikidata.org/entity/Q42` both become `Q42`.
    ///
    /// Returns [None] if `value` contains no identifier.
    pub fn entity_id(&self, value: &str) -> Option<String> {
        let value = value
            .strip_prefix(self.entity_prefix_url.as_str())
            .unwrap_or(value);
        let mut chars = self.find_entity_id(value)?.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    }
}

fn compile_regex(pattern: &str) -> Result<Regex, ConfigurationError> {
    Regex::new(pattern).map_err(|e| ConfigurationError::InvalidRegex {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })
}
