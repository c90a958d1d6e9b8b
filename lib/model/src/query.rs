//! Compiles the fields of a model into a single SPARQL query.
//!
//! Every query has the same shape. The fields contribute fragments to a [QueryParts] value that
//! is then assembled into the final query string.

use crate::constants::ROOT_VARIABLE;
use crate::{Field, ModelMeta};

/// The parameters of a single compiled query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Binds the root variable to a known set of identifiers.
    pub values: Option<Vec<String>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Only project the fields that are part of the minimal projection.
    pub minimal: bool,
    /// Only count the matching entities. Implies `minimal`.
    pub count: bool,
    /// Overrides the primary language of the model.
    pub language: Option<String>,
}

impl QueryOptions {
    #[must_use]
    pub fn with_values<V: Into<String>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_minimal(mut self, minimal: bool) -> Self {
        self.minimal = minimal;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn is_minimal(&self) -> bool {
        self.minimal || self.count
    }
}

/// The vocabulary a fragment is rendered with.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RenderContext<'a> {
    pub entity_prefix: &'a str,
    pub prop_prefix: &'a str,
    pub subclass_prop: &'a str,
    /// The primary language of the query.
    pub language: &'a str,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(meta: &'a ModelMeta, language: &'a str) -> Self {
        Self {
            entity_prefix: &meta.entity_prefix,
            prop_prefix: &meta.prop_prefix,
            subclass_prop: &meta.subclass_prop,
            language,
        }
    }
}

/// The fragments of all fields, grouped by the clause they belong to. Empty fragments are
/// dropped while collecting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct QueryParts {
    pub outer: Vec<String>,
    pub inner: Vec<String>,
    pub filters: Vec<String>,
    pub outer_filters: Vec<String>,
    pub services: Vec<String>,
    pub group: Vec<String>,
}

impl QueryParts {
    pub(crate) fn collect(fields: &[Field], minimal: bool, ctx: &RenderContext<'_>) -> Self {
        let mut parts = Self::default();
        for field in fields {
            // Required fields are never suppressed, so their filters are always rendered.
            if field.is_suppressed(minimal) {
                continue;
            }
            push_non_empty(&mut parts.outer, field.outer_fragment(minimal));
            push_non_empty(&mut parts.inner, field.inner_fragment(minimal));
            push_non_empty(&mut parts.filters, field.filter_fragment(ctx));
            push_non_empty(&mut parts.outer_filters, field.outer_filter_fragment(ctx));
            push_non_empty(&mut parts.services, field.service_fragment());
            push_non_empty(&mut parts.group, field.group_fragment());
        }
        parts
    }
}

fn push_non_empty(target: &mut Vec<String>, fragment: String) {
    if !fragment.is_empty() {
        target.push(fragment);
    }
}

/// Compiles `fields` into a minified SPARQL query.
///
/// An identifier list that is empty after slicing is treated as absent. Callers are expected to
/// skip such queries. Identifiers are normalised with [ModelMeta::entity_id]; values without an
/// identifier are dropped, so a list without any valid identifier binds the empty set.
pub(crate) fn compile(fields: &[Field], meta: &ModelMeta, options: &QueryOptions) -> String {
    let language = options.language.as_deref().unwrap_or(&meta.language);
    let ctx = RenderContext::new(meta, language);
    let minimal = options.is_minimal();
    let parts = QueryParts::collect(fields, minimal, &ctx);

    let (limit, offset) = if options.count {
        (None, None)
    } else {
        (options.limit, options.offset)
    };
    let values = options
        .values
        .as_deref()
        .map(|values| slice_values(values, limit, offset))
        .filter(|values| !values.is_empty());

    let mut clauses = Vec::new();
    match values {
        Some(values) => {
            let values = values
                .iter()
                .filter_map(|value| meta.entity_id(value))
                .map(|id| format!("{}:{id}", meta.entity_prefix))
                .collect::<Vec<_>>()
                .join(" ");
            clauses.push(format!("VALUES ?{ROOT_VARIABLE} {{{values}}}"));
            clauses.extend(parts.filters);
        }
        None => {
            let mut modifiers = vec![format!("ORDER BY ?{ROOT_VARIABLE}")];
            if let Some(limit) = limit {
                modifiers.push(format!("LIMIT {limit}"));
            }
            if let Some(offset) = offset.filter(|offset| *offset > 0) {
                modifiers.push(format!("OFFSET {offset}"));
            }
            clauses.push(format!(
                "{{ SELECT DISTINCT {} WHERE {{ {} }} {} }}",
                parts.inner.join(" "),
                parts.filters.join(" "),
                modifiers.join(" ")
            ));
        }
    }
    clauses.extend(parts.outer_filters);
    clauses.push(format!(
        "SERVICE wikibase:label {{ bd:serviceParam wikibase:language '{}'. {} }}",
        meta.languages(Some(language)),
        parts.services.join(" ")
    ));

    let mut query = format!(
        "SELECT {} WHERE {{ {} }}",
        parts.outer.join(" "),
        clauses.join(" ")
    );
    if !parts.group.is_empty() {
        query = format!("{query} GROUP BY {}", parts.group.join(" "));
    }
    if options.count {
        query = format!(
            "SELECT (COUNT(DISTINCT ?{ROOT_VARIABLE}) AS ?count) WHERE {{ {{ {query} }} }}"
        );
    }

    let prefixes = meta
        .prefixes
        .iter()
        .map(|(prefix, url)| format!("PREFIX {prefix}: <{url}>\n"))
        .collect::<String>();
    minify(&format!("{prefixes}{query}"))
}

/// Applies `offset` and `limit` to a known list of identifiers.
fn slice_values(values: &[String], limit: Option<usize>, offset: Option<usize>) -> &[String] {
    let start = offset.unwrap_or(0).min(values.len());
    let end = limit.map_or(values.len(), |limit| {
        start.saturating_add(limit).min(values.len())
    });
    &values[start..end]
}

/// Collapses all runs of whitespace into single spaces.
pub fn minify(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}
