//! Default values used by [ModelMeta](crate::ModelMeta) and the query compiler.

/// The fallback languages of the label service, in order of preference.
pub const ALL_LANGUAGES: &str = "[AUTO_LANGUAGE],en,fr,ar,be,bg,bn,ca,cs,da,de,el,en,es,et,fa,fi,he,hi,hu,hy,id,it,ja,jv,ko,nb,nl,eo,pa,pl,pt,ro,ru,sh,sk,sr,sv,sw,te,th,tr,uk,yue,vec,vi,zh";
pub const ENGLISH_LANG: &str = "en";

pub const WIKIDATA_ENTITY_PREFIX: &str = "wd";
pub const WIKIDATA_PROP_PREFIX: &str = "wdt";
pub const WIKIDATA_SUBCLASS_PROP: &str = "P279";
pub const WIKIDATA_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const WIKIDATA_ENTITY_PREFIX_URL: &str = "http://www.wikidata.org/entity/";
pub const WIKIDATA_PROP_PREFIX_URL: &str = "http://www.wikidata.org/prop/direct/";
pub const WIKIDATA_ENTITY_REGEX: &str = r"[Qq]\d+";
pub const WIKIDATA_PROP_REGEX: &str = r"[Pp]\d+";

/// The variable that binds the subject of every compiled query.
pub const ROOT_VARIABLE: &str = "main";
pub const DEFAULT_SEPARATOR: &str = "|";
pub const DEFAULT_PAGE_SIZE: usize = 500;
pub const DEFAULT_USER_AGENT: &str = concat!(
    "wikidata-api-rs/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/kennethsn/django-wikidata-api)"
);
