use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum, ValueHint};

#[derive(Parser)]
#[command(about, version, name = "wikidata-api")]
/// Query declarative Wikidata models and serve them over HTTP
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs)]
pub struct GlobalArgs {
    /// SPARQL endpoint to query
    ///
    /// By default the public Wikidata Query Service is used.
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub endpoint: Option<String>,
    /// User agent sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,
    /// Primary language of labels and descriptions
    #[arg(long, global = true)]
    pub language: Option<String>,
    /// Number of entities requested per page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
    /// Queries with fewer characters are sent with GET, all others with POST
    #[arg(long, global = true, default_value_t = 1000)]
    pub get_threshold: usize,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelName {
    /// Any Wikidata item
    Item,
    /// Biological taxa
    Taxon,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API for all models
    Serve {
        /// Host and port to listen to
        #[arg(short, long, default_value = "localhost:8000", value_hint = ValueHint::Hostname)]
        bind: String,
        /// Allows cross-origin requests
        #[arg(long)]
        cors: bool,
    },
    /// Print the SPARQL query of a model without executing it
    Query {
        #[arg(value_enum)]
        model: ModelName,
        /// Restrict the query to these identifiers
        #[arg(long, value_delimiter = ',')]
        values: Vec<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        /// Only project the minimal fields
        #[arg(long)]
        minimal: bool,
        /// Only count the matching entities
        #[arg(long)]
        count: bool,
    },
    /// List the entities of a model
    List {
        #[arg(value_enum)]
        model: ModelName,
        /// The page to fetch
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        page: usize,
        /// Fetch all pages
        #[arg(long)]
        all: bool,
        /// Only emit the minimal fields
        #[arg(long)]
        minimal: bool,
        /// Include the conformance report of every entity
        #[arg(long)]
        conformance: bool,
    },
    /// Fetch a single entity by its identifier
    Get {
        #[arg(value_enum)]
        model: ModelName,
        /// The identifier, e.g. Q42
        id: String,
        /// Include the conformance report
        #[arg(long)]
        conformance: bool,
    },
    /// Search the entities of a model
    ///
    /// All entities are fetched and matched locally.
    Search {
        #[arg(value_enum)]
        model: ModelName,
        query: String,
    },
    /// Count the entities of a model
    Count {
        #[arg(value_enum)]
        model: ModelName,
    },
}
