use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "todoz")]
#[command(about = "Walks a document store through its API and renders each response", long_about = None)]
pub struct Cli {
    /// Query a named field index (serialized name, e.g. completed, title,
    /// createdAt) instead of the built-in map function
    #[arg(long)]
    pub by: Option<String>,

    /// Only return query rows whose key equals this literal
    #[arg(short, long)]
    pub key: Option<String>,

    /// Only return query rows whose key starts with this literal
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Maximum number of query rows
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Sort query rows in descending key order
    #[arg(long)]
    pub descending: bool,

    /// Attach the full document to each query row
    #[arg(long)]
    pub include_docs: bool,

    /// Run without a display surface; rendered responses are dropped with a
    /// diagnostic
    #[arg(long)]
    pub no_display: bool,
}
