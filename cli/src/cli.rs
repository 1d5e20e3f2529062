use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-lpg")]
/// Imports RDF into a labeled property graph and deletes it again
///
/// The graph lives in memory for the duration of a command. The result is written to stdout as
/// JSON, logs are written to stderr (see RUST_LOG).
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a RDF file and print the job summary and the resulting graph
    Import {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Delete the triples of a RDF file from a graph built from other RDF files
    Delete {
        #[command(flatten)]
        input: InputArgs,
        /// Files to import before deleting
        ///
        /// Their format is guessed from their extension.
        #[arg(long, num_args = 1.., value_hint = ValueHint::FilePath)]
        against: Vec<PathBuf>,
    },
    /// Print the graph the import of a RDF file would create, without running a job
    Preview {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(ClapArgs)]
pub struct InputArgs {
    /// File to read
    ///
    /// If no file is given, stdin is read.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
    /// The format of the file to read
    ///
    /// It can be an extension like "nt" or a MIME type like "application/n-triples".
    ///
    /// By default the format is guessed from the file extension.
    #[arg(long, required_unless_present = "file")]
    pub format: Option<String>,
    /// Base IRI of the file to read
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
    /// JSON file with the mapping policy
    ///
    /// For example {"handleVocabUris": "IGNORE", "handleMultival": "ARRAY", "commitSize": 500}.
    /// By default IRIs are shortened with generated prefixes and every value overwrites the
    /// previous one.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}
