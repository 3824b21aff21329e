//! `ordergraph`: order document graph command-line interface.
//!
//! Provides three subcommands:
//!
//! - **`build`**: turn an order document into graph JSON (`{nodes, edges}`).
//! - **`summary`**: print a human-readable overview of the graph, or of one node.
//! - **`check`**: build the graph and verify its structural invariants.
//!
//! All subcommands read JSON from a file path or from stdin (`-`). Logs go
//! to stderr; set `RUST_LOG=ordergraph=debug` to see build phases.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use ordergraph::{
    build_graph_with, check_graph, render, BuildOptions, ClassificationRules, GraphData, Strategy,
};
use tracing_subscriber::EnvFilter;

/// ordergraph: order document graph CLI
///
/// Build, inspect, and check node/edge graphs derived from order documents.
#[derive(Parser)]
#[command(name = "ordergraph", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct BuildArgs {
    /// Path to a JSON order document, or `-` for stdin.
    file: PathBuf,

    /// Traversal strategy: domain | generic
    #[arg(long, env = "ORDERGRAPH_STRATEGY", default_value_t = Strategy::DomainAware)]
    strategy: Strategy,

    /// JSON file with classification rules for the generic traversal.
    /// Replaces the built-in rule table.
    #[arg(long, env = "ORDERGRAPH_RULES", value_name = "FILE")]
    rules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the graph and print it as JSON.
    ///
    /// Exits 2 if the input is not valid JSON. A document whose top level is
    /// not an object produces `{"nodes":[],"edges":[]}`.
    Build {
        #[command(flatten)]
        args: BuildArgs,

        /// Indent the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print a human-readable summary of the graph.
    ///
    /// With --node, print a single node with its data and relations instead.
    Summary {
        #[command(flatten)]
        args: BuildArgs,

        /// Node id to describe (e.g. `n3`).
        #[arg(long, value_name = "ID")]
        node: Option<String>,
    },

    /// Build the graph and verify its structural invariants.
    ///
    /// Exits 0 if the graph is well-formed, 1 otherwise.
    Check {
        #[command(flatten)]
        args: BuildArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "ordergraph=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build { args, pretty } => {
            let graph = build(&args);
            let json = if pretty {
                graph.to_json_pretty()
            } else {
                graph.to_json()
            };
            println!("{}", json.unwrap_or_else(|e| fatal(e)));
        }

        Command::Summary { args, node } => {
            let graph = build(&args);
            match node {
                Some(id) => match render::render_node(&graph, &id) {
                    Some(text) => print!("{}", text),
                    None => fatal(format!("no node with id {id:?}")),
                },
                None => print!("{}", render::render_graph(&graph)),
            }
        }

        Command::Check { args } => {
            let graph = build(&args);
            match check_graph(&graph) {
                Ok(()) => println!(
                    "ok: {} nodes, {} edges",
                    graph.nodes.len(),
                    graph.edges.len()
                ),
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

/// Read the input, assemble options, and build. Exits on any failure.
fn build(args: &BuildArgs) -> GraphData {
    let mut options = BuildOptions::default().with_strategy(args.strategy);
    if let Some(path) = &args.rules {
        let rules = ClassificationRules::from_json(&read_input(path))
            .unwrap_or_else(|e| fatal(format!("{}: {e}", path.display())));
        tracing::info!(path = %path.display(), rules = rules.rules().len(), "loaded classification rules");
        options = options.with_rules(rules);
    }

    let json = read_input(&args.file);
    let graph = build_graph_with(&json, &options).unwrap_or_else(|e| fatal(e));
    tracing::info!(
        strategy = %args.strategy,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph built"
    );
    graph
}

/// The document at `path`; `-` reads stdin to the end.
fn read_input(path: &Path) -> String {
    let stdin = path == Path::new("-");
    let contents = if stdin {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    contents.unwrap_or_else(|e| {
        let source = if stdin {
            "stdin".to_string()
        } else {
            path.display().to_string()
        };
        fatal(format!("cannot read {source}: {e}"))
    })
}

/// Report `msg` on stderr and exit with status 2.
fn fatal(msg: impl std::fmt::Display) -> ! {
    eprintln!("ordergraph: {msg}");
    process::exit(2);
}
