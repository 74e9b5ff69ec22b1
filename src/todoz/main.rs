use clap::Parser;
use todoz::demo::{self, QueryTuning};
use todoz::render::{SurfaceRegistry, TerminalSurface, RESPONSE_SURFACE};
use todoz::store::memory::InMemoryStore;

mod args;
mod print;

use args::Cli;

fn main() {
    let cli = Cli::parse();

    let mut store = InMemoryStore::new();
    let mut surfaces = SurfaceRegistry::new();
    if !cli.no_display {
        surfaces.register(RESPONSE_SURFACE, Box::new(TerminalSurface::new()));
    }

    let tuning = QueryTuning {
        by: cli.by,
        key: cli.key,
        prefix: cli.prefix,
        limit: cli.limit,
        descending: cli.descending,
        include_docs: cli.include_docs,
    };

    let report = demo::run(&mut store, &mut surfaces, &tuning);

    print::print_messages(&report.messages);
    if !report.listed.is_empty() {
        println!();
        print::print_todos(&report.listed);
    }
}
