#[macro_use]
extern crate log;

use clap::Parser;
use lumen::loader;

/// An offline physically based renderer.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// Path to the scene file.
    scene: String,

    /// Write the final image to the given filename instead of the one in
    /// the scene file.
    #[arg(long = "outfile", short = 'o', value_name = "FILE")]
    outfile: Option<String>,

    /// Use the specified number of threads for rendering.
    #[arg(long = "threads", short = 't', value_name = "NUM")]
    threads: Option<usize>,
}

fn main() {
    env_logger::init();
    let options = Options::parse();

    if let Some(threads) = options.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            warn!("Could not configure {threads} render threads: {e}");
        }
    }

    if let Err(e) = run(&options) {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    let mut context = loader::load(&options.scene, options.outfile.as_deref())?;
    context.render()
}
