//! Linemark binary: opens a window showing the demo segment.

use std::path::Path;

use linemark::{Options, Viewer};

fn main() {
    env_logger::init();

    // Optional first argument: a TOML options preset
    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(opts) => Some(opts),
            Err(e) => {
                log::error!("failed to load options from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut builder = Viewer::builder().with_title("Linemark");
    if let Some(opts) = options {
        builder = builder.with_options(opts);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
