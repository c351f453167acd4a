use anyhow::Result;
use clap::Parser;
use console::style;
use iconkit::{IconConfig, RasterizeError, DEFAULT_SIZES};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Image to render the icons from
    source: PathBuf,
    /// Existing directory receiving `icon{size}.png` files
    out_dir: PathBuf,
    /// Icon side length in px, may be repeated
    #[clap(
        short,
        long = "size",
        value_name = "PX",
        default_values_t = DEFAULT_SIZES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sizes: Vec<u32>,
}

fn main() -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
    tracing_log::LogTracer::init().ok();
    let env = std::env::var("XICON_LOG").unwrap_or_else(|_| "error".into());
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_span_events(FmtSpan::ACTIVE | FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::new(env))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    log_panics::init();
    let args = Args::parse();
    let config = IconConfig::new(args.source, args.out_dir).with_sizes(args.sizes);
    run(&config)
}

fn run(config: &IconConfig) -> Result<()> {
    match iconkit::rasterize(config) {
        Ok(written) => {
            written.iter().for_each(|path| saved(path));
            Ok(())
        }
        Err(RasterizeError::Write { written, failures }) => {
            written.iter().for_each(|path| saved(path));
            for failure in &failures {
                eprintln!("{} {}: {}", style("[ERROR]").red(), failure, failure.source);
            }
            anyhow::bail!(
                "{} of {} icons could not be written",
                failures.len(),
                written.len() + failures.len()
            );
        }
        Err(err) => Err(err.into()),
    }
}

fn saved(path: &Path) {
    println!("Saved {}", path.display());
}
