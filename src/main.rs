use clap::{Parser, Subcommand};
use gallerize::{cleanup, config, generate, output, scan, serve};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    if env!("GALLERIZE_ON_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    let hash = env!("GALLERIZE_GIT_HASH");
    if hash.is_empty() {
        "dev@unknown"
    } else {
        // Leaked once at startup
        Box::leak(format!("dev@{hash}").into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "gallerize")]
#[command(about = "Browse a directory of images as static HTML galleries")]
#[command(long_about = "\
Browse a directory of images as static HTML galleries

Writes a gallerize.html page into every directory that holds images (or holds
directories that do), linking thumbnails, subdirectories and parents by
relative paths. Directories without images anywhere below get no page.

  photos/
  ├── gallerize.toml      # Optional config (run 'gallerize gen-config')
  ├── a.jpg
  ├── notes.txt           # Not an image, not listed
  ├── trips/
  │   └── rome/
  │       └── b.png
  └── docs/               # No images below: no page
      └── plan.pdf

Run with no command (or just a port) to generate the pages, serve them on
http://127.0.0.1:8000/gallerize.html, and remove them again on Ctrl-C.")]
#[command(version = version_string())]
struct Cli {
    /// Directory to build galleries for
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Port for the generate-serve-cleanup session
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write an index page into every directory with images
    Generate,
    /// Delete every generated index page under the root
    Cleanup,
    /// Serve the root directory over HTTP (no generation)
    Serve(ServeArgs),
    /// Show which directories would get an index page
    Scan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock gallerize.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Port to listen on [default: server.port from config, else 8000]
    port: Option<u16>,

    /// Address to listen on [default: server.bind from config, else 127.0.0.1]
    #[arg(long)]
    bind: Option<IpAddr>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let load_config = || config::load_config(&cli.root);

    match cli.command {
        Some(Command::Generate) => {
            let report = generate::generate(&cli.root, &load_config()?)?;
            output::print_generate_output(&report);
        }
        Some(Command::Cleanup) => {
            let report = cleanup::cleanup(&cli.root)?;
            output::print_cleanup_output(&report);
        }
        Some(Command::Serve(args)) => {
            let config = load_config()?;
            let ip = match args.bind {
                Some(ip) => ip,
                None => config.server.ip()?,
            };
            let addr = SocketAddr::new(ip, args.port.unwrap_or(config.server.port));
            serve::run(&cli.root, addr, output::print_serve_banner)?;
        }
        Some(Command::Scan { json }) => {
            let gallery = scan::scan(&cli.root, &load_config()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&gallery)?);
            } else {
                output::print_scan_output(&gallery);
            }
        }
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
        None => {
            let config = load_config()?;
            let addr = SocketAddr::new(
                config.server.ip()?,
                cli.port.unwrap_or(config.server.port),
            );
            show(&cli.root, &config, addr)?;
        }
    }

    Ok(())
}

/// Generate, serve until Ctrl-C, then remove the pages this session wrote.
fn show(
    root: &Path,
    config: &config::GalleryConfig,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = generate::generate(root, config)?;
    output::print_generate_output(&report);

    // Clean up even when the server fails to start
    let served = serve::run(root, addr, output::print_serve_banner);

    let written: Vec<PathBuf> = report.written.iter().map(|w| w.index_path()).collect();
    let cleaned = cleanup::remove_generated(root, &written);
    output::print_cleanup_output(&cleaned);

    served?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gallerize=debug" } else { "gallerize=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
