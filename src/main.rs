use annotate_gallery::config::{self, PROFILE_ENV, Profile};
use annotate_gallery::{logging, output, paths, scan, server};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            concat!(env!("CARGO_PKG_VERSION"), "-dev")
        } else {
            Box::leak(format!("{}-dev@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "annotate-gallery")]
#[command(about = "Browse a folder of images and edit their caption files")]
#[command(long_about = "\
Browse a folder of images and edit their caption files

Every image gets a sidecar .txt with the same stem. Scanning a folder creates
missing sidecars empty, so each image always has one to edit:

  photos/
  ├── 001.jpg
  ├── 001.txt          # caption for 001.jpg
  └── cats/
      ├── 002.png
      └── 002.txt      # created empty on first scan

The server serves a single page at http://HOST:PORT/ with a thumbnail grid,
an editor, and a starred list kept in starred_images.json.

Settings come from the profile (development or production), optionally
overlaid by a TOML file. Run 'annotate-gallery gen-config' for a documented
overlay.")]
#[command(version = version_string())]
struct Cli {
    /// Settings profile: development or production
    #[arg(long, env = PROFILE_ENV, default_value = "development", global = true)]
    profile: String,

    /// TOML file overlaid on the profile's settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Scan a folder once, creating missing sidecars, and list the result
    Scan {
        /// Folder to scan
        folder: PathBuf,
    },
    /// Print a config overlay with every option documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let profile = Profile::from_name(&cli.profile);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = config::load_config(profile, cli.config.as_deref())?;
            let _guard = logging::init(&config)?;
            tracing::info!(
                profile = profile.name(),
                version = version_string(),
                "starting annotate-gallery"
            );
            let cwd = std::env::current_dir()?;
            server::serve(config, cwd).await?;
        }
        Command::Scan { folder } => {
            let config = config::load_config(profile, cli.config.as_deref())?;
            logging::init_stderr(config.server.debug)?;
            let root = paths::resolve_request_path(
                &folder.to_string_lossy(),
                &std::env::current_dir()?,
            );
            let report = scan::scan(&root, &config)?;
            output::print_scan_output(&report, &root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
