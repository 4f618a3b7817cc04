use std::path::PathBuf;

use argh::FromArgs;
use tokio::io::BufReader;
use tracing::{error, info, warn};

use sendlike::config::{self, Origin};
use sendlike::host::Console;
use sendlike::{Registry, consts, telemetry};

/// Relay like commands typed on stdin to a OneBot HTTP API.
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to config file
    #[argh(option, default = "PathBuf::from(consts::DEFAULT_CONFIG_PATH)")]
    config_path: PathBuf,
    /// the user id messages are sent as
    #[argh(option, default = "String::from(\"10000\")")]
    sender_id: String,
    /// send messages in this group instead of directly to the bot
    #[argh(option)]
    group_id: Option<String>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Parse command-line arguments
    let opts: Opts = argh::from_env();

    // Load the config before tracing as it decides how tracing is set up
    let (config, origin) = config::load_or_create(&opts.config_path);

    telemetry::try_init(&config.tracing)?;

    let path = opts.config_path.display();

    match origin {
        Origin::File => info!(%path, "loaded config file"),
        Origin::Created => info!(%path, "created default config file"),
        Origin::Fallback(err) => {
            error!(%path, ?err, "could not load config file, using defaults");
        }
    }

    info!(
        "{} v{} running",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let registry = Registry::preloaded(&config);
    registry.initialize().await?;

    let console = Console::new(opts.sender_id, opts.group_id);
    let input = BufReader::new(tokio::io::stdin());

    let result = tokio::select! {
        result = console.run(&registry, input, tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted");
            Ok(())
        }
    };

    registry.shutdown().await;

    Ok(result?)
}
