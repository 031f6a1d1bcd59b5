use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use lockcard::card::request::{
    AUTHOR_KEY, BATTERY_PERCENTAGE_KEY, CARRIER_NAME_KEY, MESSAGE_TEXT_KEY, SIGNAL_STRENGTH_KEY,
    SUBTITLE_KEY, TIME_KEY,
};
use lockcard::card::{FontBook, RenderRequest, render_png};
use lockcard::config::{FileLogSettings, ServerSettings, load_dotenv};
use lockcard::server::{AppState, run_http_server};

#[derive(Debug, Parser)]
#[command(name = "lockcard", about = "Renders lock-screen style status cards as PNG")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve cards over HTTP.
    Serve {
        /// Overrides CARD_BIND_ADDR.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Render a single card to a PNG file.
    Render {
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        card: CardArgs,
    },
}

/// Raw card parameters, normalized the same way as query strings.
#[derive(Debug, Args)]
struct CardArgs {
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    message_text: Option<String>,
    #[arg(long)]
    carrier_name: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    battery_percentage: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    signal_strength: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
}

impl CardArgs {
    fn into_params(self) -> HashMap<String, String> {
        [
            (TIME_KEY, self.time),
            (MESSAGE_TEXT_KEY, self.message_text),
            (CARRIER_NAME_KEY, self.carrier_name),
            (BATTERY_PERCENTAGE_KEY, self.battery_percentage),
            (SIGNAL_STRENGTH_KEY, self.signal_strength),
            (AUTHOR_KEY, self.author),
            (SUBTITLE_KEY, self.subtitle),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_owned(), value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let _file_log_guard = init_tracing()?;

    let cli = Cli::parse();
    let settings = ServerSettings::from_env().context("failed to load configuration")?;
    let fonts = load_fonts(&settings)?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind_addr.clone());
            run_http_server(AppState::new(fonts), &bind).await?;
        }
        Commands::Render { out, card } => {
            let request = RenderRequest::from_query(&card.into_params());
            let png = render_png(&request, &fonts).context("failed to render card")?;
            std::fs::write(&out, &png)
                .with_context(|| format!("failed to write `{}`", out.display()))?;
            info!(path = %out.display(), bytes = png.len(), "wrote card");
        }
    }

    Ok(())
}

fn load_fonts(settings: &ServerSettings) -> Result<FontBook> {
    let fonts = FontBook::system();
    let Some(dir) = &settings.font_dir else {
        return Ok(fonts);
    };
    ensure!(
        dir.is_dir(),
        "CARD_FONT_DIR `{}` is not a directory",
        dir.display()
    );
    Ok(fonts.with_font_dir(dir))
}

fn init_tracing() -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lockcard=debug"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(env_filter);

    let (file_layer, guard) = match FileLogSettings::from_env() {
        Some(file_log) => {
            let appender = tracing_appender::rolling::daily(&file_log.dir, "lockcard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(&file_log.filter));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(guard)
}
