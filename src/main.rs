use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use colorsort::api;
use colorsort::assets::{AssetLoader, ConfigSource};
use colorsort::models::{AppConfig, CanvasSpec};
use colorsort::server;
use colorsort::services::{self, WalkStatus};

#[derive(Parser)]
#[command(name = "colorsort")]
#[command(about = "Colorsort - paints every color of an RGB cube, one neighbor at a time")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Run one walk in-process and print its summary
    Walk {
        /// Canvas name from config (default: the configured default canvas)
        #[arg(short, long)]
        canvas: Option<String>,

        /// Walk seed (default: canvas seed, else random)
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Extract the embedded config.yaml for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Colorsort API",
        description = "Walks that paint every color of an RGB cube exactly once",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_list_canvases,
        api::handle_canvas_image,
        api::handle_canvas_stream,
    ),
    components(schemas(
        api::CanvasInfo,
        api::CanvasListResponse,
        services::WalkStart,
        services::WalkSummary,
        services::WalkStatus,
    )),
    tags(
        (name = "Canvas", description = "Canvas listing, rendering and streaming")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Walk { canvas, seed }) => run_walk_command(canvas, seed).await,
        Some(Commands::Init { force }) => run_init_command(force),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Run a single walk without the server
async fn run_walk_command(canvas: Option<String>, seed: Option<u64>) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorsort=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let asset_loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&asset_loader);

    let (name, canvas_config) = match canvas {
        Some(ref name) => {
            let canvas = config
                .canvas(name)
                .ok_or_else(|| anyhow::anyhow!("Canvas not found: {name}"))?;
            (name.as_str(), canvas)
        }
        None => config
            .default_canvas()
            .ok_or_else(|| anyhow::anyhow!("No default canvas configured; pass --canvas"))?,
    };
    let spec = CanvasSpec::resolve(name, canvas_config, seed)?;

    println!(
        "Walking '{}' ({}x{}, {} colors, seed {})",
        spec.name,
        spec.width(),
        spec.height(),
        spec.cell_count(),
        spec.seed
    );

    // Ctrl-C stops the walk between two steps
    let flag = color_walk::CancelFlag::new();
    let walk_flag = flag.clone();
    let walk = tokio::task::spawn_blocking(move || services::paint_canvas(&spec, &walk_flag));
    tokio::pin!(walk);
    let result = tokio::select! {
        result = &mut walk => result,
        _ = tokio::signal::ctrl_c() => {
            flag.cancel();
            walk.await
        }
    };
    let (canvas, summary) = result??;

    let status = match summary.status {
        WalkStatus::Completed => "completed",
        WalkStatus::Cancelled => "cancelled",
    };
    println!("Status:           {status}");
    println!(
        "Cells painted:    {} of {}",
        canvas.painted_count(),
        canvas.width() as usize * canvas.height() as usize
    );
    println!("Neighbor steps:   {}", summary.neighbor_steps);
    println!(
        "Fallback scans:   {} ({:.1}% of steps)",
        summary.fallback_steps,
        summary.fallback_ratio * 100.0
    );
    println!("Mean distance^2:  {:.1}", summary.mean_distance_sq);
    println!("Elapsed:          {} ms", summary.elapsed_ms);

    Ok(())
}

/// Extract the embedded config to the filesystem
fn run_init_command(force: bool) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env();
    let report = loader.init(force)?;

    for path in &report.written {
        println!("  wrote    {path}");
    }
    for path in &report.skipped {
        println!("  skipped  {path} (exists, use --force to overwrite)");
    }

    Ok(())
}

/// Show configuration status and available commands
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Colorsort v{VERSION}");
    println!("Every color of an RGB cube, one neighbor at a time\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let loader = AssetLoader::from_env();
    let config_source = match loader.config_source() {
        ConfigSource::Embedded => "embedded".to_string(),
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Missing(_) => "embedded (file not found)".to_string(),
    };
    println!("\nConfig:  {config_source}");

    let config = AppConfig::load_from_assets(&loader);
    println!("\nCanvases:");
    for (name, canvas) in &config.canvases {
        let marker = if config.default_canvas.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        let validity = match CanvasSpec::resolve(name, canvas, Some(0)) {
            Ok(_) => "ok".to_string(),
            Err(e) => e.to_string(),
        };
        println!(
            " {marker} {name:<12} {}x{} levels {:<3} {:>8} cells  {validity}",
            canvas.width,
            canvas.height,
            canvas.levels,
            canvas.cell_count()
        );
    }

    println!("\nCommands:");
    println!("  colorsort serve                Start the HTTP server");
    println!("  colorsort walk [-c NAME] [-s N]  Run one walk and print its summary");
    println!("  colorsort init [--force]       Extract config.yaml for customization");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorsort=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    tracing::info!(
        config = ?asset_loader
            .config_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        "Config source configured"
    );

    // Seed the config file if the configured path is missing
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!("Seeded config file with embedded default");
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed config");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    // Build router: shared API routes plus production-only docs
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Colorsort server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
