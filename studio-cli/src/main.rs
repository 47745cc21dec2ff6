//! # Saorsa Studio CLI
//!
//! Headless driver for the studio editor core.
//!
//! ```bash
//! studio show --format json
//! studio play --seconds 5 --from 170
//! RUST_LOG=studio_core=debug studio demo
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use studio_core::playback::format_timecode;
use studio_core::transfer::{drop_payload, encode_transfer, place_resource, upload};
use studio_core::{
    DragController, EditorConfig, EditorState, EditorStore, ElementPatch, Layout, PageId,
    PagePatch, PlaybackDriver, Position, PropertyPanel, ResourceId, ResourceTab,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for studio.
#[derive(Debug, Parser)]
#[command(name = "studio")]
#[command(about = "Saorsa Studio headless editor")]
#[command(version)]
struct Cli {
    /// Editor configuration file (JSON)
    #[arg(long, env = "STUDIO_CONFIG")]
    config: Option<PathBuf>,

    /// Project file (JSON editor state) to open instead of the template
    #[arg(long, env = "STUDIO_PROJECT")]
    project: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the project
    Show {
        /// Start from a blank project instead of the template
        #[arg(long)]
        blank: bool,
    },
    /// Play the current page in real time
    Play {
        /// Wall-clock seconds to play for
        #[arg(long, default_value = "3")]
        seconds: f64,
        /// Timeline position to start from
        #[arg(long, default_value = "0")]
        from: f64,
        /// Page to play (defaults to the current page)
        #[arg(long)]
        page: Option<String>,
    },
    /// Run a scripted editing session, logging every change
    Demo,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studio_core=debug,studio_cli=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn open_store(cli: &Cli, config: EditorConfig, blank: bool) -> anyhow::Result<EditorStore> {
    if let Some(path) = &cli.project {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading project {}", path.display()))?;
        let state: EditorState = serde_json::from_str(&contents)
            .with_context(|| format!("parsing project {}", path.display()))?;
        return EditorStore::with_state(state, config)
            .with_context(|| format!("opening project {}", path.display()));
    }
    if blank {
        return Ok(EditorStore::new(config));
    }
    let state = EditorState::sample_with(&config);
    EditorStore::with_state(state, config).context("opening template project")
}

fn print_summary(state: &EditorState) {
    println!("{} ({})", state.project_name(), state.project_date());
    println!(
        "zoom {}%  position {}  {}",
        state.zoom(),
        format_timecode(state.timeline_position()),
        if state.is_playing() { "playing" } else { "paused" }
    );
    for page in state.pages() {
        let marker = if &page.id == state.current_page_id() { '*' } else { ' ' };
        println!(
            "{marker} {} [{}] {} {}  {} elements",
            page.name,
            page.id,
            page.layout.label(),
            format_timecode(page.duration),
            page.elements.len()
        );
        for element in &page.elements {
            let selected = state.selected_element_id() == Some(&element.id);
            println!(
                "    {} {:<8} {:<12} {}-{}{}",
                if selected { '>' } else { '-' },
                element.element_type().to_string(),
                element.name,
                format_timecode(element.start_time),
                format_timecode(element.end_time()),
                if element.free_position { "  (free)" } else { "" }
            );
        }
    }
    println!("{} resources", state.resources().len());
    for resource in state.resources() {
        println!("    {:<6} {} [{}]", format!("{:?}", resource.kind).to_lowercase(), resource.name, resource.id);
    }
}

fn print_state(format: OutputFormat, state: &EditorState) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(state)?),
        OutputFormat::Text => print_summary(state),
    }
    Ok(())
}

async fn play(
    store: &EditorStore,
    seconds: f64,
    from: f64,
    page: Option<&str>,
) -> anyhow::Result<()> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("--seconds must be a non-negative number, got {seconds}");
    }
    if let Some(page) = page {
        store
            .set_current_page(&PageId::from(page))
            .with_context(|| format!("switching to page {page}"))?;
    }
    let start = store.scrub_to(from);
    tracing::info!(start, total = store.snapshot().total_duration(), "Starting playback");

    let driver = PlaybackDriver::play(store.clone());
    tokio::select! {
        () = tokio::time::sleep(Duration::from_secs_f64(seconds)) => {
            // Dropping the join future shuts the driver down.
            if store.snapshot().is_playing() {
                store.toggle_play();
            }
        }
        () = driver.join() => {
            tracing::info!("Reached end of page");
        }
    }

    let state = store.snapshot();
    tracing::info!(
        position = state.timeline_position(),
        playing = state.is_playing(),
        "Playback stopped"
    );
    Ok(())
}

fn demo(store: &EditorStore) -> anyhow::Result<()> {
    store.subscribe(|action, state| {
        tracing::info!(
            action,
            page = %state.current_page_id(),
            selected = ?state.selected_element_id().map(ToString::to_string),
            elements = state.current_elements().len(),
            "State changed"
        );
    });

    store.set_project_name("Demo session");
    store.set_zoom(250);

    // Pages
    let page = store.add_page();
    store
        .update_page(&page, PagePatch::layout(Layout::TwoVertical))
        .context("setting layout")?;
    let copy = store.duplicate_page(&page).context("duplicating page")?;
    store.delete_page(&copy).context("deleting copy")?;
    store.set_current_page(&page).context("returning to page")?;
    if let Err(e) = store.delete_page(&PageId::from("missing")) {
        tracing::info!(error = %e, "Rejected as expected");
    }

    // Resources
    let uploaded = upload(store, "sunset-over-the-harbour.jpg", "image/jpeg", "blob:demo/1")
        .context("uploading image")?;
    if upload(store, "notes.txt", "text/plain", "blob:demo/2").is_none() {
        tracing::info!("Text upload ignored");
    }
    let placed = place_resource(store, &uploaded).context("placing resource")?;
    store
        .update_element(&page, &placed, ElementPatch::position(Position::new(40.0, 40.0)))
        .context("moving element")?;
    store
        .duplicate_element(&page, &placed)
        .context("duplicating element")?;

    let state = store.snapshot();
    let resource = state
        .resource(&ResourceId::from("res-3"))
        .or_else(|| state.resources().first())
        .context("no resources in library")?;
    let payload = encode_transfer(resource)?;
    drop_payload(store, &payload, Position::new(200.0, 150.0), Position::new(0.0, 0.0))
        .context("dropping resource")?;

    // Canvas interaction
    let mut drag = DragController::new(store.clone(), Position::new(0.0, 0.0));
    let pressed = drag.press_at(Position::new(60.0, 60.0));
    tracing::info!(element = ?pressed.as_ref().map(ToString::to_string), dragging = drag.is_dragging(), "Pressed canvas");
    drag.move_to(Position::new(120.0, 90.0));
    drag.release();
    drag.click_empty();

    // Library and timeline
    store.set_active_resource_tab(ResourceTab::Audio);
    let audio = store.snapshot().filtered_resources("").len();
    tracing::info!(audio, "Audio resources in library");
    store.delete_resource(&uploaded).context("deleting resource")?;
    store.scrub_from_pointer(900.0, 1200.0);

    let state = store.snapshot();
    match state.property_panel() {
        Some(PropertyPanel::Page(page)) => tracing::info!(page = %page.id, "Showing page properties"),
        Some(panel) => tracing::info!(?panel, "Showing element properties"),
        None => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Command::Show { blank } => {
            let store = open_store(&cli, config, *blank)?;
            print_state(cli.format, &store.snapshot())?;
        }
        Command::Play {
            seconds,
            from,
            page,
        } => {
            let store = open_store(&cli, config, false)?;
            play(&store, *seconds, *from, page.as_deref()).await?;
            print_state(cli.format, &store.snapshot())?;
        }
        Command::Demo => {
            let store = open_store(&cli, config, false)?;
            demo(&store)?;
            print_state(cli.format, &store.snapshot())?;
        }
    }
    Ok(())
}
