//! reelpanel - settings overlay logic for a video player, on the command line
//!
//! Prints the download menu for a playback source, hands streams to external
//! players and edits the persisted caption styling through the same slider
//! objects the overlay uses.

mod system;

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use reelpanel_core::caption_settings::{CaptionControl, CaptionSettings, CaptionSlider};
use reelpanel_core::download::{DownloadRoute, DownloadView};
use reelpanel_core::overlay::{FallbackTranslator, MemoryRouter, Translator, paths};
use reelpanel_core::slider::{Key, StepDirection};
use reelpanel_core::subtitles::{FontStyle, VerticalPosition};
use reelpanel_core::{
    Config, PlaybackSource, PlayerOption, PlayerState, SubtitleStore, SubtitleTrack, links,
    logging,
};

use crate::system::StdoutClipboard;

/// reelpanel - video player settings overlay
#[derive(Parser, Debug)]
#[command(name = "reelpanel", version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the download menu for a playback source
    Links {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Press the download button (hosted downloader for HLS, the file otherwise)
    Download {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the URL instead of opening it
        #[arg(long)]
        dry_run: bool,
    },
    /// Open the stream in an external player
    Open {
        /// Player id (vlc, iina, outplayer)
        player: String,
        #[command(flatten)]
        source: SourceArgs,
        /// Print the URL instead of opening it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the playlist URL of an HLS source
    CopyPlaylist {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Export an SRT file as a data URL
    SubtitleExport {
        /// SRT file to export
        file: PathBuf,
        /// Hand the data URL to the configured opener
        #[arg(long)]
        open: bool,
    },
    /// Show or change caption styling
    Captions {
        #[command(subcommand)]
        action: CaptionsAction,
    },
}

/// Where the playback source comes from. Flags override the state file.
#[derive(clap::Args, Debug, Default)]
struct SourceArgs {
    /// Player state as JSON (source, currentQuality, selectedCaption)
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// HLS playlist URL
    #[arg(long, value_name = "URL", conflicts_with = "files")]
    hls: Option<String>,

    /// File stream for one quality (repeatable)
    #[arg(long = "file", value_name = "QUALITY=URL", value_parser = parse_quality)]
    files: Vec<(String, String)>,

    /// Selected quality (defaults to the first --file)
    #[arg(long)]
    quality: Option<String>,

    /// SRT file of the selected caption track
    #[arg(long, value_name = "FILE")]
    caption: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum CaptionsAction {
    /// Show the caption settings page
    Show,
    /// Type a value into a slider's text field
    Set {
        field: SliderField,
        /// Value in display units (seconds for delay, percent otherwise)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Nudge the delay with its -/+ buttons
    Step {
        field: SliderField,
        direction: Direction,
    },
    /// Move a slider to a fraction of its track (0.0 to 1.0)
    Slide {
        field: SliderField,
        percentage: f64,
    },
    /// Toggle bold text
    Bold,
    /// Toggle the "fix capitals" override
    Casing,
    /// Toggle native subtitles (hides every other control)
    Native,
    /// Pick a text color (hex)
    Color { color: String },
    /// Pick a font style (default, raised, depressed, uniform, dropShadow)
    FontStyle { style: String },
    /// Pick the vertical position
    Position { position: Position },
    /// Restore the default styling
    Reset,
    /// Print where the back link leads
    Back,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SliderField {
    Delay,
    Background,
    Blur,
    Size,
}

impl From<SliderField> for CaptionSlider {
    fn from(field: SliderField) -> Self {
        match field {
            SliderField::Delay => CaptionSlider::Delay,
            SliderField::Background => CaptionSlider::Background,
            SliderField::Blur => CaptionSlider::Blur,
            SliderField::Size => CaptionSlider::Size,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    Up,
    Down,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Position {
    Default,
    Low,
}

fn parse_quality(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((quality, url)) if !quality.is_empty() && !url.is_empty() => {
            Ok((quality.to_string(), url.to_string()))
        }
        _ => Err(format!("expected QUALITY=URL, got '{}'", raw)),
    }
}

impl SourceArgs {
    fn player_state(&self) -> anyhow::Result<PlayerState> {
        let mut state = match &self.state {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("invalid player state in {}", path.display()))?
            }
            None => PlayerState::default(),
        };

        if let Some(url) = &self.hls {
            state.source = Some(PlaybackSource::hls(url.clone()));
        } else if !self.files.is_empty() {
            state.source = Some(PlaybackSource::file(self.files.iter().cloned()));
        }

        if let Some(quality) = &self.quality {
            state.current_quality = Some(quality.clone());
        } else if state.current_quality.is_none()
            && let Some((quality, _)) = self.files.first()
        {
            state.current_quality = Some(quality.clone());
        }

        if let Some(path) = &self.caption {
            state.selected_caption = Some(read_caption(path)?);
        }

        Ok(state)
    }
}

fn read_caption(path: &Path) -> anyhow::Result<SubtitleTrack> {
    let srt_data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SubtitleTrack {
        id,
        language: String::new(),
        srt_data,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    logging::init(args.verbose);

    // --print-example-config: print the example config with comments
    if args.print_example_config {
        print!("{}", reelpanel_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        info!("Using default configuration (no config file found)");
    }

    let config = load_result.config;

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    debug!("Configuration validated successfully");

    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        return ExitCode::SUCCESS;
    }

    match args.command {
        Some(command) => handle_command(&config, command),
        None => {
            println!("{}", config.summary());
            ExitCode::SUCCESS
        }
    }
}

/// Run a subcommand and map its outcome to an exit code.
fn handle_command(config: &Config, command: Command) -> ExitCode {
    let result = match command {
        Command::Links { source } => handle_links(config, &source),
        Command::Download { source, dry_run } => handle_download(config, &source, dry_run),
        Command::Open {
            player,
            source,
            dry_run,
        } => handle_open(config, &player, &source, dry_run),
        Command::CopyPlaylist { source } => handle_copy_playlist(config, &source),
        Command::SubtitleExport { file, open } => handle_subtitle_export(config, &file, open),
        Command::Captions { action } => handle_captions(config, action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn download_view(config: &Config, source: &SourceArgs) -> anyhow::Result<DownloadView> {
    let state = source.player_state()?;
    match DownloadView::new(&state, &config.players.options()) {
        Some(view) => Ok(view),
        None if state.source.is_none() => {
            bail!("no playback source (use --hls, --file or --state)")
        }
        None => bail!(
            "quality '{}' has no stream",
            state.current_quality.as_deref().unwrap_or("")
        ),
    }
}

/// Print everything the download menu offers.
fn handle_links(config: &Config, source: &SourceArgs) -> anyhow::Result<()> {
    let view = download_view(config, source)?;
    let t = FallbackTranslator;

    println!("Stream: {}", view.download_url());
    println!("Direct: {}", view.direct_url());
    if let Some(url) = view.hls_downloader_url() {
        println!("Downloader: {}", url);
    }

    if !view.players().is_empty() {
        println!("\nOpen in:");
        for (option, url) in view.player_links() {
            let label = t.translate(option.label_key(), Some(option.display_name()));
            println!("  {:<10} {}", label, url);
        }
    }

    if !view.explanation_routes().is_empty() {
        println!("\nGuides:");
        for route in view.explanation_routes() {
            let title = t.translate(route.title_key(), Some(route_label(*route)));
            println!("  {:<18} {}", route.path(), title);
        }
    }

    match view.subtitle_data_url() {
        Some(url) => println!("\nSubtitles ({}): {}", links::SUBTITLE_FILE_NAME, url),
        None => println!("\nSubtitles: no caption selected"),
    }

    Ok(())
}

fn handle_download(config: &Config, source: &SourceArgs, dry_run: bool) -> anyhow::Result<()> {
    let view = download_view(config, source)?;
    let router = MemoryRouter::new(paths::DOWNLOAD);
    let navigator = system::navigator(&config.navigator, dry_run);
    view.download(&router, navigator.as_ref());
    debug!("Overlay now at {}", router.current());
    Ok(())
}

fn handle_open(
    config: &Config,
    player: &str,
    source: &SourceArgs,
    dry_run: bool,
) -> anyhow::Result<()> {
    let Some(option) = PlayerOption::from_id(player) else {
        let known: Vec<&str> = PlayerOption::ALL.iter().map(|p| p.id()).collect();
        bail!("unknown player '{}', expected one of: {}", player, known.join(", "));
    };
    let view = download_view(config, source)?;
    if !view.players().contains(&option) {
        warn!("{} is not in players.enabled", option.display_name());
    }
    let navigator = system::navigator(&config.navigator, dry_run);
    view.open_in_player(option.id(), navigator.as_ref());
    Ok(())
}

fn handle_copy_playlist(config: &Config, source: &SourceArgs) -> anyhow::Result<()> {
    let view = download_view(config, source)?;
    if !view.copy_playlist(&StdoutClipboard) {
        bail!("only HLS sources have a playlist");
    }
    Ok(())
}

fn handle_subtitle_export(config: &Config, file: &Path, open: bool) -> anyhow::Result<()> {
    let track = read_caption(file)?;
    let Some(url) = links::build_subtitle_export_data_url(Some(&track.srt_data)) else {
        bail!("nothing to export");
    };
    if open {
        system::navigator(&config.navigator, false).open(&url);
    } else {
        println!("{}", url);
    }
    Ok(())
}

fn handle_captions(config: &Config, action: CaptionsAction) -> anyhow::Result<()> {
    let path = config.store.resolved_path();
    let store = SubtitleStore::load(&path)
        .with_context(|| format!("failed to load caption settings from {}", path.display()))?;
    let store = Rc::new(RefCell::new(store));
    let mut settings = CaptionSettings::new(store.clone(), config.captions.overlay_back_link)?;

    match action {
        CaptionsAction::Show => {}
        CaptionsAction::Set { field, value } => {
            let slider = settings.slider_mut(field.into());
            slider.enter_text_edit();
            slider.set_edit_buffer(value);
            slider.key_press(Key::Enter);
        }
        CaptionsAction::Step { field, direction } => {
            let which = CaptionSlider::from(field);
            let slider = settings.slider_mut(which);
            if !slider.has_control_buttons() {
                bail!("{:?} has no step buttons", which);
            }
            slider.step(match direction {
                Direction::Up => StepDirection::Increment,
                Direction::Down => StepDirection::Decrement,
            });
        }
        CaptionsAction::Slide { field, percentage } => {
            settings.slider_mut(field.into()).commit(percentage);
        }
        CaptionsAction::Bold => settings.toggle_bold(),
        CaptionsAction::Casing => settings.toggle_fix_capitals(),
        CaptionsAction::Native => settings.toggle_native_subtitles(),
        CaptionsAction::Color { color } => settings.select_color(&color)?,
        CaptionsAction::FontStyle { style } => {
            let Some(style) = FontStyle::from_id(&style) else {
                let known: Vec<&str> = FontStyle::ALL.iter().map(|s| s.id()).collect();
                bail!("unknown font style '{}', expected one of: {}", style, known.join(", "));
            };
            settings.select_font_style(style);
        }
        CaptionsAction::Position { position } => {
            settings.set_vertical_position(match position {
                Position::Default => VerticalPosition::Default,
                Position::Low => VerticalPosition::Low,
            });
        }
        CaptionsAction::Reset => settings.reset(),
        CaptionsAction::Back => {
            let router = MemoryRouter::new(paths::CAPTIONS);
            settings.back(&router);
            println!("{}", router.current());
            return Ok(());
        }
    }

    store
        .borrow_mut()
        .save()
        .with_context(|| format!("failed to save caption settings to {}", path.display()))?;

    print_caption_settings(&settings);
    Ok(())
}

fn print_caption_settings(settings: &CaptionSettings) {
    let t = FallbackTranslator;
    let store = settings.store().borrow();
    let styling = store.styling();

    for control in settings.controls() {
        match control {
            CaptionControl::NativeSubtitles => {
                println!("{:<28} {}", "Native subtitles", on_off(store.enable_native_subtitles()));
            }
            CaptionControl::Slider(which) => {
                let label = t.translate(which.label_key(), Some(slider_label(which)));
                println!("{:<28} {}", label, settings.slider(which).display_text());
            }
            CaptionControl::FixCapitals => {
                println!("{:<28} {}", "Fix capitals", on_off(store.override_casing()));
            }
            CaptionControl::FontStyle => {
                println!("{:<28} {}", "Font style", styling.font_style.id());
            }
            CaptionControl::Bold => println!("{:<28} {}", "Bold", on_off(styling.bold)),
            CaptionControl::Color => println!("{:<28} {}", "Color", styling.color),
            CaptionControl::VerticalPosition => {
                let position = match styling.vertical_position {
                    VerticalPosition::Default => "default",
                    VerticalPosition::Low => "low",
                };
                println!("{:<28} {}", "Vertical position", position);
            }
            CaptionControl::Reset => {}
        }
    }
}

fn slider_label(which: CaptionSlider) -> &'static str {
    match which {
        CaptionSlider::Delay => "Subtitle delay",
        CaptionSlider::Background => "Background opacity",
        CaptionSlider::Blur => "Background blur",
        CaptionSlider::Size => "Text size",
    }
}

fn route_label(route: DownloadRoute) -> &'static str {
    match route {
        DownloadRoute::Pc => "Download on PC",
        DownloadRoute::Ios => "Download on iOS",
        DownloadRoute::Android => "Download on Android",
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
