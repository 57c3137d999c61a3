use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use deckconf::Config;
use deckconf::daemon::{self, ReloadOutcome};
use deckconf::input::InputEvent;
use deckconf::layout::{
    ActionLayout, AssignOutcome, ElementId, ElementKind, ElementStatus, TextPosition,
};
use deckconf::recorder::{CaptureOutcome, Recorder, TerminalSource};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = ".record.lock";

#[derive(Parser, Debug)]
#[command(name = "deckconf")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DECKCONF_GIT_HASH"), ")"),
    about = "Record input sequences and manage Stream Deck action scripts"
)]
struct Cli {
    /// Actions directory (overrides [paths] actions_dir)
    #[arg(long, global = true, value_name = "DIR")]
    actions_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record keyboard and mouse input from this terminal into an element's script
    Record {
        /// Element to assign, e.g. button-3, dial-2-cw, touch-1-swipe-up
        element: ElementId,

        /// Print the compiled script instead of saving it
        #[arg(long, action = ArgAction::SetTrue)]
        print: bool,

        /// Also write the recorded events as JSON
        #[arg(long, value_name = "FILE")]
        events_out: Option<PathBuf>,

        /// Do not ask the daemon to reload afterwards
        #[arg(long, action = ArgAction::SetTrue)]
        no_reload: bool,
    },

    /// Compile a JSON event list (file or stdin) into a script on stdout
    Compile {
        /// JSON file with recorded events; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Use an existing script file for an element
    Assign {
        element: ElementId,

        /// Script to copy into the actions directory
        script: PathBuf,

        #[arg(long, action = ArgAction::SetTrue)]
        no_reload: bool,
    },

    /// Set the label, text position, font size or image of a button or touch zone
    Label {
        element: ElementId,

        /// Label text; an empty string removes the label
        text: Option<String>,

        /// Label position: top, middle or bottom
        #[arg(long, value_name = "POSITION")]
        position: Option<TextPosition>,

        /// Label font size (10-60)
        #[arg(long, value_name = "SIZE")]
        font_size: Option<u32>,

        /// Image to show (png, jpg or jpeg)
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,

        #[arg(long, action = ArgAction::SetTrue)]
        no_reload: bool,
    },

    /// Apply one label font size to every button or every touch zone
    FontSize {
        /// Font size (10-60)
        size: u32,

        /// Which elements to update
        #[arg(long, value_enum, value_name = "GROUP")]
        all: FontGroup,

        #[arg(long, action = ArgAction::SetTrue)]
        no_reload: bool,
    },

    /// Show one element, or every configured element
    Show { element: Option<ElementId> },

    /// Remove an element's script and display attributes
    Clear {
        element: ElementId,

        #[arg(long, action = ArgAction::SetTrue)]
        no_reload: bool,
    },

    /// Ask the daemon to reload the actions directory
    Reload,

    /// Write a documented default config file
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FontGroup {
    Buttons,
    Zones,
}

impl From<FontGroup> for ElementKind {
    fn from(group: FontGroup) -> Self {
        match group {
            FontGroup::Buttons => ElementKind::Button,
            FontGroup::Zones => ElementKind::Touch,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        let path = Config::create_default_file()?;
        println!("Created config at {}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    let layout = ActionLayout::new(
        cli.actions_dir
            .clone()
            .unwrap_or_else(|| config.actions_dir()),
    );
    log::debug!("Actions directory: {}", layout.root().display());

    match cli.command {
        Commands::Record {
            element,
            print,
            events_out,
            no_reload,
        } => record(
            &config,
            &layout,
            element,
            print,
            events_out.as_deref(),
            no_reload,
        ),
        Commands::Compile { file } => compile(&config, file.as_deref()),
        Commands::Assign {
            element,
            script,
            no_reload,
        } => {
            let path = layout.install_script(element, &script)?;
            println!("Assigned {} -> {}", element, path.display());
            reload_after_change(&config, no_reload);
            Ok(())
        }
        Commands::Label {
            element,
            text,
            position,
            font_size,
            image,
            no_reload,
        } => {
            if text.is_none() && position.is_none() && font_size.is_none() && image.is_none() {
                return Err(anyhow!(
                    "Nothing to change: give label text, --position, --font-size or --image"
                ));
            }
            if let Some(text) = text {
                layout.set_label(element, &text)?;
            }
            if let Some(position) = position {
                layout.set_text_position(element, position)?;
            }
            if let Some(size) = font_size {
                layout.set_font_size(element, size)?;
            }
            if let Some(image) = image {
                layout.set_image(element, &image)?;
            }
            println!("{}", describe(&layout.inspect(element)?, layout.root()));
            reload_after_change(&config, no_reload);
            Ok(())
        }
        Commands::FontSize {
            size,
            all,
            no_reload,
        } => {
            let kind = ElementKind::from(all);
            let updated = layout.set_font_size_all(kind, size)?;
            println!(
                "Font size {} applied to all {} ({})",
                size,
                kind,
                updated.len()
            );
            reload_after_change(&config, no_reload);
            Ok(())
        }
        Commands::Show { element } => show(&layout, element),
        Commands::Clear { element, no_reload } => {
            let removed = layout.clear_element(element)?;
            if removed == 0 {
                println!("{} was not configured", element);
            } else {
                println!("Cleared {} ({} file(s) removed)", element, removed);
                reload_after_change(&config, no_reload);
            }
            Ok(())
        }
        Commands::Reload => {
            match daemon::reload(&config.daemon)? {
                ReloadOutcome::Reloaded => println!("Daemon reloaded"),
                ReloadOutcome::Disabled => println!("No reload command configured"),
            }
            Ok(())
        }
        Commands::InitConfig => Ok(()),
    }
}

fn record(
    config: &Config,
    layout: &ActionLayout,
    element: ElementId,
    print: bool,
    events_out: Option<&Path>,
    no_reload: bool,
) -> Result<()> {
    let recorder = Recorder::with_keybindings(&config.recorder)?
        .with_lock_file(layout.root().join(LOCK_FILE_NAME));

    eprintln!(
        "Recording {}. Press {} to stop, {} to cancel.",
        element,
        config.recorder.stop.join(" or "),
        config.recorder.cancel.join(" or ")
    );

    let mut source = TerminalSource::new();
    let handle = recorder.start_capture(&mut source)?;
    // Raw mode is on until `run` returns, so lines need an explicit carriage return.
    let outcome = handle.run(|events| {
        if let Some(last) = events.last() {
            eprint!("  {:>3}. {}\r\n", events.len(), last);
        }
    })?;

    let events = match outcome {
        CaptureOutcome::Cancelled => {
            eprintln!("Recording cancelled; {} left unchanged", element);
            return Ok(());
        }
        CaptureOutcome::Stopped(events) => events,
    };

    if events.is_empty() {
        eprintln!("No input recorded; {} left unchanged", element);
        return Ok(());
    }

    if let Some(path) = events_out {
        let json = serde_json::to_string_pretty(&events).context("Failed to serialize events")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write events to {}", path.display()))?;
        eprintln!("Wrote {} event(s) to {}", events.len(), path.display());
    }

    let format = config.script.format();
    if print {
        print!("{}", format.compile(&events));
        return Ok(());
    }

    match layout.assign_recording(element, &events, &format)? {
        AssignOutcome::Written(path) => {
            println!(
                "Saved {} event(s) to {} ({})",
                events.len(),
                element,
                path.display()
            );
            reload_after_change(config, no_reload);
        }
        AssignOutcome::Skipped => {
            eprintln!("No input recorded; {} left unchanged", element);
        }
    }
    Ok(())
}

fn compile(config: &Config, file: Option<&Path>) -> Result<()> {
    let input = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read events from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read events from stdin")?;
            buf
        }
    };

    let events: Vec<InputEvent> =
        serde_json::from_str(&input).context("Failed to parse event list JSON")?;
    print!("{}", config.script.format().compile(&events));
    Ok(())
}

fn show(layout: &ActionLayout, element: Option<ElementId>) -> Result<()> {
    if let Some(element) = element {
        println!("{}", describe(&layout.inspect(element)?, layout.root()));
        return Ok(());
    }

    let configured: Vec<ElementStatus> = layout
        .inspect_all()?
        .into_iter()
        .filter(ElementStatus::is_configured)
        .collect();

    if configured.is_empty() {
        println!("No elements configured in {}", layout.root().display());
    }
    for status in &configured {
        println!("{}", describe(status, layout.root()));
    }
    Ok(())
}

fn describe(status: &ElementStatus, root: &Path) -> String {
    let relative = |path: &Path| {
        path.strip_prefix(root)
            .unwrap_or(path)
            .display()
            .to_string()
    };

    let mut parts = vec![format!("{:<18}", status.id.to_string())];
    match &status.script {
        Some(path) if status.executable => parts.push(format!("script={}", relative(path))),
        Some(path) => parts.push(format!("script={} (not executable)", relative(path))),
        None => parts.push("script=-".to_string()),
    }
    if let Some(description) = &status.description {
        parts.push(format!("({})", description));
    }
    if let Some(label) = &status.label {
        parts.push(format!("label={:?}", label));
    }
    if let Some(position) = status.text_position {
        parts.push(format!("position={}", position));
    }
    if let Some(size) = status.font_size {
        parts.push(format!("font-size={}", size));
    }
    if let Some(image) = &status.image {
        parts.push(format!("image={}", relative(image)));
    }
    parts.join("  ")
}

fn reload_after_change(config: &Config, no_reload: bool) {
    if no_reload {
        return;
    }
    match daemon::reload(&config.daemon) {
        Ok(ReloadOutcome::Reloaded) => println!("Daemon reloaded"),
        Ok(ReloadOutcome::Disabled) => {}
        Err(err) => {
            // Files are already written; the daemon can be reloaded by hand.
            log::warn!("{}", err);
            eprintln!("Warning: {}", err);
        }
    }
}
