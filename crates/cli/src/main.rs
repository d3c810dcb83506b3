use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colorfun_engine::{
    Channel, ChipStyle, ColorWall, NIBBLE_MAX, NibblePicker, NoisePalette, Notice, PlaygroundSession, SessionStorage,
    WidgetMode, load_catalog, resolve_language,
};
use colorfun_types::{Language, NamedColorCatalog};
use colorfun_util::{AppConfig, JsonFileStore, SystemClipboard, expand_tilde};
use tracing::debug;

mod render;

/// Explore colors, tweak palettes with noise and keep a navigable history.
#[derive(Parser, Debug)]
#[command(name = "colorfun", version, about)]
struct Cli {
    /// Directory holding the store files
    #[arg(long, global = true)]
    store_dir: Option<String>,

    /// Named-color JSON document (defaults to the built-in catalog)
    #[arg(long, global = true)]
    named_colors: Option<String>,

    /// UI language (en, es); remembered for later runs
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Store namespace
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Copy the resulting color to the clipboard
    #[arg(long, global = true)]
    copy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current color and palette
    Palette,
    /// Use a hex color (#RGB or #RRGGBB) as the base and commit it
    Commit { hex: String },
    /// Use the clipboard's hex color as the base and commit it
    Paste {
        /// Hex to use when the clipboard is empty or unreadable
        fallback: Option<String>,
    },
    /// Adopt swatch INDEX (0-8) of the current palette
    Pick { index: usize },
    /// Random noise type, amount and color
    Reroll,
    /// Clear the history and start from a random color
    Fresh,
    /// List the history
    History,
    /// Step back in the history
    Prev,
    /// Step forward in the history
    Next,
    /// Jump to a history position
    Select { index: usize },
    /// Set the noise amount (0-100) and commit
    Noise { amount: f64 },
    /// Set the noise type and commit
    #[command(name = "type")]
    NoiseType { noise_type: String },
    /// Start a visit: fresh noise character and a random color
    Visit,
    /// List noise types by group
    Types,
    /// List named-color groups, or the colors of one group
    Named {
        #[arg(long)]
        group: Option<String>,
    },
    /// Show a named-color wall group and optionally pick a chip
    Wall {
        /// Group position (wraps around)
        #[arg(long, default_value_t = 0)]
        group: usize,
        /// Cap the chips like the embedded mini wall
        #[arg(long)]
        mini: bool,
        /// Chip to copy and publish as the last color
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Roll quick noise chips around the last color and optionally pick one
    #[command(name = "chips")]
    NoiseChips {
        /// Embedded variant with fewer chips
        #[arg(long)]
        mini: bool,
        /// Noise amount (0-100)
        #[arg(long, default_value_t = 35.0)]
        noise: f64,
        /// pastel, neon, earthy, cold or warm
        #[arg(long, default_value = "pastel")]
        style: ChipStyle,
        /// Chip to copy and publish as the last color
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Build a color from three 4-bit channels
    Nibble {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=NIBBLE_MAX as i64))]
        r: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=NIBBLE_MAX as i64))]
        g: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=NIBBLE_MAX as i64))]
        b: u8,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(&cli);
    debug!(store_dir = %config.store_dir.display(), namespace = %config.namespace, "Resolved configuration");

    let store = JsonFileStore::open(&config.store_dir, &config.namespace)
        .with_context(|| format!("failed to open store in {}", config.store_dir.display()))?;
    let storage = SessionStorage::new(Arc::new(store));
    storage.ensure_seed_color(&mut rand::thread_rng());

    let system_locale = std::env::var("LANG").ok();
    let language = resolve_language(
        &storage,
        cli.lang.as_deref(),
        config.language.as_deref(),
        system_locale.as_deref(),
    );

    run(&cli, &config, storage, language)
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_environment();
    if let Some(dir) = cli.store_dir.as_deref() {
        config.store_dir = expand_tilde(dir);
    }
    if let Some(path) = cli.named_colors.as_deref() {
        config.named_colors_path = Some(expand_tilde(path));
    }
    if let Some(namespace) = cli.namespace.as_deref().map(str::trim).filter(|ns| !ns.is_empty()) {
        config.namespace = namespace.to_string();
    }
    config
}

fn run(cli: &Cli, config: &AppConfig, storage: SessionStorage, language: Language) -> Result<()> {
    match &cli.command {
        Command::Types => {
            render::print_noise_types(language, cli.json)?;
            return Ok(());
        }
        Command::Named { group } => {
            let catalog = catalog(config)?;
            render::print_named(&catalog, group.as_deref(), language, cli.json)?;
            return Ok(());
        }
        Command::Wall { group, mini, pick } => {
            let mode = if *mini { WidgetMode::Mini } else { WidgetMode::Full };
            let mut wall = ColorWall::mount(Arc::new(catalog(config)?), mode, storage, Instant::now());
            wall.select_group(*group);
            render::print_wall(&wall, language, cli.json)?;
            if let Some(index) = pick {
                let mut clipboard = SystemClipboard;
                let color = wall
                    .pick(*index, &mut clipboard)
                    .with_context(|| format!("no chip at position {index}"))?;
                println!("{}", Notice::Copied(color).message(language));
            }
            wall.unmount();
            return Ok(());
        }
        Command::NoiseChips { mini, noise, style, pick } => {
            let mode = if *mini { WidgetMode::Mini } else { WidgetMode::Full };
            let mut chips = NoisePalette::mount(mode, storage);
            chips.set_style(*style);
            chips.set_noise(*noise);
            render::print_noise_chips(&chips, cli.json)?;
            if let Some(index) = pick {
                let color = chips
                    .pick(*index, &mut SystemClipboard)
                    .with_context(|| format!("no chip at position {index}"))?;
                println!("{}", Notice::Copied(color).message(language));
            }
            return Ok(());
        }
        Command::Nibble { r, g, b } => {
            let mut picker = NibblePicker::mount(storage);
            picker.set_channel(Channel::Red, *r);
            picker.set_channel(Channel::Green, *g);
            picker.set_channel(Channel::Blue, *b);
            render::print_nibble(&picker, cli.json)?;
            if cli.copy {
                picker.copy_current(&mut SystemClipboard);
            }
            return Ok(());
        }
        _ => {}
    }

    run_playground(cli, storage, language)
}

fn run_playground(cli: &Cli, storage: SessionStorage, language: Language) -> Result<()> {
    let mut session = PlaygroundSession::new(storage);
    session.set_language(language);
    session.hydrate();
    let mut clipboard = SystemClipboard;

    match &cli.command {
        Command::Palette => {}
        Command::Commit { hex } => {
            if session.apply_hex(hex, true).is_err() {
                render::print_notices(&mut session);
                bail!("'{hex}' is not a hex color (#RGB or #RRGGBB)");
            }
        }
        Command::Paste { fallback } => {
            if session.paste(&mut clipboard, fallback.as_deref()).is_err() {
                render::print_notices(&mut session);
                bail!("the clipboard does not hold a hex color (#RGB or #RRGGBB)");
            }
        }
        Command::Pick { index } => {
            if session.pick_palette_color(*index, &mut clipboard).is_none() {
                bail!("palette has no swatch {index}; choose 0-8");
            }
        }
        Command::Reroll => {
            session.reroll();
        }
        Command::Fresh => {
            session.fresh_start();
        }
        Command::History => {
            render::print_history(&session, cli.json)?;
            render::print_notices(&mut session);
            return Ok(());
        }
        Command::Prev => {
            if session.step(-1).is_none() {
                eprintln!("already at the oldest entry");
            }
        }
        Command::Next => {
            if session.step(1).is_none() {
                eprintln!("already at the newest entry");
            }
        }
        Command::Select { index } => {
            if session.select(*index).is_none() {
                bail!("history has {} entries; {index} is out of range", session.history().len());
            }
        }
        Command::Noise { amount } => {
            session.set_noise_amount(*amount);
            session.commit_current();
        }
        Command::NoiseType { noise_type } => {
            session
                .set_noise_type_tag(noise_type)
                .context("run `colorfun types` for the list of noise types")?;
        }
        Command::Visit => {
            session.begin_visit();
        }
        other => bail!("{other:?} does not operate on the playground"),
    }

    if cli.copy && !matches!(cli.command, Command::Pick { .. }) {
        session.copy_current(&mut clipboard);
    }
    render::print_session(&session, cli.json)?;
    render::print_notices(&mut session);
    Ok(())
}

fn catalog(config: &AppConfig) -> Result<NamedColorCatalog> {
    load_catalog(config.named_colors_path.as_deref()).context("could not load named colors")
}
