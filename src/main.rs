use anyhow::Result;
use clap::{Parser, Subcommand};
use keymac_lib::config;
use keymac_lib::engine::{lock, Engine};
use keymac_lib::play::{spawn_player, EchoFilter, RdevOutput};
use keymac_lib::channel::{load_listing, save_listing};
use keymac_lib::record;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the keyboard, recording and playing macros
    Listen {
        /// Config file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Macro listing loaded at startup and saved on Ctrl+C
        #[arg(long)]
        macros: Option<PathBuf>,
    },
    /// Print a macro listing with key names
    Show {
        /// Listing to print (defaults to the configured macros file)
        path: Option<PathBuf>,
        /// Config file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a config file with the default settings
    InitConfig {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    log::info!("Launched with args: {:?}", args);
    let cli = Cli::parse();

    match cli.command {
        Commands::Listen { config, macros } => run_listen(config.as_deref(), macros),
        Commands::Show { path, config } => run_show(path, config.as_deref()),
        Commands::InitConfig { path, force } => run_init_config(path, force),
    }
}

fn run_listen(config_path: Option<&Path>, macros: Option<PathBuf>) -> Result<()> {
    let config = config::load_config(config_path)?;
    let triggers = config.keymaps.trigger_keys()?;
    let macros_path = match macros {
        Some(path) => path,
        None => config.macros_path()?,
    };

    let engine = Engine::new(triggers).shared();
    load_listing(&engine, &macros_path)?;

    let echoes = EchoFilter::new();
    let output = RdevOutput::new(echoes.clone(), config.playback.flush_delay());
    let (player, _worker) = spawn_player(output, config.playback.settle_delay());

    let exit_engine = engine.clone();
    let exit_path = macros_path.clone();
    ctrlc::set_handler(move || {
        match save_listing(&exit_engine, &exit_path) {
            Ok(written) => println!("Saved {} bytes of macros to {:?}", written, exit_path),
            Err(e) => eprintln!("Error: {:?}", e),
        }
        std::process::exit(0);
    })?;

    println!(
        "Listening... Hold {:?} and release to record, press it again to stop. Ctrl+C to save and quit.",
        config.keymaps.arm
    );
    record::listen_loop(engine, player, echoes)
}

fn run_show(path: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::load_config(config_path)?.macros_path()?,
    };

    let engine = Engine::default().shared();
    load_listing(&engine, &path)?;

    let engine = lock(&engine);
    let store = engine.store();
    if store.recorded_count() == 0 {
        println!("No macros in {:?}", path);
        return Ok(());
    }
    for (index, slot) in store.slots().iter().enumerate() {
        if !slot.is_empty() {
            println!("{}: {}", index, slot);
        }
    }
    Ok(())
}

fn run_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists, pass --force to overwrite", path);
    }
    config::save_config(&config::Config::default(), &path)?;
    println!("Wrote default config to {:?}", path);
    Ok(())
}
