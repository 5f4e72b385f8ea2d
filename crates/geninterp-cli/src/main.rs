use anyhow::{Context, Result, bail};
use clap::Parser;
use geninterp_config::Config;
use geninterp_engine::InterpretError;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Parser)]
#[command(name = "geninterp", version, about = "Interpret a document and its includes")]
struct Cli {
    /// Config file describing the block types (default: ~/.config/geninterp/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory includes are resolved against (default: the input's directory)
    #[arg(short, long)]
    base_dir: Option<PathBuf>,

    /// Print the document tree instead of the rendered text
    #[arg(long)]
    tree: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a starter config (the LaTeX block set) to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["file", "config"])]
    init_config: Option<PathBuf>,

    /// Input file
    #[arg(required_unless_present = "init_config")]
    file: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.init_config {
        Config::latex()
            .save_to_path(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        log::info!("Wrote starter config to {}", path.display());
        return Ok(());
    }

    let Some(file) = &cli.file else {
        bail!("No input file given");
    };

    let config = load_config(cli.config.as_deref())?;
    let mut interpreter = config.interpreter()?;
    if let Some(dir) = &cli.base_dir {
        interpreter = interpreter.with_base_dir(dir);
    } else if !has_base_dir(&config) {
        interpreter = interpreter.with_base_file(file);
    }

    log::debug!("Interpreting {}", file.display());
    let tree = match interpreter.interpret_file(file) {
        Ok(tree) => tree,
        Err(e) => {
            if let InterpretError::UnterminatedBlock { tree, .. } = &e {
                eprintln!("{}", tree.render_structure());
            }
            return Err(e.into());
        }
    };

    let result = if cli.tree {
        let mut structure = tree.render_structure();
        structure.push('\n');
        structure
    } else {
        tree.render()
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, result)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{result}"),
    }
    Ok(())
}

/// An explicit `--config` must exist; the default location may be absent.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file not found: {}", path.display())),
        None => Ok(Config::load()?.unwrap_or_default()),
    }
}

fn has_base_dir(config: &Config) -> bool {
    config.base_dir.is_some() || config.blocks.iter().any(|b| b.base_dir.is_some())
}
