mod block;

pub use block::{BlockConfig, BlockKindConfig};

use geninterp_engine::{
    BlockType, BlockTypeError, Include, Interpreter, InterpreterOptions, presets,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Block '{name}' needs a close tag")]
    MissingCloseTag { name: String },

    #[error(transparent)]
    InvalidBlock(#[from] BlockTypeError),

    #[error("Sub-interpreter config not found at {config_path}")]
    MissingSubinterpreter { config_path: PathBuf },

    #[error("Sub-interpreter config {config_path} refers back to itself")]
    CyclicSubinterpreter { config_path: PathBuf },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default base directory of include blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Default extension of include blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_close_skip: Option<usize>,
    /// Block types in registration order. Empty means the LaTeX preset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<BlockConfig>,

    /// File this config was loaded from; relative sub-interpreter paths
    /// resolve against its directory.
    #[serde(skip)]
    source_path: Option<PathBuf>,
}

impl Config {
    /// The LaTeX preset written out as explicit block entries.
    pub fn latex() -> Self {
        Self {
            blocks: presets::latex_block_types()
                .iter()
                .filter_map(BlockConfig::from_block_type)
                .collect(),
            ..Self::default()
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in every configured path
        config.base_dir = config.base_dir.map(Self::expand_or_keep);
        for block in &mut config.blocks {
            block.base_dir = block.base_dir.take().map(Self::expand_or_keep);
            block.subinterpreter = block.subinterpreter.take().map(Self::expand_or_keep);
        }
        config.source_path = Some(config_path.to_path_buf());

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/geninterp");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Builds the configured interpreter, loading sub-interpreter configs
    /// as needed.
    pub fn interpreter(&self) -> Result<Interpreter, ConfigError> {
        let mut chain = Vec::new();
        if let Some(path) = &self.source_path {
            chain.push(Self::chain_key(path));
        }
        self.build_interpreter(&mut chain)
    }

    fn build_interpreter(&self, chain: &mut Vec<PathBuf>) -> Result<Interpreter, ConfigError> {
        let latex;
        let blocks = if self.blocks.is_empty() {
            latex = Self::latex().blocks;
            &latex
        } else {
            &self.blocks
        };

        let block_types = blocks
            .iter()
            .map(|block| self.block_type(block, chain))
            .collect::<Result<Vec<_>, _>>()?;

        let mut interpreter = Interpreter::new(block_types)?;
        if let Some(skip) = self.self_close_skip {
            interpreter = interpreter.with_options(InterpreterOptions {
                self_close_skip: skip,
            });
        }
        Ok(interpreter)
    }

    fn block_type(
        &self,
        block: &BlockConfig,
        chain: &mut Vec<PathBuf>,
    ) -> Result<BlockType, ConfigError> {
        for field in block.ignored_fields() {
            log::warn!("ignoring '{field}' on non-include block '{}'", block.name);
        }

        let close = || {
            block
                .close
                .clone()
                .ok_or_else(|| ConfigError::MissingCloseTag {
                    name: block.name.clone(),
                })
        };

        let mut block_type = match block.kind {
            BlockKindConfig::Delimited => {
                BlockType::delimited(block.name.as_str(), block.open.as_str(), close()?)
            }
            BlockKindConfig::Comment => {
                let comment = BlockType::comment(block.name.as_str(), block.open.as_str());
                match &block.close {
                    Some(close) => comment.close_tag(close.as_str()),
                    None => comment,
                }
            }
            BlockKindConfig::Include => {
                let mut include = Include::new(block.open.as_str(), close()?);
                if let Some(dir) = block.base_dir.as_ref().or(self.base_dir.as_ref()) {
                    include = include.base_dir(dir.clone());
                }
                if let Some(ext) = block.extension.as_ref().or(self.extension.as_ref()) {
                    include = include.extension(ext.as_str());
                }
                if let Some(path) = &block.subinterpreter {
                    let sub = self.load_subinterpreter(path, chain)?;
                    include = include.subinterpreter(Arc::new(sub));
                }
                BlockType::include(block.name.as_str(), include)
            }
        };

        if block.case_sensitive == Some(true) {
            block_type = block_type.case_sensitive();
        }
        if let Some(escape) = block.escape {
            block_type = block_type.escape(escape);
        }
        if let Some(value) = block.closeable_by_eof {
            block_type = block_type.closeable_by_eof(value);
        }
        if let Some(value) = block.forbid_new_openings {
            block_type = block_type.forbid_new_openings(value);
        }
        if let Some(value) = block.close_immediately {
            block_type = block_type.close_immediately(value);
        }
        Ok(block_type)
    }

    fn load_subinterpreter(
        &self,
        path: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Interpreter, ConfigError> {
        let config_path = match self.source_path.as_deref().and_then(Path::parent) {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        };

        let key = Self::chain_key(&config_path);
        if chain.contains(&key) {
            return Err(ConfigError::CyclicSubinterpreter { config_path });
        }

        log::debug!("loading sub-interpreter config {}", config_path.display());
        let sub = Self::load_from_path(&config_path)?
            .ok_or_else(|| ConfigError::MissingSubinterpreter {
                config_path: config_path.clone(),
            })?;

        chain.push(key);
        let interpreter = sub.build_interpreter(chain);
        chain.pop();
        interpreter
    }

    fn chain_key(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    fn expand_or_keep(path: PathBuf) -> PathBuf {
        Self::expand_path(&path).unwrap_or(path)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
