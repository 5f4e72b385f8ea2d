use std::path::PathBuf;

use geninterp_engine::{BlockFlags, BlockKind, BlockType, CaseSensitivity, Comment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKindConfig {
    Delimited,
    Comment,
    Include,
}

impl BlockKindConfig {
    /// Flags a freshly constructed block type of this kind carries.
    pub fn default_flags(self) -> BlockFlags {
        match self {
            BlockKindConfig::Comment => BlockFlags {
                closeable_by_eof: true,
                forbid_new_openings: true,
                ..BlockFlags::default()
            },
            BlockKindConfig::Delimited | BlockKindConfig::Include => BlockFlags::default(),
        }
    }
}

/// One `[[blocks]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    pub name: String,
    pub kind: BlockKindConfig,
    pub open: String,
    /// Required for `delimited` and `include`. On a comment it replaces the
    /// end-of-line terminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closeable_by_eof: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbid_new_openings: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_immediately: Option<bool>,

    // Include only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Path of another config file whose interpreter handles included files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subinterpreter: Option<PathBuf>,
}

impl BlockConfig {
    pub fn new(name: impl Into<String>, kind: BlockKindConfig, open: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            open: open.into(),
            close: None,
            escape: None,
            case_sensitive: None,
            closeable_by_eof: None,
            forbid_new_openings: None,
            close_immediately: None,
            base_dir: None,
            extension: None,
            subinterpreter: None,
        }
    }

    /// Describes an existing block type. Plain types have no entry, and a
    /// sub-interpreter override cannot be written back to a file.
    pub fn from_block_type(block_type: &BlockType) -> Option<Self> {
        let (kind, delimiters) = match block_type.kind() {
            BlockKind::Plain => return None,
            BlockKind::Delimited(d) => (BlockKindConfig::Delimited, d),
            BlockKind::Comment(d) => (BlockKindConfig::Comment, d),
            BlockKind::Include(inc) => (BlockKindConfig::Include, &inc.delimiters),
        };

        let mut entry = Self::new(block_type.name(), kind, delimiters.open.as_str());
        if kind != BlockKindConfig::Comment || delimiters.close != Comment::LINE_END {
            entry.close = Some(delimiters.close.clone());
        }
        entry.escape = block_type.escape_char();
        if delimiters.case == CaseSensitivity::Sensitive {
            entry.case_sensitive = Some(true);
        }

        let flags = block_type.flags();
        let defaults = kind.default_flags();
        let changed = |value: bool, default: bool| (value != default).then_some(value);
        entry.closeable_by_eof = changed(flags.closeable_by_eof, defaults.closeable_by_eof);
        entry.forbid_new_openings =
            changed(flags.forbid_new_openings, defaults.forbid_new_openings);
        entry.close_immediately = changed(flags.close_immediately, defaults.close_immediately);

        if let Some(inc) = block_type.include_settings() {
            entry.base_dir = inc.base_dir.clone();
            entry.extension = inc.extension.clone();
            if inc.subinterpreter.is_some() {
                log::warn!(
                    "block '{}' has a sub-interpreter override that cannot be saved",
                    block_type.name()
                );
            }
        }
        Some(entry)
    }

    /// Fields that only apply to include blocks but were set on another kind.
    pub(crate) fn ignored_fields(&self) -> Vec<&'static str> {
        if self.kind == BlockKindConfig::Include {
            return Vec::new();
        }
        [
            ("base_dir", self.base_dir.is_some()),
            ("extension", self.extension.is_some()),
            ("subinterpreter", self.subinterpreter.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }
}
