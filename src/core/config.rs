use crate::core::annotation::JoinMode;
use crate::core::selection::GroupingParams;
use crate::AlnDiffError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub alignment: AlignmentConfig,
    pub diff: DiffConfig,
    pub represent: RepresentConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Character marking gap columns
    pub gap_char: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Column name for an explicit reference row
    pub reference_label: String,
    /// Column name for the consensus row
    pub consensus_label: String,
    /// How columns from several annotation tables are combined ("separate" or "join")
    pub annotation_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresentConfig {
    /// Maximum days between grouped sequences (unbounded when unset)
    pub max_day_sep: Option<u32>,
    /// Grouped sequences must differ by less than this proportion
    pub min_pident_sep: f64,
    /// Only group sequences sharing a state
    pub same_state: bool,
    /// Zero-based pipe-delimited header field holding the state
    pub state_field: usize,
    /// Read a state from headers at all; when false every state is unknown
    pub extract_state: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads (0 = all available)
    pub threads: usize,
    /// Minimum number of sequences before pairwise comparison runs in parallel
    pub parallel_threshold: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self { gap_char: '-' }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            reference_label: "Ref".to_string(),
            consensus_label: "Consensus".to_string(),
            annotation_mode: "separate".to_string(),
        }
    }
}

impl Default for RepresentConfig {
    fn default() -> Self {
        Self {
            max_day_sep: None,
            min_pident_sep: 1.0,
            same_state: false,
            state_field: 1,
            extract_state: true,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel_threshold: 64,
        }
    }
}

impl AlignmentConfig {
    /// The gap character as a byte; it must be a single ASCII character.
    pub fn gap_byte(&self) -> Result<u8, AlnDiffError> {
        if self.gap_char.is_ascii() && !self.gap_char.is_ascii_whitespace() {
            Ok(self.gap_char as u8)
        } else {
            Err(AlnDiffError::Config(format!(
                "gap character must be a printable ASCII character, got {:?}",
                self.gap_char
            )))
        }
    }
}

impl DiffConfig {
    pub fn join_mode(&self) -> Result<JoinMode, AlnDiffError> {
        self.annotation_mode.parse()
    }
}

impl RepresentConfig {
    pub fn grouping_params(&self) -> GroupingParams {
        GroupingParams {
            max_day_sep: self.max_day_sep,
            min_pident_sep: self.min_pident_sep,
            same_state: self.same_state,
        }
    }

    /// Header field to read the state from, `None` when extraction is off.
    pub fn state_field(&self) -> Option<usize> {
        self.extract_state.then_some(self.state_field)
    }
}

impl Config {
    /// Reject values no command could run with.
    pub fn validate(&self) -> Result<(), AlnDiffError> {
        self.alignment.gap_byte()?;
        self.diff.join_mode()?;
        self.represent.grouping_params().validate()?;
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, AlnDiffError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| AlnDiffError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), AlnDiffError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| AlnDiffError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
