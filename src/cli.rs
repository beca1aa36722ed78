//! Command line and config file handling for the `blockfall` binary.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command line flags.
//!
//! ```toml
//! seed = 7
//! sequence = ["o", "i", "t"]
//!
//! [board]
//! width = 12
//! height = 22
//! initial_fall_ms = 400
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::core::{
    BagSequence, Board, BoardConfig, FixedSequence, PieceSource, ShapeCatalog, ShapeId,
    ShapeKind,
};

/// Seed used when neither the file nor the command line names one
pub const DEFAULT_SEED: u32 = 1;

#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Board width in cells.
    #[arg(long)]
    pub width: Option<u16>,
    /// Board height in cells.
    #[arg(long)]
    pub height: Option<u16>,
    /// Seed for the shuffled piece bag. Equal seeds replay equal piece orders.
    #[arg(short, long)]
    pub seed: Option<u32>,
    /// TOML file with `seed`, `sequence` and a `[board]` table.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Fixed, repeating piece order instead of the bag, e.g. `o,i,t` or `0,1,2`.
    #[arg(long)]
    pub sequence: Option<String>,
}

/// Contents of the optional config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub seed: Option<u32>,
    pub sequence: Option<Vec<String>>,
    pub board: BoardConfig,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("in {}", path.display()))
    }
}

/// Everything needed to start a game
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub board: BoardConfig,
    pub seed: u32,
    pub sequence: Option<Vec<ShapeId>>,
}

impl Settings {
    /// Merge `file` and `args`; flags win.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let catalog = ShapeCatalog::standard();
        let mut board = file.board;

        if args.width.is_some() || args.height.is_some() {
            let width = args.width.unwrap_or(board.width);
            let height = args.height.unwrap_or(board.height);
            // A resized board without an explicit spawn gets the centered default.
            let spawn_x = if args.width.is_some() {
                BoardConfig::sized(width, height).spawn_x
            } else {
                board.spawn_x
            };
            board.width = width;
            board.height = height;
            board.spawn_x = spawn_x;
        }
        board.validate()?;

        let sequence = match (&args.sequence, file.sequence) {
            (Some(list), _) => Some(parse_sequence(list, &catalog)?),
            (None, Some(names)) => Some(
                names
                    .iter()
                    .map(|name| parse_shape(name, &catalog))
                    .collect::<Result<Vec<_>>>()?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            board,
            seed: args.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            sequence,
        })
    }

    /// Read the config file named by `args`, if any, then resolve.
    pub fn from_args(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    pub fn source(&self) -> Box<dyn PieceSource> {
        match &self.sequence {
            Some(shapes) => Box::new(FixedSequence::new(shapes.clone())),
            None => Box::new(BagSequence::new(&ShapeCatalog::standard(), self.seed)),
        }
    }

    pub fn build_board(&self) -> Result<Board<Box<dyn PieceSource>>> {
        Board::new(self.board, ShapeCatalog::standard(), self.source())
            .context("failed to create board")
    }
}

/// Parse a comma-separated list of shape names or ids.
pub fn parse_sequence(list: &str, catalog: &ShapeCatalog) -> Result<Vec<ShapeId>> {
    let shapes = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_shape(s, catalog))
        .collect::<Result<Vec<_>>>()?;
    if shapes.is_empty() {
        bail!("piece sequence is empty");
    }
    Ok(shapes)
}

/// A shape letter (`o`, `i`, `t`, `s`, `z`, `j`, `l`) or a numeric id.
pub fn parse_shape(token: &str, catalog: &ShapeCatalog) -> Result<ShapeId> {
    let token = token.trim();
    let id = match token.parse::<ShapeId>() {
        Ok(id) => id,
        Err(_) => ShapeKind::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(token))
            .map(ShapeKind::id)
            .ok_or_else(|| anyhow!("unknown shape {token:?}"))?,
    };
    if !catalog.contains_shape(id) {
        bail!("shape id {id} is out of range (catalog has {})", catalog.len());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = Settings::resolve(&Args::default(), FileConfig::default()).unwrap();
        assert_eq!(settings.board, BoardConfig::default());
        assert_eq!(settings.seed, DEFAULT_SEED);
        assert_eq!(settings.sequence, None);
    }

    #[test]
    fn file_values_are_used() {
        let file = FileConfig::from_toml(
            r#"
            seed = 42
            sequence = ["o", "I", "6"]

            [board]
            width = 8
            initial_fall_ms = 500
            "#,
        )
        .unwrap();
        let settings = Settings::resolve(&Args::default(), file).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.sequence, Some(vec![0, 1, 6]));
        assert_eq!(settings.board.width, 8);
        assert_eq!(settings.board.height, 20);
        assert_eq!(settings.board.initial_fall_ms, 500);
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::from_toml("seed = 3\n[board]\nwidth = 8\nheight = 30\n").unwrap();
        let args = Args {
            width: Some(6),
            seed: Some(9),
            sequence: Some("t, t".to_string()),
            ..Args::default()
        };
        let settings = Settings::resolve(&args, file).unwrap();
        assert_eq!((settings.board.width, settings.board.height), (6, 30));
        assert_eq!(settings.board.spawn_x, 2);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.sequence, Some(vec![2, 2]));
    }

    #[test]
    fn rejects_bad_input() {
        let catalog = ShapeCatalog::standard();
        assert!(parse_sequence("", &catalog).is_err());
        assert!(parse_shape("q", &catalog).is_err());
        assert!(parse_shape("7", &catalog).is_err());
        assert!(FileConfig::from_toml("seed = \"x\"").is_err());

        let args = Args {
            width: Some(0),
            ..Args::default()
        };
        assert!(Settings::resolve(&args, FileConfig::default()).is_err());

        let args = Args {
            width: Some(40_000),
            ..Args::default()
        };
        assert!(Settings::resolve(&args, FileConfig::default()).is_err());
    }

    #[test]
    fn builds_board_from_settings() {
        let args = Args {
            width: Some(6),
            height: Some(10),
            sequence: Some("o".to_string()),
            ..Args::default()
        };
        let board = Settings::from_args(&args).unwrap().build_board().unwrap();
        assert_eq!(board.width(), 6);
        assert_eq!(board.active_piece().map(|p| p.shape), Some(0));
    }
}
