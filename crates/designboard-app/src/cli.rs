//! Command-line arguments.

use clap::{Parser, Subcommand};
use designboard_core::config::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_STORAGE_KEY};
use designboard_core::storage::{FileStorage, Storage};
use designboard_core::{EditorConfig, ExportFormat};
use std::path::PathBuf;
use std::sync::Arc;

/// Designboard layout editor shell.
#[derive(Debug, Clone, Parser)]
#[command(name = "designboard")]
#[command(about = "Inspect, replay and export designboard layouts")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding saved layouts
    #[arg(long, global = true, env = "DESIGNBOARD_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Storage key of the layout
    #[arg(long, global = true, env = "DESIGNBOARD_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Canvas width in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub height: f64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the layer list, topmost first
    Layers,
    /// Print the materialized view and its drawing commands
    View,
    /// Export the layout
    Export {
        /// Output format: json or html
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Output file; prints to stdout when absent
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Apply a JSON input log to the layout and save it
    Replay {
        /// Path to a JSON array of input events
        log: PathBuf,
    },
    /// Remove every element and erase the saved layout
    Clear,
    /// List keyboard and pointer shortcuts
    Shortcuts,
}

impl From<&CliArgs> for EditorConfig {
    fn from(args: &CliArgs) -> Self {
        EditorConfig::default()
            .with_canvas_size(args.width, args.height)
            .with_storage_key(args.key.clone())
    }
}

impl CliArgs {
    /// Open the storage backend the arguments point at.
    pub fn open_storage(&self) -> anyhow::Result<Arc<dyn Storage>> {
        let storage = match &self.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        log::info!("Using storage at {}", storage.base_path().display());
        Ok(Arc::new(storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["designboard", "layers"]).unwrap();
        assert_eq!(args.key, DEFAULT_STORAGE_KEY);
        assert!(matches!(args.command, Some(Command::Layers)));
        let config = EditorConfig::from(&args);
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_export_args() {
        let args = CliArgs::try_parse_from([
            "designboard",
            "export",
            "--format",
            "html",
            "--out",
            "page.html",
            "--width",
            "640",
        ])
        .unwrap();
        let config = EditorConfig::from(&args);
        assert!((config.canvas_size.width - 640.0).abs() < f64::EPSILON);
        match args.command {
            Some(Command::Export { format, out }) => {
                assert_eq!(format, ExportFormat::Html);
                assert_eq!(out, Some(PathBuf::from("page.html")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(CliArgs::try_parse_from(["designboard", "export", "--format", "png"]).is_err());
    }
}
