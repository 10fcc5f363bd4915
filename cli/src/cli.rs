use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Convert and resize images between PNG, JPEG, WebP, GIF, BMP and TIFF
#[derive(Debug, Parser)]
#[command(name = "media_converter", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a single image
    Convert {
        /// Input image (png, jpg, jpeg, gif, webp, bmp)
        input: PathBuf,

        /// Output file, or directory to write `<stem>.<format>` into
        /// (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: ConvertArgs,
    },

    /// Convert many images with one shared configuration
    Batch {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Walk input directories recursively
        #[arg(short, long)]
        recursive: bool,

        #[command(flatten)]
        settings: ConvertArgs,
    },
}

/// Settings shared by `convert` and `batch`.
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Target format (png, jpg, jpeg, webp, gif, bmp, tiff)
    #[arg(long, short = 't', value_name = "FORMAT", default_value = "png")]
    pub to: String,

    /// Resize to this width (height follows the aspect ratio unless given)
    #[arg(long)]
    pub width: Option<u32>,

    /// Resize to this height (width follows the aspect ratio unless given)
    #[arg(long)]
    pub height: Option<u32>,

    /// Quality for JPEG (default 90) and WebP (default 80), 1-100
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality: Option<i64>,

    /// PNG compression level 0-9 (default 6)
    #[arg(short, long, allow_negative_numbers = true)]
    pub compression: Option<i64>,
}

impl ConvertArgs {
    /// The same flat key/value mapping the web form submits.
    pub fn to_form(&self) -> HashMap<String, String> {
        let mut form = HashMap::new();
        form.insert("format".to_string(), self.to.clone());

        if self.width.is_some() || self.height.is_some() {
            form.insert("resize".to_string(), "yes".to_string());
        }
        if let Some(w) = self.width {
            form.insert("width".to_string(), w.to_string());
        }
        if let Some(h) = self.height {
            form.insert("height".to_string(), h.to_string());
        }
        if let Some(q) = self.quality {
            form.insert("quality".to_string(), q.to_string());
        }
        if let Some(c) = self.compression {
            form.insert("compression".to_string(), c.to_string());
        }

        form
    }
}
