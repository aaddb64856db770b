// SPDX-License-Identifier: MIT
//
// Argument definitions for the quire binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quire_core::types::ExportKind;

/// Merge, split, reorganize, and transform page-oriented documents.
#[derive(Debug, Parser)]
#[command(name = "quire", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Office formats a PDF can be exported to.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Docx,
    Pptx,
}

impl From<ExportFormat> for ExportKind {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Docx => Self::Word,
            ExportFormat::Pptx => Self::Presentation,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge several PDFs into one, in argument order
    Merge {
        /// Input PDF files (two or more)
        #[arg(value_name = "FILE", required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Split a PDF into one single-page document per page
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory for the per-page outputs
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Reorder, rotate, and delete pages of a PDF
    Organize {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Pages to delete, as 1-based numbers or ranges (e.g. '2,5-7')
        #[arg(long, value_name = "PAGES")]
        delete: Option<String>,

        /// Rotation per page as 'PAGE:DEGREES' (repeatable, e.g. '3:90')
        #[arg(long, value_name = "PAGE:DEG")]
        rotate: Vec<String>,

        /// Final page order as 1-based original page numbers (e.g. '3,1,2').
        /// Must list every surviving page exactly once.
        #[arg(long, value_name = "PAGES")]
        order: Option<String>,
    },

    /// Stamp a semi-transparent text watermark on every page
    Watermark {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Watermark text
        #[arg(short, long)]
        text: String,

        /// Font size in points
        #[arg(long, default_value_t = 48.0)]
        font_size: f32,

        /// Opacity, 0.0 to 1.0
        #[arg(long, default_value_t = 0.3)]
        opacity: f32,

        /// Counter-clockwise angle in degrees
        #[arg(long, default_value_t = 45.0)]
        angle: f32,
    },

    /// Password-protect a PDF (print permission only)
    Protect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Password to set
        #[arg(short, long)]
        password: String,
    },

    /// Remove password protection from a PDF
    Unlock {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Current password
        #[arg(short, long)]
        password: String,
    },

    /// Remove interactive form fields, keeping page content
    Flatten {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Build a PDF from images, one page per image
    Img2pdf {
        /// Input image files (JPEG/PNG/TIFF)
        #[arg(value_name = "IMAGE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Document title
        #[arg(long, default_value = "Quire Images")]
        title: String,
    },

    /// Convert between office formats and PDF via the configured service
    Convert {
        /// Input file (.docx/.xlsx/.pptx to PDF, or .pdf with --to)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Export a PDF input to this office format instead
        #[arg(long, value_name = "FORMAT")]
        to: Option<ExportFormat>,

        /// Conversion service endpoint (overrides the config file)
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },

    /// Show or edit document information metadata
    Metadata {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (required when setting any field)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Document author
        #[arg(long)]
        author: Option<String>,

        /// Document subject
        #[arg(long)]
        subject: Option<String>,

        /// Document keywords
        #[arg(long)]
        keywords: Option<String>,
    },

    /// Recognise text in page images and print it
    #[cfg(feature = "ocr")]
    Ocr {
        /// Input image files (rendered pages)
        #[arg(value_name = "IMAGE", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory containing the .rten model files
        #[arg(long, value_name = "DIR")]
        model_dir: Option<PathBuf>,
    },
}
