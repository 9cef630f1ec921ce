use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate an SRT file, or every SRT file in a folder
    #[command(alias = "trans")]
    Translate {
        /// SRT file or folder
        path: PathBuf,

        /// Source language code
        source_lang: String,

        /// Destination language code
        dest_lang: String,

        /// Keep both source & destination language
        #[arg(short = 'k', long)]
        bilingual: bool,

        /// Recursively translate subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Overwrite if the translated file already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Generate subtitles from the audio of a media file
    #[command(alias = "subv")]
    Transcribe {
        /// Video or audio file
        media: PathBuf,

        /// Spoken language code
        source_lang: String,

        /// Destination language code
        #[arg(short, long)]
        dest_lang: Option<String>,

        /// Keep both source & destination language
        #[arg(short = 'k', long)]
        bilingual: bool,
    },

    /// List supported language codes
    Languages,
}
