use clap::{Parser, Subcommand};
use reportwriter::history::ArtifactKind;
use std::path::PathBuf;

/// `reportwriter` - draft student reports with an AI model and refine them by chat.
#[derive(Parser, Debug)]
#[command(name = "reportwriter")]
#[command(version = "0.1.0")]
#[command(about = "Draft, edit and undo AI-written student reports.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a report for the student described in a form file
    Report {
        /// TOML form file (`[settings]` and `[student]` tables)
        #[arg(short, long)]
        form: PathBuf,
    },

    /// Generate teaching strategies for the student in a form file
    Strategies {
        #[arg(short, long)]
        form: PathBuf,
    },

    /// Generate a report, then refine it interactively with chat edits
    Edit {
        #[arg(short, long)]
        form: PathBuf,

        /// Artifact to generate first
        #[arg(long, default_value = "report")]
        start: ArtifactKind,
    },

    /// Manage assessment templates
    Templates {
        #[command(subcommand)]
        template_command: TemplateCommands,
    },

    /// Show this month's usage
    Usage,

    /// Run the generation proxy
    Gateway {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List templates; the active one is marked
    List,
    /// Print one template as JSON
    Show { id: String },
    /// Make a template active
    Use { id: String },
    /// Copy a template into an editable one
    Duplicate { id: String },
    /// Delete an unlocked template
    Delete { id: String },
    /// Write an unlocked template to a JSON file (stdout when no file is given)
    Export {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a template from a JSON file
    Import { file: PathBuf },
    /// Drop all custom templates and restore the default
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
