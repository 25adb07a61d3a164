//! Tackline - headless timeline editor
//!
//! Loads a project, replays an editing script through the editor and writes
//! the resulting snapshot.
//!
//! Usage: `tackline <project.json|-> <script.json> [--config cfg.json] [--out out.json]`
//!
//! Pass `-` instead of a project path to start from an empty project.

mod script;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tackline_core::EditorConfig;
use tackline_timeline::{Editor, Project, ProjectFile, TrackEvent};

use crate::script::Script;

#[derive(Debug, Parser)]
#[command(name = "tackline")]
#[command(about = "Tackline - replay an editing script against a timeline project")]
#[command(version)]
struct Args {
    /// Project file to edit, or `-` for a new empty project
    project: String,

    /// Editing script to replay
    script: PathBuf,

    /// Editor configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resulting project here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

impl Args {
    fn project_path(&self) -> Option<PathBuf> {
        (self.project != "-").then(|| PathBuf::from(&self.project))
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let project = match args.project_path() {
        Some(path) => ProjectFile::load_from_file(&path)?.project,
        None => Project::default(),
    };

    let data = std::fs::read(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script = Script::from_json(&data)?;

    info!(steps = script.steps.len(), "Tackline replay starting");

    let listener = |event: &TrackEvent, _project: &Project| {
        info!(?event, "Notification");
    };
    let mut editor = Editor::new(project, config, listener)?;
    if editor.timeline().is_none() {
        editor.add_timeline(None);
    }

    let applied = script::run(&mut editor, &script)?;
    editor.commit_pending();
    info!(applied, selection = ?editor.selection(), cursor = editor.cursor(), "Replay finished");

    let file = ProjectFile::new(editor.into_project());
    match &args.out {
        Some(path) => file.save_to_file(path)?,
        None => println!("{}", String::from_utf8(file.to_json()?)?),
    }

    Ok(())
}
