//! Turn discovered inputs into ready-to-run transcode jobs.

use anyhow::{Context, Result};
use reelforge_av::{TemplateContext, TranscodeCommand, TranscodeSettings};
use reelforge_exec::Job;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Several inputs rendered to the same output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCollision {
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
}

/// Transcode commands for a batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub commands: Vec<TranscodeCommand>,
    pub collisions: Vec<OutputCollision>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// One argv job per command; the source path is both the identity and
    /// the file cleanup may delete.
    pub fn jobs(&self) -> Vec<Job> {
        self.commands.iter().map(to_job).collect()
    }
}

pub fn to_job(command: &TranscodeCommand) -> Job {
    Job::argv(
        command.program.clone(),
        command.args.iter().cloned(),
        // Commands only hold UTF-8 paths, so nothing is replaced here.
        command.source.to_string_lossy(),
    )
    .with_source(command.source.clone())
}

/// Render `template` for every input and build its transcode command.
///
/// Fails on the first input whose name or output cannot be planned, before
/// any job has run.
pub fn build_plan(
    inputs: &[PathBuf],
    template: &str,
    settings: &TranscodeSettings,
) -> Result<Plan> {
    settings.validate()?;

    let mut commands = Vec::with_capacity(inputs.len());
    let mut destinations: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

    for input in inputs {
        // Names, identities and ffmpeg arguments are all text.
        if input.to_str().is_none() {
            anyhow::bail!("Input path is not valid UTF-8: {:?}", input);
        }

        let destination = TemplateContext::for_source(input)
            .render(template)
            .with_context(|| format!("Failed to render output name for {:?}", input))?;
        let destination = PathBuf::from(destination);

        let command = settings
            .command(input, &destination)
            .with_context(|| format!("Cannot convert {:?}", input))?;

        destinations
            .entry(destination)
            .or_default()
            .push(input.clone());
        commands.push(command);
    }

    let collisions = destinations
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(destination, sources)| OutputCollision {
            destination,
            sources,
        })
        .collect();

    Ok(Plan {
        commands,
        collisions,
    })
}
