//! End-to-end handoff run: decide, reduce, generate, write, reconcile state

use crate::config::HandoffSettings;
use crate::decision::{Decision, HandoffEngine};
use crate::prompt::{build_handoff_prompt, project_name, PromptContext};
use crate::title::{fallback_handoff, split_generated, GeneratedHandoff};
use crate::transcript::read_transcript;
use crate::types::HookInput;
use chrono::{DateTime, Local};
use handoff_generate::{GenerationRequest, Generator};
use handoff_state::{atomic_write, resolve_handoff_dir, ProjectConfig, StateStore};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum HandoffOutcome {
    /// Session ended shortly after a compaction handoff
    Skipped { growth: f64 },
    /// The transcript had nothing to summarize
    NoConversation,
    Written { path: PathBuf, short_title: String },
}

/// Output failures; everything upstream of the write degrades instead
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("cannot prepare handoff directory in {}: {}", .cwd.display(), .source)]
    Directory {
        cwd: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error saving handoff to {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct HandoffRunner<'a, S: StateStore + ?Sized> {
    engine: HandoffEngine<'a, S>,
    settings: &'a HandoffSettings,
}

impl<'a, S: StateStore + ?Sized> HandoffRunner<'a, S> {
    pub fn new(store: &'a S, settings: &'a HandoffSettings) -> Self {
        Self {
            engine: HandoffEngine::with_threshold(store, settings.growth_threshold),
            settings,
        }
    }

    /// Skip/run decision for this hook invocation; clears state on skip
    pub fn check(&self, input: &HookInput, transcript_size: u64) -> Decision {
        self.engine
            .evaluate(&input.session_id, &input.trigger, transcript_size)
    }

    /// Generate and write the handoff, then update session state.
    ///
    /// A generator failure still produces a document (the fallback); only
    /// failing to write it is an error, and state is left untouched then.
    pub async fn generate<G: Generator + ?Sized>(
        &self,
        input: &HookInput,
        transcript_size: u64,
        generator: &G,
        now: DateTime<Local>,
    ) -> Result<HandoffOutcome, HandoffError> {
        let conversation = read_transcript(&input.transcript_path, self.settings.limits());
        if conversation.is_empty() {
            return Ok(HandoffOutcome::NoConversation);
        }

        let project = project_name(&input.cwd);
        let cwd = input.cwd.to_string_lossy();
        let date = now.format("%Y-%m-%d").to_string();
        let rendered = conversation.render();
        let prompt = build_handoff_prompt(&PromptContext {
            project_name: &project,
            trigger: input.trigger.label(),
            cwd: &cwd,
            date: &date,
            platform: std::env::consts::OS,
            conversation: &rendered,
        });

        let request = GenerationRequest::new(prompt)
            .with_model(&self.settings.model)
            .with_max_tokens(self.settings.max_tokens);

        tracing::info!(
            session_id = %input.session_id,
            trigger = %input.trigger,
            excerpts = conversation.len(),
            "generating handoff"
        );
        let handoff = match generator.generate(&request).await {
            Ok(text) => split_generated(&text),
            Err(e) => {
                tracing::warn!(error = %e, "handoff generation failed, writing fallback");
                fallback_handoff(&e.to_string(), input.trigger.label(), &project)
            }
        };

        let path = self.write(input, &handoff, now)?;
        self.engine
            .complete(&input.session_id, &input.trigger, transcript_size);

        Ok(HandoffOutcome::Written {
            path,
            short_title: handoff.short_title,
        })
    }

    /// [`check`](Self::check) then [`generate`](Self::generate)
    pub async fn run<G: Generator + ?Sized>(
        &self,
        input: &HookInput,
        transcript_size: u64,
        generator: &G,
        now: DateTime<Local>,
    ) -> Result<HandoffOutcome, HandoffError> {
        if let Decision::Skip { growth } = self.check(input, transcript_size) {
            return Ok(HandoffOutcome::Skipped { growth });
        }
        self.generate(input, transcript_size, generator, now).await
    }

    fn write(
        &self,
        input: &HookInput,
        handoff: &GeneratedHandoff,
        now: DateTime<Local>,
    ) -> Result<PathBuf, HandoffError> {
        let config = ProjectConfig::load(&input.cwd);
        let dir = resolve_handoff_dir(&input.cwd, &config).map_err(|source| {
            HandoffError::Directory {
                cwd: input.cwd.clone(),
                source,
            }
        })?;

        let filename = format!("{}-{}.md", now.format("%Y%m%d-%H%M"), handoff.short_title);
        let path = dir.join(filename);
        atomic_write(&path, handoff.body.as_bytes()).map_err(|source| HandoffError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
