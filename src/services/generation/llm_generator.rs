//! Generator backed by a text-completion service.
//!
//! Prompts are minijinja templates. Replies are expected to hold one JSON
//! object, which is extracted, deserialized and normalized. Every failure is
//! logged and reported as `None`.

use minijinja::{AutoEscape, Environment, UndefinedBehavior, context};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{AppError, CommitDetails, FileEntry, PrDetails, StackGroup, StackPlan};
use crate::ports::{CompletionClient, CompletionRequest, Generator};

const SYSTEM_PROMPT: &str = include_str!("templates/system.txt");
const COMMIT_TEMPLATE: &str = "commit.txt";
const PR_TEMPLATE: &str = "pr.txt";
const STACK_TEMPLATE: &str = "stack.txt";

const DETAILS_MAX_TOKENS: u32 = 1024;
const STACK_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommitReply {
    branch_name: String,
    commit_message: String,
    pr_title: String,
    pr_body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrReply {
    title: String,
    body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StackReply {
    branch_name: String,
    pr_title: String,
    pr_body: String,
    groups: Vec<GroupReply>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GroupReply {
    files: Vec<String>,
    message: String,
}

pub struct LlmGenerator<C: CompletionClient> {
    client: C,
    max_diff_chars: usize,
    env: Environment<'static>,
}

impl<C: CompletionClient> LlmGenerator<C> {
    pub fn new(client: C, max_diff_chars: usize) -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template(COMMIT_TEMPLATE, include_str!("templates/commit.txt"))?;
        env.add_template(PR_TEMPLATE, include_str!("templates/pr.txt"))?;
        env.add_template(STACK_TEMPLATE, include_str!("templates/stack.txt"))?;
        Ok(Self { client, max_diff_chars, env })
    }

    fn ask<T: DeserializeOwned>(
        &self,
        template: &str,
        ctx: minijinja::Value,
        max_tokens: u32,
    ) -> Result<T, AppError> {
        let prompt = self.env.get_template(template)?.render(ctx)?;
        let request = CompletionRequest { system: SYSTEM_PROMPT.to_string(), prompt, max_tokens };
        let reply = self.client.complete(&request)?;
        let json = extract_json(&reply).ok_or_else(|| AppError::ParseError {
            what: "generation reply".into(),
            details: "no JSON object found".into(),
        })?;
        serde_json::from_str(json).map_err(|e| AppError::ParseError {
            what: "generation reply".into(),
            details: e.to_string(),
        })
    }

    fn try_commit_details(&self, diff: &str) -> Result<CommitDetails, AppError> {
        let (diff, truncated) = truncate_diff(diff, self.max_diff_chars);
        let ctx = context! { diff => diff, truncated => truncated };
        let reply: CommitReply = self.ask(COMMIT_TEMPLATE, ctx, DETAILS_MAX_TOKENS)?;
        let details = CommitDetails {
            branch_name: reply.branch_name,
            commit_message: reply.commit_message,
            pr_title: reply.pr_title,
            pr_body: reply.pr_body,
        }
        .normalized();
        if details.commit_message.is_empty() {
            return Err(AppError::Provider("reply had no commit message".into()));
        }
        Ok(details)
    }

    fn try_pr_details(&self, diff: &str) -> Result<PrDetails, AppError> {
        let (diff, truncated) = truncate_diff(diff, self.max_diff_chars);
        let ctx = context! { diff => diff, truncated => truncated };
        let reply: PrReply = self.ask(PR_TEMPLATE, ctx, DETAILS_MAX_TOKENS)?;
        PrDetails { title: reply.title, body: reply.body }
            .normalized()
            .ok_or_else(|| AppError::Provider("reply had no pull request title".into()))
    }

    fn try_stack_plan(&self, files: &[FileEntry], diff: &str) -> Result<StackPlan, AppError> {
        let (diff, truncated) = truncate_diff(diff, self.max_diff_chars);
        let listing: Vec<String> = files.iter().map(ToString::to_string).collect();
        let reply: StackReply = self.ask(
            STACK_TEMPLATE,
            context! { diff => diff, truncated => truncated, files => listing },
            STACK_MAX_TOKENS,
        )?;
        let plan = StackPlan {
            groups: reply
                .groups
                .into_iter()
                .map(|g| StackGroup { files: g.files, message: g.message })
                .collect(),
            branch_name: reply.branch_name,
            pr_title: reply.pr_title,
            pr_body: reply.pr_body,
        };
        plan.reconcile(files)
            .ok_or_else(|| AppError::Provider("stack plan had no usable groups".into()))
    }
}

fn logged<T>(what: &str, result: Result<T, AppError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(error = %err, "{} generation failed", what);
            None
        }
    }
}

impl<C: CompletionClient> Generator for LlmGenerator<C> {
    fn commit_details(&self, diff: &str) -> Option<CommitDetails> {
        logged("commit details", self.try_commit_details(diff))
    }

    fn pr_details(&self, diff: &str) -> Option<PrDetails> {
        logged("pull request", self.try_pr_details(diff))
    }

    fn stack_plan(&self, files: &[FileEntry], diff: &str) -> Option<StackPlan> {
        logged("stack plan", self.try_stack_plan(files, diff))
    }
}

/// Cut `diff` to at most `max_chars` characters on a line boundary.
///
/// Returns the text and whether anything was dropped.
pub fn truncate_diff(diff: &str, max_chars: usize) -> (String, bool) {
    if diff.chars().count() <= max_chars {
        return (diff.to_string(), false);
    }
    let cut = diff.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(diff.len());
    let head = &diff[..cut];
    let head = match head.rfind('\n') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head,
    };
    (format!("{}\n[... diff truncated ...]", head), true)
}

/// First balanced JSON object in `text`, skipping prose and code fences.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
