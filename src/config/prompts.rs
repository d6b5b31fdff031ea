//! Prompt templates for Skrive.
//!
//! Each generation task owns exactly one template. Templates can be customized by
//! placing a `prompts.toml` in the custom prompts directory; any task missing from
//! that file keeps its built-in template.
//!
//! Placeholders use the `{{name}}` syntax. Rendering is strict: a placeholder with
//! no bound value, or an unterminated `{{`, is a template error rather than being
//! passed through to the model.

use crate::error::{Result, SkriveError};
use crate::generation::TaskKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Name of the override file inside the custom prompts directory.
pub const PROMPTS_FILE: &str = "prompts.toml";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub description_tags: String,
    pub highlights: String,
    pub timecodes: String,
    pub tweets: String,
    pub shorts: String,
    pub timing: String,
    pub translation: String,
    pub ama: String,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            title: r#"You are an expert YouTube strategist. Write one title for the video described by the manuscript below.

Rules:
- Maximum 70 characters
- Lead with the most compelling idea, no clickbait that the video does not deliver
- Do not wrap the title in quotes and do not add any explanation

Manuscript:
{{manuscript}}

Respond with the title only, on a single line."#
                .to_string(),

            description: r#"You are an expert YouTube copywriter. Write the description for the video described by the manuscript below.

Rules:
- Two or three short paragraphs, plain text
- The first sentence must work on its own as a search snippet
- No hashtags, no timecodes, no links

Manuscript:
{{manuscript}}

Respond with the description only."#
                .to_string(),

            tags: r#"You are a YouTube SEO specialist. Produce search tags for the video described by the manuscript below.

Rules:
- Comma-separated list, most relevant first
- The whole list must not exceed {{max_chars}} characters including separators
- No hashtags, no numbering, no explanation

Manuscript:
{{manuscript}}

Respond with the comma-separated tags only."#
                .to_string(),

            description_tags: r#"Pick exactly three hashtags for the video described by the manuscript below.

Rules:
- Exactly 3 hashtags, each starting with #
- Separated by single spaces, on one line
- No other text

Manuscript:
{{manuscript}}"#
                .to_string(),

            highlights: r#"You are an editor preparing a manuscript for recording. Select the phrases that deserve emphasis.

Rules:
- Every phrase must be copied exactly, character for character, from the manuscript
- Prefer short phrases (2 to 8 words) carrying the key ideas
- Do not paraphrase, do not merge separate sentences

Manuscript:
{{manuscript}}

Respond with a JSON array of strings. Example:
["key phrase one", "another exact phrase"]"#
                .to_string(),

            timecodes: r#"Create YouTube chapter timecodes for the video described below.

Rules:
- One chapter per line in the form "MM:SS Chapter title" (use HH:MM:SS past one hour)
- The first line must be "00:00 Intro"
- Chapter titles are 2 to 6 words
- No other text

Manuscript or transcript:
{{manuscript}}"#
                .to_string(),

            tweets: r#"Write social posts promoting the video described by the manuscript below.

Rules:
- Between 3 and 5 posts, each a standalone message
- Each post must be at most {{max_chars}} characters
- Include [YOUTUBE] where the video link belongs

Manuscript:
{{manuscript}}

Respond with a JSON array of strings. Example:
["First post text [YOUTUBE]", "Second post text [YOUTUBE]"]"#
                .to_string(),

            shorts: r#"You are a short-form video producer. Find segments of the manuscript that work as standalone short videos.

Rules:
- Return up to {{candidate_count}} candidates
- Each "text" is a verbatim excerpt from the manuscript of at most {{max_words}} words
- Each segment must make sense without the rest of the video
- "id" is a short unique identifier such as "short1"
- "rationale" explains in one sentence why the segment works on its own

Manuscript:
{{manuscript}}

Respond with a JSON array of objects. Example:
[
  {"id": "short1", "title": "Why caches lie", "text": "Exact excerpt...", "rationale": "Self-contained surprising claim."}
]"#
                .to_string(),

            timing: r#"You are a YouTube analytics expert. Based on the performance of past videos, recommend publishing slots for new videos.

Past videos ({{video_count}} records, times in UTC):
{{analytics}}

Rules:
- Recommend between 6 and 8 slots
- "day" is one of Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday
- "time" is 24-hour HH:MM in UTC
- "reasoning" cites the data supporting the slot

Respond with a JSON array of objects. Example:
[
  {"day": "Tuesday", "time": "16:00", "reasoning": "Tuesday afternoon uploads averaged the highest CTR."}
]"#
                .to_string(),

            translation: r#"Translate the YouTube video metadata below into {{target_language}}.

Rules:
- Keep the exact same JSON structure and field names
- Keep empty fields empty
- In "timecodes", keep every timestamp unchanged and translate only the chapter titles
- In "tags", keep the comma-separated format
- Keep "short_titles" in the same order with the same number of entries

Metadata:
{{metadata_json}}

Respond with the translated JSON object only."#
                .to_string(),

            ama: r#"You are preparing the publishing package for an "Ask Me Anything" live stream recording. Use the transcript below.

Produce:
- "title": one title, at most 70 characters
- "description": two short paragraphs summarizing the questions covered
- "tags": comma-separated search tags, at most {{tags_max_chars}} characters in total
- "timecodes": one line per question in the form "HH:MM:SS Question summary", first line "00:00:00 Intro"

Transcript:
{{transcript}}

Respond with a single JSON object with the fields "title", "description", "tags" and "timecodes"."#
                .to_string(),

            variables: HashMap::new(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    ///
    /// Every template is checked for well-formed placeholders before it is returned,
    /// so a broken override fails at startup rather than on the first request.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());
            let prompts_path = custom_path.join(PROMPTS_FILE);
            if prompts_path.exists() {
                let content = std::fs::read_to_string(&prompts_path)?;
                prompts = toml::from_str(&content)?;
            }
        }

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        prompts.check()?;
        Ok(prompts)
    }

    /// The template owned by a task.
    pub fn template(&self, task: TaskKind) -> &str {
        match task {
            TaskKind::Title => &self.title,
            TaskKind::Description => &self.description,
            TaskKind::Tags => &self.tags,
            TaskKind::DescriptionTags => &self.description_tags,
            TaskKind::Highlights => &self.highlights,
            TaskKind::Timecodes => &self.timecodes,
            TaskKind::Tweets => &self.tweets,
            TaskKind::Shorts => &self.shorts,
            TaskKind::Timing => &self.timing,
            TaskKind::Translation => &self.translation,
            TaskKind::Ama => &self.ama,
        }
    }

    /// Verify that every template only references variables its task supplies
    /// or that are defined as custom variables.
    pub fn check(&self) -> Result<()> {
        for task in TaskKind::ALL {
            let template = self.template(task);
            if template.trim().is_empty() {
                return Err(SkriveError::Template(format!(
                    "template '{}' is empty",
                    task
                )));
            }
            for name in placeholders(template).map_err(|e| e.with_context(task.name()))? {
                let known = task.variables().contains(&name.as_str())
                    || self.variables.contains_key(&name);
                if !known {
                    return Err(SkriveError::Template(format!(
                        "template '{}' references unknown variable {{{{{}}}}}",
                        task, name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render a task's template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_task(&self, task: TaskKind, vars: &HashMap<String, String>) -> Result<String> {
        self.render_with_custom(self.template(task), vars)
            .map_err(|e| e.with_context(task.name()))
    }

    /// Render a template with both provided variables and custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &HashMap<String, String>,
    ) -> Result<String> {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass, so values that themselves contain `{{...}}`
    /// are inserted verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> Result<String> {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let close = after_open.find("}}").ok_or_else(|| {
                SkriveError::Template(format!(
                    "unterminated placeholder near {:?}",
                    crate::error::excerpt(&rest[open..], 30)
                ))
            })?;
            let name = placeholder_name(&after_open[..close])?;
            let value = vars.get(name).ok_or_else(|| {
                SkriveError::Template(format!("no value bound for {{{{{}}}}}", name))
            })?;
            result.push_str(value);
            rest = &after_open[close + 2..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

/// Names of all placeholders referenced by a template, in order of appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let close = after_open.find("}}").ok_or_else(|| {
            SkriveError::Template(format!(
                "unterminated placeholder near {:?}",
                crate::error::excerpt(&rest[open..], 30)
            ))
        })?;
        names.push(placeholder_name(&after_open[..close])?.to_string());
        rest = &after_open[close + 2..];
    }

    Ok(names)
}

fn placeholder_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(name)
    } else {
        Err(SkriveError::Template(format!(
            "malformed placeholder {{{{{}}}}}",
            raw
        )))
    }
}
