//! Video description generation.

use crate::error::{Result, SkriveError};
use crate::generation::normalize::extract_text;
use crate::generation::validate::non_empty;
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use tracing::{info, instrument};

impl Generator {
    /// Generate the description text for the video described by `manuscript`.
    #[instrument(skip(self, ctx, manuscript), fields(task = "description"))]
    pub async fn generate_description(
        &self,
        ctx: &GenerationContext,
        manuscript: &str,
    ) -> Result<String> {
        let task = TaskKind::Description;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(task, &vars([("manuscript", manuscript.to_string())]))?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let description = extract_text(&raw);
        non_empty("description", &description).map_err(SkriveError::from)?;

        info!("Generated description ({} chars)", description.chars().count());
        Ok(description)
    }
}
