//! Chapter timecodes.

use crate::error::{Result, SkriveError};
use crate::generation::normalize::extract_text;
use crate::generation::validate::non_empty;
use crate::generation::{require_input, vars, GenerationContext, Generator, TaskKind};
use tracing::{info, instrument, warn};

/// Timestamp the first chapter is expected to start at.
const FIRST_CHAPTER: &str = "00:00";

impl Generator {
    /// Generate chapter timecodes for a manuscript or transcript.
    #[instrument(skip(self, ctx, manuscript), fields(task = "timecodes"))]
    pub async fn generate_timecodes(
        &self,
        ctx: &GenerationContext,
        manuscript: &str,
    ) -> Result<String> {
        let task = TaskKind::Timecodes;
        let manuscript = require_input(task, "manuscript", manuscript)?;

        let prompt = self.render(task, &vars([("manuscript", manuscript.to_string())]))?;
        let raw = self.invoke(ctx, task, &prompt).await?;

        let timecodes = parse_timecodes(&raw)?;
        info!("Generated {} chapters", timecodes.lines().count());
        Ok(timecodes)
    }
}

/// Normalize a raw timecode response into trimmed, non-blank lines.
pub fn parse_timecodes(raw: &str) -> Result<String> {
    let text = extract_text(raw);
    let timecodes = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    non_empty("timecodes", &timecodes).map_err(SkriveError::from)?;

    if !timecodes.starts_with(FIRST_CHAPTER) {
        warn!(
            "First chapter does not start at {}: {:?}",
            FIRST_CHAPTER,
            timecodes.lines().next().unwrap_or_default()
        );
    }
    Ok(timecodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_dropped() {
        let raw = "```\n00:00 Intro\n\n  01:30 Setup  \n05:10 Demo\n```";
        assert_eq!(
            parse_timecodes(raw).unwrap(),
            "00:00 Intro\n01:30 Setup\n05:10 Demo"
        );
    }

    #[test]
    fn test_missing_intro_still_accepted() {
        assert_eq!(parse_timecodes("00:15 Setup").unwrap(), "00:15 Setup");
    }

    #[test]
    fn test_blank_rejected() {
        assert!(matches!(parse_timecodes("``````"), Err(SkriveError::Validation(_))));
    }
}
