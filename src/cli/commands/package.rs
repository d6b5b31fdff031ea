//! Package command - generate the full publishing package for a manuscript.

use super::generate::{cancel_on_ctrl_c, emit};
use crate::cli::preflight::build_generator;
use crate::cli::Output;
use crate::config::Settings;
use crate::tasks::{DescriptionTags, Tags};
use anyhow::{Context, Result};
use serde::Serialize;

/// Everything needed to publish one video.
#[derive(Debug, Serialize)]
pub struct PublishingPackage {
    pub title: String,
    pub description: String,
    pub tags: Tags,
    pub description_tags: DescriptionTags,
    pub timecodes: String,
    pub tweets: Vec<String>,
}

impl PublishingPackage {
    /// Description with its hashtags appended, as pasted into the upload form.
    pub fn full_description(&self) -> String {
        format!("{}\n\n{}", self.description, self.description_tags)
    }
}

/// Run the package command.
///
/// The tasks are independent, so they run concurrently against one generator.
pub async fn run_package(manuscript: &str, json: bool, settings: Settings) -> Result<()> {
    let content = std::fs::read_to_string(Settings::expand_path(manuscript))
        .with_context(|| format!("Failed to read manuscript: {}", manuscript))?;
    let generator = build_generator(&settings)?;
    let ctx = cancel_on_ctrl_c();

    let spinner = Output::spinner("Generating publishing package...");
    let (title, description, tags, description_tags, timecodes, tweets) = tokio::join!(
        generator.generate_title(&ctx, &content),
        generator.generate_description(&ctx, &content),
        generator.generate_tags(&ctx, &content),
        generator.generate_description_tags(&ctx, &content),
        generator.generate_timecodes(&ctx, &content),
        generator.generate_tweets(&ctx, &content),
    );
    spinner.finish_and_clear();

    let package = PublishingPackage {
        title: title.context("title")?,
        description: description.context("description")?,
        tags: tags.context("tags")?,
        description_tags: description_tags.context("description tags")?,
        timecodes: timecodes.context("timecodes")?,
        tweets: tweets.context("tweets")?,
    };

    emit(json, &package, print_package)
}

fn print_package(package: &PublishingPackage) {
    Output::header("Title");
    Output::block(&package.title);

    Output::header("Description");
    Output::block(&package.full_description());

    Output::header("Tags");
    Output::block(&package.tags.value);
    if package.tags.truncated {
        Output::warning("Tag list was truncated to fit the character limit.");
    }

    Output::header("Timecodes");
    Output::block(&package.timecodes);

    Output::header("Tweets");
    for tweet in &package.tweets {
        Output::list_item(tweet);
    }
    println!();
    Output::success("Package ready.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{parse_description_tags, parse_tags};

    #[test]
    fn test_full_description_appends_hashtags() {
        let package = PublishingPackage {
            title: "T".to_string(),
            description: "About the video.".to_string(),
            tags: parse_tags("a, b").unwrap(),
            description_tags: parse_description_tags("#a #b #c").unwrap(),
            timecodes: "00:00 Intro".to_string(),
            tweets: vec![],
        };
        assert_eq!(package.full_description(), "About the video.\n\n#a #b #c");

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["tags"]["value"], "a, b");
        assert_eq!(json["description_tags"]["tags"][2], "#c");
    }
}
