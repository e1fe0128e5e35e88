//! CLI handlers for listing and posting stories.

use crate::auth::Session;
use crate::stories::{NewStory, Stories, StoryFilter, StoryTag};

use super::api::render_current_error;
use super::{ListStoriesArgs, PostStoryArgs};

/// Handle `commonthread stories list`.
pub async fn handle_list(
    session: &Session,
    args: &ListStoriesArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match (args.org, args.project, args.story, args.user) {
        (Some(id), _, _, _) => StoryFilter::Org(id),
        (_, Some(id), _, _) => StoryFilter::Project(id),
        (_, _, Some(id), _) => StoryFilter::Story(id),
        (_, _, _, Some(id)) => StoryFilter::User(id),
        _ => return Err("one of --org, --project, --story or --user is required".into()),
    };

    let stories = Stories::new(session.clone())
        .list(filter)
        .await
        .map_err(|e| {
            render_current_error(session.errors());
            e
        })?;
    if stories.is_empty() {
        println!("No stories");
    }
    for story in stories {
        println!(
            "#{} {} ({}, {})",
            story.story_id, story.storyteller, story.project_name, story.date
        );
        if let Some(summary) = story.summary.filter(|s| !s.is_empty()) {
            println!("    {summary}");
        }
    }
    Ok(())
}

/// Handle `commonthread stories post`.
pub async fn handle_post(
    session: &Session,
    args: &PostStoryArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let tags = args
        .tags
        .iter()
        .map(|raw| parse_tag(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let story = NewStory::builder()
        .proj_id(args.project_id)
        .storyteller(args.storyteller.as_str())
        .text_content(args.text.as_str())
        .maybe_curator(args.curator)
        .optional_tags(tags)
        .build();

    let story_id = Stories::new(session.clone())
        .create(&story)
        .await
        .map_err(|e| {
            render_current_error(session.errors());
            e
        })?;
    println!("✅ Posted story #{story_id}");
    Ok(())
}

fn parse_tag(raw: &str) -> Result<StoryTag, String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok(StoryTag::new(name.trim(), value.trim())),
        _ => Err(format!("tag must look like NAME=VALUE, got {raw:?}")),
    }
}
