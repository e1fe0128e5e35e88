//! Story listing and posting through an authenticated session.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Session;
use crate::client::ApiRequest;
use crate::error::Result;

/// Tag attached to a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTag {
    pub name: String,
    pub value: String,
}

impl StoryTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A story to post to a project.
///
/// `audio_content` and `image_content` are object keys of media already
/// uploaded; empty when the story has none.
#[derive(Debug, Clone, Serialize, Builder)]
pub struct NewStory {
    pub proj_id: i64,
    #[builder(into)]
    pub storyteller: String,
    #[builder(into)]
    pub text_content: String,
    pub curator: Option<i64>,
    #[builder(into, default)]
    pub audio_content: String,
    #[builder(into, default)]
    pub image_content: String,
    #[builder(default)]
    pub required_tags: Vec<StoryTag>,
    #[builder(default)]
    pub optional_tags: Vec<StoryTag>,
}

/// A story as listed by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Story {
    pub story_id: i64,
    pub storyteller: String,
    pub project_id: i64,
    pub project_name: String,
    pub curator: Option<String>,
    pub date: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub audio_path: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub tags: Vec<StoryTag>,
}

/// Which stories to list. The backend accepts exactly one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryFilter {
    Org(i64),
    Project(i64),
    Story(i64),
    User(i64),
}

impl StoryFilter {
    fn path(self) -> String {
        let (key, id) = match self {
            Self::Org(id) => ("org_id", id),
            Self::Project(id) => ("project_id", id),
            Self::Story(id) => ("story_id", id),
            Self::User(id) => ("user_id", id),
        };
        format!("/stories/?{key}={id}")
    }
}

#[derive(Debug, Deserialize)]
struct StoryListing {
    stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
struct CreatedStory {
    story_id: i64,
}

/// Typed story operations on top of [`Session::request`].
///
/// Errors are [`crate::error::ClientError::Rejected`]; shared failures have
/// also been reported to the session's error slot.
#[derive(Debug, Clone)]
pub struct Stories {
    session: Session,
}

impl Stories {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// List the stories matching `filter`.
    pub async fn list(&self, filter: StoryFilter) -> Result<Vec<Story>> {
        let data = self
            .session
            .request(ApiRequest::get(filter.path()))
            .await
            .into_result()?;
        let listing: StoryListing = serde_json::from_value(data)?;
        tracing::debug!(?filter, count = listing.stories.len(), "Listed stories");
        Ok(listing.stories)
    }

    /// Post a story and return its id.
    pub async fn create(&self, story: &NewStory) -> Result<i64> {
        let body: Value = serde_json::to_value(story)?;
        let data = self
            .session
            .request(ApiRequest::post("/story/create", body))
            .await
            .into_result()?;
        let created: CreatedStory = serde_json::from_value(data)?;
        tracing::info!(story_id = created.story_id, project = story.proj_id, "Story posted");
        Ok(created.story_id)
    }
}
