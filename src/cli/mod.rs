//! CLI entry point for the CommonThread client.

pub mod api;
pub mod auth;
pub mod stories;

use clap::{ArgGroup, Parser, Subcommand};

/// CommonThread CLI
#[derive(Parser, Debug)]
#[command(name = "commonthread", version, about = "CommonThread storytelling API client")]
pub struct Cli {
    /// Credential profile to use
    #[arg(long, global = true, default_value = "default")]
    pub profile: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the issued tokens
    Login(LoginArgs),
    /// Create an account
    Signup(SignupArgs),
    /// Forget stored tokens
    Logout,
    /// Show whether tokens are stored
    Status,
    /// Send an authenticated request
    Request(RequestArgs),
    /// Chat with a project's assistant
    Chat(ChatArgs),
    /// List or post stories
    #[command(subcommand)]
    Stories(StoriesCommand),
}

/// Arguments for `commonthread login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `commonthread signup`.
#[derive(Parser, Debug)]
pub struct SignupArgs {
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub city: Option<String>,
}

/// Arguments for `commonthread request`.
#[derive(Parser, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE, ...)
    pub method: String,

    /// Server-relative path, e.g. /stories/
    pub path: String,

    /// JSON body for non-GET requests
    #[arg(short, long)]
    pub body: Option<String>,
}

/// Arguments for `commonthread chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    pub project_id: String,

    pub message: String,
}

/// `commonthread stories` subcommands.
#[derive(Subcommand, Debug)]
pub enum StoriesCommand {
    /// List stories by exactly one of org, project, story or user
    List(ListStoriesArgs),
    /// Post a story to a project
    Post(PostStoryArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("filter").required(true).args(["org", "project", "story", "user"])))]
pub struct ListStoriesArgs {
    #[arg(long)]
    pub org: Option<i64>,

    #[arg(long)]
    pub project: Option<i64>,

    #[arg(long)]
    pub story: Option<i64>,

    #[arg(long)]
    pub user: Option<i64>,
}

#[derive(Parser, Debug)]
pub struct PostStoryArgs {
    pub project_id: i64,

    pub storyteller: String,

    /// Story text
    pub text: String,

    /// Curator user id
    #[arg(long)]
    pub curator: Option<i64>,

    /// Tag as NAME=VALUE; repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_login_with_password() {
        let cli = Cli::try_parse_from(["commonthread", "login", "ada", "-p", "pw"]).unwrap();
        assert_eq!(cli.profile, "default");
        match cli.command {
            Commands::Login(args) => {
                assert_eq!(args.username, "ada");
                assert_eq!(args.password.as_deref(), Some("pw"));
            }
            other => panic!("expected Login, got {other:?}"),
        }
    }

    #[test]
    fn parse_request_with_body_and_profile() {
        let cli = Cli::try_parse_from([
            "commonthread",
            "--profile",
            "staff",
            "request",
            "POST",
            "/story/create",
            "--body",
            "{\"title\":\"x\"}",
        ])
        .unwrap();
        assert_eq!(cli.profile, "staff");
        match cli.command {
            Commands::Request(args) => {
                assert_eq!(args.method, "POST");
                assert_eq!(args.path, "/story/create");
                assert_eq!(args.body.as_deref(), Some("{\"title\":\"x\"}"));
            }
            other => panic!("expected Request, got {other:?}"),
        }
    }

    #[test]
    fn parse_chat() {
        let cli = Cli::try_parse_from(["commonthread", "chat", "42", "hello"]).unwrap();
        match cli.command {
            Commands::Chat(args) => {
                assert_eq!(args.project_id, "42");
                assert_eq!(args.message, "hello");
            }
            other => panic!("expected Chat, got {other:?}"),
        }
    }

    #[test]
    fn parse_status_and_logout() {
        let cli = Cli::try_parse_from(["commonthread", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
        let cli = Cli::try_parse_from(["commonthread", "logout"]).unwrap();
        assert!(matches!(cli.command, Commands::Logout));
    }

    #[test]
    fn chat_requires_message() {
        assert!(Cli::try_parse_from(["commonthread", "chat", "42"]).is_err());
    }

    #[test]
    fn stories_list_needs_exactly_one_filter() {
        let cli = Cli::try_parse_from(["commonthread", "stories", "list", "--org", "5"]).unwrap();
        match cli.command {
            Commands::Stories(StoriesCommand::List(args)) => assert_eq!(args.org, Some(5)),
            other => panic!("expected stories list, got {other:?}"),
        }
        assert!(Cli::try_parse_from(["commonthread", "stories", "list"]).is_err());
        assert!(Cli::try_parse_from([
            "commonthread", "stories", "list", "--org", "5", "--user", "2"
        ])
        .is_err());
    }

    #[test]
    fn parse_stories_post_with_tags() {
        let cli = Cli::try_parse_from([
            "commonthread",
            "stories",
            "post",
            "4",
            "Sam",
            "We walked to the mill.",
            "--tag",
            "Place=Mill",
            "--tag",
            "Era=1960s",
        ])
        .unwrap();
        match cli.command {
            Commands::Stories(StoriesCommand::Post(args)) => {
                assert_eq!(args.project_id, 4);
                assert_eq!(args.tags, vec!["Place=Mill", "Era=1960s"]);
            }
            other => panic!("expected stories post, got {other:?}"),
        }
    }

    #[test]
    fn parse_signup() {
        let cli = Cli::try_parse_from([
            "commonthread", "signup", "ada", "-p", "pw", "--email", "ada@example.org",
        ])
        .unwrap();
        match cli.command {
            Commands::Signup(args) => {
                assert_eq!(args.username, "ada");
                assert_eq!(args.email.as_deref(), Some("ada@example.org"));
            }
            other => panic!("expected Signup, got {other:?}"),
        }
    }
}
