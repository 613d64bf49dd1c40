use clap::{builder::TypedValueParser as _, Parser, Subcommand};
use std::fmt::Write;

use crate::{
    client::{BlogClient, ClientResult, DEFAULT_BASE_URL},
    models::{BlogPage, NewPost, Post, PostUpdate},
};

const EXCERPT_LENGTH: usize = 150;

/// Largest page a server with default settings returns. Larger requests are
/// cut down server-side, which would make the page footer wrong.
pub const MAX_LIST_LIMIT: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "iron-blog")]
#[command(about = "A small blog server backed by a JSON file, and a client for it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// List one page of posts
    #[command(alias = "ls")]
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Posts per page, up to the server's default cap
        #[arg(
            short,
            long,
            default_value_t = 6,
            value_parser = clap::value_parser!(u64).range(1..=MAX_LIST_LIMIT as u64).map(|n| n as usize)
        )]
        limit: usize,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Show a single post
    Show {
        id: String,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Publish a new post
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        #[arg(long)]
        author_id: Option<String>,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Change the title or content of a post
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        id: String,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServerArgs {
    /// Base URL of the blog API
    #[arg(long, env = "BLOG_API_URL", default_value = DEFAULT_BASE_URL)]
    pub server: String,
}

impl ServerArgs {
    fn client(&self) -> BlogClient {
        BlogClient::new(&self.server)
    }
}

/// Runs a client subcommand and returns what should be printed.
/// `Serve` is handled by the binary and yields nothing here.
pub async fn run_client_command(command: Command) -> ClientResult<String> {
    match command {
        Command::Serve => Ok(String::new()),
        Command::List {
            page,
            limit,
            server,
        } => {
            let blogs = server.client().list(page, limit).await?;
            Ok(render_list(&blogs, page, limit))
        }
        Command::Show { id, server } => {
            let post = server.client().get(&id).await?;
            Ok(render_post(&post))
        }
        Command::Create {
            title,
            content,
            author_id,
            server,
        } => {
            let mut new_post = NewPost::new(title, content);
            new_post.author_id = author_id;
            let post = server.client().create(&new_post).await?;
            Ok(format!("Created post {}\n", post.id))
        }
        Command::Edit {
            id,
            title,
            content,
            server,
        } => {
            let post = server
                .client()
                .update(&id, &PostUpdate { title, content })
                .await?;
            Ok(format!("Updated post {}\n", post.id))
        }
        Command::Delete { id, server } => {
            server.client().delete(&id).await?;
            Ok(format!("Deleted post {}\n", id))
        }
    }
}

pub fn render_list(blogs: &BlogPage, page: usize, limit: usize) -> String {
    let mut out = String::new();

    if blogs.blogs.is_empty() {
        out.push_str("No posts.\n");
    }

    for post in &blogs.blogs {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            post.id,
            post.created_at.format("%b %-d, %Y"),
            post.author.email,
            post.title
        );
        let _ = writeln!(out, "    {}", post.preview(EXCERPT_LENGTH).replace('\n', " "));
    }

    let _ = writeln!(
        out,
        "page {} of {} ({} posts)",
        page.max(1),
        blogs.page_count(limit),
        blogs.total
    );
    out
}

pub fn render_post(post: &Post) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(out, "By: {}", post.author.email);
    let _ = writeln!(out, "Published: {}", post.created_at.format("%B %-d, %Y %H:%M"));
    if post.was_edited() {
        let _ = writeln!(out, "Updated: {}", post.updated_at.format("%B %-d, %Y %H:%M"));
    }
    out.push('\n');

    for paragraph in post.content.split('\n') {
        let _ = writeln!(out, "{}", paragraph);
    }
    out
}
