//! CLI entry point for mdblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdblog::commands;
use mdblog::Blog;

#[derive(Parser)]
#[command(name = "mdblog")]
#[command(version)]
#[command(about = "A small markdown blog with highlighted, copyable code blocks", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name without extension (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        #[arg(short, long)]
        author: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Export static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Disable file watching and live reload
        #[arg(long)]
        r#static: bool,
    },

    /// List posts or the home page listing
    List {
        /// What to list (post, listing)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Report listing entries that point to missing posts
    Check,

    /// Delete the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "mdblog=debug,info"
    } else {
        "mdblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            author,
            description,
        } => {
            let blog = Blog::new(&base_dir)?;
            let path = commands::new::create_post(
                &blog,
                &commands::new::NewPost {
                    title: &title,
                    slug: slug.as_deref(),
                    author: author.as_deref(),
                    description: description.as_deref(),
                },
            )?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            let report = commands::generate::run(&blog)?;
            println!(
                "Generated {} posts into {:?}",
                report.posts, blog.public_dir
            );

            if watch {
                commands::generate::watch(&blog).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdblog::server::start(&blog, &ip, port, !r#static, open).await?;
        }

        Commands::List { r#type, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::list::run(&blog, &r#type, json)?;
        }

        Commands::Check => {
            let blog = Blog::new(&base_dir)?;
            commands::check::run(&blog)?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("mdblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
