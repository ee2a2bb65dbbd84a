use clap::{Parser, Subcommand, ValueEnum};
use sqlx::sqlite::SqlitePoolOptions;

use special_announcements::{
    auth::{generate_token, hash_token, provide_permissions, Permission},
    config::Settings,
    repository::{EditorRepository, SqliteEditorRepository},
};

/// Manage editors of special announcements.
#[derive(Parser)]
#[command(name = "editor", version)]
struct Cli {
    /// Database URL; falls back to DATABASE_URL, then the configured one.
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an editor and print its bearer token.
    Create {
        #[arg(long)]
        name: String,
        /// Permission to grant; repeat for several.
        #[arg(long = "grant", value_enum, required = true)]
        grants: Vec<Grant>,
    },
    /// List the permissions that can be granted.
    Permissions,
}

#[derive(Clone, Copy, ValueEnum)]
enum Grant {
    Edit,
    Delete,
    Create,
    All,
}

fn expand(grants: &[Grant]) -> Vec<Permission> {
    let mut permissions = Vec::new();
    for grant in grants {
        let granted: &[Permission] = match grant {
            Grant::Edit => &[Permission::Edit],
            Grant::Delete => &[Permission::Delete],
            Grant::Create => &[Permission::Create],
            Grant::All => &Permission::ALL,
        };
        for permission in granted {
            if !permissions.contains(permission) {
                permissions.push(*permission);
            }
        }
    }
    permissions
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Permissions => {
            for info in provide_permissions() {
                println!("{:<28} {} ({})", info.code, info.name, info.category);
            }
        }
        Command::Create { name, grants } => {
            let database_url = cli
                .database_url
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .unwrap_or_else(|| Settings::new().unwrap_or_default().database.url);

            let db_pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&database_url)
                .await?;

            sqlx::migrate!("./migrations")
                .run(&db_pool)
                .await?;

            let permissions = expand(&grants);
            let token = generate_token();
            let editor = SqliteEditorRepository::new(db_pool)
                .create(&name, &hash_token(&token), &permissions)
                .await?;

            println!("Created editor {} ({})", editor.name, editor.id);
            for permission in &permissions {
                println!("  granted {}", permission.code());
            }
            println!();
            println!("Bearer token (shown once): {}", token);
        }
    }

    Ok(())
}
