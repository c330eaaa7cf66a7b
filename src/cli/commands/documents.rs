use clap::Subcommand;

use crate::cli::config::load_environment_config;
use crate::cli::utils::output_actions;
use crate::cli::OutputFormat;
use crate::client::{actions, DocumentAction, DocumentDraft};

#[derive(Subcommand)]
pub enum DocumentCommands {
    #[command(about = "List public documents")]
    Public,

    #[command(about = "List documents owned by a user (defaults to you)")]
    Mine {
        #[arg(long, help = "User id")]
        user: Option<i32>,
    },

    #[command(about = "Show one document")]
    Get {
        #[arg(help = "Document id")]
        id: i32,
    },

    #[command(about = "Create a document")]
    Create {
        #[arg(help = "Title")]
        title: String,
        #[arg(long, help = "Content")]
        content: String,
        #[arg(long, default_value = "public", help = "public, private or role")]
        access: String,
    },

    #[command(about = "Update a document you own")]
    Update {
        #[arg(help = "Document id")]
        id: i32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        access: Option<String>,
    },

    #[command(about = "Delete a document")]
    Delete {
        #[arg(help = "Document id")]
        id: i32,
    },

    #[command(about = "Search public documents by title")]
    Search {
        #[arg(help = "Title fragment")]
        title: String,
    },

    #[command(about = "Search your own documents by title")]
    SearchMine {
        #[arg(help = "Title fragment")]
        title: String,
    },
}

pub async fn handle(cmd: DocumentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let env = load_environment_config()?;
    let client = env.authenticated_client()?;
    let mut dispatched: Vec<DocumentAction> = Vec::new();

    match cmd {
        DocumentCommands::Public => {
            actions::get_all_public_documents(&client, &mut dispatched).await;
        }
        DocumentCommands::Mine { user } => {
            let user_id = user
                .or(env.user_id)
                .ok_or_else(|| anyhow::anyhow!("No user id saved; pass --user <id>"))?;
            actions::get_user_documents(&client, user_id, &mut dispatched).await;
        }
        DocumentCommands::Get { id } => {
            actions::get_one_document(&client, id, &mut dispatched).await;
        }
        DocumentCommands::Create { title, content, access } => {
            let draft = DocumentDraft {
                title: Some(title),
                content: Some(content),
                access: Some(access),
            };
            actions::create_user_document(&client, &draft, &mut dispatched).await;
        }
        DocumentCommands::Update { id, title, content, access } => {
            let draft = DocumentDraft { title, content, access };
            actions::update_user_document(&client, id, &draft, &mut dispatched).await;
        }
        DocumentCommands::Delete { id } => {
            actions::delete_user_document(&client, id, &mut dispatched).await;
        }
        DocumentCommands::Search { title } => {
            actions::search_public_documents(&client, &title, &mut dispatched).await;
        }
        DocumentCommands::SearchMine { title } => {
            actions::search_own_documents(&client, &title, &mut dispatched).await;
        }
    }

    output_actions(&output_format, &dispatched)
}
