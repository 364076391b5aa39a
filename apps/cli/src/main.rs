use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{HttpTransport, SyncClient};
use shared::{
    domain::{FilterValue, ItemId, ItemPriority, ItemStatus, ListId},
    protocol::ItemPatch,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Synchronized todo lists from the command line")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all lists.
    Lists,
    CreateList {
        title: String,
    },
    RenameList {
        list_id: String,
        title: String,
    },
    DeleteList {
        list_id: String,
    },
    /// Show the items of one list.
    Items {
        list_id: String,
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    AddItem {
        list_id: String,
        title: String,
    },
    UpdateItem {
        list_id: String,
        item_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        #[arg(long, conflicts_with = "clear_start_date")]
        start_date: Option<String>,
        #[arg(long)]
        clear_start_date: bool,
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<String>,
        #[arg(long)]
        clear_deadline: bool,
    },
    DeleteItem {
        list_id: String,
        item_id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for FilterValue {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => FilterValue::All,
            FilterArg::Active => FilterValue::Active,
            FilterArg::Completed => FilterValue::Completed,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    New,
    InProgress,
    Done,
    UnderReview,
}

impl From<StatusArg> for ItemStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::New => ItemStatus::New,
            StatusArg::InProgress => ItemStatus::InProgress,
            StatusArg::Done => ItemStatus::Done,
            StatusArg::UnderReview => ItemStatus::UnderReview,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    Low,
    Middle,
    High,
    Urgent,
    Later,
}

impl From<PriorityArg> for ItemPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => ItemPriority::Low,
            PriorityArg::Middle => ItemPriority::Middle,
            PriorityArg::High => ItemPriority::High,
            PriorityArg::Urgent => ItemPriority::Urgent,
            PriorityArg::Later => ItemPriority::Later,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let transport = Arc::new(
        HttpTransport::new(
            &settings.api_base_url,
            settings.api_key.clone(),
            settings.request_timeout(),
        )
        .context("failed to build http transport")?,
    );
    let client = SyncClient::new_with_identity(transport.clone(), transport);

    let logged_in = client.initialize().await.context("session check failed")?;
    if !logged_in {
        warn!("no authenticated session; the server will likely reject commands");
    }
    client.fetch_lists().await.context("failed to load lists")?;
    info!(base_url = %settings.api_base_url, "lists loaded");

    run(&client, args.command).await?;
    Ok(())
}

async fn run(client: &SyncClient, command: Command) -> Result<()> {
    match command {
        Command::Lists => {
            let snapshot = client.snapshot().await;
            print_json(&snapshot.lists)?;
        }
        Command::CreateList { title } => {
            let list = client.create_list(&title).await?;
            print_json(&list)?;
        }
        Command::RenameList { list_id, title } => {
            let list_id = ListId::new(list_id);
            client.rename_list(&list_id, &title).await?;
            print_json(&client.snapshot().await.list(&list_id))?;
        }
        Command::DeleteList { list_id } => {
            client.delete_list(&ListId::new(list_id)).await?;
            print_json(&client.snapshot().await.lists)?;
        }
        Command::Items { list_id, filter } => {
            let list_id = ListId::new(list_id);
            client.fetch_items(&list_id).await?;
            client.change_filter(&list_id, filter.into()).await;
            let visible: Vec<_> = client
                .read(|state| {
                    state
                        .items()
                        .visible_items(&list_id, filter.into())
                        .into_iter()
                        .cloned()
                        .collect()
                })
                .await;
            print_json(&visible)?;
        }
        Command::AddItem { list_id, title } => {
            let list_id = ListId::new(list_id);
            client.fetch_items(&list_id).await?;
            let item = client.create_item(&list_id, &title).await?;
            print_json(&item)?;
        }
        Command::UpdateItem {
            list_id,
            item_id,
            title,
            description,
            clear_description,
            status,
            priority,
            start_date,
            clear_start_date,
            deadline,
            clear_deadline,
        } => {
            let list_id = ListId::new(list_id);
            let item_id = ItemId::new(item_id);
            let patch = ItemPatch {
                title,
                description: nullable_arg(description, clear_description),
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                start_date: nullable_arg(start_date, clear_start_date),
                deadline: nullable_arg(deadline, clear_deadline),
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field flag");
            }
            client.fetch_items(&list_id).await?;
            client.update_item(&list_id, &item_id, patch).await?;
            let snapshot = client.snapshot().await;
            let updated = snapshot
                .items_for(&list_id)
                .and_then(|items| items.iter().find(|item| item.id == item_id));
            print_json(&updated)?;
        }
        Command::DeleteItem { list_id, item_id } => {
            let list_id = ListId::new(list_id);
            client.fetch_items(&list_id).await?;
            client
                .delete_item(&list_id, &ItemId::new(item_id))
                .await?;
            print_json(&client.snapshot().await.items_for(&list_id))?;
        }
    }
    Ok(())
}

fn nullable_arg(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
