//! swap-cli - command-line client for the Swap marketplace HTTP API
//!
//! # Subcommands
//! - `store`                       - list every item with categories and total
//! - `item <id>`                   - show one item
//! - `view <id> [--user <user>]`   - record a view and show the item
//! - `categories`                  - list distinct categories
//! - `category <text>`             - items whose category contains the text
//! - `views`                       - full view history
//! - `reset`                       - wipe all data and reseed the sample catalog
//! - `status`                      - show server health
//!
//! Every subcommand accepts `--json` to print the raw response body.

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use swap_core::api::{
    CategoriesResponse, ErrorResponse, ItemResponse, ItemViewRequest, ItemViewsResponse,
    ItemsByCategoryResponse, MessageResponse, StorePageResponse,
};
use swap_core::{Item, ItemView};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "swap-cli", version, about = "Swap marketplace command-line client")]
struct Cli {
    /// Swap HTTP server URL (overrides SWAP_HTTP_URL env var)
    #[arg(long, env = "SWAP_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Print the raw JSON response instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every item in the store
    Store,

    /// Show a single item
    Item {
        /// Item id, e.g. item_1
        id: String,
    },

    /// Record a view of an item and show it
    View {
        /// Item id, e.g. item_1
        id: String,

        /// Viewer id (anonymous when omitted)
        #[arg(long)]
        user: Option<String>,
    },

    /// List the distinct item categories
    Categories,

    /// List items whose category contains the given text (case-insensitive)
    Category {
        /// Category text to match
        name: String,
    },

    /// Show the full item view history
    Views,

    /// Delete all items and views, then reseed the sample catalog
    Reset,

    /// Show Swap server status
    Status,
}

// ============================================================================
// Text formatting
// ============================================================================

/// One-line summary: `item_1  $1200.00  MacBook Pro 13-inch  [Electronics, good]`
pub fn format_item_line(item: &Item) -> String {
    format!(
        "{:<8}  ${:>8.2}  {}  [{}, {}]",
        item.id, item.price, item.title, item.category, item.condition
    )
}

pub fn format_item_details(item: &Item) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", item.title, item.id));
    out.push_str(&format!("Price:     ${:.2}\n", item.price));
    out.push_str(&format!("Category:  {}\n", item.category));
    out.push_str(&format!("Condition: {}\n", item.condition));
    out.push_str(&format!("Seller:    {} ({})\n", item.seller_name, item.seller_id));
    if !item.tags.is_empty() {
        out.push_str(&format!("Tags:      {}\n", item.tags.join(", ")));
    }
    out.push_str(&format!("Distance:  {}\n", item.distance));
    for url in &item.images {
        out.push_str(&format!("Image:     {}\n", url));
    }
    out.push('\n');
    out.push_str(&item.description);
    out
}

pub fn format_view_line(view: &ItemView) -> String {
    format!(
        "#{:<5} {}  {}  {}",
        view.id,
        view.timestamp.to_rfc3339(),
        view.item_id,
        view.user_id.as_deref().unwrap_or("anonymous")
    )
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

struct Client {
    server: String,
    http: reqwest::blocking::Client,
}

impl Client {
    fn new(server: &str) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Server URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.server)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid server URL: {}", self.server))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send the request and return the JSON body, turning non-2xx responses
    /// into errors carrying the server's message.
    fn send(&self, req: reqwest::blocking::RequestBuilder) -> anyhow::Result<serde_json::Value> {
        let resp = req.send().map_err(|e| anyhow::anyhow!("connection failed: {}", e))?;
        let status = resp.status();
        let text = resp.text().unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            anyhow::bail!("server returned {}: {}", status, message);
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn get(&self, segments: &[&str]) -> anyhow::Result<serde_json::Value> {
        self.send(self.http.get(self.url(segments)?))
    }
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> anyhow::Result<T> {
    serde_json::from_value(body).map_err(|e| anyhow::anyhow!("failed to parse response: {}", e))
}

fn print_json(body: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let client = Client::new(&cli.server)?;

    let body = match &cli.command {
        Commands::Store => client.get(&["api", "store"])?,
        Commands::Item { id } => client.get(&["api", "item", id.as_str()])?,
        Commands::View { id, user } => {
            let req = ItemViewRequest {
                item_id: id.clone(),
                user_id: user.clone(),
            };
            client.send(client.http.post(client.url(&["api", "item", "view"])?).json(&req))?
        }
        Commands::Categories => client.get(&["api", "categories"])?,
        Commands::Category { name } => client.get(&["api", "items", "category", name.as_str()])?,
        Commands::Views => client.get(&["api", "item-views"])?,
        Commands::Reset => client.send(client.http.delete(client.url(&["api", "reset"])?))?,
        Commands::Status => client.get(&["health"])?,
    };

    if cli.json {
        return print_json(&body);
    }

    match cli.command {
        Commands::Store => {
            let page: StorePageResponse = decode(body)?;
            println!("{} items in {} categories\n", page.total_items, page.categories.len());
            for item in &page.items {
                println!("{}", format_item_line(item));
            }
        }
        Commands::Item { .. } | Commands::View { .. } => {
            let resp: ItemResponse = decode(body)?;
            eprintln!("{}", resp.message);
            if let Some(item) = resp.item {
                println!("{}", format_item_details(&item));
            }
        }
        Commands::Categories => {
            let resp: CategoriesResponse = decode(body)?;
            for c in resp.categories {
                println!("{}", c);
            }
        }
        Commands::Category { name } => {
            let resp: ItemsByCategoryResponse = decode(body)?;
            if resp.items.is_empty() {
                eprintln!("No items found for category: {}", name);
            }
            for item in &resp.items {
                println!("{}", format_item_line(item));
            }
        }
        Commands::Views => {
            let resp: ItemViewsResponse = decode(body)?;
            println!("{} views\n", resp.total);
            for view in &resp.views {
                println!("{}", format_view_line(view));
            }
        }
        Commands::Reset => {
            let resp: MessageResponse = decode(body)?;
            println!("{}", resp.message);
        }
        Commands::Status => {
            println!("Swap server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:     {}", body["version"].as_str().unwrap_or("?"));
            println!("Database:    {}", body["database"].as_str().unwrap_or("?"));
            println!("Items:       {}", body["items"]);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("swap-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
