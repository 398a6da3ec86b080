use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cardspace_cli::cache::SpaceCache;
use cardspace_cli::models::{
    CardUpdate, NewCard, NewContent, NewSpace, NewUser, Space, SpaceUpdate, UserUpdate,
    random_space_color,
};
use cardspace_cli::{ApiClient, DEFAULT_API_URL, render};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cardspace",
    about = "Build digital business cards and organize portfolio spaces",
    version
)]
struct Cli {
    /// Base URL of the CardSpace API
    #[arg(long, env = "CARDSPACE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Space cache file (defaults to the platform cache directory)
    #[arg(long, env = "CARDSPACE_CACHE", global = true)]
    cache: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user profiles
    #[command(subcommand)]
    User(UserCommand),

    /// List the available card styles
    Styles,

    /// Create and manage business cards
    #[command(subcommand)]
    Card(CardCommand),

    /// Browse and organize spaces
    #[command(subcommand)]
    Space(SpaceCommand),

    /// Add, view and remove items inside a space
    #[command(subcommand)]
    Content(ContentCommand),

    /// Show a user's profile, cards and top-level spaces
    Portfolio { user_id: i32 },

    /// Forget every cached space
    ClearCache,
}

#[derive(Subcommand)]
enum UserCommand {
    /// List every user
    List,
    /// Show a user by id
    Show { id: i32 },
    /// Look a user up by email
    Find { email: String },
    /// Create a user
    Create(NewUserArgs),
    /// Change profile fields
    Update {
        id: i32,
        #[command(flatten)]
        fields: UserUpdateArgs,
    },
}

#[derive(Args)]
struct NewUserArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    job_title: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    twitter: Option<String>,
}

impl From<NewUserArgs> for NewUser {
    fn from(args: NewUserArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            job_title: args.job_title,
            company: args.company,
            website: args.website,
            linkedin: args.linkedin,
            twitter: args.twitter,
        }
    }
}

#[derive(Args)]
struct UserUpdateArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    job_title: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    twitter: Option<String>,
}

impl From<UserUpdateArgs> for UserUpdate {
    fn from(args: UserUpdateArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            job_title: args.job_title,
            company: args.company,
            website: args.website,
            linkedin: args.linkedin,
            twitter: args.twitter,
        }
    }
}

#[derive(Subcommand)]
enum CardCommand {
    /// Generate a card for a user, looked up by id or email
    Create {
        #[arg(long, required_unless_present = "email", conflicts_with = "email")]
        user: Option<i32>,
        #[arg(long)]
        email: Option<String>,
        /// Style name (modern, gradient, minimal)
        #[arg(long)]
        style: Option<String>,
        /// Card contents as a JSON object
        #[arg(long, value_parser = parse_json)]
        data: Value,
        #[arg(long)]
        qr: Option<String>,
    },
    /// Show one card
    Show { card_id: String },
    /// List a user's cards, newest first
    List { user_id: i32 },
    /// Change a card's style, contents or QR link
    Update {
        card_id: String,
        #[arg(long)]
        style: Option<String>,
        #[arg(long, value_parser = parse_json)]
        data: Option<Value>,
        #[arg(long)]
        qr: Option<String>,
    },
    /// Delete a card
    Delete { card_id: String },
}

#[derive(Subcommand)]
enum SpaceCommand {
    /// List top-level spaces, optionally only one user's
    List {
        #[arg(long)]
        user: Option<i32>,
        /// Include nested spaces (requires --user)
        #[arg(long, requires = "user")]
        all: bool,
    },
    /// Show a space with its sub-spaces and content.
    ///
    /// SPACE is a slug (`portfolio`), a nested slug (`work/projects`) or a
    /// space id.
    Show { space: String },
    /// Create a space, optionally nested under another
    Create {
        #[arg(long)]
        user: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Hex color; a random palette color when omitted
        #[arg(long)]
        color: Option<String>,
        /// Parent space (slug or id)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename or restyle a space
    Update {
        space: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a space and everything under it
    Delete { space: String },
    /// Write spaces to a JSON file
    Export {
        #[arg(long)]
        user: Option<i32>,
        #[arg(short, long, default_value = "my-spaces.json")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ContentCommand {
    /// List the active items of a space
    List { space: String },
    /// Add a text note
    Note { space: String, text: String },
    /// Add a link
    Link { space: String, url: String },
    /// Upload a file
    Upload {
        space: String,
        path: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show one item, previewing uploads
    Show {
        space: String,
        content_id: String,
        /// Save an upload's bytes to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Hide an item, or remove it for good with --permanent
    Delete {
        space: String,
        content_id: String,
        #[arg(long)]
        permanent: bool,
    },
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("CARDSPACE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_cache(path: Option<PathBuf>) -> Result<SpaceCache> {
    let path = path
        .or_else(SpaceCache::default_path)
        .unwrap_or_else(|| std::env::temp_dir().join("cardspace-spaces.json"));
    debug!(path = %path.display(), "Opening space cache");
    SpaceCache::open(&path).with_context(|| format!("failed to open {}", path.display()))
}

/// Find a space from `slug`, `parent/child` or a raw id.
fn resolve_space(client: &ApiClient, cache: &mut SpaceCache, reference: &str) -> Result<Space> {
    let (parent, slug) = match reference.split_once('/') {
        Some((parent, child)) => (Some(parent), child),
        None => (None, reference),
    };
    match cache.resolve(&client.spaces(), parent, slug)? {
        Some(space) => Ok(space),
        None => bail!("Space not found: {reference}"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let client = ApiClient::new(&cli.api_url)?;
    let mut cache = open_cache(cli.cache)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::User(command) => run_user(&client, &mut out, command)?,
        Commands::Styles => {
            for style in client.cards().styles()? {
                render::style(&mut out, &style)?;
            }
        }
        Commands::Card(command) => run_card(&client, &mut out, command)?,
        Commands::Space(command) => run_space(&client, &mut cache, &mut out, command)?,
        Commands::Content(command) => run_content(&client, &mut cache, &mut out, command)?,
        Commands::Portfolio { user_id } => portfolio(&client, &mut cache, &mut out, user_id)?,
        Commands::ClearCache => {
            cache.clear();
            writeln!(out, "Cleared {}", cache.path().display())?;
        }
    }

    cache.save().context("failed to write space cache")?;
    Ok(())
}

fn run_user(client: &ApiClient, out: &mut impl Write, command: UserCommand) -> Result<()> {
    let users = client.users();
    match command {
        UserCommand::List => {
            for user in users.list()? {
                render::user(out, &user)?;
            }
        }
        UserCommand::Show { id } => match users.get(id)? {
            Some(user) => render::user(out, &user)?,
            None => bail!("User not found: {id}"),
        },
        UserCommand::Find { email } => match users.by_email(&email)? {
            Some(user) => render::user(out, &user)?,
            None => bail!("User not found: {email}"),
        },
        UserCommand::Create(args) => {
            let user = users.create(&args.into())?;
            info!(user_id = user.id, "Created user");
            render::user(out, &user)?;
        }
        UserCommand::Update { id, fields } => {
            let user = users.update(id, &fields.into())?;
            render::user(out, &user)?;
        }
    }
    Ok(())
}

fn run_card(client: &ApiClient, out: &mut impl Write, command: CardCommand) -> Result<()> {
    let cards = client.cards();
    match command {
        CardCommand::Create {
            user,
            email,
            style,
            data,
            qr,
        } => {
            let user_id = match (user, email) {
                (Some(id), _) => id,
                (None, Some(email)) => match client.users().by_email(&email)? {
                    Some(user) => user.id,
                    None => bail!("No user with email {email}; create one first"),
                },
                (None, None) => bail!("Pass --user or --email"),
            };
            if let Some(name) = &style {
                if cards.style(name)?.is_none() {
                    bail!("Card style not found: {name}");
                }
            }
            let card = cards.create(&NewCard {
                user_id,
                card_style: style,
                card_data: data,
                qr_code_url: qr,
            })?;
            info!(card_id = %card.card_id, "Created card");
            render::card(out, &card)?;
        }
        CardCommand::Show { card_id } => match cards.get(&card_id)? {
            Some(card) => render::card(out, &card)?,
            None => bail!("Card not found: {card_id}"),
        },
        CardCommand::List { user_id } => {
            for card in cards.by_user(user_id)? {
                render::card(out, &card)?;
            }
        }
        CardCommand::Update {
            card_id,
            style,
            data,
            qr,
        } => {
            let card = cards.update(
                &card_id,
                &CardUpdate {
                    card_style: style,
                    card_data: data,
                    qr_code_url: qr,
                },
            )?;
            render::card(out, &card)?;
        }
        CardCommand::Delete { card_id } => {
            let receipt = cards.delete(&card_id)?;
            writeln!(out, "{}", receipt.message)?;
        }
    }
    Ok(())
}

fn run_space(
    client: &ApiClient,
    cache: &mut SpaceCache,
    out: &mut impl Write,
    command: SpaceCommand,
) -> Result<()> {
    let spaces = client.spaces();
    match command {
        SpaceCommand::List { user, all } => {
            let listed = match (user, all) {
                (None, _) => spaces.root()?,
                (Some(user_id), false) => spaces.user_root(user_id)?,
                (Some(user_id), true) => spaces.by_user(user_id)?,
            };
            for space in &listed {
                if !space.is_child_space {
                    cache.remember(space, None);
                }
                render::space(out, space)?;
            }
        }
        SpaceCommand::Show { space } => {
            let space = resolve_space(client, cache, &space)?;
            render::space(out, &space)?;

            let children = spaces.children(&space.space_id)?;
            if !children.is_empty() {
                writeln!(out, "\nSub-spaces:")?;
                for child in &children {
                    cache.remember(child, Some(&space));
                    render::space(out, child)?;
                }
            }

            let items = spaces.content(&space.space_id)?;
            writeln!(out, "\nContent ({}):", items.len())?;
            for item in &items {
                render::content(out, item)?;
            }
        }
        SpaceCommand::Create {
            user,
            name,
            description,
            color,
            parent,
        } => {
            let parent = parent
                .map(|reference| resolve_space(client, cache, &reference))
                .transpose()?;
            let created = spaces.create(&NewSpace {
                name,
                user_id: user,
                description,
                color: Some(color.unwrap_or_else(|| random_space_color().to_string())),
                parent_id: parent.as_ref().map(|p| p.space_id.clone()),
            })?;
            info!(space_id = %created.space_id, "Created space");
            cache.remember(&created, parent.as_ref());
            render::space(out, &created)?;
        }
        SpaceCommand::Update {
            space,
            name,
            description,
            color,
        } => {
            let target = resolve_space(client, cache, &space)?;
            let updated = spaces.update(
                &target.space_id,
                &SpaceUpdate {
                    name,
                    description,
                    color,
                },
            )?;
            cache.forget(&updated.space_id);
            render::space(out, &updated)?;
        }
        SpaceCommand::Delete { space } => {
            let target = resolve_space(client, cache, &space)?;
            let receipt = spaces.delete(&target.space_id)?;
            cache.forget_tree(&target);
            writeln!(out, "{}", receipt.message)?;
        }
        SpaceCommand::Export { user, output } => {
            let listed = match user {
                Some(user_id) => spaces.by_user(user_id)?,
                None => spaces.root()?,
            };
            let json = serde_json::to_string_pretty(&listed)?;
            fs::write(&output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;
            writeln!(out, "Exported {} spaces to {}", listed.len(), output.display())?;
        }
    }
    Ok(())
}

fn run_content(
    client: &ApiClient,
    cache: &mut SpaceCache,
    out: &mut impl Write,
    command: ContentCommand,
) -> Result<()> {
    let spaces = client.spaces();
    match command {
        ContentCommand::List { space } => {
            let space = resolve_space(client, cache, &space)?;
            for item in spaces.content(&space.space_id)? {
                render::content(out, &item)?;
            }
        }
        ContentCommand::Note { space, text } => {
            let space = resolve_space(client, cache, &space)?;
            let added = spaces.add_content(&space.space_id, &NewContent::note(&text))?;
            writeln!(out, "notes content added: {}", added.content_id)?;
        }
        ContentCommand::Link { space, url } => {
            let space = resolve_space(client, cache, &space)?;
            let added = spaces.add_content(&space.space_id, &NewContent::link(&url))?;
            writeln!(out, "url content added: {}", added.content_id)?;
        }
        ContentCommand::Upload {
            space,
            path,
            description,
        } => {
            let space = resolve_space(client, cache, &space)?;
            let upload = NewContent::upload_file(&path, description.as_deref())
                .with_context(|| format!("cannot upload {}", path.display()))?;
            let added = spaces.add_content(&space.space_id, &upload)?;
            writeln!(out, "upload content added: {}", added.content_id)?;
        }
        ContentCommand::Show {
            space,
            content_id,
            output,
        } => {
            let space = resolve_space(client, cache, &space)?;
            let Some(item) = spaces.full_content(&space.space_id, &content_id)? else {
                bail!("Content not found: {content_id}");
            };
            render::preview(out, &item)?;
            if let Some(path) = output {
                let bytes = render::upload_bytes(&item)?;
                fs::write(&path, &bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                writeln!(out, "Saved {} bytes to {}", bytes.len(), path.display())?;
            }
        }
        ContentCommand::Delete {
            space,
            content_id,
            permanent,
        } => {
            let space = resolve_space(client, cache, &space)?;
            let message = if permanent {
                spaces.delete_content(&space.space_id, &content_id)?.message
            } else {
                spaces.soft_delete_content(&space.space_id, &content_id)?.message
            };
            writeln!(out, "{message}")?;
        }
    }
    Ok(())
}

fn portfolio(
    client: &ApiClient,
    cache: &mut SpaceCache,
    out: &mut impl Write,
    user_id: i32,
) -> Result<()> {
    let Some(user) = client.users().get(user_id)? else {
        bail!("User not found: {user_id}");
    };
    render::user(out, &user)?;

    let cards = client.cards().by_user(user_id)?;
    writeln!(out, "\nCards ({}):", cards.len())?;
    for card in &cards {
        render::card(out, card)?;
    }

    let spaces = client.spaces().user_root(user_id)?;
    writeln!(out, "\nSpaces ({}):", spaces.len())?;
    for space in &spaces {
        cache.remember(space, None);
        render::space(out, space)?;
    }
    Ok(())
}
