//! Command-line surface for `vitrina-admin`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vitrina::config::ConfigOverrides;
use vitrina_api_types::{RecordId, ToggleField};

/// Environment variable holding the admin key. There is deliberately no
/// flag for it so the key stays out of shell history.
pub const ADMIN_KEY_ENV: &str = "VITRINA_ADMIN_KEY";

#[derive(Parser, Debug)]
#[command(
    name = "vitrina-admin",
    version,
    about = "Vitrina storefront admin CLI",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the admin key (from VITRINA_ADMIN_KEY or stdin) and remember it
    Login,
    /// Forget the remembered admin key
    Logout,
    /// Show whether the remembered key is still accepted
    Status,
    /// Catalog categories (deactivate instead of deleting)
    Categories(CategoriesArgs),
    /// Catalog products (deactivate instead of deleting)
    Products(ProductsArgs),
    /// Blog articles
    Articles(ArticlesArgs),
    /// Home page banners
    Banners(BannersArgs),
    /// Promotions
    Promotions(PromotionsArgs),
    /// Contact details and company requisites
    Contacts(ContactsArgs),
    /// Upload an image and print its hosted URL
    Upload {
        file: PathBuf,
        #[arg(long)]
        folder: String,
    },
    /// Public catalog reads (no admin key needed)
    Catalog(CatalogArgs),
    /// Ask to be told when an out-of-stock product is back
    Notify {
        #[arg(long)]
        product: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
}

impl Commands {
    /// Whether destructive confirmations were pre-approved on the command
    /// line.
    pub fn assume_yes(&self) -> bool {
        let action = match self {
            Commands::Articles(args) => &args.action,
            Commands::Banners(args) => &args.action,
            Commands::Promotions(args) => &args.action,
            _ => return false,
        };
        matches!(action, DeletableCmd::Delete { yes: true, .. })
    }
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: RecordCmd,
}

#[derive(Parser, Debug)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub action: RecordCmd,
}

#[derive(Parser, Debug)]
pub struct ArticlesArgs {
    #[command(subcommand)]
    pub action: DeletableCmd,
}

#[derive(Parser, Debug)]
pub struct BannersArgs {
    #[command(subcommand)]
    pub action: DeletableCmd,
}

#[derive(Parser, Debug)]
pub struct PromotionsArgs {
    #[command(subcommand)]
    pub action: DeletableCmd,
}

/// Draft fields as a JSON object, plus an optional image to attach.
#[derive(Args, Debug, Default, Clone)]
pub struct DraftInput {
    /// Inline JSON object of draft fields
    #[arg(long, conflicts_with = "data_file")]
    pub data: Option<String>,
    /// Path to a JSON object of draft fields
    #[arg(long)]
    pub data_file: Option<PathBuf>,
    /// Image to upload into the record's image slot
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum RecordCmd {
    /// List records as the server currently has them
    List,
    /// Create a record from the create-mode defaults plus the given fields
    Create {
        #[command(flatten)]
        input: DraftInput,
    },
    /// Load a record into the editor, apply the given fields, save it
    Update {
        #[arg(long)]
        id: RecordId,
        #[command(flatten)]
        input: DraftInput,
    },
    /// Flip one boolean flag
    Toggle {
        #[arg(long)]
        id: RecordId,
        /// Defaults to the kind's visibility flag
        #[arg(long, value_enum)]
        field: Option<FlagArg>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DeletableCmd {
    #[command(flatten)]
    Record(RecordCmd),
    /// Delete a record after confirmation
    Delete {
        #[arg(long)]
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlagArg {
    Active,
    Published,
    InStock,
}

impl From<FlagArg> for ToggleField {
    fn from(value: FlagArg) -> Self {
        match value {
            FlagArg::Active => ToggleField::Active,
            FlagArg::Published => ToggleField::Published,
            FlagArg::InStock => ToggleField::InStock,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub action: ContactsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ContactsCmd {
    /// Show the stored contact settings, grouped as in the form
    Show,
    /// Change one setting and save
    Set { key: String, value: String },
}

#[derive(Parser, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub action: CatalogCmd,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCmd {
    /// Active categories
    Categories,
    /// Active products
    Products {
        /// Category slug
        #[arg(long)]
        category: Option<String>,
        /// Name search
        #[arg(long)]
        search: Option<String>,
    },
    /// Published articles
    Articles,
    /// One article by id
    Article {
        #[arg(long)]
        id: RecordId,
    },
    /// Active banners
    Banners,
    /// Public contact settings
    Contacts,
    /// Price a cart built from product ids (repeat an id to add it again)
    Quote {
        #[arg(required = true)]
        ids: Vec<RecordId>,
    },
}
