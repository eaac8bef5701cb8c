//! vitrina-admin: storefront catalog admin from the command line.
//! Drives the same resource panels as any other front end; toasts go to
//! stderr and results to stdout as JSON.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use clap::Parser;
use vitrina::config;
use vitrina::infra::telemetry;
use vitrina_api_types::ToggleField;

use args::{Cli, Commands};
use client::{CliError, Ctx};
use handlers::{catalog, contacts, notify, records, session, upload};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = config::load(&cli.config)?;
    telemetry::init(&settings.logging)?;
    let ctx = Ctx::new(settings, cli.command.assume_yes())?;

    match &cli.command {
        Commands::Login => session::login(&ctx).await?,
        Commands::Logout => session::logout(&ctx).await?,
        Commands::Status => session::status(&ctx).await?,
        Commands::Catalog(args) => catalog::handle(&ctx, &args.action).await?,
        Commands::Notify {
            product,
            email,
            phone,
        } => notify::handle(&ctx, product, email, phone).await?,
        Commands::Categories(args) => {
            let mut console = ctx.open_console().await?;
            records::handle(
                &mut console,
                records::categories,
                ToggleField::Active,
                &args.action,
            )
            .await?;
        }
        Commands::Products(args) => {
            let mut console = ctx.open_console().await?;
            records::handle(
                &mut console,
                records::products,
                ToggleField::Active,
                &args.action,
            )
            .await?;
        }
        Commands::Articles(args) => {
            let mut console = ctx.open_console().await?;
            records::handle_deletable(
                &mut console,
                records::articles,
                ToggleField::Published,
                &args.action,
            )
            .await?;
        }
        Commands::Banners(args) => {
            let mut console = ctx.open_console().await?;
            records::handle_deletable(
                &mut console,
                records::banners,
                ToggleField::Active,
                &args.action,
            )
            .await?;
        }
        Commands::Promotions(args) => {
            let mut console = ctx.open_console().await?;
            records::handle_deletable(
                &mut console,
                records::promotions,
                ToggleField::Active,
                &args.action,
            )
            .await?;
        }
        Commands::Contacts(args) => {
            let mut console = ctx.open_console().await?;
            contacts::handle(&mut console, &args.action).await?;
        }
        Commands::Upload { file, folder } => {
            let mut console = ctx.open_console().await?;
            upload::handle(&mut console, file, folder).await?;
        }
    }

    Ok(())
}
