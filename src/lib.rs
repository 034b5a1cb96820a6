pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FormMode};
pub use config::Config;
use repositories::HttpUserRepository;
use store::UserStore;

/// Installs the global subscriber. Logs go to stderr so page output on
/// stdout stays clean; `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &config::GeneralConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr);

    if config.log_format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if config.override_base_url(cli.api_url.as_deref()) {
        debug!("Using API base URL from --api-url");
    }
}

/// Validates the API settings and wires the HTTP repository into a store.
fn connect(config: &Config) -> anyhow::Result<UserStore> {
    config.validate()?;

    let repository = HttpUserRepository::new(&config.api)
        .context("Failed to set up the users API client")?;
    info!(base_url = %repository.base_url(), "Using users API");

    Ok(UserStore::new(Arc::new(repository)))
}

pub async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    apply_cli_overrides(&mut config, &cli);

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    let default_page = config.pagination.resolve(None, None);

    // home and init must work without a usable [api] section
    match cli.command.unwrap_or(Commands::Home) {
        Commands::Home => cli::render_home(&mut out)?,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                writeln!(out, "✓ Config file created. Edit config.toml and run again.")?;
            } else {
                writeln!(out, "config.toml already exists, leaving it untouched.")?;
            }
        }

        Commands::List { skip, limit } => {
            let mut store = connect(&config)?;
            let pagination = config.pagination.resolve(skip, limit);
            debug!(skip = pagination.skip, limit = pagination.limit, "Listing users");
            cli::cmd_list_users(&mut store, pagination, &mut out).await?;
        }

        Commands::Show { id } => {
            let mut store = connect(&config)?;
            cli::cmd_show_user(&mut store, id, &mut out).await?;
        }

        Commands::Create(form) => {
            let mut store = connect(&config)?;
            let no_input = form.no_input;
            let next = cli::cmd_user_form(
                &mut store,
                FormMode::Create,
                form.into(),
                no_input,
                &mut input,
                &mut out,
            )
            .await?;
            if let Some(route) = next {
                writeln!(out)?;
                cli::navigate(&mut store, route, default_page, no_input, &mut input, &mut out)
                    .await?;
            }
        }

        Commands::Edit { id, form } => {
            let mut store = connect(&config)?;
            let no_input = form.no_input;
            let next = cli::cmd_user_form(
                &mut store,
                FormMode::Edit(id),
                form.into(),
                no_input,
                &mut input,
                &mut out,
            )
            .await?;
            if let Some(route) = next {
                writeln!(out)?;
                cli::navigate(&mut store, route, default_page, no_input, &mut input, &mut out)
                    .await?;
            }
        }

        Commands::Delete { id, yes } => {
            let mut store = connect(&config)?;
            cli::cmd_delete_user(&mut store, id, yes, &mut input, &mut out).await?;
        }

        Commands::Open { route } => {
            let mut store = connect(&config)?;
            cli::navigate(&mut store, route, default_page, false, &mut input, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
