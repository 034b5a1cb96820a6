//! CLI module - terminal front end for user management
//!
//! Each page of the web client (home, list, detail, form) is a command here;
//! `open` accepts the same paths the web router used.

mod commands;
pub mod prompt;
pub mod routes;

use std::io::{BufRead, Write};

use clap::{Args, Parser, Subcommand};

use crate::domain::{Pagination, UserId};
use crate::store::UserStore;
pub use commands::*;
pub use routes::Route;

/// OpenAgri user management
/// Manage platform users through the OpenAgri REST API
#[derive(Parser)]
#[command(name = "openagri-users")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the welcome page
    Home,

    /// List users
    #[command(alias = "ls", alias = "l")]
    List {
        /// Number of users to skip
        #[arg(long)]
        skip: Option<u32>,
        /// Maximum number of users to return
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show details about a user
    #[command(alias = "info", alias = "i")]
    Show {
        /// User ID
        id: UserId,
    },

    /// Create a new user
    #[command(alias = "add", alias = "a")]
    Create(FormArgs),

    /// Edit an existing user
    Edit {
        /// User ID
        id: UserId,
        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete a user
    #[command(alias = "rm", alias = "r")]
    Delete {
        /// User ID
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Open a page by path, e.g. /users/3/edit
    Open {
        /// Page path
        route: Route,
    },

    /// Create default config file
    Init,
}

#[derive(Args, Debug, Default)]
pub struct FormArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub full_name: Option<String>,

    /// Never prompt; fail validation instead
    #[arg(long)]
    pub no_input: bool,
}

impl From<FormArgs> for FormValues {
    fn from(args: FormArgs) -> Self {
        Self {
            email: args.email,
            username: args.username,
            full_name: args.full_name,
        }
    }
}

/// Shows `route` and follows any navigation it triggers, the way a form
/// returns to the list after saving.
pub async fn navigate(
    store: &mut UserStore,
    route: Route,
    pagination: Pagination,
    no_input: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut next = Some(route);

    while let Some(route) = next.take() {
        next = match route {
            Route::Home => {
                render_home(out)?;
                None
            }
            Route::Users => {
                cmd_list_users(store, pagination, out).await?;
                None
            }
            Route::UserDetail(id) => {
                cmd_show_user(store, id, out).await?;
                None
            }
            Route::CreateUser => {
                cmd_user_form(
                    store,
                    FormMode::Create,
                    FormValues::default(),
                    no_input,
                    input,
                    out,
                )
                .await?
            }
            Route::EditUser(id) => {
                cmd_user_form(
                    store,
                    FormMode::Edit(id),
                    FormValues::default(),
                    no_input,
                    input,
                    out,
                )
                .await?
            }
        };

        if next.is_some() {
            writeln!(out)?;
        }
    }

    Ok(())
}
