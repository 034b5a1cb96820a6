//! User list page, including row deletion.

use std::io::{self, BufRead, Write};

use tracing::error;

use crate::cli::prompt;
use crate::cli::routes::Route;
use crate::domain::{Pagination, UserId};
use crate::store::{UserState, UserStore};

const LOADING: &str = "Loading users...";

pub fn render_user_list(state: &UserState, out: &mut impl Write) -> io::Result<()> {
    if state.loading {
        return writeln!(out, "{LOADING}");
    }

    if let Some(err) = &state.error {
        return writeln!(out, "Error: {err}");
    }

    writeln!(out, "Users")?;
    writeln!(out, "{:-<90}", "")?;
    writeln!(
        out,
        "{:>6}  {:<16}  {:<30}  {:<20}  {}",
        "ID", "Username", "Email", "Full Name", "Status"
    )?;

    for user in &state.users {
        writeln!(
            out,
            "{:>6}  {:<16}  {:<30}  {:<20}  {}",
            user.id,
            user.username,
            user.email,
            user.full_name_or_dash(),
            user.status_label()
        )?;
    }

    if state.users.is_empty() {
        writeln!(out)?;
        writeln!(out, "No users found. Create your first user!")?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Actions: open {}/<id> | open {}/<id>/edit | delete <id> | open {}",
        Route::Users,
        Route::Users,
        Route::CreateUser
    )?;

    Ok(())
}

pub async fn cmd_list_users(
    store: &mut UserStore,
    pagination: Pagination,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{LOADING}")?;
    out.flush()?;
    store.fetch_users(pagination).await;
    render_user_list(store.state(), out)?;
    Ok(())
}

/// Deletes after interactive confirmation. A failed delete is logged, not
/// shown on the page.
pub async fn cmd_delete_user(
    store: &mut UserStore,
    id: UserId,
    assume_yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let confirmed = assume_yes
        || prompt::confirm(
            input,
            out,
            &format!("Are you sure you want to delete this user? (ID: {id})"),
        )?;

    if !confirmed {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    match store.delete_user(id).await {
        Ok(()) => writeln!(out, "✓ Deleted user {id}")?,
        Err(e) => error!(user_id = %id, error = %e, "Failed to delete user"),
    }

    Ok(())
}
