//! User detail page

use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};

use crate::cli::routes::Route;
use crate::domain::UserId;
use crate::store::{UserState, UserStore};

const LOADING: &str = "Loading user details...";

fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn render_user_detail(state: &UserState, out: &mut impl Write) -> io::Result<()> {
    if state.loading {
        return writeln!(out, "{LOADING}");
    }

    if let Some(err) = &state.error {
        return writeln!(out, "Error: {err}");
    }

    let Some(user) = &state.selected_user else {
        return writeln!(out, "User not found");
    };

    writeln!(out, "User Details")?;
    writeln!(out, "{:-<60}", "")?;
    writeln!(out, "ID:          {}", user.id)?;
    writeln!(out, "Username:    {}", user.username)?;
    writeln!(out, "Email:       {}", user.email)?;
    writeln!(out, "Full Name:   {}", user.full_name_or_dash())?;
    writeln!(out, "Status:      {}", user.status_label())?;
    writeln!(out, "Superuser:   {}", user.superuser_label())?;
    writeln!(out, "Created At:  {}", local_time(&user.created_at))?;
    writeln!(out, "Updated At:  {}", local_time(&user.updated_at))?;
    writeln!(out)?;
    writeln!(
        out,
        "Edit: open {} | Back to List: open {}",
        Route::EditUser(user.id),
        Route::Users
    )?;

    Ok(())
}

pub async fn cmd_show_user(
    store: &mut UserStore,
    id: UserId,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{LOADING}")?;
    out.flush()?;
    store.fetch_user(id).await;
    render_user_detail(store.state(), out)?;
    Ok(())
}
