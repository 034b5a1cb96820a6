//! Home page

use std::io::{self, Write};

use crate::cli::routes::Route;

pub fn render_home(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Welcome to ICTU-OpenAgri")?;
    writeln!(out, "An open-source agricultural management platform")?;
    writeln!(out)?;
    writeln!(
        out,
        "Manage Users: openagri-users list   (or: openagri-users open {})",
        Route::Users
    )?;
    Ok(())
}
