//! Prints the Argon2 hash of an admin key for the `ADMIN_KEY_HASH` setting.
//!
//! Usage: `hash-admin-key <key>`

use color_eyre::eyre::{Result, eyre};

fn main() -> Result<()> {
    color_eyre::install()?;

    let key = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("Usage: hash-admin-key <key>"))?;
    if key.len() < 12 {
        return Err(eyre!("Admin keys must be at least 12 characters long"));
    }

    println!("{}", salonbook_api::middleware::auth::hash_admin_key(&key)?);
    Ok(())
}
