//! User management command handlers

use crate::config::Config;
use crate::db::{Store, StoreError};

pub async fn cmd_users_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(config);
    let users = store.usernames().await?;

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("Registered users ({} total, backend: {})", users.len(), store.backend_name());
    println!("{:-<50}", "");

    for username in users {
        let premium = store
            .find(&username)
            .await?
            .is_some_and(|u| u.premium);
        let marker = if premium { "⭐" } else { "•" };
        println!("{marker} '{username}'");
    }

    Ok(())
}

pub async fn cmd_users_upgrade(config: &Config, username: &str) -> anyhow::Result<()> {
    let store = Store::from_config(config);

    match store.set_premium(username, true).await {
        Ok(user) => {
            println!("⭐ Upgraded user to premium: '{}'", user.username.trim());
            Ok(())
        }
        Err(StoreError::NotFound(name)) => {
            anyhow::bail!("User not found: '{name}'. Use 'pocketkit users list' to see users")
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_users_reset(config: &Config, confirmed: bool) -> anyhow::Result<()> {
    let store = Store::from_config(config);

    if !confirmed {
        let count = store.usernames().await?.len();
        println!("This would delete {count} user(s) from the {} store.", store.backend_name());
        println!("Run again with --yes to confirm.");
        return Ok(());
    }

    let removed = store.reset().await?;
    println!("🧹 User database cleared ({removed} user(s) removed)");
    Ok(())
}
