//! Music clicker server command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use anyhow::Error;

use crate::store::UserStore;

/// The command line arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file path.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// The command to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Operational commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generates a secret for signing login tokens.
    #[command(name = "generate-secret")]
    GenerateSecret,
    #[command(name = "show")]
    ShowUser(ShowUser),
}

/// Prints a user's stored record.
#[derive(clap::Args, Debug)]
pub struct ShowUser {
    /// The username of the user.
    pub username: String,
}

/// Prints a user's stored record.
///
/// The record is printed as it is stored; no earnings are credited.
pub async fn show_user(command: &ShowUser, store: &UserStore) -> Result<(), Error> {
    match store.get(&command.username).await? {
        Some(user) => {
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(())
        }
        None => Err(Error::msg(format!("user {} not found", command.username))),
    }
}
