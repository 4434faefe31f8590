use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "caddiectl",
    version,
    about = "Scan recorded golf shots for implausible distances"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the bearer token used against the remote service
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// List the player's clubs with lifetime distance stats
    Clubs,
    /// Manage per-club distance ceilings that replace the built-in table
    Override {
        #[command(subcommand)]
        action: OverrideAction,
    },
    /// Run a full scan and print every flagged shot
    Scan,
}

#[derive(Debug, Subcommand)]
pub enum TokenAction {
    /// Save a bearer token (paste from an authenticated browser session)
    Set { token: String },
    /// Forget the saved token
    Clear,
    /// Report whether a token is saved (never prints the token itself)
    Show,
}

#[derive(Debug, Subcommand)]
pub enum OverrideAction {
    /// Set the maximum plausible distance for one club, in meters
    Set { club_id: i64, max_meters: f64 },
    /// Remove the override for one club
    Rm { club_id: i64 },
    /// List all configured overrides
    List,
}
