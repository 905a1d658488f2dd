//! Print a bcrypt hash for a password read from stdin.
//!
//! Useful for seeding `users.password_hash` by hand.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Read, Write};

use clap::Parser;
use keystone::domain::auth::PasswordHasher;
use zeroize::Zeroizing;

/// `hash-password` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hash-password",
    about = "Hash a password from stdin with bcrypt",
    version
)]
struct CliArgs {
    /// bcrypt work factor.
    #[arg(long, default_value_t = bcrypt::DEFAULT_COST, value_parser = clap::value_parser!(u32).range(4..=31))]
    cost: u32,
}

fn read_password(mut input: impl Read) -> io::Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    input.read_to_string(&mut buf)?;
    let trimmed = buf.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no password on stdin",
        ));
    }
    Ok(Zeroizing::new(trimmed.to_owned()))
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let password = read_password(io::stdin().lock())?;
    let hash = PasswordHasher::new(args.cost)
        .hash(&password)
        .map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", hash.as_str())?;
    Ok(())
}
