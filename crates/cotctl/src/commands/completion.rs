//! Shell completion scripts for cotctl
//!
//! - cotctl completion bash > /etc/bash_completion.d/cotctl
//! - cotctl completion zsh  > ~/.zsh/completion/_cotctl
//! - cotctl completion fish > ~/.config/fish/completions/cotctl.fish

use anyhow::Result;
use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell as ClapShell};
use std::io;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::Powershell => ClapShell::PowerShell,
            Shell::Elvish => ClapShell::Elvish,
        }
    }
}

impl Shell {
    /// Where the generated script is usually installed
    fn install_hint(self) -> &'static str {
        match self {
            Shell::Bash => "source <(cotctl completion bash)  # in ~/.bashrc",
            Shell::Zsh => "cotctl completion zsh > ~/.zsh/completion/_cotctl  # then run compinit",
            Shell::Fish => "cotctl completion fish > ~/.config/fish/completions/cotctl.fish",
            Shell::Powershell => "cotctl completion powershell > cotctl.ps1; . ./cotctl.ps1",
            Shell::Elvish => "cotctl completion elvish > ~/.elvish/lib/cotctl.elv",
        }
    }
}

/// Write the completion script to stdout and an install hint to stderr
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(ClapShell::from(shell), &mut cmd, name, &mut io::stdout());

    eprintln!();
    eprintln!("# Install: {}", shell.install_hint());
    Ok(())
}
