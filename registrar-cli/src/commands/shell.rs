//! `registrar shell [--seed]` — read commands from stdin until EOF or `quit`.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Args, Parser};
use colored::Colorize;

use registrar_core::{RegistryConfig, RegistryService};

use super::session::{execute, Flow, ShellLine};

/// Arguments for `registrar shell`.
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Pre-create the sample courses (Programming I, Programming II, Database I).
    #[arg(long)]
    pub seed: bool,
}

impl ShellArgs {
    pub fn run(self, config: RegistryConfig) -> Result<()> {
        let mut svc = RegistryService::new(config);
        if self.seed {
            svc.seed_sample_courses().context("failed to seed sample courses")?;
        }

        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_session(&mut svc, stdin.lock(), &mut out, interactive)
    }
}

/// Drive `svc` from `input` line by line.
///
/// Blank lines and `#` comments are skipped. A failing command is reported
/// on stderr and the session continues; only unreadable input aborts.
pub fn run_session(
    svc: &mut RegistryService,
    input: impl BufRead,
    out: &mut dyn Write,
    interactive: bool,
) -> Result<()> {
    if interactive {
        writeln!(out, "registrar {} — type `help` for commands", env!("CARGO_PKG_VERSION"))?;
        prompt(out)?;
    }
    for (n, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read input line {}", n + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            if interactive {
                prompt(out)?;
            }
            continue;
        }

        match ShellLine::try_parse_from(trimmed.split_whitespace()) {
            Ok(parsed) => match execute(svc, parsed.command, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    tracing::debug!(line = n + 1, error = %err, "command failed");
                    eprintln!("{} {err:#}", "error:".red().bold());
                }
            },
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => {
                write!(out, "{}", err.render())?;
            }
            Err(err) => eprint!("{}", err.render()),
        }

        if interactive {
            prompt(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn prompt(out: &mut dyn Write) -> Result<()> {
    write!(out, "registrar> ")?;
    out.flush()?;
    Ok(())
}
