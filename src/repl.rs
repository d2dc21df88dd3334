use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use crate::assistant::Assistant;
use crate::model_gateway::ModelGateway;

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Exit,
    Query(&'a str),
}

fn classify<'a>(line: &'a str, exit_keyword: &str) -> Input<'a> {
    let query = line.trim();
    if query.to_lowercase() == exit_keyword.trim().to_lowercase() {
        Input::Exit
    } else {
        Input::Query(query)
    }
}

pub async fn run_repl<G: ModelGateway>(
    assistant: &Assistant<'_, G>,
    exit_keyword: &str,
) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl_with(assistant, exit_keyword, stdin.lock(), stdout.lock()).await
}

pub async fn run_repl_with<G, R, W>(
    assistant: &Assistant<'_, G>,
    exit_keyword: &str,
    mut input: R,
    mut output: W,
) -> Result<()>
where
    G: ModelGateway,
    R: BufRead,
    W: Write,
{
    writeln!(output, "helpdesk support assistant")?;
    writeln!(
        output,
        "knowledge base: {} teams",
        assistant.knowledge_base().team_count()
    )?;
    writeln!(output, "type a request, or '{exit_keyword}' to quit")?;

    loop {
        write!(output, "> ")?;
        output.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read stdin")?;
        if read == 0 {
            debug!("stdin closed");
            break;
        }

        let query = match classify(&line, exit_keyword) {
            Input::Exit => break,
            Input::Query(query) => query,
        };

        match assistant.answer(query).await {
            Ok(answer) => writeln!(output, "\nAnswer:\n{}\n", answer.trim())?,
            Err(err) => {
                debug!(error = %err, "query failed");
                writeln!(output, "error: {err}\n")?;
            }
        }
    }

    info!("session ended");
    Ok(())
}
