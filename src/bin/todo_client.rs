use std::{process::ExitCode, sync::Arc};

use askama::Template;
use clap::{Parser, Subcommand};

use todo_app::{
    client::{
        ClientConfig, ClientError, HttpTodoApi, TodoState, TodoStore,
        view::{EMPTY_MESSAGE, TodoPage},
    },
    config::EnvConfig,
    logging::init_cli_tracing,
};

#[derive(Parser)]
#[command(author, version, about = "Command-line client for the todo API")]
struct Cli {
    /// Server base URL (overrides TODO_CLIENT_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every todo, newest first
    List,
    /// Add a todo
    Add { text: String },
    /// Flip a todo between open and done
    Toggle { id: i64 },
    /// Delete a todo
    Delete { id: i64 },
    /// Print the HTML page for the current list
    Render,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_cli_tracing("warn");
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut cfg = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        cfg.base_url = base_url;
    }

    let store = TodoStore::new(Arc::new(HttpTodoApi::from_config(&cfg)));
    store.load().finished().await;

    if let Command::Render = cli.command {
        let state = store.snapshot();
        println!("{}", TodoPage::from_state(&state, "").render()?);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(err) = store.snapshot().error {
        return Ok(failure(&err));
    }

    let outcome = match cli.command {
        Command::List | Command::Render => Ok(()),
        Command::Add { text } => store.create_todo(&text).await.map(|_| ()),
        Command::Toggle { id } => match store.toggle_todo(id).await {
            Some(result) => result.map(|_| ()),
            None => Err(ClientError::NotFound),
        },
        Command::Delete { id } => store.delete_todo(id).await,
    };

    if let Err(err) = outcome {
        return Ok(failure(&err));
    }

    print_list(&store.snapshot());
    Ok(ExitCode::SUCCESS)
}

fn print_list(state: &TodoState) {
    if state.todos.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return;
    }
    for todo in &state.todos {
        let mark = if todo.completed { 'x' } else { ' ' };
        println!("[{mark}] #{} {}", todo.id, todo.text);
    }
}

fn failure(err: &ClientError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::FAILURE
}
