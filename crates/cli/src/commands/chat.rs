//! `jarvis chat`: Interactive or single-message chat mode.

use futures::StreamExt;
use jarvis_agent::ChatAgent;
use jarvis_core::memory::ConversationStore;
use jarvis_core::role::Role;
use jarvis_memory::{FileStore, InMemoryStore};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct ChatOptions {
    pub role: String,
    pub stream: bool,
    pub ephemeral: bool,
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    Clear,
    History,
    Help,
    SetRole(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "exit" | "quit" | "/exit" | "/quit" => Input::Exit,
        "/clear" => Input::Clear,
        "/history" => Input::History,
        "/help" => Input::Help,
        _ => match line.strip_prefix("/role") {
            Some(rest) if rest.is_empty() || rest.starts_with(' ') => Input::SetRole(rest.trim()),
            _ => Input::Message(line),
        },
    }
}

fn pick_role(name: &str) -> Role {
    let role = Role::from_name(name);
    if let Role::Unknown(other) = &role {
        eprintln!("  ⚠️  Unknown role '{other}', continuing without a persona.");
    }
    role
}

pub async fn run(message: Option<String>, options: ChatOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let backend = super::backend(&config)?;

    let store: Arc<dyn ConversationStore> = if options.ephemeral {
        Arc::new(InMemoryStore::new())
    } else {
        Arc::new(FileStore::open(config.memory.resolved_path())?)
    };
    let agent = ChatAgent::new(backend, store);
    let mut role = pick_role(&options.role);

    if let Some(msg) = message {
        // Single message mode
        reply(&agent, &msg, &role, options.stream).await?;
        return Ok(());
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║           Jarvis — Interactive Chat          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", agent.backend().provider_name());
    println!("  Model:     {}", agent.backend().model());
    println!("  Role:      {}", role.name());
    println!();
    println!("  Type your message and press Enter. /help lists commands.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    for turn in agent.history().await {
        println!("  {turn}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Exit => break,
            Input::Help => {
                println!("  /role <tutor|coder|mentor>  switch persona");
                println!("  /history                    show the conversation");
                println!("  /clear                      forget the conversation");
                println!("  exit                        quit");
            }
            Input::History => {
                let history = agent.history().await;
                if history.is_empty() {
                    println!("  (no history)");
                }
                for turn in history {
                    println!("  {turn}");
                }
            }
            Input::Clear => {
                agent.clear_memory().await?;
                println!("  🧹 Chat history cleared.");
            }
            Input::SetRole(name) if name.is_empty() => {
                println!("  Current role: {}", role.name());
            }
            Input::SetRole(name) => {
                role = pick_role(name);
                println!("  Role set to {}.", role.name());
            }
            Input::Message(text) => {
                reply(&agent, text, &role, options.stream).await?;
                println!();
            }
        }
    }

    println!("  👋 Goodbye!");
    Ok(())
}

async fn reply(agent: &ChatAgent, text: &str, role: &Role, stream: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !stream {
        eprint!("  Thinking...");
        let response = agent.respond(text, role).await?;
        eprint!("\r              \r");
        println!("  Jarvis > {response}");
        return Ok(());
    }

    print!("  Jarvis > ");
    std::io::stdout().flush()?;

    let mut fragments = agent.respond_stream(text, role).await;
    loop {
        tokio::select! {
            item = fragments.next() => match item {
                Some(Ok(fragment)) => {
                    print!("{fragment}");
                    std::io::stdout().flush()?;
                }
                Some(Err(e)) => {
                    println!();
                    return Err(format!("Reply shown but not saved: {e}").into());
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                // Dropping the stream leaves the log untouched
                println!(" [cancelled]");
                return Ok(());
            }
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands() {
        assert_eq!(parse_input("  "), Input::Empty);
        assert_eq!(parse_input("exit"), Input::Exit);
        assert_eq!(parse_input("/clear"), Input::Clear);
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/role coder"), Input::SetRole("coder"));
        assert_eq!(parse_input("/role"), Input::SetRole(""));
    }

    #[test]
    fn everything_else_is_a_message() {
        assert_eq!(parse_input("explain ownership"), Input::Message("explain ownership"));
        assert_eq!(parse_input("/roles are fun"), Input::Message("/roles are fun"));
        assert_eq!(parse_input("exit strategies?"), Input::Message("exit strategies?"));
    }

    #[test]
    fn known_and_unknown_roles() {
        assert_eq!(pick_role("Mentor"), Role::Mentor);
        assert!(matches!(pick_role("pirate"), Role::Unknown(_)));
    }
}
