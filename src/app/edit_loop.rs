use anyhow::Result;
use dialoguer::Input;
use reportwriter::form::FormState;
use reportwriter::history::ArtifactKind;
use reportwriter::session::ReportSession;

use super::style;

/// One line typed at the edit prompt.
#[derive(Debug, PartialEq, Eq)]
enum EditCommand {
    Undo,
    Redo,
    Target(ArtifactKind),
    Generate(ArtifactKind),
    Show,
    Clear,
    Quit,
    Instruction(String),
    Unknown(String),
}

fn parse_command(line: &str) -> EditCommand {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return EditCommand::Instruction(line.to_string());
    };
    let mut words = rest.split_whitespace();
    match (words.next(), words.next()) {
        (Some("undo"), None) => EditCommand::Undo,
        (Some("redo"), None) => EditCommand::Redo,
        (Some("show"), None) => EditCommand::Show,
        (Some("clear"), None) => EditCommand::Clear,
        (Some("quit" | "exit"), None) => EditCommand::Quit,
        (Some("report"), None) => EditCommand::Generate(ArtifactKind::Report),
        (Some("strategies"), None) => EditCommand::Generate(ArtifactKind::Strategies),
        (Some("target"), Some(kind)) => match kind.parse() {
            Ok(kind) => EditCommand::Target(kind),
            Err(_) => EditCommand::Unknown(line.to_string()),
        },
        _ => EditCommand::Unknown(line.to_string()),
    }
}

async fn print_artifact(session: &ReportSession, kind: ArtifactKind) {
    let marker = if session.chat_target() == Some(kind) {
        " (editing)"
    } else {
        ""
    };
    println!(
        "\n{}{}\n{}\n",
        style::header(kind.label()),
        style::dim(marker),
        session.text(kind).await
    );
}

fn print_help() {
    println!(
        "{}",
        style::dim(
            "Type an instruction to edit the selected text.\n\
             /undo /redo            step through edits\n\
             /target report|strategies  choose what to edit\n\
             /report /strategies    generate afresh\n\
             /show /clear /quit"
        )
    );
}

async fn step(session: &ReportSession, undo: bool) {
    let Some(kind) = session.chat_target() else {
        println!("{}", style::warn("Nothing selected; use /target first."));
        return;
    };
    let stepped = if undo {
        session.undo(kind)
    } else {
        session.redo(kind)
    };
    match stepped {
        Ok(Some(_)) => print_artifact(session, kind).await,
        Ok(None) => println!("{}", style::dim("Nothing to step to.")),
        Err(e) => println!("{}", style::warn(e)),
    }
}

/// Interactive loop: generate `start`, then apply chat edits until `/quit`.
pub async fn run(session: &ReportSession, form: &mut FormState, start: ArtifactKind) -> Result<()> {
    match session.generate(start, form).await {
        Ok(_) => print_artifact(session, start).await,
        Err(e) => println!("{}", style::warn(format!("Error: {e}"))),
    }
    print_help();

    loop {
        let line: String = Input::new()
            .with_prompt("edit")
            .allow_empty(true)
            .interact_text()?;

        match parse_command(&line) {
            EditCommand::Quit => return Ok(()),
            EditCommand::Instruction(text) if text.is_empty() => {}
            EditCommand::Instruction(text) => match session.chat_edit(&text).await {
                Ok(_) => {
                    if let Some(kind) = session.chat_target() {
                        print_artifact(session, kind).await;
                    }
                }
                Err(e) => println!("{}", style::warn(format!("Error: {e}"))),
            },
            EditCommand::Undo => step(session, true).await,
            EditCommand::Redo => step(session, false).await,
            EditCommand::Target(kind) => {
                session.set_chat_target(kind);
                print_artifact(session, kind).await;
            }
            EditCommand::Generate(kind) => match session.generate(kind, form).await {
                Ok(_) => print_artifact(session, kind).await,
                Err(e) => println!("{}", style::warn(format!("Error: {e}"))),
            },
            EditCommand::Show => {
                for kind in ArtifactKind::ALL {
                    print_artifact(session, kind).await;
                }
            }
            EditCommand::Clear => {
                session.clear_form(form)?;
                println!(
                    "{}",
                    style::dim("Student cleared; report settings kept. Edit the form file and /report.")
                );
            }
            EditCommand::Unknown(text) => {
                println!("{}", style::warn(format!("Unknown command: {text}")));
                print_help();
            }
        }
    }
}
