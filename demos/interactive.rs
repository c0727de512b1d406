//! Interactive smoke test for manual use: `cargo run --bin caretline-demo`.
//!
//! Exercises history recall, tab completion, password masking and a yes/no
//! prompt against a real terminal.

use caretline::{colored, Color, LineEditor, StyledText, WordListCompleter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> caretline::Result<()> {
    let commands: Vec<String> = vec![
        "help", "quit", "clear", "history", "login", "logout", "hello world",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    let completer = WordListCompleter::new(commands);

    let mut editor = LineEditor::new().with_history_file("caretline-demo-history.txt")?;
    let prompt = colored(Color::Green, "caretline> ");

    loop {
        let line = match editor.read_line(&prompt, &completer).await {
            Ok(line) => line,
            Err(caretline::EditorError::Interrupt) => {
                println!("^C");
                break;
            }
            Err(err) => return Err(err),
        };

        match line.trim() {
            "quit" | "exit" => break,
            "login" => {
                let user = editor.read_line_plain(&StyledText::from("username: ")).await?;
                let password = editor.read_password(&StyledText::from("password: "), '*').await?;
                println!("logged in as {user} ({} chars of password)", password.len());
            }
            "clear" => println!("(nothing to clear in this demo)"),
            "" => {}
            other => println!("you typed: {other}"),
        }
    }

    let proceed = editor
        .read_yes_no(&StyledText::from("save history before exiting? [y/n] "))
        .await?;
    if proceed {
        println!("history saved ({} entries)", editor.history().len());
    }

    Ok(())
}
