//! `weft repl` — interactive REPL.
//!
//! Persistent evaluation session with line editing, history, and multi-line
//! input for unbalanced parentheses. The session's last result survives
//! across inputs until `clear`.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use weft_runtime::{Exception, Reporter, Session, SourceContext};

const PROMPT: &str = "weft> ";
const CONTINUATION_PROMPT: &str = "  ... ";

pub fn execute() -> anyhow::Result<()> {
    let mut session = Session::new();
    let mut reporter = Reporter::stderr();
    let mut editor = DefaultEditor::new()?;

    // Load history if it exists
    let history_path = dirs::home_dir().map(|h| h.join(".weft").join("repl_history"));
    if let Some(ref path) = history_path {
        let _ = editor.load_history(path);
    }

    println!("Weft v{} REPL", env!("CARGO_PKG_VERSION"));
    println!("Type help for help, exit to quit\n");

    let mut buffer = String::new();
    let mut line_no = 0usize;

    loop {
        let prompt = if buffer.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                // Handle REPL commands (only when not in multi-line mode)
                if buffer.is_empty() && is_command(trimmed) {
                    let _ = editor.add_history_entry(&line);
                    if handle_command(trimmed, &mut session) {
                        break; // exit
                    }
                    continue;
                }

                // Accumulate input
                if buffer.is_empty() {
                    buffer = line.clone();
                } else {
                    buffer.push(' ');
                    buffer.push_str(&line);
                }

                if is_incomplete(&buffer) {
                    continue;
                }

                let input = std::mem::take(&mut buffer);
                let _ = editor.add_history_entry(&input);
                line_no += 1;

                match session.eval(&input) {
                    Ok(result) => println!("{}", result),
                    Err(error) => match Exception::from_error(&error) {
                        Ok(exception) => {
                            // Fatal in a file; the REPL always resumes.
                            let _ = reporter
                                .report(SourceContext::new("<repl>", line_no), &exception);
                        }
                        Err(e) => eprintln!("{}", e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: discard multi-line buffer or hint exit
                if !buffer.is_empty() {
                    buffer.clear();
                    println!();
                } else {
                    println!("\n(To exit, press Ctrl+D or type exit)");
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D: exit
                break;
            }
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }

    Ok(())
}

/// Check if input looks like a REPL command.
fn is_command(input: &str) -> bool {
    matches!(
        input.split_whitespace().next(),
        Some("exit" | "quit" | "help" | "clear" | "last")
    )
}

/// Handle REPL commands. Returns true if the REPL should exit.
fn handle_command(cmd: &str, session: &mut Session) -> bool {
    match cmd {
        "exit" | "quit" => return true,
        "help" => {
            println!("Commands:");
            println!("  help     Show this help");
            println!("  last     Show the last result");
            println!("  clear    Reset session (discard all state)");
            println!("  exit     Exit the REPL (also Ctrl-D)");
        }
        "last" => {
            println!("{}", session.last_result());
        }
        "clear" => match session.reset() {
            Ok(()) => println!("Session cleared."),
            Err(e) => eprintln!("{}", e),
        },
        _ => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type help for available commands.");
        }
    }
    false
}

/// Returns true while the input has more open than closed parentheses.
fn is_incomplete(input: &str) -> bool {
    let mut depth = 0i32;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}
