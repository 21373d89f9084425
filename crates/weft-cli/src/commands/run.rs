//! `weft run` — execute a script file line by line.
//!
//! Each non-empty line is an expression. Recoverable failures are reported
//! and execution continues with the next line; a fatal failure (syntax
//! error) stops the run with a non-zero exit.

use anyhow::Context;

use weft_runtime::{Code, Exception, Reporter, Session, SourceContext};

pub fn execute(path: &str) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path))?;

    let code = Code::new(&source)
        .map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;

    let mut session = Session::new();
    let mut reporter = Reporter::stderr();

    for (index, line) in code.lines().iter().enumerate() {
        match session.eval(line) {
            Ok(result) => println!("{}", result),
            Err(error) => {
                let exception = Exception::from_error(&error)
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                let fatal = reporter
                    .report(SourceContext::new(path, index + 1), &exception)?;
                if fatal {
                    anyhow::bail!("aborted: {}", exception);
                }
            }
        }
    }

    Ok(())
}
