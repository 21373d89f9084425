//! `weft eval` — evaluate an inline expression.

use weft_runtime::{evaluate, Exception, Reporter, SourceContext};

pub fn execute(expr: &str) -> anyhow::Result<()> {
    match evaluate(expr) {
        Ok(result) => {
            println!("{}", result);
            Ok(())
        }
        Err(error) => {
            let exception =
                Exception::from_error(&error).map_err(|e| anyhow::anyhow!("{}", e))?;
            let mut reporter = Reporter::stderr();
            reporter.report(SourceContext::new("<eval>", 1), &exception)?;
            anyhow::bail!("{}", exception)
        }
    }
}
