use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;

use crate::command;
use crate::events::{emit, Event, Format};
use crate::session::Session;

/// Built-in scenario for `chatsim demo`: offline delivery, then a group
/// broadcast.
pub const DEMO_SCRIPT: &str = "\
# offline delivery
register alice
register bob
register carol
login alice
add-friend bob
send bob hi
send bob there
logout
login bob
history
# group broadcast
login alice
create-group g
login bob
join g
login carol
join g
login alice
send-group g yo
history
login bob
history
login carol
history
logout
groups
users
stats
";

/// Feed every command line from `input` to the session.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Parse and
/// core errors are emitted as events and do not stop the run. Returns the
/// number of commands executed.
pub fn run_lines<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    format: Format,
) -> anyhow::Result<usize> {
    let mut executed = 0;
    for (n, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", n + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event = match command::parse(line) {
            Ok(cmd) => {
                executed += 1;
                session.execute(cmd)
            }
            Err(e) => Event::Error {
                message: format!("line {}: {e}", n + 1),
            },
        };
        emit(out, &event, format).context("writing output")?;
    }
    Ok(executed)
}

/// Run a script file, or stdin when `path` is `None`.
pub fn run_script<W: Write>(
    session: &mut Session,
    path: Option<&Path>,
    out: &mut W,
    format: Format,
) -> anyhow::Result<usize> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            run_lines(session, BufReader::new(file), out, format)
        }
        None => run_lines(session, io::stdin().lock(), out, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsim_core::{ChatConfig, ChatCore};

    fn session() -> Session {
        Session::new(ChatCore::new(ChatConfig::defaults()))
    }

    fn json_lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn demo_script_runs_clean() {
        let mut s = session();
        let mut out = Vec::new();
        run_lines(&mut s, DEMO_SCRIPT.as_bytes(), &mut out, Format::Json).unwrap();

        let events = json_lines(&out);
        assert!(events.iter().all(|e| e["event"] != "error"), "{events:?}");

        // bob's history right after the first login.
        let bob_history = events
            .iter()
            .find(|e| e["event"] == "history" && e["name"] == "bob")
            .unwrap();
        assert_eq!(
            bob_history["lines"],
            serde_json::json!(["alice -> You: hi", "alice -> You: there"])
        );

        let core = s.core();
        assert_eq!(
            core.view_history("carol").unwrap(),
            ["[g] alice -> You: yo"]
        );
        assert_eq!(core.stats().group_sent, 1);
        assert_eq!(s.current_user(), None);
    }

    #[test]
    fn script_file_with_errors_keeps_going() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  register alice  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "register alice").unwrap();
        writeln!(file, "fly away").unwrap();
        writeln!(file, "users").unwrap();
        file.flush().unwrap();

        let mut s = session();
        let mut out = Vec::new();
        let executed = run_script(&mut s, Some(file.path()), &mut out, Format::Text).unwrap();
        assert_eq!(executed, 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Registered 'alice'",
                "error: user already exists: alice",
                "error: line 5: unknown command: fly",
                " - alice",
            ]
        );
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        let mut out = Vec::new();
        let missing = dir.path().join("nope.txt");
        let err = run_script(&mut s, Some(missing.as_path()), &mut out, Format::Text).unwrap_err();
        assert!(err.to_string().starts_with("opening script"));
    }
}
