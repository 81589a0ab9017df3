use anyhow::{anyhow, bail};

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register(String),
    Login(String),
    Logout,
    Users,
    Friends,
    AddFriend(String),
    Unfriend(String),
    Send { to: String, body: String },
    History,
    CreateGroup(String),
    Join(String),
    Leave(String),
    DeleteGroup(String),
    Groups,
    SendGroup { group: String, body: String },
    Stats,
}

/// Parse a trimmed, non-empty input line.
///
/// The first word selects the command. Names are single words; message
/// bodies take the rest of the line with outer whitespace trimmed.
pub fn parse(line: &str) -> anyhow::Result<Command> {
    let line = line.trim();
    let (verb, rest) = split_word(line);
    let rest = rest.trim();

    let cmd = match verb {
        "register" => Command::Register(one_name(verb, rest)?),
        "login" => Command::Login(one_name(verb, rest)?),
        "logout" => no_args(verb, rest, Command::Logout)?,
        "users" => no_args(verb, rest, Command::Users)?,
        "friends" => no_args(verb, rest, Command::Friends)?,
        "add-friend" => Command::AddFriend(one_name(verb, rest)?),
        "unfriend" => Command::Unfriend(one_name(verb, rest)?),
        "send" => {
            let (to, body) = name_and_body(verb, rest)?;
            Command::Send { to, body }
        }
        "history" => no_args(verb, rest, Command::History)?,
        "create-group" => Command::CreateGroup(one_name(verb, rest)?),
        "join" => Command::Join(one_name(verb, rest)?),
        "leave" => Command::Leave(one_name(verb, rest)?),
        "delete-group" => Command::DeleteGroup(one_name(verb, rest)?),
        "groups" => no_args(verb, rest, Command::Groups)?,
        "send-group" => {
            let (group, body) = name_and_body(verb, rest)?;
            Command::SendGroup { group, body }
        }
        "stats" => no_args(verb, rest, Command::Stats)?,
        "" => bail!("empty command"),
        other => bail!("unknown command: {other}"),
    };
    Ok(cmd)
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

fn one_name(verb: &str, rest: &str) -> anyhow::Result<String> {
    let (name, extra) = split_word(rest);
    if name.is_empty() {
        bail!("usage: {verb} NAME");
    }
    if !extra.trim().is_empty() {
        bail!("{verb}: names are a single word");
    }
    Ok(name.to_string())
}

fn name_and_body(verb: &str, rest: &str) -> anyhow::Result<(String, String)> {
    let (name, body) = split_word(rest);
    if name.is_empty() {
        return Err(anyhow!("usage: {verb} NAME MESSAGE"));
    }
    Ok((name.to_string(), body.trim().to_string()))
}

fn no_args(verb: &str, rest: &str, cmd: Command) -> anyhow::Result<Command> {
    if !rest.is_empty() {
        bail!("{verb} takes no arguments");
    }
    Ok(cmd)
}
