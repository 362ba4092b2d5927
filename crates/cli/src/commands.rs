use taskdraw_core::{CardId, Category};

pub const HELP: &str = "\
commands:
  draw <category>     draw a card (text, coding, image, music, video)
  toggle [card-id]    flip completion of a card, the current card by default
  reset               reset every deck and the active profile's completions
  profile <name>      create or select a profile
  profiles            list known profiles
  logout              stop acting as a profile
  list [category]     show every card grouped by difficulty
  status              decks, active profile and completion count
  help                this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Draw(Category),
    Toggle(Option<CardId>),
    Reset,
    Profile(String),
    Profiles,
    Logout,
    List(Option<Category>),
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let Some((head, rest)) = split_head(line) else {
        return Ok(None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "draw" | "d" => Command::Draw(parse_category(rest)?),
        "toggle" | "t" => {
            if rest.is_empty() {
                Command::Toggle(None)
            } else {
                let id = rest
                    .parse::<CardId>()
                    .map_err(|_| format!("invalid card id {rest:?}"))?;
                Command::Toggle(Some(id))
            }
        }
        "reset" => Command::Reset,
        "profile" | "p" => {
            if rest.is_empty() {
                return Err("usage: profile <name>".to_string());
            }
            Command::Profile(rest.to_string())
        }
        "profiles" => Command::Profiles,
        "logout" => Command::Logout,
        "list" | "ls" => {
            if rest.is_empty() {
                Command::List(None)
            } else {
                Command::List(Some(parse_category(rest)?))
            }
        }
        "status" | "s" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(Some(command))
}

fn split_head(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    })
}

fn parse_category(raw: &str) -> Result<Category, String> {
    if raw.is_empty() {
        return Err("a category is required (text, coding, image, music, video)".to_string());
    }
    raw.parse::<Category>()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! parse_case {
        ($name:ident, $line:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(parse_command($line), Ok(Some($expected)));
            }
        };
    }

    parse_case!(parse_draw, "draw coding", Command::Draw(Category::Coding));
    parse_case!(parse_draw_short, "d Music", Command::Draw(Category::Music));
    parse_case!(parse_toggle_current, "toggle", Command::Toggle(None));
    parse_case!(parse_toggle_id, "t 12", Command::Toggle(Some(12)));
    parse_case!(
        parse_profile_with_spaces,
        "profile  Ann Lee ",
        Command::Profile("Ann Lee".to_string())
    );
    parse_case!(parse_list_all, "ls", Command::List(None));
    parse_case!(
        parse_list_category,
        "list video",
        Command::List(Some(Category::Video))
    );
    parse_case!(parse_quit, "exit", Command::Quit);

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn errors_are_descriptive() {
        assert!(parse_command("draw").is_err());
        assert!(parse_command("draw poetry").is_err());
        assert!(parse_command("toggle five").is_err());
        assert!(parse_command("profile").is_err());
        assert!(parse_command("dance").is_err());
    }
}
