use std::path::PathBuf;

use crate::{ThumbError, ThumbResult, template::resolve::BadgePosition};

pub const HELP: &str = "\
commands:
  title <text>        set the title (empty shows the placeholder)
  badge <text>        set the badge text (empty hides it)
  badge-pos <pos>     top-left | top-right | bottom-left | bottom-right
  footer <text>       set the footer text
  script <file>       suggest a title from a script when the title is empty
  video <file>        use a video frame as background
  image <file>        use a still image as background
  clear-bg            go back to the generated background
  seek <secs>         sample the video at a new time
  render              render and print the layout
  export <file.png>   write the current thumbnail
  help                show this text
  quit                leave the studio";

/// One parsed line of studio input.
#[derive(Clone, Debug, PartialEq)]
pub enum StudioCommand {
    Title(String),
    Badge(String),
    BadgePos(BadgePosition),
    Footer(String),
    Script(PathBuf),
    Video(PathBuf),
    Image(PathBuf),
    ClearBackground,
    Seek(f64),
    Render,
    Export(PathBuf),
    Help,
    Quit,
}

impl StudioCommand {
    /// Whether the command changes what the thumbnail looks like.
    pub fn edits_form(&self) -> bool {
        matches!(
            self,
            Self::Title(_)
                | Self::Badge(_)
                | Self::BadgePos(_)
                | Self::Footer(_)
                | Self::Script(_)
                | Self::Image(_)
                | Self::ClearBackground
        )
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> ThumbResult<Option<StudioCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "title" => StudioCommand::Title(rest.to_owned()),
        "badge" => StudioCommand::Badge(rest.to_owned()),
        "footer" => StudioCommand::Footer(rest.to_owned()),
        "badge-pos" => StudioCommand::BadgePos(BadgePosition::parse(rest).ok_or_else(|| {
            ThumbError::input(format!("unknown badge position \"{rest}\""))
        })?),
        "script" => StudioCommand::Script(path_arg(word, rest)?),
        "video" => StudioCommand::Video(path_arg(word, rest)?),
        "image" => StudioCommand::Image(path_arg(word, rest)?),
        "clear-bg" => StudioCommand::ClearBackground,
        "seek" => StudioCommand::Seek(
            rest.parse::<f64>()
                .ok()
                .filter(|t| t.is_finite())
                .ok_or_else(|| ThumbError::input(format!("seek needs seconds, got \"{rest}\"")))?,
        ),
        "render" => StudioCommand::Render,
        "export" => StudioCommand::Export(path_arg(word, rest)?),
        "help" | "?" => StudioCommand::Help,
        "quit" | "exit" => StudioCommand::Quit,
        other => {
            return Err(ThumbError::input(format!(
                "unknown command \"{other}\"; type `help`"
            )));
        }
    };
    Ok(Some(cmd))
}

fn path_arg(cmd: &str, rest: &str) -> ThumbResult<PathBuf> {
    if rest.is_empty() {
        return Err(ThumbError::input(format!("{cmd} needs a file path")));
    }
    Ok(PathBuf::from(rest))
}
