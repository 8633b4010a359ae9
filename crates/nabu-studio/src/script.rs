//! Plain-text command scripts.
//!
//! One instruction per line. `#` starts a comment at the beginning of a line
//! or when surrounded by whitespace, so `#ff8800` stays an argument:
//!
//! ```text
//! wait 0.5                  # advance half a second of frames
//! go.bounce(0.4)            # element.command(args)
//! text 3 Hello there        # set resource slot 3
//! image 7 bundle badge      # load into slot 7 (file|bundle|resource|url|address)
//! event go click            # forward go's onClick handlers
//! progress hp 0.25 animate  # set a progress bar
//! ```

use anyhow::{Context as _, Result, anyhow, bail};

use nabu_ui::attrs::AttrEnum;
use nabu_ui::resources::SourceKind;
use nabu_ui::widget::parse_handler_list;

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Wait(f32),
    Command { element: String, command: String, args: Vec<String> },
    Text { slot: usize, text: String },
    Image { slot: usize, kind: SourceKind, source: String },
    Event { element: String, event: String, args: Vec<String> },
    Progress { element: String, value: f32, animate: bool },
}

pub fn parse(src: &str) -> Result<Vec<Instruction>> {
    let mut out = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let inst = parse_line(line).with_context(|| format!("script line {}: {:?}", i + 1, raw.trim()))?;
        out.push(inst);
    }
    Ok(out)
}

fn strip_comment(raw: &str) -> &str {
    let line = raw.trim_start();
    if line.starts_with('#') {
        return "";
    }
    let bytes = line.as_bytes();
    for (i, _) in line.match_indices('#') {
        let before = i > 0 && bytes[i - 1].is_ascii_whitespace();
        let after = bytes.get(i + 1).is_none_or(u8::is_ascii_whitespace);
        if before && after {
            return &line[..i];
        }
    }
    line
}

fn parse_line(line: &str) -> Result<Instruction> {
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut words = rest.split_whitespace();

    match head {
        "wait" => Ok(Instruction::Wait(number(rest)?)),
        "text" => {
            let (slot, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(Instruction::Text { slot: slot.parse().context("slot index")?, text: text.trim().to_string() })
        }
        "image" => {
            let slot = words.next().ok_or_else(|| anyhow!("missing slot"))?.parse().context("slot index")?;
            let kind_name = words.next().ok_or_else(|| anyhow!("missing source kind"))?;
            let kind = SourceKind::from_name(kind_name).ok_or_else(|| anyhow!("unknown source kind {:?}", kind_name))?;
            let source = words.collect::<Vec<_>>().join(" ");
            if source.is_empty() {
                bail!("missing source");
            }
            Ok(Instruction::Image { slot, kind, source })
        }
        "event" => {
            let element = words.next().ok_or_else(|| anyhow!("missing element"))?.to_string();
            let event = words.next().ok_or_else(|| anyhow!("missing event type"))?.to_string();
            Ok(Instruction::Event { element, event, args: words.map(str::to_string).collect() })
        }
        "progress" => {
            let element = words.next().ok_or_else(|| anyhow!("missing element"))?.to_string();
            let value = number(words.next().unwrap_or_default())?;
            let animate = matches!(words.next(), Some("animate"));
            Ok(Instruction::Progress { element, value, animate })
        }
        _ => command(line),
    }
}

fn number(s: &str) -> Result<f32> {
    s.trim().parse::<f32>().with_context(|| format!("{:?} is not a number", s.trim()))
}

/// `element.command(args)`
fn command(line: &str) -> Result<Instruction> {
    let (element, call) = line.split_once('.').ok_or_else(|| anyhow!("expected element.command(args)"))?;
    let mut parsed = parse_handler_list("script", call);
    if parsed.len() != 1 {
        bail!("expected exactly one command call");
    }
    let h = parsed.remove(0);
    Ok(Instruction::Command { element: element.trim().to_string(), command: h.command, args: h.params })
}
