//! Line-oriented displays for `list` and `watch`

use std::io::Write;

use ballotctl_core::{BallotError, BallotRecord, DisplayCampaigns, DisplayProps};

fn io_err(err: std::io::Error) -> BallotError {
    BallotError::display(err.to_string())
}

/// One line per ballot: `#<id>  <label> - <description>`
pub fn ballot_line(record: &BallotRecord) -> String {
    let id = record.id().map(|id| format!("#{}  ", id)).unwrap_or_default();
    match (record.label(), record.description()) {
        (Some(label), Some(desc)) => format!("{}{} - {}", id, label, desc),
        (Some(label), None) => format!("{}{}", id, label),
        _ => format!("{}{}", id, record.value()),
    }
}

/// Human-readable display
pub struct TextDisplay<W: Write> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplayCampaigns for TextDisplay<W> {
    fn render(&mut self, props: &DisplayProps) -> ballotctl_core::Result<()> {
        writeln!(self.out, "{} ({})", props.title, props.campaigns.len()).map_err(io_err)?;

        if props.is_loading {
            writeln!(self.out, "  Loading...").map_err(io_err)?;
        } else if let Some(ref error) = props.error {
            writeln!(self.out, "  ! Could not load ballots: {}", error).map_err(io_err)?;
        }

        if props.campaigns.is_empty() && !props.is_loading {
            writeln!(self.out, "  No ballots yet").map_err(io_err)?;
        }
        for record in &props.campaigns {
            writeln!(self.out, "  {}", ballot_line(record)).map_err(io_err)?;
        }

        self.out.flush().map_err(io_err)
    }
}

/// JSON display: pretty for one-shot output, one object per line for streams
pub struct JsonDisplay<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonDisplay<W> {
    pub fn pretty(out: W) -> Self {
        Self { out, pretty: true }
    }

    pub fn lines(out: W) -> Self {
        Self { out, pretty: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplayCampaigns for JsonDisplay<W> {
    fn render(&mut self, props: &DisplayProps) -> ballotctl_core::Result<()> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(props)
        } else {
            serde_json::to_string(props)
        }
        .map_err(|err| BallotError::json("display props", err))?;

        writeln!(self.out, "{}", encoded).map_err(io_err)?;
        self.out.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballotctl_core::FetchFailure;
    use serde_json::json;

    fn props(campaigns: Vec<BallotRecord>) -> DisplayProps {
        DisplayProps {
            title: "Your Ballots".into(),
            is_loading: false,
            campaigns,
            error: None,
        }
    }

    fn text(props: &DisplayProps) -> String {
        let mut display = TextDisplay::new(Vec::new());
        display.render(props).unwrap();
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn text_lists_ballots_in_order() {
        let out = text(&props(vec![
            json!({"id": 1, "title": "Budget", "description": "Q3"}).into(),
            json!({"id": 2, "name": "Board seat"}).into(),
            json!({"weird": true}).into(),
        ]));

        assert_eq!(
            out,
            "Your Ballots (3)\n  #1  Budget - Q3\n  #2  Board seat\n  {\"weird\":true}\n"
        );
    }

    #[test]
    fn text_shows_empty_and_loading_states() {
        assert_eq!(text(&props(vec![])), "Your Ballots (0)\n  No ballots yet\n");

        let mut loading = props(vec![]);
        loading.is_loading = true;
        assert_eq!(text(&loading), "Your Ballots (0)\n  Loading...\n");
    }

    #[test]
    fn text_shows_failure() {
        let mut failed = props(vec![json!({"id": 4}).into()]);
        failed.error = Some(FetchFailure::Provider("execution reverted".into()));
        let out = text(&failed);
        assert!(out.contains("! Could not load ballots: execution reverted"));
        assert!(out.contains("#4"));
    }

    #[test]
    fn json_lines_are_single_line() {
        let mut display = JsonDisplay::lines(Vec::new());
        display.render(&props(vec![json!({"id": 1}).into()])).unwrap();
        let out = String::from_utf8(display.into_inner()).unwrap();

        assert_eq!(out.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["campaigns"][0]["id"], 1);
        assert_eq!(value["is_loading"], false);
    }
}
