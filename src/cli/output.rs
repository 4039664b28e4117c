//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PhonewiseArgs, RecommendMode};
use crate::compare::{ComparisonResult, OverallWinner, Winner};
use crate::error::Result;
use crate::recommend::RankedResult;
use crate::respond::ChatReply;
use crate::util::spec_text::format_price;

/// Results that have a human-readable rendering.
pub trait HumanOutput {
    fn human(&self) -> String;
}

/// One message and the assistant's answer.
#[derive(Debug, Serialize)]
pub struct ChatTurn {
    pub message: String,
    pub reply: ChatReply,
}

/// Result structure for a chat run.
#[derive(Debug, Serialize)]
pub struct ChatTranscript {
    pub session_id: String,
    pub turns: Vec<ChatTurn>,
}

/// Result structure for direct recommendations.
#[derive(Debug, Serialize)]
pub struct RecommendationList {
    pub mode: RecommendMode,
    pub results: Vec<RankedResult>,
}

/// Result structure for a comparison.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub phone_a: String,
    pub phone_b: String,
    pub comparison: ComparisonResult,
}

/// Result structure for model training.
#[derive(Debug, Serialize)]
pub struct TrainingSummary {
    pub output: String,
    pub samples: usize,
    pub labels: Vec<String>,
    pub training_accuracy: f64,
    pub duration_ms: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &PhonewiseArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            println!("{}", result.human());
        }
        OutputFormat::Json => output_json(result, args)?,
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PhonewiseArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl HumanOutput for ChatTranscript {
    fn human(&self) -> String {
        let mut out = format!("Session: {}\n", self.session_id);
        for turn in &self.turns {
            let _ = write!(
                out,
                "\n> {}\n[{}]\n{}\n",
                turn.message, turn.reply.intent, turn.reply.reply_text
            );
            if !turn.reply.metadata.quick_replies.is_empty() {
                let _ = writeln!(
                    out,
                    "Suggestions: {}",
                    turn.reply.metadata.quick_replies.join(" | ")
                );
            }
        }
        out.trim_end().to_string()
    }
}

impl HumanOutput for RecommendationList {
    fn human(&self) -> String {
        if self.results.is_empty() {
            return "No phones matched.".to_string();
        }

        let mut out = String::from("Recommendations:\n════════════════");
        for (i, result) in self.results.iter().enumerate() {
            let _ = write!(
                out,
                "\n{}. {} - {} (Score: {:.2})\n   {}",
                i + 1,
                result.entry.display_name(),
                format_price(result.entry.price),
                result.score,
                result.reason
            );
        }
        out
    }
}

impl HumanOutput for ComparisonReport {
    fn human(&self) -> String {
        let width = self
            .comparison
            .attributes
            .iter()
            .map(|a| a.label.len())
            .max()
            .unwrap_or(0);

        let mut out = format!("A: {}\nB: {}\n", self.phone_a, self.phone_b);
        for attr in &self.comparison.attributes {
            let mark = match attr.winner {
                Winner::A => "◀",
                Winner::B => "▶",
                Winner::Tie => "=",
                Winner::None => " ",
            };
            let _ = write!(
                out,
                "\n{:<width$}  {} {mark} {}",
                attr.label, attr.value_a, attr.value_b
            );
        }
        let (wins_a, wins_b) = self.comparison.win_counts();
        let verdict = match self.comparison.overall_winner {
            OverallWinner::A => self.phone_a.as_str(),
            OverallWinner::B => self.phone_b.as_str(),
            OverallWinner::Tie => "Tie",
        };
        let _ = write!(out, "\n\nWins: {wins_a} - {wins_b}\nOverall: {verdict}");
        out
    }
}

impl HumanOutput for TrainingSummary {
    fn human(&self) -> String {
        format!(
            "Model written to {}\nSamples: {}\nLabels: {}\nTraining accuracy: {:.1}%\nTraining time: {}ms",
            self.output,
            self.samples,
            self.labels.join(", "),
            self.training_accuracy * 100.0,
            self.duration_ms
        )
    }
}
