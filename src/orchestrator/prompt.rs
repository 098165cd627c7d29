//! Run plan collection from CLI presets or interactive prompts.

use std::io::{self, BufRead, Write};

use crate::actions::{Action, Pipeline, RunPlan};
use crate::blockchain::types::parse_amount;
use crate::orchestrator::{RunError, RunResult};

/// Line-oriented user interaction.
pub trait Prompter {
    /// Print an informational line.
    fn show(&mut self, line: &str);

    /// Print `question` and read one answer line.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompts on stdout, answers from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn show(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{}", question);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }
}

/// Answers supplied up front (CLI flags); missing ones are prompted for.
#[derive(Debug, Default, Clone)]
pub struct PlanPreset {
    pub auto_restart: Option<String>,
    pub action: Option<String>,
    pub amount: Option<String>,
    pub repeat: Option<String>,
}

/// Build the run plan, prompting for anything `preset` leaves open.
pub fn collect_plan<P: Prompter>(prompter: &mut P, preset: &PlanPreset, pipeline: &Pipeline) -> RunResult<RunPlan> {
    let answer = answer_or_ask(
        prompter,
        &preset.auto_restart,
        "Do you want to auto-restart the process after completion? (y/n): ",
    )?;
    let auto_restart = parse_yes_no(&answer)?;

    let action = match &preset.action {
        Some(choice) => choice.parse::<Action>()?,
        None => {
            for action in Action::ALL {
                prompter.show(&format!("{}. {}", action.menu_number(), action.menu_label(pipeline)));
            }
            prompter.ask("Please select an option (1/2/3/4/5): ")?.parse::<Action>()?
        }
    };

    let mut plan = RunPlan::new(action);
    plan.auto_restart = auto_restart;

    if action.needs_amount() {
        let question = format!(
            "How many {} would you like to convert to {}? (Example: 0.01) ",
            pipeline.native_symbol, pipeline.source_symbol
        );
        let answer = answer_or_ask(prompter, &preset.amount, &question)?;
        plan.native_amount = parse_amount(&answer).map_err(RunError::InvalidInput)?;
    }

    if action.needs_repeat_count() {
        let answer = answer_or_ask(
            prompter,
            &preset.repeat,
            "How many transactions would you like to execute per account? ",
        )?;
        plan.repeat_count = parse_repeat_count(&answer)?;
    }

    Ok(plan)
}

fn answer_or_ask<P: Prompter>(prompter: &mut P, preset: &Option<String>, question: &str) -> RunResult<String> {
    match preset {
        Some(answer) => Ok(answer.clone()),
        None => Ok(prompter.ask(question)?),
    }
}

pub fn parse_yes_no(answer: &str) -> RunResult<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        other => Err(RunError::InvalidInput(format!(
            "Invalid input '{}'. Please enter 'y' or 'n'.",
            other
        ))),
    }
}

pub fn parse_repeat_count(answer: &str) -> RunResult<u32> {
    match answer.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RunError::InvalidInput(format!(
            "Invalid transaction count '{}'. Please enter a positive whole number.",
            answer.trim()
        ))),
    }
}
