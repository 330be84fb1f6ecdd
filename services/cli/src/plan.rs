use clap::Args;
use requiem_planner::catalog::Catalog;
use requiem_planner::config::PlannerConfig;
use requiem_planner::error::AppError;
use requiem_planner::planner::{detail_rows, EntryView, PlannerSession, PointsSummary, Selection};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct PlanArgs {
    /// Catalog JSON to plan against. Defaults to PLANNER_CATALOG.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Race id. Defaults to the first race in the catalog.
    #[arg(long)]
    pub(crate) group: Option<String>,
    /// Job id within the race. Defaults to the race's first job.
    #[arg(long)]
    pub(crate) job: Option<String>,
    /// Subclass id within the job. Defaults to the job's first subclass.
    #[arg(long)]
    pub(crate) spec: Option<String>,
    /// Character level (clamped to 1..=90). Defaults to PLANNER_LEVEL.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) level: Option<i64>,
    /// Read actions from a file; `#` starts a comment
    #[arg(long, conflicts_with = "actions")]
    pub(crate) script: Option<PathBuf>,
    /// Print the plan as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Include tooltip details for each skill
    #[arg(long)]
    pub(crate) details: bool,
    /// Actions applied in order: +ID, -ID, dna+ID, dna-ID, `level N`, reset.
    /// Put `--` before the first action that starts with a dash.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub(crate) actions: Vec<String>,
}

/// One allocation intent read from the command line or a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    IncreaseSkill(String),
    DecreaseSkill(String),
    IncreaseDna(String),
    DecreaseDna(String),
    Level(String),
    Reset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::IncreaseSkill(id) => write!(f, "+{id}"),
            Action::DecreaseSkill(id) => write!(f, "-{id}"),
            Action::IncreaseDna(id) => write!(f, "dna+{id}"),
            Action::DecreaseDna(id) => write!(f, "dna-{id}"),
            Action::Level(value) => write!(f, "level {value}"),
            Action::Reset => write!(f, "reset"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ActionOutcome {
    pub(crate) action: String,
    pub(crate) accepted: bool,
    pub(crate) reasons: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    selection: &'a Selection,
    points: PointsSummary,
    hint: &'static str,
    skills: Vec<EntryView>,
    dna: Vec<EntryView>,
    actions: Vec<ActionOutcome>,
}

pub(crate) fn run_plan(args: PlanArgs, config: &PlannerConfig) -> Result<(), AppError> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::load_or_empty(&config.catalog.path),
    };

    let tokens = match &args.script {
        Some(path) => parse_script(&fs::read_to_string(path)?),
        None => args.actions.clone(),
    };
    let actions = parse_actions(&tokens)?;

    let level = args.level.unwrap_or_else(|| i64::from(config.default_level));
    let mut session = PlannerSession::new(catalog).with_level(level);
    apply_selection(&mut session, &args)?;

    let outcomes: Vec<ActionOutcome> = actions
        .iter()
        .map(|action| apply(&mut session, action))
        .collect();
    let rejected = outcomes.iter().filter(|outcome| !outcome.accepted).count();
    info!(actions = outcomes.len(), rejected, "plan applied");

    if args.json {
        let report = PlanReport {
            selection: session.selection(),
            points: session.points(),
            hint: session.points().hint.label(),
            skills: session.skill_views(),
            dna: session.dna_views(),
            actions: outcomes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_plan(&session, &outcomes, args.details);
    }
    Ok(())
}

pub(crate) fn parse_script(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_actions(tokens: &[String]) -> Result<Vec<Action>, AppError> {
    let mut actions = Vec::new();
    let mut tokens = tokens.iter().map(String::as_str);

    while let Some(token) = tokens.next() {
        let action = match token {
            "reset" => Action::Reset,
            "level" => {
                let value = tokens
                    .next()
                    .ok_or_else(|| AppError::Input("`level` needs a value".to_string()))?;
                Action::Level(value.to_string())
            }
            _ => parse_entry_action(token)
                .ok_or_else(|| AppError::Input(format!("unknown action '{token}'")))?,
        };
        actions.push(action);
    }

    Ok(actions)
}

fn parse_entry_action(token: &str) -> Option<Action> {
    let (dna, rest) = match token.strip_prefix("dna") {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (increase, id) = match (rest.strip_prefix('+'), rest.strip_prefix('-')) {
        (Some(id), _) => (true, id),
        (None, Some(id)) => (false, id),
        (None, None) => return None,
    };
    if id.is_empty() {
        return None;
    }

    let id = id.to_string();
    Some(match (dna, increase) {
        (false, true) => Action::IncreaseSkill(id),
        (false, false) => Action::DecreaseSkill(id),
        (true, true) => Action::IncreaseDna(id),
        (true, false) => Action::DecreaseDna(id),
    })
}

fn apply_selection(session: &mut PlannerSession, args: &PlanArgs) -> Result<(), AppError> {
    if let Some(group) = &args.group {
        if !session.select_group(group) {
            return Err(AppError::Input(format!("unknown race '{group}'")));
        }
    }
    if let Some(job) = &args.job {
        if !session.select_job(job) {
            return Err(AppError::Input(format!(
                "job '{job}' is not part of the selected race"
            )));
        }
    }
    if let Some(spec) = &args.spec {
        if !session.select_spec(spec) {
            return Err(AppError::Input(format!(
                "subclass '{spec}' is not part of the selected job"
            )));
        }
    }
    Ok(())
}

pub(crate) fn apply(session: &mut PlannerSession, action: &Action) -> ActionOutcome {
    let (accepted, reasons) = match action {
        Action::IncreaseSkill(id) => {
            if session.increase_skill(id) {
                (true, Vec::new())
            } else if !has_skill(session, id) {
                (false, vec![format!("No skill {id} in this subclass")])
            } else {
                (false, session.explain_blocked(id))
            }
        }
        Action::DecreaseSkill(id) => {
            if session.decrease_skill(id) {
                (true, Vec::new())
            } else if !has_skill(session, id) {
                (false, vec![format!("No skill {id} in this subclass")])
            } else {
                (false, decrease_reasons(session, id))
            }
        }
        Action::IncreaseDna(id) => {
            let accepted = session.increase_dna(id);
            (accepted, dna_reasons(session, id, accepted, "Already at max level"))
        }
        Action::DecreaseDna(id) => {
            let accepted = session.decrease_dna(id);
            (accepted, dna_reasons(session, id, accepted, "Nothing invested"))
        }
        Action::Level(value) => {
            session.set_level_input(value);
            (true, Vec::new())
        }
        Action::Reset => {
            session.reset();
            (true, Vec::new())
        }
    };

    ActionOutcome {
        action: action.to_string(),
        accepted,
        reasons,
    }
}

fn has_skill(session: &PlannerSession, id: &str) -> bool {
    session.skills().iter().any(|skill| skill.id == id)
}

fn decrease_reasons(session: &PlannerSession, id: &str) -> Vec<String> {
    let blockers = session.decrease_blockers(id);
    if blockers.is_empty() {
        return vec!["Nothing invested".to_string()];
    }

    blockers
        .iter()
        .map(|dependent| {
            let name = session
                .skills()
                .iter()
                .find(|skill| &skill.id == dependent)
                .map_or(dependent.as_str(), |skill| skill.name.as_str());
            format!("Required by {name}")
        })
        .collect()
}

fn dna_reasons(session: &PlannerSession, id: &str, accepted: bool, blocked: &str) -> Vec<String> {
    if accepted {
        Vec::new()
    } else if session.dna().iter().any(|dna| dna.id == id) {
        vec![blocked.to_string()]
    } else {
        vec![format!("No DNA {id} in this subclass")]
    }
}

fn render_plan(session: &PlannerSession, outcomes: &[ActionOutcome], details: bool) {
    println!("Requiem skill plan");
    match selection_line(session) {
        Some(line) => println!("{line}"),
        None => println!("No subclass available (catalog is empty)"),
    }

    let points = session.points();
    println!(
        "{} | {} | {}",
        points.level_label(),
        points.skills_label(),
        points.dna_label()
    );
    println!("{}", points.hint.label());

    println!("\nSkills");
    for (skill, view) in session.skills().iter().zip(session.skill_views()) {
        println!("{}", entry_line(&view));
        if !view.can_increase {
            for reason in session.explain_blocked(&view.id) {
                println!("      ! {reason}");
            }
        }
        if details {
            for (label, value) in detail_rows(&skill.details) {
                println!("      {label}: {value}");
            }
        }
    }

    let dna = session.dna_views();
    if !dna.is_empty() {
        println!("\nDNA");
        for view in &dna {
            println!("{}", entry_line(view));
        }
    }

    if !outcomes.is_empty() {
        println!("\nActions");
        for outcome in outcomes {
            if outcome.accepted {
                println!("- {} ok", outcome.action);
            } else {
                println!("- {} rejected: {}", outcome.action, outcome.reasons.join("; "));
            }
        }
    }
}

fn selection_line(session: &PlannerSession) -> Option<String> {
    let selection = session.selection();
    let group_id = selection.group_id.as_deref()?;
    let group = session
        .catalog()
        .groups
        .iter()
        .find(|group| group.id == group_id)?;
    let job = session
        .jobs()
        .iter()
        .find(|job| Some(job.id.as_str()) == selection.job_id.as_deref())?;
    let spec = job
        .specs
        .iter()
        .find(|spec| Some(spec.id.as_str()) == selection.spec_id.as_deref())?;

    Some(format!("{} / {} / {}", group.name, job.name, spec.name))
}

fn entry_line(view: &EntryView) -> String {
    let increase = if view.can_increase { '+' } else { ' ' };
    let decrease = if view.can_decrease { '-' } else { ' ' };
    format!(
        "  [{increase}{decrease}] {:<8} {:<28} {}",
        view.id,
        view.name,
        view.badge()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|token| token.to_string()).collect()
    }

    fn session() -> PlannerSession {
        let catalog = Catalog::from_value(&json!({
            "groups": [{"id": "g", "name": "Xenoa"}],
            "jobs": {"g": [{"id": "j", "name": "Magician", "specs": [{"id": "s", "name": "Elementalist"}]}]},
            "skills": {"s": [
                {"id": "1", "name": "Fire Ball"},
                {"id": "2", "name": "Fire Wall",
                 "requires": {"required skill": {"id": "1", "level": 2}}}
            ]},
            "dna": {"s": [{"id": "d", "name": "Focus", "maxLevel": 1}]}
        }));
        PlannerSession::new(catalog).with_level(10)
    }

    #[test]
    fn parses_every_action_form() {
        let actions = parse_actions(&tokens(&[
            "+1", "-1", "dna+d", "dna-d", "level", "35", "reset",
        ]))
        .expect("actions parse");

        assert_eq!(
            actions,
            vec![
                Action::IncreaseSkill("1".to_string()),
                Action::DecreaseSkill("1".to_string()),
                Action::IncreaseDna("d".to_string()),
                Action::DecreaseDna("d".to_string()),
                Action::Level("35".to_string()),
                Action::Reset,
            ]
        );
        assert_eq!(actions[2].to_string(), "dna+d");
    }

    #[test]
    fn rejects_unknown_and_incomplete_actions() {
        match parse_actions(&tokens(&["*1"])) {
            Err(AppError::Input(message)) => assert_eq!(message, "unknown action '*1'"),
            other => panic!("expected input error, got {other:?}"),
        }
        assert!(parse_actions(&tokens(&["+"])).is_err());
        assert!(parse_actions(&tokens(&["level"])).is_err());
    }

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let script = "# opener\n+1 +1\n\nlevel 20 # catch up\n  dna+d\n";
        assert_eq!(parse_script(script), tokens(&["+1", "+1", "level", "20", "dna+d"]));
    }

    #[test]
    fn outcomes_explain_rejections() {
        let mut session = session();

        let blocked = apply(&mut session, &Action::IncreaseSkill("2".to_string()));
        assert!(!blocked.accepted);
        assert_eq!(blocked.reasons, vec!["Requires Fire Ball Lv.2".to_string()]);

        for _ in 0..2 {
            assert!(apply(&mut session, &Action::IncreaseSkill("1".to_string())).accepted);
        }
        assert!(apply(&mut session, &Action::IncreaseSkill("2".to_string())).accepted);

        let held = apply(&mut session, &Action::DecreaseSkill("1".to_string()));
        assert_eq!(held.reasons, vec!["Required by Fire Wall".to_string()]);

        let missing = apply(&mut session, &Action::IncreaseSkill("9".to_string()));
        assert_eq!(missing.reasons, vec!["No skill 9 in this subclass".to_string()]);
    }

    #[test]
    fn dna_and_level_actions() {
        let mut session = session();

        assert!(apply(&mut session, &Action::IncreaseDna("d".to_string())).accepted);
        let capped = apply(&mut session, &Action::IncreaseDna("d".to_string()));
        assert_eq!(capped.reasons, vec!["Already at max level".to_string()]);

        assert!(apply(&mut session, &Action::Level("120".to_string())).accepted);
        assert_eq!(session.level(), 90);

        assert!(apply(&mut session, &Action::Reset).accepted);
        assert!(session.allocation().is_empty());
    }

    #[test]
    fn selection_line_names_the_path() {
        assert_eq!(
            selection_line(&session()).as_deref(),
            Some("Xenoa / Magician / Elementalist")
        );
        assert_eq!(selection_line(&PlannerSession::new(Catalog::empty())), None);
    }
}
