//! Instance input and schedule output.
//!
//! # Fact format
//!
//! One fact per line. `%` starts a comment that runs to the end of the
//! line. Lines that do not open one of the facts below are ignored; a line
//! that opens one must be well formed.
//!
//! ```text
//! test( 't1', 2, ['m1', 'm2'], ['r1']).
//! test( 't2', 1, [], []).
//! embedded_board( 'm1').
//! embedded_board( 'm2').
//! resource( 'r1', 1).
//! ```
//!
//! `test` declares a task (id, duration, allowed machines, required
//! resources), `embedded_board` a machine, `resource` an exclusive global
//! resource with capacity 1. Atoms may be single-quoted, double-quoted, or
//! bare.
//!
//! # JSON format
//!
//! The serde form of [`InstanceSpec`].
//!
//! # Output
//!
//! One line per decision, in recorded order: `'task',start,'machine'.`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{GlobalResource, InstanceSpec, Machine, SchedulingResult, Task};

/// Textual encodings of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceFormat {
    /// Prolog-style facts.
    Fact,
    /// JSON document.
    Json,
}

impl InstanceFormat {
    /// Guesses the format from a file extension (`.json` → JSON, else facts).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InstanceFormat::Json,
            _ => InstanceFormat::Fact,
        }
    }
}

impl FromStr for InstanceFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fact" | "facts" | "pl" => Ok(InstanceFormat::Fact),
            "json" => Ok(InstanceFormat::Json),
            _ => Err(format!("Invalid instance format: {s}")),
        }
    }
}

/// Parses an instance in the given format.
pub fn parse_instance(text: &str, format: InstanceFormat) -> Result<InstanceSpec> {
    match format {
        InstanceFormat::Fact => parse_facts(text),
        InstanceFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

/// Reads and parses an instance file.
pub fn read_instance(path: &Path, format: InstanceFormat) -> Result<InstanceSpec> {
    let text = fs::read_to_string(path)?;
    parse_instance(&text, format)
}

/// Parses the fact format.
pub fn parse_facts(text: &str) -> Result<InstanceSpec> {
    let mut spec = InstanceSpec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let err = |message: String| ScheduleError::Parse { line, message };
        let Some((name, body)) = fact_body(strip_comment(raw).trim()).map_err(err)? else {
            continue;
        };

        if name == "test" {
            let args = split_top_level(body).map_err(err)?;
            let [id, duration, machines, resources] = args.as_slice() else {
                return Err(err(format!("test/4 expects 4 arguments, got {}", args.len())));
            };
            let duration: u64 = duration
                .trim()
                .parse()
                .map_err(|_| err(format!("invalid duration '{}'", duration.trim())))?;
            spec.tasks.push(Task {
                id: parse_atom(id).map_err(err)?,
                duration,
                allowed_machines: parse_list(machines).map_err(err)?,
                required_resources: parse_list(resources).map_err(err)?,
            });
        } else if name == "embedded_board" {
            let args = split_top_level(body).map_err(err)?;
            let [id] = args.as_slice() else {
                return Err(err(format!(
                    "embedded_board/1 expects 1 argument, got {}",
                    args.len()
                )));
            };
            spec.machines.push(Machine::new(parse_atom(id).map_err(err)?));
        } else {
            let args = split_top_level(body).map_err(err)?;
            let id = match args.as_slice() {
                [id] => id,
                [id, capacity] => {
                    if capacity.trim() != "1" {
                        return Err(err(format!(
                            "resource capacity must be 1, got '{}'",
                            capacity.trim()
                        )));
                    }
                    id
                }
                _ => {
                    return Err(err(format!(
                        "resource/2 expects 1 or 2 arguments, got {}",
                        args.len()
                    )))
                }
            };
            spec.resources
                .push(GlobalResource::new(parse_atom(id).map_err(err)?));
        }
    }

    Ok(spec)
}

/// Renders an instance in the fact format.
pub fn format_facts(spec: &InstanceSpec) -> String {
    let list = |items: &[String]| {
        let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
        format!("[{}]", quoted.join(", "))
    };

    let mut out = String::new();
    for t in &spec.tasks {
        out.push_str(&format!(
            "test( '{}', {}, {}, {}).\n",
            t.id,
            t.duration,
            list(&t.allowed_machines),
            list(&t.required_resources)
        ));
    }
    for m in &spec.machines {
        out.push_str(&format!("embedded_board( '{}').\n", m.id));
    }
    for r in &spec.resources {
        out.push_str(&format!("resource( '{}', 1).\n", r.id));
    }
    out
}

/// Writes decision lines in recorded order.
pub fn write_schedule<W: Write>(mut writer: W, result: &SchedulingResult) -> Result<()> {
    for line in result.lines() {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Default output path: `res-<file name>` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("res-{name}"))
}

const FACTS: [&str; 3] = ["test", "embedded_board", "resource"];

/// Splits `name( ... ).` into the fact name and its argument text.
///
/// `Ok(None)` when the line does not open a known fact; an error when it
/// opens one but never closes it.
fn fact_body(line: &str) -> std::result::Result<Option<(&'static str, &str)>, String> {
    for name in FACTS {
        let Some(rest) = line
            .strip_prefix(name)
            .and_then(|r| r.trim_start().strip_prefix('('))
        else {
            continue;
        };
        let rest = rest.trim_end();
        let rest = rest.strip_suffix('.').unwrap_or(rest).trim_end();
        return match rest.strip_suffix(')') {
            Some(body) => Ok(Some((name, body))),
            None => Err(format!("{name} fact is missing its closing ')'")),
        };
    }
    Ok(None)
}

/// Cuts a `%` comment that is not inside a quoted atom.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '%') => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Splits on commas outside brackets and quotes.
fn split_top_level(s: &str) -> std::result::Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced ']' in '{s}'"))?;
            }
            (None, ',') if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(format!("unterminated quote in '{s}'"));
    }
    if depth != 0 {
        return Err(format!("unbalanced '[' in '{s}'"));
    }
    let last = &s[start..];
    if !(parts.is_empty() && last.trim().is_empty()) {
        parts.push(last);
    }
    Ok(parts)
}

fn parse_atom(s: &str) -> std::result::Result<String, String> {
    let s = s.trim();
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            if inner.is_empty() {
                return Err("empty identifier".to_string());
            }
            return Ok(inner.to_string());
        }
    }
    if s.is_empty() || s.contains(|c: char| c.is_whitespace() || "[]()'\",".contains(c)) {
        return Err(format!("invalid identifier '{s}'"));
    }
    Ok(s.to_string())
}

fn parse_list(s: &str) -> std::result::Result<Vec<String>, String> {
    let s = s.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(|| format!("expected a list, got '{s}'"))?;
    split_top_level(inner)?
        .into_iter()
        .map(parse_atom)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::Strategy;
    use crate::models::ScheduleDecision;
    use crate::scheduler::GreedyScheduler;

    const SAMPLE: &str = "\
% three tests, one board
test( 't1', 2, [], []).
test( 't2', 1, [], []).
test( 't3', 3, [], ['r1']).
embedded_board( 'm1').
resource( 'r1', 1).
";

    #[test]
    fn test_parse_sample() {
        let spec = parse_facts(SAMPLE).unwrap();
        assert_eq!(spec.tasks.len(), 3);
        assert_eq!(spec.tasks[2], Task::new("t3", 3).with_resource("r1"));
        assert_eq!(spec.machines, vec![Machine::new("m1")]);
        assert_eq!(spec.resources, vec![GlobalResource::new("r1")]);
    }

    #[test]
    fn test_sample_schedules_to_makespan_six() {
        let inst = parse_facts(SAMPLE).unwrap().build().unwrap();
        let result = GreedyScheduler::new()
            .run_strategy(&inst, Strategy::ShortestFirst)
            .unwrap();
        let lines: Vec<String> = result.lines().collect();
        assert_eq!(lines, vec!["'t2',0,'m1'.", "'t1',1,'m1'.", "'t3',3,'m1'."]);
    }

    #[test]
    fn test_parse_multi_element_lists_and_quotes() {
        let spec = parse_facts(r#"test( "a b", 4, ['m1', m2 ,"m3"], [r1,'r2'])."#).unwrap();
        let t = &spec.tasks[0];
        assert_eq!(t.id, "a b");
        assert_eq!(t.allowed_machines, vec!["m1", "m2", "m3"]);
        assert_eq!(t.required_resources, vec!["r1", "r2"]);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let text = "embedded_board( 'm1').\ntest( 't1', x, [], []).\n";
        match parse_facts(text).unwrap_err() {
            ScheduleError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("duration"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_arity_and_capacity() {
        assert!(parse_facts("test( 't1', 1, []).").is_err());
        assert!(parse_facts("resource( 'r1', 2).").is_err());
        assert!(parse_facts("embedded_board( 'm1', 'm2').").is_err());
        assert!(parse_facts("test( 't1', 1, ['m1', [], []).").is_err());
    }

    #[test]
    fn test_unterminated_fact_is_an_error() {
        let text = "test( 't1', 2, [], []).\ntest( 't2', 1, [], []\nembedded_board( 'm1').\n";
        match parse_facts(text).unwrap_err() {
            ScheduleError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("closing"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_facts("embedded_board ( 'm1'").is_err());
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let text = "test( 't1', 2, [], []). % build step\nembedded_board( 'm1').%\n";
        let spec = parse_facts(text).unwrap();
        assert_eq!(spec.tasks, vec![Task::new("t1", 2)]);
        assert_eq!(spec.machines, vec![Machine::new("m1")]);

        let spec = parse_facts("test( '50%', 1, [], []).").unwrap();
        assert_eq!(spec.tasks[0].id, "50%");
    }

    #[test]
    fn test_non_facts_ignored() {
        let spec = parse_facts("\n% comment\ntesting( 'x').\nfoo.\n").unwrap();
        assert_eq!(spec, InstanceSpec::new());
    }

    #[test]
    fn test_format_then_parse() {
        let spec = InstanceSpec::new()
            .with_task(Task::new("t1", 2).with_machines(["m1", "m2"]).with_resource("r1"))
            .with_task(Task::new("t2", 5))
            .with_machine("m1")
            .with_machine("m2")
            .with_resource("r1");
        assert_eq!(parse_facts(&format_facts(&spec)).unwrap(), spec);
    }

    #[test]
    fn test_parse_json() {
        let spec = parse_instance(
            r#"{"tasks":[{"id":"t1","duration":1}],"machines":["m1"]}"#,
            InstanceFormat::Json,
        )
        .unwrap();
        assert_eq!(spec.tasks[0].id, "t1");
        assert!(spec.resources.is_empty());
        assert!(matches!(
            parse_instance("{", InstanceFormat::Json),
            Err(ScheduleError::Json(_))
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(InstanceFormat::from_path(Path::new("x.JSON")), InstanceFormat::Json);
        assert_eq!(InstanceFormat::from_path(Path::new("x.pl")), InstanceFormat::Fact);
        assert_eq!("json".parse::<InstanceFormat>().unwrap(), InstanceFormat::Json);
        assert!("yaml".parse::<InstanceFormat>().is_err());
    }

    #[test]
    fn test_write_schedule() {
        let mut result = SchedulingResult::new();
        result.add_decision(ScheduleDecision::new("t2", 0, "m1", 1));
        result.add_decision(ScheduleDecision::new("t1", 1, "m1", 2));
        let mut buf = Vec::new();
        write_schedule(&mut buf, &result).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "'t2',0,'m1'.\n't1',1,'m1'.\n");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/inst1.txt")),
            PathBuf::from("data/res-inst1.txt")
        );
    }
}
