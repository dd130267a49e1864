mod utils;

use hreports::cli::{Commands, RenderArgs, RunArgs, Runner, SaveArgs};
use hreports::error::Error;
use hreports::Config;
use serde_json::json;
use test_log::test;
use utils::{FakeConverter, FakeQueryEngine, Workspace};

fn dispatch(runner: &Runner, hreport: &hreports::Hreport) -> (hreports::Result<()>, String) {
    let mut out = Vec::new();
    let result = runner.dispatch(hreport, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn config() -> serde_json::Value {
    json!({
        "global": { "ledger": "main.journal" },
        "reports": {
            "cash": { "query": "bal cash" },
            "broken": { "template": "missing.html", "query": "bal" },
            "income": { "query": "bal income" }
        }
    })
}

#[test]
fn test_list_prints_reports_in_file_order() {
    let ws = Workspace::new();
    let hreport = ws.engine(config(), FakeQueryEngine::echoing(), FakeConverter::default());
    let runner = Runner::new(ws.config_path(), Commands::List);
    let (result, out) = dispatch(&runner, &hreport);
    result.unwrap();
    assert_eq!(out, "cash\nbroken\nincome\n");
}

#[test]
fn test_run_prints_query_output() {
    let ws = Workspace::new();
    let hreport = ws.engine(config(), FakeQueryEngine::echoing(), FakeConverter::default());
    let runner = Runner::new(
        ws.config_path(),
        Commands::Run(RunArgs {
            report: Some("cash".into()),
            query: None,
            ledger: None,
            show_command: false,
        }),
    );
    let (result, out) = dispatch(&runner, &hreport);
    result.unwrap();
    assert_eq!(out, "-f main.journal bal cash");
}

#[test]
fn test_run_literal_query() {
    let ws = Workspace::new();
    let hreport = ws.engine(config(), FakeQueryEngine::echoing(), FakeConverter::default());
    let runner = Runner::new(
        ws.config_path(),
        Commands::Run(RunArgs {
            report: None,
            query: Some("reg food".into()),
            ledger: Some("food.journal".into()),
            show_command: true,
        }),
    );
    let (result, out) = dispatch(&runner, &hreport);
    result.unwrap();
    assert_eq!(out, "-f food.journal reg food");
}

#[test]
fn test_render_prints_document() {
    let ws = Workspace::new();
    let hreport =
        ws.engine(config(), FakeQueryEngine::returning("raw"), FakeConverter::default());
    let runner =
        Runner::new(ws.config_path(), Commands::Render(RenderArgs { report: "cash".into() }));
    let (result, out) = dispatch(&runner, &hreport);
    result.unwrap();
    assert_eq!(out, "raw");
}

#[test]
fn test_save_stops_at_first_failure() {
    let ws = Workspace::new();
    let hreport = ws.engine(config(), FakeQueryEngine::returning("x"), FakeConverter::default());
    let runner = Runner::new(
        ws.config_path(),
        Commands::Save(SaveArgs {
            reports: vec!["broken".into(), "cash".into()],
            keep_going: false,
        }),
    );
    let (result, out) = dispatch(&runner, &hreport);
    assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
    assert!(out.is_empty());
    assert!(ws.work_files().is_empty());
}

#[test]
fn test_save_keep_going_exports_the_rest() {
    let ws = Workspace::new();
    let hreport = ws.engine(config(), FakeQueryEngine::returning("x"), FakeConverter::default());
    let runner = Runner::new(
        ws.config_path(),
        Commands::Save(SaveArgs {
            reports: vec!["broken".into(), "cash".into(), "income".into()],
            keep_going: true,
        }),
    );
    let (result, out) = dispatch(&runner, &hreport);
    assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
    assert_eq!(out.lines().count(), 2);
    assert_eq!(ws.work_files(), vec!["cash.pdf", "income.pdf"]);
}

#[test]
fn test_runner_reports_missing_config_file() {
    let ws = Workspace::new();
    let runner = Runner::new(ws.root.path().join("absent.yml"), Commands::List);
    assert!(matches!(runner.run(), Err(Error::ConfigurationError(_))));
}

#[test]
fn test_yaml_config_file_loads() {
    let ws = Workspace::new();
    std::fs::write(
        ws.config_path(),
        "global:\n  ledger: main.journal\nreports:\n  cash:\n    query: bal cash\n",
    )
    .unwrap();
    let config = Config::load(ws.config_path()).unwrap();
    assert_eq!(config.report_names(), vec!["cash"]);
    assert_eq!(config.templates_dir(), ws.templates());
}
