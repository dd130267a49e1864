use crate::{
    cli::args::{Cli, Commands, RunArgs, SaveArgs},
    config::Config,
    error::{Error, Result},
    query::Query,
    report::Hreport,
};
use std::io::Write;
use std::path::PathBuf;

/// Main CLI runner that loads the configuration and dispatches one command
pub struct Runner {
    config: PathBuf,
    command: Commands,
}

impl Runner {
    pub fn new(config: PathBuf, command: Commands) -> Self {
        Self { config, command }
    }

    /// Loads the configuration and runs the command with the default tools
    pub fn run(self) -> Result<()> {
        let config = Config::load(&self.config)?;
        let engine = Hreport::new(config);
        let stdout = std::io::stdout();
        self.dispatch(&engine, &mut stdout.lock())
    }

    /// Runs the command against `engine`, writing results to `out`
    pub fn dispatch(&self, engine: &Hreport, out: &mut impl Write) -> Result<()> {
        match &self.command {
            Commands::List => {
                for name in engine.config().report_names() {
                    writeln!(out, "{name}")?;
                }
                Ok(())
            }
            Commands::Run(args) => self.run_query(engine, args, out),
            Commands::Render(args) => {
                let document = engine.render(&args.report)?;
                write!(out, "{document}")?;
                Ok(())
            }
            Commands::Save(args) => self.save(engine, args, out),
        }
    }

    fn run_query(&self, engine: &Hreport, args: &RunArgs, out: &mut impl Write) -> Result<()> {
        let query = match (&args.report, &args.query) {
            (_, Some(query)) => Query::Literal { query, ledger: args.ledger.as_deref() },
            (Some(report), None) => Query::Report(report),
            (None, None) => {
                return Err(Error::ConfigurationError(
                    "either a report or a query is required".into(),
                ))
            }
        };

        let output = engine.run_query(query)?;
        if args.show_command {
            eprintln!("{}", output.command);
        }
        write!(out, "{}", output.stdout)?;
        Ok(())
    }

    /// Exports each report in turn. Without `--keep-going` the first failure
    /// stops the batch; with it, failures are logged and the first is returned
    /// once every report has been attempted.
    fn save(&self, engine: &Hreport, args: &SaveArgs, out: &mut impl Write) -> Result<()> {
        let mut first_failure = None;
        for name in &args.reports {
            match engine.save(name) {
                Ok(path) => writeln!(out, "{}", path.display())?,
                Err(e) if args.keep_going => {
                    log::error!("Report '{name}' failed: {e}");
                    first_failure.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}

/// Runs the command line with the default external tools.
pub fn run(cli: Cli) -> Result<()> {
    Runner::new(cli.config, cli.command).run()
}
