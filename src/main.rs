use anyhow::Context;
use clap::Parser;
use disk_planner::assistant::{generate_prompt, is_read_only_select};
use disk_planner::config::Command;
use disk_planner::utils::{logger, validation::validate_path};
use disk_planner::{CliConfig, DiskPlanError, DiskPlanner, RateCard, Scenario};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(err) = run(config) {
        let exit_code = match err.downcast_ref::<DiskPlanError>() {
            Some(e) => {
                tracing::error!(
                    "❌ {:#} (Category: {:?}, Severity: {:?})",
                    err,
                    e.category(),
                    e.severity()
                );
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                // invalid proposals are reported in the JSON and still exit 0
                e.severity().exit_code()
            }
            None => {
                tracing::error!("❌ {:#}", err);
                eprintln!("❌ {:#}", err);
                1
            }
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: CliConfig) -> anyhow::Result<()> {
    let rates = match &config.rates {
        Some(path) => {
            validate_path("rates", path)?;
            RateCard::from_file(path)
                .with_context(|| format!("loading rate card {}", path.display()))?
        }
        None => RateCard::default(),
    };
    let planner = DiskPlanner::new(rates);

    match config.command {
        Command::Ranges {
            storage_type,
            size,
            iops,
        } => {
            let report = planner.ranges(storage_type, size, iops);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Evaluate { scenario } => {
            validate_path("scenario", &scenario)?;
            let loaded = Scenario::from_file(&scenario)
                .with_context(|| format!("loading scenario {}", scenario.display()))?;
            let view = planner.evaluate(&loaded);
            println!("{}", serde_json::to_string_pretty(&view)?);

            if !view.errors.is_empty() {
                let message = view
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(DiskPlanError::ValidationError { message }.into());
            }
        }
        Command::CheckSql { query } => {
            let read_only = is_read_only_select(&query);
            tracing::debug!(read_only, "classified query");
            println!("{}", if read_only { "read-only" } else { "not read-only" });
        }
        Command::Prompt {
            kind,
            context,
            schemas,
            tables,
        } => {
            println!("{}", generate_prompt(kind, context, &schemas, &tables));
        }
    }

    Ok(())
}
