pub mod rate_card;
pub mod scenario;

pub use rate_card::RateCard;
pub use scenario::{ProposedChanges, Scenario};

#[cfg(feature = "cli")]
use crate::assistant::{AssistantEntity, QuickPromptKind, TableRef};
#[cfg(feature = "cli")]
use crate::domain::model::StorageType;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "disk-planner")]
#[command(about = "Plan database disk changes: valid ranges, price deltas and SQL helpers")]
pub struct CliConfig {
    /// TOML rate card overriding the built-in limits and prices
    #[arg(long, global = true)]
    pub rates: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the IOPS and throughput ranges for a disk
    Ranges {
        #[arg(long)]
        storage_type: StorageType,
        #[arg(long)]
        size: f64,
        /// Provisioned IOPS used to derive the throughput range
        #[arg(long)]
        iops: Option<f64>,
    },
    /// Apply the proposed changes of a scenario file and print the result as JSON
    Evaluate {
        #[arg(long)]
        scenario: PathBuf,
    },
    /// Check whether a query is a plain read-only select
    CheckSql { query: String },
    /// Print an assistant quick prompt
    Prompt {
        #[arg(long)]
        kind: QuickPromptKind,
        #[arg(long)]
        context: AssistantEntity,
        #[arg(long = "schema")]
        schemas: Vec<String>,
        /// Table as schema.name, repeatable
        #[arg(long = "table")]
        tables: Vec<TableRef>,
    },
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ranges_command() {
        let config = CliConfig::parse_from([
            "disk-planner",
            "ranges",
            "--storage-type",
            "gp3",
            "--size",
            "100",
            "--verbose",
        ]);
        assert!(config.verbose);
        match config.command {
            Command::Ranges {
                storage_type,
                size,
                iops,
            } => {
                assert_eq!(storage_type, StorageType::Gp3);
                assert_eq!(size, 100.0);
                assert_eq!(iops, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_prompt_command() {
        let config = CliConfig::parse_from([
            "disk-planner",
            "prompt",
            "--kind",
            "suggest",
            "--context",
            "rls-policies",
            "--schema",
            "public",
            "--table",
            "public.todos",
        ]);
        match config.command {
            Command::Prompt {
                kind,
                context,
                schemas,
                tables,
            } => {
                assert_eq!(kind, QuickPromptKind::Suggest);
                assert_eq!(context, AssistantEntity::RlsPolicies);
                assert_eq!(schemas, vec!["public".to_string()]);
                assert_eq!(tables[0].name, "todos");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_storage_type_is_rejected() {
        let result = CliConfig::try_parse_from([
            "disk-planner",
            "ranges",
            "--storage-type",
            "st1",
            "--size",
            "100",
        ]);
        assert!(result.is_err());
    }
}
