//! Titles, placeholders and quick prompts for the SQL assistant panel.

use crate::utils::error::DiskPlanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

const PLACEHOLDER_PREFIX: &str = "-- Press tab to use this code\n\n&nbsp;\n";
const PLACEHOLDER_LIMIT: &str = "Just three examples will do.";

const FUNCTIONS_DOCS: &str = "https://supabase.com/docs/guides/database/functions";
const RLS_DOCS: &str = "https://supabase.com/docs/guides/database/postgres/row-level-security";

/// Editors the assistant can be opened from. `None` in the APIs below means
/// the generic SQL scratch pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistantEntity {
    Functions,
    RlsPolicies,
}

impl AssistantEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantEntity::Functions => "functions",
            AssistantEntity::RlsPolicies => "rls-policies",
        }
    }
}

impl fmt::Display for AssistantEntity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistantEntity {
    type Err = DiskPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "functions" => Ok(AssistantEntity::Functions),
            "rls-policies" => Ok(AssistantEntity::RlsPolicies),
            other => Err(DiskPlanError::UnknownVariant {
                kind: "assistant context",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickPromptKind {
    Examples,
    Ask,
    Suggest,
}

impl FromStr for QuickPromptKind {
    type Err = DiskPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "examples" => Ok(QuickPromptKind::Examples),
            "ask" => Ok(QuickPromptKind::Ask),
            "suggest" => Ok(QuickPromptKind::Suggest),
            other => Err(DiskPlanError::UnknownVariant {
                kind: "prompt kind",
                value: other.to_string(),
            }),
        }
    }
}

/// The function or policy being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl FromStr for TableRef {
    type Err = DiskPlanError;

    /// Parses `schema.name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => Ok(TableRef {
                schema: schema.to_string(),
                name: name.to_string(),
            }),
            _ => Err(DiskPlanError::InvalidConfigValueError {
                field: "table".to_string(),
                value: s.to_string(),
                reason: "Expected <schema>.<name>".to_string(),
            }),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

pub fn generate_title(editor: Option<AssistantEntity>, entity: Option<&DatabaseEntity>) -> String {
    match (editor, entity) {
        (Some(AssistantEntity::Functions), None) => "Create a new function".to_string(),
        (Some(AssistantEntity::Functions), Some(entity)) => format!("Edit function: {}", entity.name),
        (Some(AssistantEntity::RlsPolicies), None) => "Create a new RLS policy".to_string(),
        (Some(AssistantEntity::RlsPolicies), Some(entity)) => {
            format!("Edit RLS policy: {}", entity.name)
        }
        (None, _) => "SQL Scratch Pad".to_string(),
    }
}

pub fn generate_cta(editor: Option<AssistantEntity>) -> &'static str {
    match editor {
        Some(AssistantEntity::Functions) => "Save function",
        Some(AssistantEntity::RlsPolicies) => "Save policy",
        None => "Run query",
    }
}

/// Markdown placeholder shown in an empty editor. Lines are separated by a
/// blank line so the markdown renderer keeps them apart.
pub fn generate_placeholder(
    editor: Option<AssistantEntity>,
    entity: Option<&DatabaseEntity>,
    existing_definition: Option<&str>,
) -> Option<String> {
    match (editor?, entity) {
        (AssistantEntity::Functions, None) => Some(placeholder(&[
            "CREATE FUNCTION *schema*.*function_name*(*param1 type*, *param2 type*)",
            "&nbsp;&nbsp;RETURNS *return_type*",
            "&nbsp;&nbsp;LANGUAGE *plpgsql*",
            "&nbsp;&nbsp;SECURITY DEFINER",
            "&nbsp;&nbsp;SET *search_path = ''*",
            "AS $$",
            "DECLARE",
            "&nbsp;&nbsp;*-- Variable declarations*",
            "BEGIN",
            "&nbsp;&nbsp;*-- Function logic*",
            "END;",
            "$$;",
        ])),
        (AssistantEntity::Functions, Some(entity)) => {
            let rename = format!("ALTER FUNCTION *{}* RENAME TO *new_name*;", entity.name);
            let set_schema = format!("ALTER FUNCTION *{}* SET SCHEMA *new_schema*;", entity.name);
            // an unknown definition leaves the last line blank
            let definition = format_definition(existing_definition.unwrap_or_default());
            Some(placeholder(&[
                "-- To rename the function",
                rename.as_str(),
                "&nbsp;",
                "-- To change the schema of the function",
                set_schema.as_str(),
                "&nbsp;",
                "-- To update the function body or the arguments, use",
                "-- the create or replace statement instead",
                definition.as_str(),
            ]))
        }
        (AssistantEntity::RlsPolicies, _) => Some(placeholder(&[
            "CREATE POLICY *name* ON *table_name*",
            "AS PERMISSIVE -- PERMISSIVE | RESTRICTIVE",
            "FOR ALL -- ALL | SELECT | INSERT | UPDATE | DELETE",
            "TO *role_name* -- Default: public",
            "USING ( *using_expression* )",
            "WITH CHECK ( *check_expression* );",
        ])),
    }
}

fn placeholder(lines: &[&str]) -> String {
    format!("{}\n{}\n", PLACEHOLDER_PREFIX, lines.join("\n\n"))
}

fn format_definition(definition: &str) -> String {
    definition
        .replace("\n ", "\n  &nbsp;&nbsp;")
        .replace('\n', "\n\n")
        .trim()
        .to_string()
}

pub fn retrieve_docs_url(editor: Option<AssistantEntity>) -> Option<Url> {
    let raw = match editor? {
        AssistantEntity::Functions => FUNCTIONS_DOCS,
        AssistantEntity::RlsPolicies => RLS_DOCS,
    };
    Url::parse(raw).ok()
}

/// Loose check that the query matches the editor it will be saved from.
pub fn validate_query(editor: Option<AssistantEntity>, query: &str) -> bool {
    let formatted = query.to_lowercase().replace('\n', " ");

    match editor {
        Some(AssistantEntity::Functions) => {
            formatted.contains("create function") || formatted.contains("create or replace function")
        }
        Some(AssistantEntity::RlsPolicies) => formatted.contains("create policy"),
        None => true,
    }
}

pub fn generate_prompt(
    kind: QuickPromptKind,
    context: AssistantEntity,
    schemas: &[String],
    tables: &[TableRef],
) -> String {
    match kind {
        QuickPromptKind::Examples => format!(
            "What are some common examples of user-defined database {}? {}",
            context, PLACEHOLDER_LIMIT
        ),
        QuickPromptKind::Ask => {
            format!("Could you explain to me what are user-defined database {}?", context)
        }
        QuickPromptKind::Suggest => {
            let (output, suffix) = match context {
                AssistantEntity::Functions => (
                    "user-defined database functions",
                    "Let me know for which tables each function will be useful",
                ),
                AssistantEntity::RlsPolicies => ("RLS policies", ""),
            };
            let base_prompt = format!("Suggest some {} that might be useful", output);

            if !tables.is_empty() && !schemas.is_empty() {
                let tables = tables
                    .iter()
                    .map(TableRef::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                format!(
                    "{} for the following tables within this database: {}. {} {}",
                    base_prompt, tables, PLACEHOLDER_LIMIT, suffix
                )
                .trim()
                .to_string()
            } else if !schemas.is_empty() {
                format!(
                    "{} for the tables in the following schemas within this database: {}. {}",
                    base_prompt,
                    schemas.join(", "),
                    suffix
                )
                .trim()
                .to_string()
            } else {
                base_prompt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str) -> DatabaseEntity {
        DatabaseEntity {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_titles_and_ctas() {
        assert_eq!(generate_title(Some(AssistantEntity::Functions), None), "Create a new function");
        assert_eq!(
            generate_title(Some(AssistantEntity::RlsPolicies), Some(&entity("owner_only"))),
            "Edit RLS policy: owner_only"
        );
        assert_eq!(generate_title(None, Some(&entity("ignored"))), "SQL Scratch Pad");
        assert_eq!(generate_cta(Some(AssistantEntity::RlsPolicies)), "Save policy");
        assert_eq!(generate_cta(None), "Run query");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(generate_placeholder(None, None, None), None);

        let create = generate_placeholder(Some(AssistantEntity::Functions), None, None).unwrap();
        assert!(create.starts_with("-- Press tab to use this code\n\n&nbsp;\n\nCREATE FUNCTION"));
        assert!(create.ends_with("END;\n\n$$;\n"));

        let policy = generate_placeholder(Some(AssistantEntity::RlsPolicies), None, None).unwrap();
        assert!(policy.contains("CREATE POLICY *name* ON *table_name*\n\nAS PERMISSIVE"));
    }

    #[test]
    fn test_edit_placeholder_embeds_definition() {
        let definition = "create function public.hello()\n returns text\nas $$ select 'hi' $$;\n";
        let text = generate_placeholder(
            Some(AssistantEntity::Functions),
            Some(&entity("hello")),
            Some(definition),
        )
        .unwrap();
        assert!(text.contains("ALTER FUNCTION *hello* RENAME TO *new_name*;"));
        assert!(text.contains(
            "create function public.hello()\n\n  &nbsp;&nbsp;returns text\n\nas $$ select 'hi' $$;\n"
        ));
    }

    #[test]
    fn test_edit_placeholder_without_definition_ends_blank() {
        let text =
            generate_placeholder(Some(AssistantEntity::Functions), Some(&entity("hello")), None)
                .unwrap();
        assert!(text.ends_with("-- the create or replace statement instead\n\n\n"));
        assert!(!text.contains("undefined"));
    }

    #[test]
    fn test_docs_url() {
        let url = retrieve_docs_url(Some(AssistantEntity::Functions)).unwrap();
        assert_eq!(url.path(), "/docs/guides/database/functions");
        assert!(retrieve_docs_url(None).is_none());
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query(
            Some(AssistantEntity::Functions),
            "CREATE OR REPLACE\nFUNCTION foo() returns void as $$ $$ language sql;"
        ));
        assert!(!validate_query(Some(AssistantEntity::Functions), "select 1"));
        assert!(validate_query(Some(AssistantEntity::RlsPolicies), "Create Policy p on t"));
        assert!(validate_query(None, "anything"));
    }

    #[test]
    fn test_generate_prompt() {
        assert_eq!(
            generate_prompt(QuickPromptKind::Examples, AssistantEntity::RlsPolicies, &[], &[]),
            "What are some common examples of user-defined database rls-policies? Just three examples will do."
        );

        let schemas = vec!["public".to_string(), "auth".to_string()];
        assert_eq!(
            generate_prompt(QuickPromptKind::Suggest, AssistantEntity::RlsPolicies, &schemas, &[]),
            "Suggest some RLS policies that might be useful for the tables in the following schemas within this database: public, auth."
        );

        let tables = vec![
            "public.todos".parse::<TableRef>().unwrap(),
            "public.users".parse::<TableRef>().unwrap(),
        ];
        assert_eq!(
            generate_prompt(QuickPromptKind::Suggest, AssistantEntity::Functions, &schemas, &tables),
            "Suggest some user-defined database functions that might be useful for the following tables within this database: public.todos,public.users. Just three examples will do. Let me know for which tables each function will be useful"
        );

        assert_eq!(
            generate_prompt(QuickPromptKind::Suggest, AssistantEntity::Functions, &[], &tables),
            "Suggest some user-defined database functions that might be useful"
        );
    }
}
