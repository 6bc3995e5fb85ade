pub mod prompts;
pub mod sql;

pub use prompts::{
    generate_cta, generate_placeholder, generate_prompt, generate_title, retrieve_docs_url,
    validate_query, AssistantEntity, DatabaseEntity, QuickPromptKind, TableRef,
};
pub use sql::is_read_only_select;
