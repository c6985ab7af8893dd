//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use handlebars::Handlebars;
use salesqa_core::{AppError, AppResult};
use std::path::Path;

/// YAML source of the built-in prompt, embedded at compile time.
const DEFAULT_PROMPT_YAML: &str = include_str!("../prompts/sales.qa.default.yml");

/// Placeholder for the serialized dataset.
pub const DATASET_PLACEHOLDER: &str = "{{dataset}}";

/// Placeholder for the user's question.
pub const QUESTION_PLACEHOLDER: &str = "{{question}}";

const DATASET_VARIABLE: &str = "dataset";
const QUESTION_VARIABLE: &str = "question";

/// The built-in scoped prompt (`sales.qa.default`).
pub fn default_prompt() -> AppResult<PromptDefinition> {
    parse_prompt(DEFAULT_PROMPT_YAML, "built-in prompt")
}

/// Load a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use salesqa_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("prompts/custom.yml"))?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let definition = parse_prompt(&contents, &format!("{:?}", path))?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

fn parse_prompt(contents: &str, source: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", source, e))
    })?;

    validate_prompt(&definition)?;

    Ok(definition)
}

/// Validate a prompt definition.
///
/// The template must compile and must embed the dataset before the question.
fn validate_prompt(definition: &PromptDefinition) -> AppResult<()> {
    if definition.id.trim().is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if definition.template.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Prompt template cannot be empty: {}",
            definition.id
        )));
    }

    Handlebars::new()
        .register_template_string(&definition.id, &definition.template)
        .map_err(|e| {
            AppError::Prompt(format!("Invalid template in prompt {}: {}", definition.id, e))
        })?;

    let dataset_at = find_variable(&definition.template, DATASET_VARIABLE);
    let question_at = find_variable(&definition.template, QUESTION_VARIABLE);

    match (dataset_at, question_at) {
        (Some(d), Some(q)) if d < q => Ok(()),
        (Some(_), Some(_)) => Err(AppError::Prompt(format!(
            "Prompt {} must place {} before {}",
            definition.id, DATASET_PLACEHOLDER, QUESTION_PLACEHOLDER
        ))),
        (None, _) => Err(AppError::Prompt(format!(
            "Prompt {} is missing {}",
            definition.id, DATASET_PLACEHOLDER
        ))),
        (_, None) => Err(AppError::Prompt(format!(
            "Prompt {} is missing {}",
            definition.id, QUESTION_PLACEHOLDER
        ))),
    }
}

/// Byte offset of the first `{{name}}` expression in `template`.
///
/// Accepts inner whitespace, `~` whitespace control and triple-stash
/// (`{{ name }}`, `{{~name~}}`, `{{{name}}}`).
fn find_variable(template: &str, name: &str) -> Option<usize> {
    let mut offset = 0;

    while let Some(open) = template[offset..].find("{{") {
        let start = offset + open;
        let inner_start = start + 2;
        let close = inner_start + template[inner_start..].find("}}")?;

        let inner = template[inner_start..close]
            .trim_matches(|c: char| c == '{' || c == '~' || c.is_whitespace());
        if inner == name {
            return Some(start);
        }

        offset = close + 2;
    }

    None
}
