//! The actions the supervisor can dispatch, with their typed argument
//! schemas and fallible decoding from reasoner tool calls.

use serde::Deserialize;

use scout_core::{PropertySchema, ToolCall, ToolDefinition, ToolParameters};

use crate::state::Mode;

pub const SEARCH: &str = "search";
pub const WRITE_SECTION: &str = "write_section";
pub const CHECK_ARTICLE: &str = "check_article";
pub const EDIT_ARTICLE: &str = "edit_article";
pub const COMPLETE: &str = "complete";

/// A decoded action invocation with validated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search { query: String },
    WriteSection { title: String, goal: String },
    CheckArticle,
    EditArticle { instruction: String },
    Complete { final_answer: Option<String> },
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Deserialize)]
struct WriteSectionArgs {
    section_title: String,
    section_goal: String,
}

#[derive(Deserialize)]
struct EditArticleArgs {
    instruction: String,
}

#[derive(Deserialize, Default)]
struct CompleteArgs {
    #[serde(default)]
    final_answer: Option<String>,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Search { .. } => SEARCH,
            Action::WriteSection { .. } => WRITE_SECTION,
            Action::CheckArticle => CHECK_ARTICLE,
            Action::EditArticle { .. } => EDIT_ARTICLE,
            Action::Complete { .. } => COMPLETE,
        }
    }

    /// Decode a reasoner-selected tool call into a typed action.
    ///
    /// The `Err` value is a corrective message fed back to the reasoner
    /// on the next decision turn; malformed input never aborts a run.
    pub fn decode(call: &ToolCall) -> Result<Action, String> {
        let args = call.arguments.clone();
        match call.name.as_str() {
            SEARCH => serde_json::from_value::<SearchArgs>(args)
                .map(|a| Action::Search { query: a.query })
                .map_err(|e| format!("Invalid arguments for `{SEARCH}`: {e}.")),
            WRITE_SECTION => serde_json::from_value::<WriteSectionArgs>(args)
                .map(|a| Action::WriteSection {
                    title: a.section_title,
                    goal: a.section_goal,
                })
                .map_err(|e| format!("Invalid arguments for `{WRITE_SECTION}`: {e}.")),
            CHECK_ARTICLE => Ok(Action::CheckArticle),
            EDIT_ARTICLE => serde_json::from_value::<EditArticleArgs>(args)
                .map(|a| Action::EditArticle {
                    instruction: a.instruction,
                })
                .map_err(|e| format!("Invalid arguments for `{EDIT_ARTICLE}`: {e}.")),
            COMPLETE => {
                let args = if args.is_null() {
                    CompleteArgs::default()
                } else {
                    serde_json::from_value::<CompleteArgs>(args).unwrap_or_default()
                };
                Ok(Action::Complete {
                    final_answer: args.final_answer,
                })
            }
            other => Err(format!(
                "Unknown action `{other}`. Available actions: {}.",
                [SEARCH, WRITE_SECTION, CHECK_ARTICLE, EDIT_ARTICLE, COMPLETE].join(", ")
            )),
        }
    }

    /// The action schemas advertised to the reasoner for a run mode.
    pub fn definitions(mode: Mode) -> Vec<ToolDefinition> {
        let search = ToolDefinition::new(SEARCH, "Search the web for information.")
            .with_parameters(ToolParameters::new().add_property(
                "query",
                PropertySchema::string("The query to search on the web."),
                true,
            ));
        let complete = ToolDefinition::new(
            COMPLETE,
            "Declare the research complete and stop taking actions.",
        )
        .with_parameters(ToolParameters::new().add_property(
            "final_answer",
            PropertySchema::string("The final answer to the research question."),
            mode == Mode::ShortAnswer,
        ));

        match mode {
            Mode::ShortAnswer => vec![search, complete],
            Mode::Report => vec![
                search,
                ToolDefinition::new(WRITE_SECTION, "Draft the next section of the article.")
                    .with_parameters(
                        ToolParameters::new()
                            .add_property(
                                "section_title",
                                PropertySchema::string("The section title."),
                                true,
                            )
                            .add_property(
                                "section_goal",
                                PropertySchema::string("What the section should establish."),
                                true,
                            ),
                    ),
                ToolDefinition::new(
                    CHECK_ARTICLE,
                    "Check the article structure and return its outline.",
                ),
                ToolDefinition::new(EDIT_ARTICLE, "Rewrite the whole article per an instruction.")
                    .with_parameters(ToolParameters::new().add_property(
                        "instruction",
                        PropertySchema::string("The instruction for editing the article."),
                        true,
                    )),
                complete,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_search() {
        let call = ToolCall::new("c1", SEARCH, json!({"query": "capital of France"}));
        let action = Action::decode(&call).unwrap();
        assert_eq!(
            action,
            Action::Search {
                query: "capital of France".to_string()
            }
        );
        assert_eq!(action.name(), SEARCH);
    }

    #[test]
    fn test_decode_missing_required_field_is_corrective() {
        let call = ToolCall::new("c1", SEARCH, json!({}));
        let err = Action::decode(&call).unwrap_err();
        assert!(err.contains("search"));
        assert!(err.contains("query"));
    }

    #[test]
    fn test_decode_unknown_action() {
        let call = ToolCall::new("c1", "summon", json!({}));
        let err = Action::decode(&call).unwrap_err();
        assert!(err.contains("summon"));
        assert!(err.contains(SEARCH));
    }

    #[test]
    fn test_decode_complete_without_arguments() {
        let call = ToolCall::new("c1", COMPLETE, serde_json::Value::Null);
        assert_eq!(
            Action::decode(&call).unwrap(),
            Action::Complete { final_answer: None }
        );

        let call = ToolCall::new("c2", COMPLETE, json!({"final_answer": "Paris"}));
        assert_eq!(
            Action::decode(&call).unwrap(),
            Action::Complete {
                final_answer: Some("Paris".to_string())
            }
        );
    }

    #[test]
    fn test_decode_write_section() {
        let call = ToolCall::new(
            "c1",
            WRITE_SECTION,
            json!({"section_title": "History", "section_goal": "Cover the origins"}),
        );
        assert_eq!(
            Action::decode(&call).unwrap(),
            Action::WriteSection {
                title: "History".to_string(),
                goal: "Cover the origins".to_string()
            }
        );
    }

    #[test]
    fn test_mode_restricts_available_actions() {
        let short: Vec<String> = Action::definitions(Mode::ShortAnswer)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(short, vec![SEARCH, COMPLETE]);

        let report: Vec<String> = Action::definitions(Mode::Report)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            report,
            vec![SEARCH, WRITE_SECTION, CHECK_ARTICLE, EDIT_ARTICLE, COMPLETE]
        );
    }

    #[test]
    fn test_final_answer_required_only_in_short_answer_mode() {
        let required = |mode: Mode| {
            Action::definitions(mode)
                .into_iter()
                .find(|d| d.name == COMPLETE)
                .map(|d| d.parameters.required.contains(&"final_answer".to_string()))
                .unwrap_or(false)
        };
        assert!(required(Mode::ShortAnswer));
        assert!(!required(Mode::Report));
    }
}
