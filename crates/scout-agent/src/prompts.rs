//! Prompt templates for the supervisor and the research actions.

/// Appended before every non-initial decision turn.
pub const NEXT_ACTION: &str = "Please produce the next action call.";

pub fn supervisor_bootstrap(research_question: &str, max_interactions: u32) -> String {
    format!(
        "You are an autonomous research agent answering the question below by \
         searching the web. Call one action at a time; you have a budget of \
         {max_interactions} actions. Search for missing facts, and call `complete` \
         with the final answer as soon as the question is resolved.\n\n\
         Research question: {research_question}"
    )
}

pub fn supervisor_bootstrap_report(research_question: &str, plan: &str) -> String {
    format!(
        "You are an autonomous research agent writing a structured article that \
         answers the question below, following the research plan. Call one action \
         at a time: search the web for material, write sections once you have \
         enough, check the article outline, edit for coherence, and call \
         `complete` when the article covers the plan.\n\n\
         Research question: {research_question}\n\nResearch plan:\n{plan}"
    )
}

pub fn research_plan(research_question: &str) -> String {
    format!(
        "Draft a short research plan for an article answering the question below: \
         the main sections to write and what each needs to establish.\n\n\
         Research question: {research_question}"
    )
}

pub fn search_intent(previous_thoughts: &str) -> String {
    format!(
        "Based on the research so far, state in one or two sentences what the \
         next web search is trying to find out.\n\n\
         Research so far:\n{previous_thoughts}"
    )
}

pub fn extract_information(query: &str, search_intent: &str, search_results: &str) -> String {
    format!(
        "Condense the search results below into the information relevant to the \
         query and the search intent. Keep concrete facts, names, and figures; \
         drop boilerplate.\n\n\
         Query: {query}\nSearch intent: {search_intent}\n\n\
         Search results:\n{search_results}"
    )
}

pub fn write_section(
    research_question: &str,
    previous_thoughts: &str,
    article_outline: &str,
    section_title: &str,
    section_goal: &str,
    relevant_documents: &str,
) -> String {
    format!(
        "Write the next section of the article in markdown, starting with its \
         heading. Ground the section in the retrieved documents; do not invent \
         facts.\n\n\
         Research question: {research_question}\n\
         Current outline:\n{article_outline}\n\
         Section title: {section_title}\nSection goal: {section_goal}\n\n\
         Retrieved documents:\n{relevant_documents}\n\n\
         Research so far:\n{previous_thoughts}"
    )
}

pub fn article_title(research_question: &str, article: &str) -> String {
    format!(
        "Propose a concise title for the article below. Reply with the title \
         only.\n\n\
         Research question: {research_question}\n\nArticle:\n{article}"
    )
}

pub fn edit_article(instruction: &str, article: &str) -> String {
    format!(
        "Rewrite the article below according to the instruction. Return the \
         complete edited article in markdown.\n\n\
         Instruction: {instruction}\n\nArticle:\n{article}"
    )
}

pub fn summarize_solution(research_question: &str, previous_thoughts: &str) -> String {
    format!(
        "Using the research below, give the final answer to the question. Be \
         direct; lead with the answer itself.\n\n\
         Research question: {research_question}\n\n\
         Research:\n{previous_thoughts}"
    )
}

pub fn final_refinement(research_question: &str, article: &str) -> String {
    format!(
        "Refine the article below into its final form: fix transitions, remove \
         repetition, and make sure it answers the research question. Return the \
         complete article in markdown.\n\n\
         Research question: {research_question}\n\nArticle:\n{article}"
    )
}
