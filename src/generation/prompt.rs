//! Prompt construction.
//!
//! Pure string builders: the orchestrator resolves the template and standards
//! first, so everything here is deterministic for a fixed input. Both request
//! flows share one ruleset (context block, task line, standards context,
//! difficulty guidance, notation instructions, output-shape contract); they
//! differ only in which fields feed the context and whether the standards
//! section lists state standards or the generic note.

use crate::generation::types::{GenerationRequest, ResourceData, Template};

// ---------------------------------------------------------------------------
// Fixed blocks
// ---------------------------------------------------------------------------

const NOTATION_INSTRUCTIONS: &str = "\
MATHEMATICAL NOTATION: Use proper mathematical notation in your questions and answers:
- Inverse trig functions: sin^(-1), cos^(-1), tan^(-1) (NOT arcsin, arccos, arctan)
- Exponents: x^2, x^3, e^(2x) (use ^ for powers)
- Subscripts: H_2O, CO_2, Ca(OH)_2 (use _ for subscripts)
- Square roots: sqrt(16), sqrt(x) (use sqrt)
- Fractions: 1/2, 3/4, 2/3 (simple fractions)
- Greek letters: pi, theta, alpha, beta (spell out)
- Chemical reactions: -> for reactions, <-> for reversible
- Ion charges: H^+, OH^-, SO4^2-, Ca^2+

EXAMPLES:
\u{2713} \"Find sin^(-1)(1/2)\" - CORRECT
\u{2713} \"If cos^(-1)(x) = pi/3\" - CORRECT
\u{2713} \"Calculate tan^(-1)(sqrt(3))\" - CORRECT
\u{2717} \"Find arcsin(1/2)\" - WRONG (use sin^(-1) instead)
\u{2717} \"Calculate arctan(\u{221a}3)\" - WRONG (use tan^(-1)(sqrt(3)) instead)

";

const GENERAL_STANDARDS_NOTE: &str = "\
STANDARDS CONTEXT:
- No specific state provided. Align content with generally accepted grade-level standards for the subject.
- Ensure clarity, rigor, and appropriateness for the specified grade and school level.

";

const SYSTEM_PROMPT: &str = "\
You are PageSmith, an AI-powered educational content generator. Your role is to create high-quality, standards-aligned educational materials for teachers.

Key responsibilities:
- Generate engaging, age-appropriate content
- Align with state educational standards
- Follow template specifications exactly
- Provide structured, consistent output
- Ensure educational value and accuracy
- Use proper mathematical and scientific notation

MATHEMATICAL NOTATION GUIDELINES:
- Inverse trig functions: sin^(-1), cos^(-1), tan^(-1) (NOT arcsin, arccos, arctan)
- Exponents: x^2, x^3, e^(2x) (use ^ for powers)
- Subscripts: H_2O, CO_2, Ca(OH)_2 (use _ for subscripts)
- Square roots: sqrt(16), sqrt(x) (use sqrt, not \u{221a})
- Fractions: 1/2, 3/4, 2/3 (simple fractions)
- Greek letters: pi, theta, alpha, beta (spell out, not symbols)
- Chemical reactions: -> for reactions, <-> for reversible
- Ion charges: H^+, OH^-, SO4^2-, Ca^2+

CRITICAL: Always use sin^(-1), cos^(-1), tan^(-1) format, NEVER arcsin, arccos, arctan!

Always respond with valid JSON that matches the requested template structure.";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// The fixed, request-independent system prompt. Byte-identical across calls.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Guidance text for a 1-5 difficulty tier. Anything outside the range gets
/// the moderate tier.
pub fn difficulty_guidance(level: i64) -> &'static str {
    match level {
        1 => {
            "DIFFICULTY TARGET: 1 (Easiest)\n\
             - Use simple, single-step questions\n\
             - Provide scaffolding and clear hints\n\
             - Prefer concrete numbers/examples\n\n"
        }
        2 => {
            "DIFFICULTY TARGET: 2\n\
             - Mostly single-step with mild variation\n\
             - Include subtle prompts towards the method\n\
             - Maintain straightforward language\n\n"
        }
        4 => {
            "DIFFICULTY TARGET: 4\n\
             - Primarily multi-step questions\n\
             - Require strategic thinking and justification\n\
             - Use less obvious setups and distractors\n\n"
        }
        5 => {
            "DIFFICULTY TARGET: 5 (Hardest)\n\
             - Multi-step, rigorous reasoning required\n\
             - Minimal scaffolding; emphasize abstraction/transfer\n\
             - Allow for extension or generalization prompts\n\n"
        }
        _ => {
            "DIFFICULTY TARGET: 3 (Moderate)\n\
             - Mix single- and multi-step reasoning\n\
             - Avoid trivial prompts; encourage explanation in answers\n\
             - Introduce moderate variation in contexts\n\n"
        }
    }
}

/// User prompt for the grade/state flow: exactly 3 questions, state-standards
/// alignment when `standards` is non-empty. The request shape carries no
/// difficulty knob, so the moderate tier applies.
pub fn build_prompt(request: &GenerationRequest, template: &Template, standards: &[String]) -> String {
    let mut prompt = format!(
        "You are an expert teacher creating educational content for {grade} grade {subject_type} students.\n\
         \n\
         CONTEXT:\n\
         - Grade Level: {grade}\n\
         - Subject Type: {subject_type}\n\
         - Main Topic: {main_topic}\n\
         - Sub Topic: {sub_topic}\n\
         - State: {state}\n\
         - Template Type: {template_name}\n\
         \n\
         TASK: Generate a worksheet with exactly 3 questions about {main_topic}. \
         Include clear instructions and an answer key. \
         Make the questions appropriate for {grade} grade level.\n\
         \n",
        grade = request.grade_level,
        subject_type = request.subject_type,
        main_topic = request.main_topic,
        sub_topic = request.sub_topic,
        state = request.state,
        template_name = template.name,
    );

    prompt.push_str(NOTATION_INSTRUCTIONS);
    prompt.push_str(&placeholder_requirements(template));
    if !standards.is_empty() {
        prompt.push_str(&standards_section(standards));
    }
    prompt.push_str(difficulty_guidance(3));
    prompt.push_str(&output_format_requirements(template));
    prompt
}

/// User prompt for the resource flow: exactly 5 questions, generic standards
/// context, explicit difficulty tier.
pub fn build_resource_prompt(data: &ResourceData, template: &Template) -> String {
    let difficulty = data.difficulty.unwrap_or(3);
    let mut prompt = format!(
        "You are an expert teacher creating educational content for {grade} grade {subject} students.\n\
         \n\
         CONTEXT:\n\
         - School Level: {level}\n\
         - Grade Level: {grade}\n\
         - Subject: {subject}\n\
         - Topic: {topic}\n\
         - Standards Context: General (no state-specific alignment)\n\
         - Resource Type: {resource_type}\n\
         - Template Type: {template_name}\n\
         - Difficulty Level (1-5): {difficulty}\n\
         \n\
         TASK: Generate a {resource_type} with exactly 5 questions about {topic}. \
         Include clear instructions and an answer key. \
         Make the questions appropriate for {grade} grade level in {level}.\n\
         \n",
        grade = data.grade,
        subject = data.subject,
        level = data.level,
        topic = data.topic,
        resource_type = data.resource_type,
        template_name = template.name,
        difficulty = difficulty,
    );

    prompt.push_str(NOTATION_INSTRUCTIONS);
    prompt.push_str(&placeholder_requirements(template));
    prompt.push_str(GENERAL_STANDARDS_NOTE);
    prompt.push_str(difficulty_guidance(difficulty));
    prompt.push_str(&output_format_requirements(template));
    prompt
}

fn placeholder_requirements(template: &Template) -> String {
    let keys: Vec<String> = template
        .placeholders
        .iter()
        .map(|placeholder| format!("- {placeholder}"))
        .collect();
    format!(
        "IMPORTANT: Your response must be structured as a JSON object with the following keys:\n{}\n\n",
        keys.join("\n")
    )
}

fn standards_section(standards: &[String]) -> String {
    let lines: Vec<String> = standards.iter().map(|standard| format!("- {standard}")).collect();
    format!(
        "STATE STANDARDS TO ALIGN WITH:\n{}\n\n\
         Ensure your content aligns with these standards and is appropriate for the specified grade level.\n\n",
        lines.join("\n")
    )
}

fn output_format_requirements(template: &Template) -> String {
    let skeleton: Vec<String> = template
        .placeholders
        .iter()
        .take(3)
        .map(|placeholder| format!("  \"{placeholder}\": \"Your {placeholder} here\","))
        .collect();
    format!(
        "OUTPUT REQUIREMENTS:\n\
         1. Return ONLY a valid JSON object\n\
         2. Use the exact keys specified above\n\
         3. Make content engaging and age-appropriate\n\
         4. Ensure all placeholders are filled with meaningful content\n\
         5. Content should be educational and aligned with standards\n\
         6. Keep responses concise but comprehensive\n\
         \n\
         EXAMPLE OUTPUT FORMAT:\n\
         {{\n{}\n  // ... fill all required fields\n}}\n\
         \n\
         Now generate the content following these requirements:",
        skeleton.join("\n")
    )
}
