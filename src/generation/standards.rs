//! State academic standards, indexed state -> subject -> grade.
//!
//! The dataset is small enough to live in the binary. Lookups never fail:
//! unknown keys at any level degrade to an empty list so callers can treat
//! "no standards" and "unknown state" the same way.

use std::collections::HashMap;

/// Flattened dataset rows: (state, subject, grade, standards). Row order is
/// the canonical listing order for the catalog endpoints.
const DATASET: &[(&str, &str, &str, &[&str])] = &[
    (
        "CA",
        "Mathematics",
        "K",
        &[
            "K.CC.A.1 - Count to 100 by ones and by tens",
            "K.CC.A.2 - Count forward beginning from a given number",
            "K.CC.A.3 - Write numbers from 0 to 20",
            "K.OA.A.1 - Represent addition and subtraction with objects",
            "K.OA.A.2 - Solve addition and subtraction word problems",
        ],
    ),
    (
        "CA",
        "Mathematics",
        "1st",
        &[
            "1.OA.A.1 - Use addition and subtraction within 20",
            "1.OA.A.2 - Solve word problems involving addition and subtraction",
            "1.OA.B.3 - Apply properties of operations",
            "1.NBT.A.1 - Extend the counting sequence",
            "1.NBT.B.2 - Understand place value",
        ],
    ),
    (
        "CA",
        "Mathematics",
        "2nd",
        &[
            "2.OA.A.1 - Use addition and subtraction within 100",
            "2.OA.B.2 - Fluently add and subtract within 20",
            "2.NBT.A.1 - Understand place value",
            "2.NBT.B.5 - Fluently add and subtract within 100",
            "2.MD.A.1 - Measure and estimate lengths",
        ],
    ),
    (
        "CA",
        "Mathematics",
        "3rd",
        &[
            "3.OA.A.1 - Interpret products of whole numbers",
            "3.OA.A.2 - Interpret whole-number quotients",
            "3.NBT.A.1 - Use place value understanding",
            "3.NBT.A.2 - Fluently add and subtract within 1000",
            "3.MD.A.1 - Tell and write time to the nearest minute",
        ],
    ),
    (
        "CA",
        "Mathematics",
        "4th",
        &[
            "4.OA.A.1 - Interpret a multiplication equation",
            "4.NBT.A.1 - Recognize place value",
            "4.NBT.B.5 - Multiply whole numbers",
            "4.NF.A.1 - Explain equivalent fractions",
            "4.MD.A.1 - Know relative sizes of measurement units",
        ],
    ),
    (
        "CA",
        "Mathematics",
        "5th",
        &[
            "5.NBT.A.1 - Recognize place value",
            "5.NBT.B.5 - Fluently multiply multi-digit whole numbers",
            "5.NF.A.1 - Add and subtract fractions",
            "5.MD.A.1 - Convert among different-sized measurement units",
            "5.G.A.1 - Use a pair of perpendicular number lines",
        ],
    ),
    (
        "CA",
        "English Language Arts",
        "K",
        &[
            "K.RL.1 - Ask and answer questions about key details",
            "K.RL.2 - Retell familiar stories",
            "K.RL.3 - Identify characters, settings, and events",
            "K.RF.1 - Demonstrate understanding of organization",
            "K.RF.2 - Demonstrate understanding of spoken words",
        ],
    ),
    (
        "CA",
        "English Language Arts",
        "1st",
        &[
            "1.RL.1 - Ask and answer questions about key details",
            "1.RL.2 - Retell stories with key details",
            "1.RL.3 - Describe characters, settings, and events",
            "1.RF.1 - Demonstrate understanding of organization",
            "1.RF.2 - Demonstrate understanding of spoken words",
        ],
    ),
    (
        "CA",
        "English Language Arts",
        "2nd",
        &[
            "2.RL.1 - Ask and answer questions about key details",
            "2.RL.2 - Recount stories and determine central message",
            "2.RL.3 - Describe how characters respond to events",
            "2.RF.1 - Demonstrate understanding of organization",
            "2.RF.2 - Demonstrate understanding of spoken words",
        ],
    ),
    (
        "CA",
        "English Language Arts",
        "3rd",
        &[
            "3.RL.1 - Ask and answer questions about key details",
            "3.RL.2 - Recount stories and determine central message",
            "3.RL.3 - Describe characters and explain actions",
            "3.RF.1 - Demonstrate understanding of organization",
            "3.RF.2 - Demonstrate understanding of spoken words",
        ],
    ),
    (
        "CA",
        "English Language Arts",
        "4th",
        &[
            "4.RL.1 - Refer to details and examples in text",
            "4.RL.2 - Determine theme and summarize text",
            "4.RL.3 - Describe characters, settings, and events",
            "4.RF.1 - Demonstrate understanding of organization",
            "4.RF.2 - Demonstrate understanding of spoken words",
        ],
    ),
    (
        "CA",
        "English Language Arts",
        "5th",
        &[
            "5.RL.1 - Quote accurately from text",
            "5.RL.2 - Determine theme and summarize text",
            "5.RL.3 - Compare and contrast characters",
            "5.RF.1 - Demonstrate understanding of organization",
            "5.RF.2 - Demonstrate understanding of spoken words",
        ],
    ),
    (
        "CA",
        "Science",
        "K",
        &[
            "K-PS2-1 - Plan and conduct investigations",
            "K-PS3-1 - Make observations to determine effect of sunlight",
            "K-LS1-1 - Use observations to describe patterns",
            "K-ESS2-1 - Use and share observations of weather",
            "K-ESS3-1 - Communicate solutions to reduce human impact",
        ],
    ),
    (
        "CA",
        "Science",
        "1st",
        &[
            "1-PS4-1 - Plan and conduct investigations",
            "1-PS4-2 - Make observations to construct evidence-based account",
            "1-LS1-1 - Use materials to design solution to human problem",
            "1-LS3-1 - Make observations to construct evidence-based account",
            "1-ESS1-1 - Use observations of sun, moon, and stars",
        ],
    ),
    (
        "CA",
        "Science",
        "2nd",
        &[
            "2-PS1-1 - Plan and conduct investigation",
            "2-PS1-2 - Analyze data from tests of materials",
            "2-LS2-1 - Plan and conduct investigation",
            "2-LS4-1 - Make observations of plants and animals",
            "2-ESS1-1 - Use information from several sources",
        ],
    ),
    (
        "CA",
        "Science",
        "3rd",
        &[
            "3-PS2-1 - Plan and conduct investigation",
            "3-PS2-2 - Observe and analyze motion",
            "3-LS1-1 - Develop models to describe organisms",
            "3-LS3-1 - Analyze and interpret data",
            "3-ESS2-1 - Represent data in tables and graphs",
        ],
    ),
    (
        "CA",
        "Science",
        "4th",
        &[
            "4-PS3-1 - Use evidence to construct explanation",
            "4-PS3-2 - Make observations to provide evidence",
            "4-LS1-1 - Construct argument that plants and animals",
            "4-LS1-2 - Use model to describe animals",
            "4-ESS1-1 - Identify evidence from patterns in rock formations",
        ],
    ),
    (
        "CA",
        "Science",
        "5th",
        &[
            "5-PS1-1 - Develop model to describe matter",
            "5-PS1-2 - Measure and graph quantities",
            "5-LS1-1 - Support argument that plants get materials",
            "5-LS2-1 - Develop model to describe movement of matter",
            "5-ESS1-1 - Support argument that apparent brightness",
        ],
    ),
    (
        "CA",
        "Social Studies",
        "K",
        &[
            "K.1 - Students understand that being a good citizen",
            "K.2 - Students recognize national and state symbols",
            "K.3 - Students match simple descriptions of work",
            "K.4 - Students compare and contrast locations",
            "K.5 - Students put events in temporal order",
        ],
    ),
    (
        "CA",
        "Social Studies",
        "1st",
        &[
            "1.1 - Students describe the rights and responsibilities",
            "1.2 - Students compare and contrast absolute locations",
            "1.3 - Students know and understand the symbols",
            "1.4 - Students understand basic economic concepts",
            "1.5 - Students describe the human characteristics",
        ],
    ),
    (
        "CA",
        "Social Studies",
        "2nd",
        &[
            "2.1 - Students differentiate between things",
            "2.2 - Students demonstrate map skills",
            "2.3 - Students explain governmental institutions",
            "2.4 - Students understand basic economic concepts",
            "2.5 - Students understand the importance",
        ],
    ),
    (
        "CA",
        "Social Studies",
        "3rd",
        &[
            "3.1 - Students describe the physical and human",
            "3.2 - Students describe the American Indian nations",
            "3.3 - Students draw from historical and community",
            "3.4 - Students understand the role of rules and laws",
            "3.5 - Students demonstrate basic economic reasoning",
        ],
    ),
    (
        "CA",
        "Social Studies",
        "4th",
        &[
            "4.1 - Students demonstrate an understanding",
            "4.2 - Students describe the social, political",
            "4.3 - Students explain the economic, social",
            "4.4 - Students explain how California became",
            "4.5 - Students understand the structures",
        ],
    ),
    (
        "CA",
        "Social Studies",
        "5th",
        &[
            "5.1 - Students describe the major pre-Columbian",
            "5.2 - Students trace the routes of early explorers",
            "5.3 - Students describe the cooperation and conflict",
            "5.4 - Students understand the political, religious",
            "5.5 - Students understand the causes of the American",
        ],
    ),
    (
        "TX",
        "Mathematics",
        "K",
        &[
            "K.2A - Count forward and backward to at least 20",
            "K.2B - Read, write, and represent whole numbers",
            "K.2C - Count a set of objects up to at least 20",
            "K.2D - Recognize instantly the quantity of a small group",
            "K.2E - Generate a set using concrete and pictorial models",
        ],
    ),
    (
        "TX",
        "Mathematics",
        "1st",
        &[
            "1.2A - Recognize instantly the quantity of structured arrangements",
            "1.2B - Use concrete and pictorial models to compose and decompose",
            "1.2C - Use objects, pictures, and expanded and standard forms",
            "1.2D - Generate a number that is greater than or less than",
            "1.2E - Use place value to compare whole numbers up to 120",
        ],
    ),
    (
        "NY",
        "Mathematics",
        "K",
        &[
            "K.CC.1 - Count to 100 by ones and by tens",
            "K.CC.2 - Count forward beginning from a given number",
            "K.CC.3 - Write numbers from 0 to 20",
            "K.OA.1 - Represent addition and subtraction with objects",
            "K.OA.2 - Solve addition and subtraction word problems",
        ],
    ),
];

// ---------------------------------------------------------------------------
// StandardsIndex
// ---------------------------------------------------------------------------

/// In-memory standards lookup. Built once at startup and shared via `Arc`.
#[derive(Debug)]
pub struct StandardsIndex {
    by_state: HashMap<&'static str, HashMap<&'static str, HashMap<&'static str, &'static [&'static str]>>>,
}

impl StandardsIndex {
    pub fn new() -> Self {
        let mut by_state: HashMap<
            &'static str,
            HashMap<&'static str, HashMap<&'static str, &'static [&'static str]>>,
        > = HashMap::new();

        for (state, subject, grade, standards) in DATASET {
            by_state
                .entry(state)
                .or_default()
                .entry(subject)
                .or_default()
                .insert(grade, standards);
        }

        Self { by_state }
    }

    /// Standards for an exact (state, subject, grade) triple. Matching is
    /// case-sensitive at every level; any miss yields an empty list.
    pub fn relevant_standards(&self, state: &str, subject: &str, grade: &str) -> Vec<String> {
        self.by_state
            .get(state)
            .and_then(|subjects| subjects.get(subject))
            .and_then(|grades| grades.get(grade))
            .map(|standards| standards.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }

    /// Known state codes, in dataset order.
    pub fn states(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for (state, _, _, _) in DATASET {
            if !seen.iter().any(|s: &String| s == state) {
                seen.push(state.to_string());
            }
        }
        seen
    }

    /// Subjects available for a state, in dataset order. Empty when unknown.
    pub fn subjects(&self, state: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for (row_state, subject, _, _) in DATASET {
            if *row_state == state && !seen.iter().any(|s: &String| s == subject) {
                seen.push(subject.to_string());
            }
        }
        seen
    }

    /// Grades available for a (state, subject) pair, in dataset order.
    pub fn grades(&self, state: &str, subject: &str) -> Vec<String> {
        DATASET
            .iter()
            .filter(|(row_state, row_subject, _, _)| *row_state == state && *row_subject == subject)
            .map(|(_, _, grade, _)| grade.to_string())
            .collect()
    }

    /// Whether the triple resolves to at least one standard.
    pub fn has_standards(&self, state: &str, subject: &str, grade: &str) -> bool {
        !self.relevant_standards(state, subject, grade).is_empty()
    }
}

impl Default for StandardsIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_triple_returns_five_standards() {
        let index = StandardsIndex::new();
        let standards = index.relevant_standards("CA", "Mathematics", "2nd");

        assert_eq!(standards.len(), 5);
        assert_eq!(standards[0], "2.OA.A.1 - Use addition and subtraction within 100");
    }

    #[test]
    fn test_unknown_state_returns_empty() {
        let index = StandardsIndex::new();
        assert!(index.relevant_standards("ZZ", "Mathematics", "K").is_empty());
    }

    #[test]
    fn test_unknown_subject_and_grade_return_empty() {
        let index = StandardsIndex::new();
        assert!(index.relevant_standards("CA", "Underwater Basket Weaving", "K").is_empty());
        assert!(index.relevant_standards("CA", "Mathematics", "13th").is_empty());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let index = StandardsIndex::new();
        assert!(index.relevant_standards("ca", "Mathematics", "K").is_empty());
        assert!(index.relevant_standards("CA", "mathematics", "K").is_empty());
        assert!(index.relevant_standards("CA", "Mathematics", "k").is_empty());
    }

    #[test]
    fn test_states_in_dataset_order() {
        let index = StandardsIndex::new();
        assert_eq!(index.states(), vec!["CA", "TX", "NY"]);
    }

    #[test]
    fn test_subjects_for_state() {
        let index = StandardsIndex::new();
        assert_eq!(
            index.subjects("CA"),
            vec!["Mathematics", "English Language Arts", "Science", "Social Studies"]
        );
        assert_eq!(index.subjects("NY"), vec!["Mathematics"]);
        assert!(index.subjects("ZZ").is_empty());
    }

    #[test]
    fn test_grades_for_state_subject() {
        let index = StandardsIndex::new();
        assert_eq!(
            index.grades("CA", "Mathematics"),
            vec!["K", "1st", "2nd", "3rd", "4th", "5th"]
        );
        assert_eq!(index.grades("TX", "Mathematics"), vec!["K", "1st"]);
        assert!(index.grades("TX", "Science").is_empty());
    }

    #[test]
    fn test_every_dataset_row_has_five_standards() {
        for (state, subject, grade, standards) in DATASET {
            assert_eq!(
                standards.len(),
                5,
                "row ({state}, {subject}, {grade}) should carry five standards"
            );
        }
    }
}
