//! ASCII math shorthand to Unicode conversion.
//!
//! The model is instructed to emit plain-text notation (`x^2`, `H_2O`,
//! `sqrt`, `pi`); the rendering side wants real glyphs. `normalize` applies
//! one canonical ruleset in a fixed order. The order is load-bearing:
//! inverse trig must run before generic exponent handling, subscripts before
//! Greek names, and operator shorthand last so `<=` style tokens are not
//! half-consumed by earlier rules.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Character tables
// ---------------------------------------------------------------------------

const SUPERSCRIPT: &[(char, char)] = &[
    ('0', '⁰'),
    ('1', '¹'),
    ('2', '²'),
    ('3', '³'),
    ('4', '⁴'),
    ('5', '⁵'),
    ('6', '⁶'),
    ('7', '⁷'),
    ('8', '⁸'),
    ('9', '⁹'),
    ('+', '⁺'),
    ('-', '⁻'),
    ('=', '⁼'),
    ('(', '⁽'),
    (')', '⁾'),
    ('n', 'ⁿ'),
    ('i', 'ⁱ'),
];

const SUBSCRIPT: &[(char, char)] = &[
    ('0', '₀'),
    ('1', '₁'),
    ('2', '₂'),
    ('3', '₃'),
    ('4', '₄'),
    ('5', '₅'),
    ('6', '₆'),
    ('7', '₇'),
    ('8', '₈'),
    ('9', '₉'),
    ('+', '₊'),
    ('-', '₋'),
    ('=', '₌'),
    ('(', '₍'),
    (')', '₎'),
    ('a', 'ₐ'),
    ('e', 'ₑ'),
    ('o', 'ₒ'),
    ('x', 'ₓ'),
    ('h', 'ₕ'),
    ('k', 'ₖ'),
    ('l', 'ₗ'),
    ('m', 'ₘ'),
    ('n', 'ₙ'),
    ('p', 'ₚ'),
    ('s', 'ₛ'),
    ('t', 'ₜ'),
];

/// Plain substring replacements, applied in table order without word
/// boundaries.
const FRACTIONS: &[(&str, &str)] = &[
    ("1/2", "½"),
    ("1/3", "⅓"),
    ("2/3", "⅔"),
    ("1/4", "¼"),
    ("3/4", "¾"),
    ("1/5", "⅕"),
    ("2/5", "⅖"),
    ("3/5", "⅗"),
    ("4/5", "⅘"),
    ("1/6", "⅙"),
    ("5/6", "⅚"),
    ("1/8", "⅛"),
    ("3/8", "⅜"),
    ("5/8", "⅝"),
    ("7/8", "⅞"),
];

/// Greek letter names, matched as whole words, case-sensitive per entry.
/// No name is a prefix of another, so a single alternation is equivalent to
/// per-entry passes.
const GREEK: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("theta", "θ"),
    ("iota", "ι"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("omicron", "ο"),
    ("pi", "π"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("upsilon", "υ"),
    ("phi", "φ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
    ("Alpha", "Α"),
    ("Beta", "Β"),
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Epsilon", "Ε"),
    ("Zeta", "Ζ"),
    ("Eta", "Η"),
    ("Theta", "Θ"),
    ("Iota", "Ι"),
    ("Kappa", "Κ"),
    ("Lambda", "Λ"),
    ("Mu", "Μ"),
    ("Nu", "Ν"),
    ("Xi", "Ξ"),
    ("Omicron", "Ο"),
    ("Pi", "Π"),
    ("Rho", "Ρ"),
    ("Sigma", "Σ"),
    ("Tau", "Τ"),
    ("Upsilon", "Υ"),
    ("Phi", "Φ"),
    ("Chi", "Χ"),
    ("Psi", "Ψ"),
    ("Omega", "Ω"),
];

/// Operator shorthand, applied last. `<=>` must precede `<=` and `->` must
/// follow `<->` or the longer tokens are consumed piecemeal.
const SYMBOLS: &[(&str, &str)] = &[
    ("<=>", "⇔"),
    ("<->", "↔"),
    ("->", "→"),
    ("<=", "≤"),
    (">=", "≥"),
    ("!=", "≠"),
    ("+/-", "±"),
    ("**", "×"),
];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static INVERSE_TRIG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?i:sin|cos|tan|sec|csc|cot))\^\(-1\)").expect("valid regex"));

static PAREN_EXPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\([^)]+\)").expect("valid regex"));

/// Checks whether the text immediately before a `^(...)` group ends in a
/// trig function name. Those stay ASCII so inverse notation is unambiguous.
static TRIG_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:sin|cos|tan|sec|csc|cot)$").expect("valid regex"));

static SIMPLE_EXPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^([0-9+-]+)").expect("valid regex"));

static SUBSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([0-9a-zA-Z+-]+)").expect("valid regex"));

static GREEK_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = GREEK.iter().map(|(name, _)| *name).collect();
    Regex::new(&format!(r"\b({})\b", names.join("|"))).expect("valid regex")
});

static SQRT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bsqrt\b").expect("valid regex"));

static DEGREES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdegrees?\b").expect("valid regex"));

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn to_superscript(text: &str) -> String {
    text.chars()
        .map(|c| {
            SUPERSCRIPT
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

fn to_subscript(text: &str) -> String {
    text.chars()
        .map(|c| {
            SUBSCRIPT
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Handles `^(expr)` groups. The whole parenthesized group, parens included,
/// is mapped through the superscript table. Skipped when the preceding text
/// ends in a trig name or the inner expression is `1` or `-1`; those stay
/// literal so they keep reading as function inverses.
fn convert_parenthesized_exponents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in PAREN_EXPONENT_RE.find_iter(text) {
        out.push_str(&text[last..m.start()]);

        // Up to ten characters of context before the caret.
        let mut window_start = m.start().saturating_sub(10);
        while !text.is_char_boundary(window_start) {
            window_start += 1;
        }
        let before = &text[window_start..m.start()];

        let group = &m.as_str()[1..];
        let inner = group[1..group.len() - 1].trim();

        if TRIG_SUFFIX_RE.is_match(before) || inner == "-1" || inner == "1" {
            out.push_str(m.as_str());
        } else {
            out.push_str(&to_superscript(group));
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Convert ASCII math shorthand in `text` to Unicode.
///
/// Deterministic and total; text with no shorthand tokens passes through
/// unchanged, and the conversion is idempotent.
pub fn normalize(text: &str) -> String {
    // 1. Inverse trig before anything else touches `^(...)`.
    let mut result = INVERSE_TRIG_RE
        .replace_all(text, |caps: &Captures| format!("{}⁻¹", &caps[1]))
        .into_owned();

    // 2. Fraction literals.
    for (literal, glyph) in FRACTIONS {
        result = result.replace(literal, glyph);
    }

    // 3. Parenthesized exponents.
    result = convert_parenthesized_exponents(&result);

    // 4. Simple exponents.
    result = SIMPLE_EXPONENT_RE
        .replace_all(&result, |caps: &Captures| to_superscript(&caps[1]))
        .into_owned();

    // 5. Subscripts. Unmapped characters pass through with the underscore
    //    dropped.
    result = SUBSCRIPT_RE
        .replace_all(&result, |caps: &Captures| to_subscript(&caps[1]))
        .into_owned();

    // 6. Greek letter names.
    result = GREEK_RE
        .replace_all(&result, |caps: &Captures| {
            let name = &caps[1];
            GREEK
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, glyph)| (*glyph).to_string())
                .unwrap_or_else(|| name.to_string())
        })
        .into_owned();

    // 7. Square root.
    result = SQRT_RE.replace_all(&result, "√").into_owned();

    // 8. Degrees.
    result = DEGREES_RE.replace_all(&result, "°").into_owned();

    // 9. Operator shorthand.
    for (literal, glyph) in SYMBOLS {
        result = result.replace(literal, glyph);
    }

    result
}

/// Recursively normalize every string value in a JSON tree. Object keys and
/// non-string leaves are untouched. Never fails.
pub fn normalize_deep(value: &mut Value) {
    match value {
        Value::String(s) => *s = normalize(s),
        Value::Array(items) => {
            for item in items {
                normalize_deep(item);
            }
        }
        Value::Object(map) => {
            for (_, nested) in map.iter_mut() {
                normalize_deep(nested);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inverse_trig() {
        assert_eq!(normalize("sin^(-1)(0.5)"), "sin⁻¹(0.5)");
        assert_eq!(normalize("cos^(-1)(x)"), "cos⁻¹(x)");
        assert_eq!(normalize("cot^(-1)(1)"), "cot⁻¹(1)");
    }

    #[test]
    fn test_inverse_trig_preserves_case() {
        assert_eq!(normalize("COS^(-1)(x)"), "COS⁻¹(x)");
        assert_eq!(normalize("Tan^(-1)(y)"), "Tan⁻¹(y)");
    }

    #[test]
    fn test_rule_order_inverse_trig_with_greek() {
        // Rule-order regression: the inverse must be handled before generic
        // exponents, and pi/3 must become π/3 rather than a fraction glyph.
        assert_eq!(normalize("cos^(-1)(x) = pi/3"), "cos⁻¹(x) = π/3");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(normalize("1/2 cup and 3/4 teaspoon"), "½ cup and ¾ teaspoon");
        assert_eq!(normalize("7/8"), "⅞");
    }

    #[test]
    fn test_fractions_have_no_word_boundaries() {
        // Substring semantics: digits around the literal still match.
        assert_eq!(normalize("11/22"), "1½2");
    }

    #[test]
    fn test_simple_exponents() {
        assert_eq!(normalize("x^2 + y^2 = z^2"), "x² + y² = z²");
        assert_eq!(normalize("2^10"), "2¹⁰");
        assert_eq!(normalize("10^-3"), "10⁻³");
    }

    #[test]
    fn test_parenthesized_exponents() {
        assert_eq!(normalize("e^(2x)"), "e⁽²x⁾");
        assert_eq!(normalize("10^(n+1)"), "10⁽ⁿ⁺¹⁾");
    }

    #[test]
    fn test_parenthesized_exponent_skips_trig_bases() {
        assert_eq!(normalize("sin^(2x)"), "sin^(2x)");
        assert_eq!(normalize("arccos^(3)"), "arccos^(3)");
    }

    #[test]
    fn test_parenthesized_exponent_skips_unit_inverses() {
        // Non-trig ^(-1) and ^(1) stay literal.
        assert_eq!(normalize("x^(-1)"), "x^(-1)");
        assert_eq!(normalize("x^(1)"), "x^(1)");
        assert_eq!(normalize("x^( -1 )"), "x^( -1 )");
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(normalize("H_2O"), "H₂O");
        assert_eq!(normalize("CO_2 + H_2O"), "CO₂ + H₂O");
        assert_eq!(normalize("a_n"), "aₙ");
    }

    #[test]
    fn test_subscript_unmapped_chars_pass_through() {
        // 'q' has no subscript glyph; the underscore is still dropped.
        assert_eq!(normalize("x_q2"), "xq₂");
    }

    #[test]
    fn test_greek_letters() {
        assert_eq!(normalize("alpha + beta = gamma"), "α + β = γ");
        assert_eq!(normalize("Delta x"), "Δ x");
        assert_eq!(normalize("omega and Omega"), "ω and Ω");
    }

    #[test]
    fn test_greek_requires_word_boundaries() {
        assert_eq!(normalize("pit"), "pit");
        assert_eq!(normalize("alphabet"), "alphabet");
        assert_eq!(normalize("pi"), "π");
    }

    #[test]
    fn test_greek_is_case_sensitive_per_entry() {
        assert_eq!(normalize("PI"), "PI");
        assert_eq!(normalize("Pi"), "Π");
    }

    #[test]
    fn test_sqrt_and_degrees() {
        assert_eq!(normalize("sqrt of 16"), "√ of 16");
        assert_eq!(normalize("90 degrees"), "90 °");
        assert_eq!(normalize("1 degree"), "1 °");
        assert_eq!(normalize("45 DEGREES"), "45 °");
        assert_eq!(normalize("sqrtx"), "sqrtx");
    }

    #[test]
    fn test_operator_shorthand() {
        assert_eq!(normalize("a -> b"), "a → b");
        assert_eq!(normalize("a <-> b"), "a ↔ b");
        assert_eq!(normalize("p <=> q"), "p ⇔ q");
        assert_eq!(normalize("x <= 5 and y >= 2"), "x ≤ 5 and y ≥ 2");
        assert_eq!(normalize("a != b"), "a ≠ b");
        assert_eq!(normalize("+/- 0.5"), "± 0.5");
        assert_eq!(normalize("3 ** 4"), "3 × 4");
    }

    #[test]
    fn test_longer_arrows_win_over_shorter() {
        // `<=>` must not decay into `<=` plus `>`.
        assert_eq!(normalize("<=>"), "⇔");
        assert_eq!(normalize("<->"), "↔");
    }

    #[test]
    fn test_mixed_expression() {
        // 1/7 has no glyph and stays ASCII.
        assert_eq!(
            normalize("The area is pi * r^2, about 3 1/7 r^2"),
            "The area is π * r², about 3 1/7 r²"
        );
        assert_eq!(normalize("x_1^2 + x_2^2"), "x₁² + x₂²");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Solve the word problem and show your work.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_idempotent_on_converted_output() {
        let samples = [
            "sin^(-1)(0.5) = pi/6",
            "x^2 + H_2O and 3/4 of sqrt 2",
            "alpha -> beta <=> gamma != delta",
            "e^(2x) and x^(-1) and 2^10 degrees",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "second pass changed {sample:?}");
        }
    }

    #[test]
    fn test_normalize_deep_converts_nested_strings() {
        let mut value = json!({
            "title": "Exponents: x^2",
            "questions": ["What is 2^3?", "Simplify H_2O + CO_2"],
            "nested": { "hint": "pi is about 3.14159" },
            "count": 3,
            "published": true
        });

        normalize_deep(&mut value);

        assert_eq!(value["title"], "Exponents: x²");
        assert_eq!(value["questions"][0], "What is 2³?");
        assert_eq!(value["questions"][1], "Simplify H₂O + CO₂");
        assert_eq!(value["nested"]["hint"], "π is about 3.14159");
        assert_eq!(value["count"], 3);
        assert_eq!(value["published"], true);
    }

    #[test]
    fn test_normalize_deep_leaves_keys_alone() {
        let mut value = json!({ "x^2": "x^2" });
        normalize_deep(&mut value);

        let map = value.as_object().unwrap();
        assert!(map.contains_key("x^2"));
        assert_eq!(map["x^2"], "x²");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// One pass over shorthand-capable text settles it; a second pass
            /// is a no-op.
            #[test]
            fn prop_normalize_is_idempotent(s in "[a-zA-Z0-9 ^_()/<>=!*+,.?-]{0,48}") {
                let once = normalize(&s);
                prop_assert_eq!(normalize(&once), once);
            }

            /// Text over an alphabet with no shorthand tokens is a fixed point.
            #[test]
            fn prop_clean_text_unchanged(s in "[bcdfgjklmnpqvwxz ]{0,48}") {
                prop_assert_eq!(normalize(&s), s);
            }

            /// The conversion is total over arbitrary input.
            #[test]
            fn prop_normalize_total(s in "\\PC*") {
                let _ = normalize(&s);
            }

            /// The deep walk touches only string values.
            #[test]
            fn prop_deep_preserves_non_strings(n in any::<i64>(), b in any::<bool>()) {
                let mut value = json!({ "n": n, "b": b, "null": null });
                normalize_deep(&mut value);
                prop_assert_eq!(&value["n"], &json!(n));
                prop_assert_eq!(&value["b"], &json!(b));
                prop_assert!(value["null"].is_null());
            }
        }
    }
}
