use super::*;
use crate::extract::{ContextExtractor, FALLBACK_DOMAIN, FALLBACK_TITLE};

fn synthesizer() -> SectionSynthesizer {
    SectionSynthesizer::new(SectionHeadings::default())
}

fn context_for(text: &str) -> ExtractionContext {
    ContextExtractor::new()
        .expect("compile extractor")
        .extract(text)
}

fn upgrade(text: &str) -> Upgrade {
    synthesizer().upgrade(&Document::new(text), &context_for(text))
}

#[test]
fn empty_document_gains_all_nine_sections_in_order() {
    let result = upgrade("");
    assert_eq!(result.added, SectionKind::ALL.to_vec());

    let text = result.document.text();
    let headings = SectionHeadings::default();
    let mut last = 0;
    for kind in SectionKind::ALL {
        let line = headings.line(kind);
        let pos = text.find(&line).expect("heading present");
        assert!(pos >= last, "{} out of order", kind.key());
        last = pos;
    }
    assert!(text.starts_with("\n\n## Why This Skill Exists\n"));
    assert!(text.ends_with('\n'));
}

#[test]
fn fallback_literals_render_in_bodies() {
    let text = upgrade("").document.into_text();
    assert!(text.contains(&format!("operationalizes **{FALLBACK_TITLE}** for {FALLBACK_DOMAIN}.")));
    assert!(text.contains("Run when new this domain signals arrive"));
    assert!(text.contains("requiring this capability normalization/assessment"));
    assert!(text.contains("- Produces: `This capability` execution artifacts"));
}

#[test]
fn upgrade_is_idempotent() {
    let source = "---\nname: u0007-demo\ndescription: \"Demo\" for QA. Use often.\n---\n# Demo\n";
    let once = upgrade(source);
    assert!(once.changed());

    let ctx = context_for(once.document.text());
    let twice = synthesizer().upgrade(&once.document, &ctx);
    assert!(!twice.changed());
    assert_eq!(twice.document, once.document);

    let headings = SectionHeadings::default();
    for kind in SectionKind::ALL {
        let line = headings.line(kind);
        assert_eq!(twice.document.text().matches(&line).count(), 1);
    }
}

#[test]
fn existing_sections_are_kept_and_not_duplicated() {
    let source = "# Demo\n\n## When To Use\nCustom guidance.\n\n## Output Contract\n- custom\n";
    let result = upgrade(source);
    assert!(result.document.text().starts_with(source));
    assert!(!result.added.contains(&SectionKind::When));
    assert!(!result.added.contains(&SectionKind::OutputContract));
    assert_eq!(result.added.len(), 7);
    assert_eq!(result.document.text().matches("## When To Use").count(), 1);
}

#[test]
fn missing_trailing_newline_is_added_before_append() {
    let doc = Document::new("# Title");
    let next = doc
        .with_section("## Extra", "  body text \n")
        .expect("section appended");
    assert_eq!(next.text(), "# Title\n\n## Extra\nbody text\n");
    assert!(next.with_section("## Extra", "again").is_none());
}

#[test]
fn bodies_use_extracted_context() {
    let source = "---\ndescription: Uses \"Churn Forecast\" for Retail Analytics. Trigger weekly.\n---\n# Forecasting\n";
    let text = upgrade(source).document.into_text();
    assert!(text.contains("operationalizes **Churn Forecast** for Retail Analytics."));
    assert!(text.contains("Run when new retail analytics signals arrive"));
    assert!(text.contains("requiring churn forecast normalization/assessment"));
}

#[test]
fn every_body_is_non_empty_and_deterministic() {
    let ctx = context_for("");
    for kind in SectionKind::ALL {
        let body = section_body(kind, &ctx);
        assert!(!body.trim().is_empty(), "{} body empty", kind.key());
        assert_eq!(body, section_body(kind, &ctx));
    }
}

#[test]
fn examples_body_keeps_nested_indentation() {
    let body = section_body(SectionKind::Examples, &context_for(""));
    assert!(body.contains("**\n   - Input: noisy upstream payload"));
    assert!(body.contains("\n2. **Planned delivery quality check**\n"));
}

#[test]
fn validation_gates_body_matches_published_wording() {
    let body = section_body(SectionKind::ValidationGates, &context_for(""));
    assert_eq!(
        body,
        "1. **schema-contract-check** \u{2014} Required inputs are present and schema-valid (on fail: block).\n\
         2. **determinism-check** \u{2014} Stable output under repeated runs on identical input (on fail: escalate).\n\
         3. **policy-approval-check** \u{2014} Required approvals and policy constraints satisfied (on fail: block publish)."
    );
}
