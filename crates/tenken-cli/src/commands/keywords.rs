use std::collections::HashSet;
use std::path::Path;
use tenken_core::error::TenkenError;
use tenken_core::lexicon::builtin;
use tenken_core::lexicon::schema::KeywordLexicon;

pub fn show() -> Result<(), TenkenError> {
    for name in builtin::PRESETS {
        let lex = builtin::load_preset(name)?;
        println!("{} (v{}) [{}]\n", lex.name, lex.version, name);
        if let Some(ref desc) = lex.description {
            println!("{}\n", desc);
        }
        print_set("Urgent (緊急)", &lex.urgent);
        print_set("Attention (要注意)", &lex.attention);
        print_set("Remediation: done", &lex.remediation.done);
        print_set("Remediation: in progress", &lex.remediation.in_progress);
        print_set("Remediation: planned", &lex.remediation.planned);
    }

    println!("A line containing an urgent keyword is an urgent finding; a line");
    println!("containing an attention keyword is an issue. Remediation keywords");
    println!("are checked in the order done, in progress, planned.");
    Ok(())
}

fn print_set(label: &str, keywords: &[String]) {
    println!("  {label}:");
    if keywords.is_empty() {
        println!("    (none)");
    } else {
        println!("    {}", keywords.join(", "));
    }
    println!();
}

pub fn validate(file: &Path) -> Result<(), TenkenError> {
    let lex = tenken_core::lexicon::load_lexicon(file)?;

    println!("Lexicon '{}' (v{}) is valid.", lex.name, lex.version);
    println!(
        "  Keywords: {} urgent, {} attention, {} remediation",
        lex.urgent.len(),
        lex.attention.len(),
        lex.remediation.done.len()
            + lex.remediation.in_progress.len()
            + lex.remediation.planned.len()
    );

    let warnings = lint(&lex);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

/// Suspicious but legal lexicon contents.
fn lint(lex: &KeywordLexicon) -> Vec<String> {
    let mut warnings = Vec::new();

    let urgent: HashSet<&str> = lex.urgent.iter().map(String::as_str).collect();
    for kw in &lex.attention {
        if urgent.contains(kw.as_str()) {
            warnings.push(format!("'{kw}' is listed as both urgent and attention"));
        }
    }

    for (set, keywords) in [
        ("urgent", &lex.urgent),
        ("attention", &lex.attention),
        ("remediation.done", &lex.remediation.done),
        ("remediation.in_progress", &lex.remediation.in_progress),
        ("remediation.planned", &lex.remediation.planned),
    ] {
        let mut seen = HashSet::new();
        for kw in keywords {
            if !seen.insert(kw.as_str()) {
                warnings.push(format!("'{kw}' appears more than once in {set}"));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lexicon_is_clean() {
        let lex = builtin::default_lexicon().unwrap();
        assert!(lint(&lex).is_empty());
    }

    #[test]
    fn test_lint_flags_overlap_and_repeats() {
        let mut lex = builtin::default_lexicon().unwrap();
        lex.attention.push("漏水".into());
        lex.remediation.done.push("完了".into());
        let warnings = lint(&lex);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("both urgent and attention"));
        assert!(warnings[1].contains("remediation.done"));
    }

    #[test]
    fn test_validate_rejects_empty_urgent_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"name": "x", "version": "1", "urgent": [], "attention": ["錆"]}"#,
        )
        .unwrap();
        assert!(validate(&path).is_err());
    }
}
